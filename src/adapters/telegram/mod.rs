//! Telegram adapter - Bot API transport for the command router.
//!
//! - `TelegramClient` - `getUpdates`, `sendMessage`, `sendPhoto`,
//!   `answerCallbackQuery`
//! - `TelegramBot` - long-polling loop dispatching updates to the router

mod client;
mod poller;
mod types;

pub use client::{TelegramClient, TelegramConfig, TelegramError, DEFAULT_API_BASE_URL};
pub use poller::{handle_incoming, TelegramBot};
pub use types::{Incoming, InlineKeyboardButton, InlineKeyboardMarkup, Update};
