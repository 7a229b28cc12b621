//! Chat surface - transport-neutral commands, replies and routing.
//!
//! Transports turn platform updates into [`Inbound`] values and render the
//! returned [`Reply`]; everything in between lives here.

mod command;
pub mod messages;
mod reply;
mod router;

pub use command::{BotCommand, CallbackAction, MenuAction};
pub use reply::{Button, Keyboard, Photo, Reply};
pub use router::{CommandRouter, Inbound, RouterPorts, RouterSettings, Sender};
