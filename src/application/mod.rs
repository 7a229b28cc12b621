//! Application layer - Commands, Queries, Handlers and the chat router.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers (write) and query handlers (read) are kept separate.

mod answer_synthesizer;
pub mod bot;
pub mod handlers;

pub use answer_synthesizer::AnswerSynthesizer;
pub use bot::{CommandRouter, Inbound, Reply, RouterPorts, RouterSettings, Sender};
