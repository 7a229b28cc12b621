//! Tarot Bot - Conversational tarot readings over a chat bot.
//!
//! Users onboard with a short name / age / gender conversation, ask a
//! question, and receive three distinct cards plus a synthesized answer. The
//! first reading is free; later ones are paid from a per-user balance that
//! is debited atomically.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
