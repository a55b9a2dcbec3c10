//! Async runtime for a live robot basketball competition.
//!
//! An [`Arena`] owns the competition and serializes every mutation:
//! client requests and clock ticks are handled one at a time, and the
//! resulting changes are broadcast and saved.
//!
//! ## Architecture
//!
//! - [`Arena`] — Single-owner event loop over requests and ticks
//! - [`Ticker`] — Polling clock armed while a match clock runs
//!
//! ## Wire Format
//!
//! - [`Request`] — Client requests, one JSON object per line
//! - [`ServerMessage`] — Broadcasts to clients and robots
mod arena;
mod message;
mod protocol;
mod ticker;

pub use arena::*;
pub use message::*;
pub use protocol::*;
pub use ticker::*;
