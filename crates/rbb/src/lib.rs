//! Robot basketball competition toolkit.
//!
//! This facade crate re-exports all public rbb crates for convenient access.
//!
//! ## Crate Organization
//!
//! ### Core Types
//! - [`core`] — Type aliases, identifiers, and rule constants
//!
//! ### Domain Logic
//! - [`gameplay`] — Match engine: rounds, free throws, status
//! - [`tournament`] — Swiss and double-elimination stages
//! - [`competition`] — Roster, stage lifecycle, active match
//!
//! ### Infrastructure
//! - [`save`] — Versioned JSON snapshots
//!
//! ### Application
//! - [`gameroom`] — Async arena loop and wire protocol

pub use rbb_core        as core;
pub use rbb_gameplay    as gameplay;
pub use rbb_tournament  as tournament;
pub use rbb_competition as competition;
pub use rbb_save        as save;
pub use rbb_gameroom    as gameroom;

// Re-export commonly used types at the root
pub use rbb_core::*;
