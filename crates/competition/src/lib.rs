//! Competition orchestration for robot basketball.
//!
//! A [`Competition`] owns the roster, the configured tournament stages,
//! exhibition matches, and the one match currently on the field. It is
//! the single entry point for commands and the single source of events.
//!
//! ## Orchestration
//!
//! - [`Competition`] — Roster, stage lifecycle, and command routing
//! - [`TournamentConfig`] — Which stages to run
//! - [`Exhibition`] — Matches created on demand outside the stages
//! - [`seed`] — Elimination seeds from Swiss standings
//!
//! ## Output
//!
//! - [`CompetitionEvent`] — Relayed changes for broadcast and persistence
//! - [`CompetitionView`] — Full broadcast snapshot
//! - [`RobotsView`] — Targets and baskets for the robots
//! - [`CompetitionRecord`] — Stored form
mod competition;
mod config;
mod error;
mod event;
mod exhibition;
mod seeding;
mod view;

pub use competition::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use exhibition::*;
pub use seeding::*;
pub use view::*;

#[cfg(test)]
mod tests;
