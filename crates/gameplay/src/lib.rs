//! Robot basketball match engine.
//!
//! A match is a nested state machine: timed rounds, then an optional
//! free-throw series, each unit gated by referee confirmation before the
//! next one opens. Every operation is pure with respect to time: callers
//! pass `now` in milliseconds.
//!
//! ## Units of Play
//!
//! - [`Round`] — Timed scoring period with pausable clock, scores, and fouls
//! - [`FreeThrows`] — Sudden-death tiebreak of alternating [`Attempt`]s
//! - [`Match`] — Composes rounds and free throws; computes [`Status`]
//!
//! ## Records
//!
//! - [`Mark`] — A score or foul entry with a correctable validity flag
//! - [`Run`] — One uninterrupted stretch of a round's clock
//! - [`Basket`] — Blue or magenta scoring target
//! - [`Contestant`] — A robot's identity
//!
//! ## Interaction
//!
//! - [`Command`] — Referee and basket-counter inputs
//! - [`MatchEvent`] — Change notifications drained by the owner
//! - [`MatchView`] — Broadcast snapshot with clock readings
mod attempt;
mod basket;
mod command;
mod contestant;
mod error;
mod event;
mod freethrows;
mod game;
mod mark;
mod placement;
mod round;
mod run;
mod status;
mod view;

pub use attempt::*;
pub use basket::*;
pub use command::*;
pub use contestant::*;
pub use error::*;
pub use event::*;
pub use freethrows::*;
pub use game::*;
pub use mark::*;
pub use placement::*;
pub use round::*;
pub use run::*;
pub use status::*;
pub use view::*;

#[cfg(test)]
mod tests;
