//! Tournament stages for robot basketball.
//!
//! A competition runs a Swiss-system stage, a double-elimination
//! bracket, or the first feeding its top finishers into the second.
//! Stages own their [`rbb_gameplay::Match`]es and react when one ends.
//!
//! ## Stages
//!
//! - [`SwissStage`] — Rank-based rounds without rematches
//! - [`EliminationStage`] — Two-loss bracket with first and second finals
//! - [`Stage`] — Command routing and event relay shared by both
//!
//! ## Scoring & Pairing
//!
//! - [`award`] — Points per match outcome
//! - [`Standing`] — Score, tiebreak, and rank
//! - [`pair`] — Greedy pairing with a weighted matching fallback
//! - [`Lookahead`] — Keeps later Swiss rounds pairable
//! - [`max_weight_matching`] — Blossom solver
//! - [`SideBook`] — Starting-basket balancing
mod elimination;
mod error;
mod event;
mod lookahead;
mod matching;
mod pairing;
mod points;
mod sides;
mod stage;
mod swiss;

pub use elimination::*;
pub use error::*;
pub use event::*;
pub use lookahead::*;
pub use matching::*;
pub use pairing::*;
pub use points::*;
pub use sides::*;
pub use stage::*;
pub use swiss::*;

#[cfg(test)]
mod tests;
