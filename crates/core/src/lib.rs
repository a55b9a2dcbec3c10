//! Core type aliases, identifiers, and rule constants for robobasket.
//!
//! This crate provides the foundational types and competition rules
//! shared by every other crate in the workspace.
#![allow(dead_code)]

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Wall-clock timestamps and durations in milliseconds since the Unix epoch.
pub type Millis = i64;
/// Side of a match (0 = left/first contestant, 1 = right/second contestant).
pub type Side = usize;
/// Tournament points in tenths (a 2-0 win is worth 10).
pub type Points = u32;
/// Numeric match identifier, unique within a competition.
pub type MatchId = u32;

// ============================================================================
// TRAITS
// ============================================================================
/// Unique identifier trait for domain entities.
pub trait Unique<T = Self> {
    fn id(&self) -> ID<T>;
}

// ============================================================================
// IDENTITY TYPES
// ============================================================================
use std::cmp::Ordering;
use std::fmt::Formatter;
use std::marker::PhantomData;

/// Identifier of a contestant or competition.
///
/// Backed by a uuid v7, so ids sort in creation order. Stored and sent
/// as the full hyphenated uuid; logs show only the random tail.
pub struct ID<T> {
    uuid: uuid::Uuid,
    kind: PhantomData<fn() -> T>,
}

impl<T> ID<T> {
    /// Last eight hex digits. The leading digits are a timestamp and
    /// repeat across ids minted close together.
    pub fn short(&self) -> String {
        let simple = self.uuid.simple().to_string();
        simple[simple.len() - 8..].to_string()
    }
}

impl<T> Default for ID<T> {
    fn default() -> Self {
        Self {
            uuid: uuid::Uuid::now_v7(),
            kind: PhantomData,
        }
    }
}

impl<T> Copy for ID<T> {}
impl<T> Clone for ID<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Eq for ID<T> {}
impl<T> PartialEq for ID<T> {
    fn eq(&self, other: &Self) -> bool {
        self.uuid == other.uuid
    }
}
impl<T> Ord for ID<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.uuid.cmp(&other.uuid)
    }
}
impl<T> PartialOrd for ID<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> std::fmt::Debug for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let kind = std::any::type_name::<T>().rsplit("::").next().unwrap_or("ID");
        write!(f, "{}#{}", kind, self.short())
    }
}
impl<T> std::fmt::Display for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.short())
    }
}

impl<T> serde::Serialize for ID<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.uuid.serialize(serializer)
    }
}
impl<'de, T> serde::Deserialize<'de> for ID<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        uuid::Uuid::deserialize(deserializer).map(|uuid| Self {
            uuid,
            kind: PhantomData,
        })
    }
}

// ============================================================================
// MATCH RULES
// ============================================================================
/// Time limit of each of the three main rounds.
pub const MAIN_ROUND_LENGTH: Millis = 60_000;
/// Time limit of each extra round (rounds 4 to 6).
pub const EXTRA_ROUND_LENGTH: Millis = 30_000;
/// Time limit of a single free-throw attempt.
pub const FREE_THROW_ATTEMPT_LENGTH: Millis = 10_000;
/// Guaranteed free-throw rounds before sudden death.
pub const FREE_THROW_MIN_ROUNDS: usize = 3;
/// Best-of-three main rounds.
pub const MAIN_ROUNDS: usize = 3;
/// Main rounds plus extra rounds.
pub const MAX_ROUNDS: usize = 6;
/// Round wins needed to take the match during the main rounds.
pub const ROUND_WINS_NEEDED: usize = 2;
/// Valid fouls after which a robot must return to its corner.
pub const BACK_TO_CORNER_FOUL_COUNT: usize = 1;
/// Valid fouls after which a robot sits out the rest of the round.
pub const OUT_OF_ROUND_FOUL_COUNT: usize = 2;

// ============================================================================
// TOURNAMENT RULES
// Points are tenths: the winner and loser of a match always share 10.
// ============================================================================
/// Points for winning both of two rounds.
pub const POINTS_SWEEP: Points = 10;
/// Points for two round wins and one tied round.
pub const POINTS_WIN_WITH_TIE: Points = 9;
/// Points for two round wins and one lost round.
pub const POINTS_WIN_WITH_LOSS: Points = 8;
/// Points for one round win and two tied rounds.
pub const POINTS_NARROW_WIN: Points = 7;
/// Points each side takes from a tied match.
pub const POINTS_TIE: Points = 5;
/// Points credited for a bye.
pub const POINTS_BYE: Points = 10;
/// Total points shared by the two sides of a decided match.
pub const POINTS_TOTAL: Points = 10;
/// Swiss finishers guaranteed a seed in the elimination bracket.
pub const ELIMINATION_SEED_CUT: usize = 4;
/// Elimination match ids start after this offset.
pub const ELIMINATION_ID_OFFSET: MatchId = 1000;
/// Exhibition match ids start after this offset.
pub const EXHIBITION_ID_OFFSET: MatchId = 2000;

// ============================================================================
// RUNTIME PARAMETERS
// ============================================================================
/// Interval between round/attempt time-limit checks.
pub const TICK_INTERVAL: std::time::Duration = std::time::Duration::from_millis(100);
/// Quiet period before a competition summary is broadcast.
pub const SUMMARY_DEBOUNCE: std::time::Duration = std::time::Duration::from_millis(500);

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now() -> Millis {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as Millis)
        .unwrap_or_default()
}

/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, INFO to terminal.
#[cfg(feature = "server")]
pub fn log() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}
