use rbb_core::Millis;
use serde::Deserialize;
use serde::Serialize;

/// A recorded score or foul.
///
/// Marks are never removed. A referee correction flips `is_valid`
/// and leaves the entry in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mark {
    pub time: Millis,
    pub is_valid: bool,
}

impl Mark {
    pub fn at(time: Millis) -> Self {
        Self {
            time,
            is_valid: true,
        }
    }
}

/// Count the still-valid marks in a list.
pub fn count_valid(marks: &[Mark]) -> usize {
    marks.iter().filter(|m| m.is_valid).count()
}
