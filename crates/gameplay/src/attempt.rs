use rbb_core::Millis;
use rbb_core::Side;
use serde::Deserialize;
use serde::Serialize;

/// One side's free-throw attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attempt {
    pub side: Side,
    pub start: Millis,
    pub end: Option<Millis>,
    pub did_score: bool,
    pub is_confirmed: bool,
}

impl Attempt {
    pub fn open(side: Side, start: Millis) -> Self {
        Self {
            side,
            start,
            end: None,
            did_score: false,
            is_confirmed: false,
        }
    }
    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }
    pub fn is_settled(&self) -> bool {
        self.end.is_some() && self.is_confirmed
    }
}
