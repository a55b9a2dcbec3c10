use super::*;
use rbb_core::*;
use rbb_gameplay::*;
use serde::Deserialize;
use serde::Serialize;

/// Points each side earns from a match, or `None` while undecided.
///
/// | tallies (winner's view) | winner | loser |
/// |---|---|---|
/// | 2 wins | 10 | 0 |
/// | 2 wins, 1 tie | 9 | 1 |
/// | 2 wins, 1 loss | 8 | 2 |
/// | 1 win, 2 ties | 7 | 3 |
/// | tie | 5 | 5 |
pub fn award(status: &Status) -> Result<Option<[Points; 2]>, StageError> {
    match status.result {
        Outcome::Unknown => Ok(None),
        Outcome::Tied => Ok(Some([POINTS_TIE, POINTS_TIE])),
        Outcome::Won => {
            let (wins, losses, ties) = status.counts();
            let points = match (wins, losses, ties) {
                (2, 0, 0) => POINTS_SWEEP,
                (2, 0, 1) => POINTS_WIN_WITH_TIE,
                (2, 1, 0) => POINTS_WIN_WITH_LOSS,
                (1, 0, 2) => POINTS_NARROW_WIN,
                _ => return Err(StageError::Unscored { wins, losses, ties }),
            };
            let mut award = [POINTS_TOTAL - points; 2];
            if let Some(winner) = status.winner {
                award[winner] = points;
            }
            Ok(Some(award))
        }
    }
}

/// A contestant's position in a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub contestant: ID<Contestant>,
    pub score: Points,
    pub tiebreak: Points,
    /// 1 is best.
    pub rank: usize,
}

/// Rank a field by score, then tiebreak, then roster order.
pub fn rank(mut field: Vec<(ID<Contestant>, Points, Points)>) -> Vec<Standing> {
    // stable sort keeps roster order among equals
    field.sort_by(|a, b| b.1.cmp(&a.1).then(b.2.cmp(&a.2)));
    field
        .into_iter()
        .enumerate()
        .map(|(i, (contestant, score, tiebreak))| Standing {
            contestant,
            score,
            tiebreak,
            rank: i + 1,
        })
        .collect()
}
