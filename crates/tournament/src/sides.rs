use rand::Rng;
use rbb_core::ID;
use rbb_gameplay::*;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-contestant history of starting baskets, used to balance sides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SideBook(BTreeMap<ID<Contestant>, Vec<Basket>>);

impl SideBook {
    pub fn new(contestants: &[ID<Contestant>]) -> Self {
        Self(contestants.iter().map(|c| (*c, Vec::new())).collect())
    }
    /// Carry over the histories of `contestants` from an earlier stage.
    pub fn inherit(&self, contestants: &[ID<Contestant>]) -> Self {
        Self(
            contestants
                .iter()
                .map(|c| (*c, self.history(*c).to_vec()))
                .collect(),
        )
    }
    pub fn history(&self, id: ID<Contestant>) -> &[Basket] {
        self.0.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }
    /// Less-used basket; on a tie, the opposite of the most recent.
    pub fn preference(&self, id: ID<Contestant>) -> Option<Basket> {
        let history = self.history(id);
        let last = history.last()?;
        let blue = history.iter().filter(|b| **b == Basket::Blue).count();
        let magenta = history.len() - blue;
        Some(match blue.cmp(&magenta) {
            std::cmp::Ordering::Equal => last.opposite(),
            std::cmp::Ordering::Greater => Basket::Magenta,
            std::cmp::Ordering::Less => Basket::Blue,
        })
    }
    /// Starting baskets for a new match between `pair`.
    pub fn assign(&self, pair: [ID<Contestant>; 2], rng: &mut impl Rng) -> [Basket; 2] {
        decide([self.preference(pair[0]), self.preference(pair[1])], rng)
    }
    pub fn record(&mut self, pair: [ID<Contestant>; 2], baskets: [Basket; 2]) {
        for (id, basket) in pair.into_iter().zip(baskets) {
            self.0.entry(id).or_default().push(basket);
        }
    }
}

/// Honor distinct preferences, give a lone preference its basket, and
/// flip a coin otherwise.
pub fn decide(preferences: [Option<Basket>; 2], rng: &mut impl Rng) -> [Basket; 2] {
    match preferences {
        [Some(a), Some(b)] if a != b => [a, b],
        [Some(a), None] => a.pair(),
        [None, Some(b)] => [b.opposite(), b],
        _ => Basket::random(rng).pair(),
    }
}
