use rbb_core::ID;
use rbb_gameplay::Contestant;
use std::collections::BTreeMap;

/// Search steps allowed per round before lookahead gives up and
/// assumes the remaining rounds can be paired.
const BUDGET: usize = 1 << 20;

/// One round's choice: the bye recipient, if any, and the pairs.
pub type Draw = (Option<ID<Contestant>>, Vec<[ID<Contestant>; 2]>);

/// Unplayed pairings of a field, used to check that a round leaves the
/// rest of the stage pairable.
///
/// Slots are in rank order. An odd field gains a trailing bye slot whose
/// partner in a round is the bye recipient; it is open only to
/// contestants who have not had a bye.
#[derive(Debug, Clone)]
pub struct Lookahead {
    slots: Vec<Option<ID<Contestant>>>,
    index: BTreeMap<ID<Contestant>, usize>,
    open: Vec<Vec<bool>>,
    steps: usize,
}

impl Lookahead {
    pub fn new(
        ranked: &[ID<Contestant>],
        played: impl Fn(ID<Contestant>, ID<Contestant>) -> bool,
        has_bye: impl Fn(ID<Contestant>) -> bool,
    ) -> Self {
        let mut slots = ranked.iter().copied().map(Some).collect::<Vec<_>>();
        if slots.len() % 2 == 1 {
            slots.push(None);
        }
        let index = ranked.iter().enumerate().map(|(i, c)| (*c, i)).collect();
        let open = slots
            .iter()
            .map(|a| {
                slots
                    .iter()
                    .map(|b| match (a, b) {
                        (Some(a), Some(b)) => a != b && !played(*a, *b),
                        (Some(c), None) | (None, Some(c)) => !has_bye(*c),
                        (None, None) => false,
                    })
                    .collect()
            })
            .collect();
        Self {
            slots,
            index,
            open,
            steps: 0,
        }
    }
    /// Search steps spent so far.
    pub fn steps(&self) -> usize {
        self.steps
    }
    /// Most rounds, up to `wanted`, that can still follow the next one.
    pub fn horizon(&mut self, wanted: usize) -> usize {
        (0..=wanted)
            .rev()
            .find(|rounds| self.completable(rounds + 1))
            .unwrap_or(0)
    }
    /// Whether `remaining` more rounds can still be paired once `draw`
    /// has been played.
    pub fn allows(&mut self, draw: &Draw, remaining: usize) -> bool {
        let edges = self.edges(draw);
        edges.iter().for_each(|&(i, j)| self.set(i, j, false));
        let allowed = self.completable(remaining);
        edges.iter().for_each(|&(i, j)| self.set(i, j, true));
        allowed
    }
    /// The first draw, top-ranked slots paired first and each with its
    /// closest-ranked partner, that leaves `remaining` more rounds
    /// pairable. Pairs are returned with the highest-ranked pair last.
    pub fn search(&mut self, remaining: usize) -> Option<Draw> {
        let mut mate = vec![None; self.slots.len()];
        if !self.extend(&mut mate, remaining + 1) {
            return None;
        }
        let mut bye = None;
        let mut pairs = Vec::new();
        for (i, j) in mate.iter().enumerate().filter_map(|(i, m)| m.map(|j| (i, j))) {
            match (self.slots[i], self.slots[j]) {
                (Some(a), Some(b)) if i < j => pairs.push((i, [a, b])),
                (Some(c), None) => bye = Some(c),
                _ => {}
            }
        }
        pairs.sort_by_key(|(i, _)| std::cmp::Reverse(*i));
        Some((bye, pairs.into_iter().map(|(_, pair)| pair).collect()))
    }
}

impl Lookahead {
    fn edges(&self, (bye, pairs): &Draw) -> Vec<(usize, usize)> {
        let bye_slot = self.slots.len() - 1;
        pairs
            .iter()
            .filter_map(|[a, b]| Some((*self.index.get(a)?, *self.index.get(b)?)))
            .chain(bye.as_ref().and_then(|c| self.index.get(c)).map(|i| (*i, bye_slot)))
            .collect()
    }
    fn set(&mut self, i: usize, j: usize, open: bool) {
        self.open[i][j] = open;
        self.open[j][i] = open;
    }
    /// Whether `rounds` edge-disjoint perfect pairings remain. Optimistic
    /// once the step budget is spent.
    fn completable(&mut self, rounds: usize) -> bool {
        if rounds == 0 {
            return true;
        }
        if self.steps >= BUDGET {
            log::debug!("[lookahead] budget spent, assuming pairable");
            return true;
        }
        if self
            .open
            .iter()
            .any(|row| row.iter().filter(|o| **o).count() < rounds)
        {
            return false;
        }
        let mut mate = vec![None; self.slots.len()];
        self.extend(&mut mate, rounds)
    }
    /// Complete a pairing from the first unpaired slot. On success `mate`
    /// holds the pairing.
    fn extend(&mut self, mate: &mut [Option<usize>], rounds: usize) -> bool {
        let Some(i) = mate.iter().position(Option::is_none) else {
            let pairs = mate
                .iter()
                .enumerate()
                .filter_map(|(i, m)| m.filter(|j| i < *j).map(|j| (i, j)))
                .collect::<Vec<_>>();
            pairs.iter().for_each(|&(i, j)| self.set(i, j, false));
            let completable = self.completable(rounds - 1);
            pairs.iter().for_each(|&(i, j)| self.set(i, j, true));
            return completable;
        };
        for j in i + 1..mate.len() {
            if mate[j].is_some() || !self.open[i][j] {
                continue;
            }
            self.steps += 1;
            mate[i] = Some(j);
            mate[j] = Some(i);
            if self.extend(mate, rounds) {
                return true;
            }
            mate[i] = None;
            mate[j] = None;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn field(n: usize) -> Vec<ID<Contestant>> {
        (0..n).map(|_| ID::default()).collect()
    }

    #[test]
    fn fresh_even_field_allows_full_round_robin() {
        let ids = field(6);
        let ref mut lookahead = Lookahead::new(&ids, |_, _| false, |_| false);
        let draw = (None, vec![[ids[0], ids[1]], [ids[2], ids[3]], [ids[4], ids[5]]]);
        assert!(lookahead.allows(&draw, 4));
        assert!(!lookahead.allows(&draw, 5));
    }
    #[test]
    fn dead_end_round_is_refused() {
        // two rounds of six played; 0-5 1-3 2-4 would leave two triangles
        let ids = field(6);
        let history = BTreeSet::from([
            (ids[0], ids[1]),
            (ids[2], ids[3]),
            (ids[4], ids[5]),
            (ids[0], ids[2]),
            (ids[1], ids[4]),
            (ids[3], ids[5]),
        ]);
        let played = |a: ID<Contestant>, b: ID<Contestant>| {
            history.contains(&(a, b)) || history.contains(&(b, a))
        };
        let ref mut lookahead = Lookahead::new(&ids, played, |_| false);
        let dead_end = (None, vec![[ids[2], ids[4]], [ids[1], ids[3]], [ids[0], ids[5]]]);
        assert!(!lookahead.allows(&dead_end, 2));
        let draw = lookahead.search(2).unwrap();
        assert_eq!(
            draw,
            (None, vec![[ids[2], ids[4]], [ids[1], ids[5]], [ids[0], ids[3]]])
        );
        assert!(lookahead.allows(&draw, 2));
    }
    #[test]
    fn odd_field_draws_one_bye() {
        let ids = field(5);
        let ref mut lookahead = Lookahead::new(&ids, |_, _| false, |c| c == ids[4]);
        let (bye, pairs) = lookahead.search(3).unwrap();
        let bye = bye.unwrap();
        assert_ne!(bye, ids[4]);
        assert_eq!(pairs.len(), 2);
        assert!(pairs.iter().all(|p| !p.contains(&bye)));
    }
    #[test]
    fn horizon_caps_at_a_round_robin() {
        let ids = field(6);
        let ref mut lookahead = Lookahead::new(&ids, |_, _| false, |_| false);
        assert_eq!(lookahead.horizon(2), 2);
        assert_eq!(lookahead.horizon(9), 4);
    }
    #[test]
    fn too_many_rounds_have_no_draw() {
        let ids = field(4);
        let ref mut lookahead = Lookahead::new(&ids, |_, _| false, |_| false);
        assert!(lookahead.search(2).is_some());
        assert!(lookahead.search(3).is_none());
    }
}
