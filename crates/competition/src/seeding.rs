use rand::Rng;
use rand::seq::SliceRandom;
use rbb_core::*;
use rbb_gameplay::Contestant;
use rbb_tournament::Standing;

/// Bracket seeds from final Swiss standings.
///
/// The top [`ELIMINATION_SEED_CUT`] qualify, plus anyone level with the
/// last of them on both score and tiebreak. Contestants level with each
/// other are shuffled among themselves.
pub fn seed(standings: &[Standing], rng: &mut impl Rng) -> Vec<ID<Contestant>> {
    let key = |s: &Standing| (s.score, s.tiebreak);
    let mut ranked = standings.to_vec();
    ranked.sort_by_key(|s| s.rank);
    let cut = ranked.get(ELIMINATION_SEED_CUT.saturating_sub(1)).map(key);
    let qualified = ranked
        .iter()
        .enumerate()
        .take_while(|(i, s)| *i < ELIMINATION_SEED_CUT || Some(key(s)) == cut)
        .map(|(_, s)| *s)
        .collect::<Vec<_>>();
    let mut seeds = Vec::with_capacity(qualified.len());
    for group in qualified.chunk_by(|a, b| key(a) == key(b)) {
        let mut group = group.iter().map(|s| s.contestant).collect::<Vec<_>>();
        group.shuffle(rng);
        seeds.extend(group);
    }
    seeds
}
