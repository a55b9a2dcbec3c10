use super::*;
use petgraph::graph::NodeIndex;
use petgraph::graph::UnGraph;
use rbb_core::ID;
use rbb_gameplay::Contestant;

/// Largest field the weight scheme can express without overflow.
const MAX_FIELD: usize = 48;

/// Pair an even field of standings so that no pair has met before.
///
/// A greedy pass pairs each contestant, best first, with the next-best
/// unpaired contestant they haven't played. If it dead-ends, a
/// maximum-weight perfect matching is solved instead. The weights make
/// pairing higher-ranked contestants dominate, and among a contestant's
/// candidates prefer the closest-ranked. Pairs are returned with the
/// highest-ranked pair last.
pub fn pair(
    standings: &[Standing],
    played: impl Fn(ID<Contestant>, ID<Contestant>) -> bool,
) -> Result<Vec<[ID<Contestant>; 2]>, StageError> {
    let mut field = standings.to_vec();
    field.sort_by_key(|s| s.rank);
    if field.len() % 2 == 1 {
        return Err(StageError::Pairing(format!(
            "odd field of {}",
            field.len()
        )));
    }
    let ids = field.iter().map(|s| s.contestant).collect::<Vec<_>>();
    let mut pairs = match greedy(&ids, &played) {
        Some(pairs) => pairs,
        None => {
            log::debug!("[pairing] greedy dead end, solving weighted matching");
            weighted(&ids, &played)?
        }
    };
    pairs.sort_by_key(|&(i, j)| std::cmp::Reverse(i.min(j)));
    Ok(pairs.into_iter().map(|(i, j)| [ids[i], ids[j]]).collect())
}

/// Pair positions in rank order, or `None` at a dead end.
fn greedy(
    ids: &[ID<Contestant>],
    played: &impl Fn(ID<Contestant>, ID<Contestant>) -> bool,
) -> Option<Vec<(usize, usize)>> {
    let mut taken = vec![false; ids.len()];
    let mut pairs = Vec::new();
    for i in 0..ids.len() {
        if taken[i] {
            continue;
        }
        let j = (i + 1..ids.len()).find(|&j| !taken[j] && !played(ids[i], ids[j]))?;
        taken[i] = true;
        taken[j] = true;
        pairs.push((i, j));
    }
    Some(pairs)
}

/// Edge weights over unplayed pairs, positions in rank order.
///
/// For position `i` with `e = n - 1 - i`, the edge to its `k`-th
/// unplayed successor weighs `2^e + round(2^e / 2^k)`.
pub fn weights(
    ids: &[ID<Contestant>],
    played: &impl Fn(ID<Contestant>, ID<Contestant>) -> bool,
) -> Vec<(usize, usize, i64)> {
    let n = ids.len();
    let mut edges = Vec::new();
    for i in 0..n {
        let e = (n - 1 - i) as u32;
        let mut k = 0;
        for j in i + 1..n {
            if played(ids[i], ids[j]) {
                continue;
            }
            edges.push((i, j, (1i64 << e) + decay(e, k)));
            k += 1;
        }
    }
    edges
}

/// `round(2^e / 2^k)`, rounding halves up.
fn decay(e: u32, k: u32) -> i64 {
    match k {
        k if k <= e => 1i64 << (e - k),
        k if k == e + 1 => 1,
        _ => 0,
    }
}

fn weighted(
    ids: &[ID<Contestant>],
    played: &impl Fn(ID<Contestant>, ID<Contestant>) -> bool,
) -> Result<Vec<(usize, usize)>, StageError> {
    let n = ids.len();
    if n > MAX_FIELD {
        return Err(StageError::Pairing(format!("field of {} is too large", n)));
    }
    let edges = weights(ids, played);
    if !feasible(n, &edges) {
        return Err(StageError::Pairing(String::from(
            "no perfect pairing of unplayed opponents exists",
        )));
    }
    let mate = matching::max_weight_matching(n, &edges);
    let pairs = mate
        .iter()
        .enumerate()
        .filter_map(|(i, m)| m.filter(|&j| i < j).map(|j| (i, j)))
        .collect::<Vec<_>>();
    match pairs.len() * 2 == n {
        true => Ok(pairs),
        false => Err(StageError::Pairing(String::from("matching is not perfect"))),
    }
}

/// Whether a perfect matching exists at all.
fn feasible(n: usize, edges: &[(usize, usize, i64)]) -> bool {
    let mut graph = UnGraph::<usize, i64>::with_capacity(n, edges.len());
    let nodes = (0..n).map(|i| graph.add_node(i)).collect::<Vec<NodeIndex>>();
    for &(i, j, w) in edges {
        graph.add_edge(nodes[i], nodes[j], w);
    }
    petgraph::algo::maximum_matching(&graph).len() * 2 == n
}
