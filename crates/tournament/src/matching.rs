//! Maximum-weight matching on general graphs.
//!
//! Edmonds' blossom algorithm with primal-dual weight adjustment,
//! O(n³). Among all maximum-cardinality matchings it returns one of
//! maximum total weight. Weights are integers, and every dual variable
//! stays integral.

const NIL: usize = usize::MAX;

/// Solve for `vertices` vertices and `(i, j, weight)` edges.
/// Returns the mate of every vertex.
pub fn max_weight_matching(vertices: usize, edges: &[(usize, usize, i64)]) -> Vec<Option<usize>> {
    let n = edges
        .iter()
        .map(|&(i, j, _)| i.max(j) + 1)
        .max()
        .unwrap_or(0)
        .max(vertices);
    if edges.is_empty() {
        return vec![None; n];
    }
    let mut blossom = Blossom::new(n, edges);
    blossom.solve();
    blossom
        .mate
        .iter()
        .map(|&p| (p != NIL).then(|| blossom.endpoint[p]))
        .collect()
}

/// Solver state. Indices below `n` are vertices, `n..2n` are blossoms.
/// Endpoint `p` of edge `k = p / 2` is `endpoint[p]`; `p ^ 1` is the
/// other end.
struct Blossom<'a> {
    n: usize,
    edges: &'a [(usize, usize, i64)],
    endpoint: Vec<usize>,
    neighbors: Vec<Vec<usize>>,
    mate: Vec<usize>,
    label: Vec<i32>,
    labelend: Vec<usize>,
    inblossom: Vec<usize>,
    parent: Vec<usize>,
    childs: Vec<Vec<usize>>,
    base: Vec<usize>,
    endps: Vec<Vec<usize>>,
    bestedge: Vec<usize>,
    bestedges: Vec<Option<Vec<usize>>>,
    unused: Vec<usize>,
    dual: Vec<i64>,
    allowed: Vec<bool>,
    queue: Vec<usize>,
}

impl<'a> Blossom<'a> {
    fn new(n: usize, edges: &'a [(usize, usize, i64)]) -> Self {
        let m = edges.len();
        let maxweight = edges.iter().map(|e| e.2).max().unwrap_or(0).max(0);
        let endpoint = (0..2 * m)
            .map(|p| match p % 2 {
                0 => edges[p / 2].0,
                _ => edges[p / 2].1,
            })
            .collect();
        let mut neighbors = vec![Vec::new(); n];
        for (k, &(i, j, _)) in edges.iter().enumerate() {
            neighbors[i].push(2 * k + 1);
            neighbors[j].push(2 * k);
        }
        Self {
            n,
            edges,
            endpoint,
            neighbors,
            mate: vec![NIL; n],
            label: vec![0; 2 * n],
            labelend: vec![NIL; 2 * n],
            inblossom: (0..n).collect(),
            parent: vec![NIL; 2 * n],
            childs: vec![Vec::new(); 2 * n],
            base: (0..n).chain(std::iter::repeat_n(NIL, n)).collect(),
            endps: vec![Vec::new(); 2 * n],
            bestedge: vec![NIL; 2 * n],
            bestedges: vec![None; 2 * n],
            unused: (n..2 * n).collect(),
            dual: std::iter::repeat_n(maxweight, n)
                .chain(std::iter::repeat_n(0, n))
                .collect(),
            allowed: vec![false; m],
            queue: Vec::new(),
        }
    }

    fn slack(&self, k: usize) -> i64 {
        let (i, j, w) = self.edges[k];
        self.dual[i] + self.dual[j] - 2 * w
    }

    fn leaves(&self, b: usize) -> Vec<usize> {
        let mut leaves = Vec::new();
        self.collect_leaves(b, &mut leaves);
        leaves
    }
    fn collect_leaves(&self, b: usize, leaves: &mut Vec<usize>) {
        if b < self.n {
            leaves.push(b);
        } else {
            for &t in &self.childs[b] {
                self.collect_leaves(t, leaves);
            }
        }
    }

    /// Python-style index into a blossom's cyclic child list.
    fn cyclic(len: usize, j: isize) -> usize {
        let len = len as isize;
        (((j % len) + len) % len) as usize
    }

    /// Label `w` (and its top-level blossom) S=1 or T=2, reached via
    /// endpoint `p`.
    fn assign_label(&mut self, w: usize, t: i32, p: usize) {
        let b = self.inblossom[w];
        self.label[w] = t;
        self.label[b] = t;
        self.labelend[w] = p;
        self.labelend[b] = p;
        self.bestedge[w] = NIL;
        self.bestedge[b] = NIL;
        match t {
            1 => {
                let leaves = self.leaves(b);
                self.queue.extend(leaves);
            }
            2 => {
                let mate = self.mate[self.base[b]];
                self.assign_label(self.endpoint[mate], 1, mate ^ 1);
            }
            _ => {}
        }
    }

    /// Trace back from `v` and `w` to find a common base, which means a
    /// new blossom, or NIL, which means an augmenting path.
    fn scan_blossom(&mut self, v: usize, w: usize) -> usize {
        let mut path = Vec::new();
        let mut base = NIL;
        let (mut v, mut w) = (v, w);
        while v != NIL || w != NIL {
            let mut b = self.inblossom[v];
            if self.label[b] & 4 != 0 {
                base = self.base[b];
                break;
            }
            path.push(b);
            self.label[b] = 5;
            if self.labelend[b] == NIL {
                v = NIL;
            } else {
                v = self.endpoint[self.labelend[b]];
                b = self.inblossom[v];
                v = self.endpoint[self.labelend[b]];
            }
            if w != NIL {
                std::mem::swap(&mut v, &mut w);
            }
        }
        for b in path {
            self.label[b] = 1;
        }
        base
    }

    fn add_blossom(&mut self, base: usize, k: usize) {
        let (v, w, _) = self.edges[k];
        let bb = self.inblossom[base];
        let mut bv = self.inblossom[v];
        let mut bw = self.inblossom[w];
        let Some(b) = self.unused.pop() else {
            return;
        };
        self.base[b] = base;
        self.parent[b] = NIL;
        self.parent[bb] = b;
        let mut path = Vec::new();
        let mut endps = Vec::new();
        while bv != bb {
            self.parent[bv] = b;
            path.push(bv);
            endps.push(self.labelend[bv]);
            bv = self.inblossom[self.endpoint[self.labelend[bv]]];
        }
        path.push(bb);
        path.reverse();
        endps.reverse();
        endps.push(2 * k);
        while bw != bb {
            self.parent[bw] = b;
            path.push(bw);
            endps.push(self.labelend[bw] ^ 1);
            bw = self.inblossom[self.endpoint[self.labelend[bw]]];
        }
        self.label[b] = 1;
        self.labelend[b] = self.labelend[bb];
        self.dual[b] = 0;
        self.childs[b] = path.clone();
        self.endps[b] = endps;
        for v in self.leaves(b) {
            if self.label[self.inblossom[v]] == 2 {
                self.queue.push(v);
            }
            self.inblossom[v] = b;
        }
        let mut bestedgeto = vec![NIL; 2 * self.n];
        for bv in path {
            let lists = match self.bestedges[bv].take() {
                Some(list) => vec![list],
                None => self
                    .leaves(bv)
                    .into_iter()
                    .map(|v| self.neighbors[v].iter().map(|p| p / 2).collect())
                    .collect::<Vec<Vec<usize>>>(),
            };
            for k in lists.into_iter().flatten() {
                let (i, j, _) = self.edges[k];
                let j = if self.inblossom[j] == b { i } else { j };
                let bj = self.inblossom[j];
                if bj != b
                    && self.label[bj] == 1
                    && (bestedgeto[bj] == NIL || self.slack(k) < self.slack(bestedgeto[bj]))
                {
                    bestedgeto[bj] = k;
                }
            }
            self.bestedge[bv] = NIL;
        }
        let best = bestedgeto
            .into_iter()
            .filter(|&k| k != NIL)
            .collect::<Vec<_>>();
        self.bestedge[b] = NIL;
        for &k in &best {
            if self.bestedge[b] == NIL || self.slack(k) < self.slack(self.bestedge[b]) {
                self.bestedge[b] = k;
            }
        }
        self.bestedges[b] = Some(best);
    }

    fn expand_blossom(&mut self, b: usize, endstage: bool) {
        let childs = self.childs[b].clone();
        for &s in &childs {
            self.parent[s] = NIL;
            if s < self.n {
                self.inblossom[s] = s;
            } else if endstage && self.dual[s] == 0 {
                self.expand_blossom(s, endstage);
            } else {
                for v in self.leaves(s) {
                    self.inblossom[v] = s;
                }
            }
        }
        if !endstage && self.label[b] == 2 {
            // relabel the sub-blossoms along the even path through b
            let len = childs.len();
            let entrychild = self.inblossom[self.endpoint[self.labelend[b] ^ 1]];
            let mut j = childs.iter().position(|&c| c == entrychild).unwrap_or(0) as isize;
            let (jstep, trick) = match j & 1 {
                1 => {
                    j -= len as isize;
                    (1, 0)
                }
                _ => (-1, 1),
            };
            let mut p = self.labelend[b];
            while j != 0 {
                self.label[self.endpoint[p ^ 1]] = 0;
                let e = self.endps[b][Self::cyclic(len, j - trick as isize)];
                self.label[self.endpoint[e ^ trick ^ 1]] = 0;
                self.assign_label(self.endpoint[p ^ 1], 2, p);
                self.allowed[e / 2] = true;
                j += jstep;
                p = self.endps[b][Self::cyclic(len, j - trick as isize)] ^ trick;
                self.allowed[p / 2] = true;
                j += jstep;
            }
            let bv = childs[Self::cyclic(len, j)];
            let entry = self.endpoint[p ^ 1];
            self.label[entry] = 2;
            self.label[bv] = 2;
            self.labelend[entry] = p;
            self.labelend[bv] = p;
            self.bestedge[bv] = NIL;
            j += jstep;
            while childs[Self::cyclic(len, j)] != entrychild {
                let bv = childs[Self::cyclic(len, j)];
                j += jstep;
                if self.label[bv] == 1 {
                    continue;
                }
                let reached = self.leaves(bv).into_iter().find(|&v| self.label[v] != 0);
                if let Some(v) = reached {
                    self.label[v] = 0;
                    self.label[self.endpoint[self.mate[self.base[bv]]]] = 0;
                    self.assign_label(v, 2, self.labelend[v]);
                }
            }
        }
        self.label[b] = -1;
        self.labelend[b] = NIL;
        self.childs[b].clear();
        self.endps[b].clear();
        self.base[b] = NIL;
        self.bestedges[b] = None;
        self.bestedge[b] = NIL;
        self.unused.push(b);
    }

    /// Swap matched and unmatched edges along the even path from `v` to
    /// the base of blossom `b`.
    fn augment_blossom(&mut self, b: usize, v: usize) {
        let mut t = v;
        while self.parent[t] != b {
            t = self.parent[t];
        }
        if t >= self.n {
            self.augment_blossom(t, v);
        }
        let len = self.childs[b].len();
        let i = self.childs[b].iter().position(|&c| c == t).unwrap_or(0);
        let mut j = i as isize;
        let (jstep, trick) = match j & 1 {
            1 => {
                j -= len as isize;
                (1, 0)
            }
            _ => (-1, 1),
        };
        while j != 0 {
            j += jstep;
            let t = self.childs[b][Self::cyclic(len, j)];
            let p = self.endps[b][Self::cyclic(len, j - trick as isize)] ^ trick;
            if t >= self.n {
                self.augment_blossom(t, self.endpoint[p]);
            }
            j += jstep;
            let t = self.childs[b][Self::cyclic(len, j)];
            if t >= self.n {
                self.augment_blossom(t, self.endpoint[p ^ 1]);
            }
            let (a, z) = (self.endpoint[p], self.endpoint[p ^ 1]);
            self.mate[a] = p ^ 1;
            self.mate[z] = p;
        }
        self.childs[b].rotate_left(i);
        self.endps[b].rotate_left(i);
        self.base[b] = self.base[self.childs[b][0]];
    }

    /// Augment along the path through edge `k` between two S-vertices.
    fn augment_matching(&mut self, k: usize) {
        let (v, w, _) = self.edges[k];
        for (s, p) in [(v, 2 * k + 1), (w, 2 * k)] {
            let (mut s, mut p) = (s, p);
            loop {
                let bs = self.inblossom[s];
                if bs >= self.n {
                    self.augment_blossom(bs, s);
                }
                self.mate[s] = p;
                if self.labelend[bs] == NIL {
                    break;
                }
                let t = self.endpoint[self.labelend[bs]];
                let bt = self.inblossom[t];
                s = self.endpoint[self.labelend[bt]];
                let j = self.endpoint[self.labelend[bt] ^ 1];
                if bt >= self.n {
                    self.augment_blossom(bt, j);
                }
                self.mate[j] = self.labelend[bt];
                p = self.labelend[bt] ^ 1;
            }
        }
    }

    /// One stage per augmentation; stop when no augmenting path exists.
    fn solve(&mut self) {
        let n = self.n;
        for _ in 0..n {
            self.label.fill(0);
            self.bestedge.fill(NIL);
            for b in n..2 * n {
                self.bestedges[b] = None;
            }
            self.allowed.fill(false);
            self.queue.clear();
            for v in 0..n {
                if self.mate[v] == NIL && self.label[self.inblossom[v]] == 0 {
                    self.assign_label(v, 1, NIL);
                }
            }
            let mut augmented = false;
            loop {
                while !augmented {
                    let Some(v) = self.queue.pop() else {
                        break;
                    };
                    for idx in 0..self.neighbors[v].len() {
                        let p = self.neighbors[v][idx];
                        let k = p / 2;
                        let w = self.endpoint[p];
                        if self.inblossom[v] == self.inblossom[w] {
                            continue;
                        }
                        let mut kslack = 0;
                        if !self.allowed[k] {
                            kslack = self.slack(k);
                            if kslack <= 0 {
                                self.allowed[k] = true;
                            }
                        }
                        if self.allowed[k] {
                            if self.label[self.inblossom[w]] == 0 {
                                self.assign_label(w, 2, p ^ 1);
                            } else if self.label[self.inblossom[w]] == 1 {
                                let base = self.scan_blossom(v, w);
                                if base != NIL {
                                    self.add_blossom(base, k);
                                } else {
                                    self.augment_matching(k);
                                    augmented = true;
                                    break;
                                }
                            } else if self.label[w] == 0 {
                                self.label[w] = 2;
                                self.labelend[w] = p ^ 1;
                            }
                        } else if self.label[self.inblossom[w]] == 1 {
                            let b = self.inblossom[v];
                            if self.bestedge[b] == NIL || kslack < self.slack(self.bestedge[b]) {
                                self.bestedge[b] = k;
                            }
                        } else if self.label[w] == 0
                            && (self.bestedge[w] == NIL || kslack < self.slack(self.bestedge[w]))
                        {
                            self.bestedge[w] = k;
                        }
                    }
                }
                if augmented {
                    break;
                }
                if self.adjust() {
                    break;
                }
            }
            if !augmented {
                break;
            }
            for b in n..2 * n {
                if self.parent[b] == NIL
                    && self.base[b] != NIL
                    && self.label[b] == 1
                    && self.dual[b] == 0
                {
                    self.expand_blossom(b, true);
                }
            }
        }
    }

    /// Apply the smallest dual adjustment that opens a new tight edge or
    /// empties a T-blossom. Returns true once the duals are exhausted.
    fn adjust(&mut self) -> bool {
        #[derive(PartialEq)]
        enum Delta {
            None,
            Exhausted,
            Grow(usize),
            Merge(usize),
            Expand(usize),
        }
        let n = self.n;
        let mut kind = Delta::None;
        let mut delta = 0;
        for v in 0..n {
            if self.label[self.inblossom[v]] == 0 && self.bestedge[v] != NIL {
                let d = self.slack(self.bestedge[v]);
                if kind == Delta::None || d < delta {
                    delta = d;
                    kind = Delta::Grow(self.bestedge[v]);
                }
            }
        }
        for b in 0..2 * n {
            if self.parent[b] == NIL && self.label[b] == 1 && self.bestedge[b] != NIL {
                let d = self.slack(self.bestedge[b]) / 2;
                if kind == Delta::None || d < delta {
                    delta = d;
                    kind = Delta::Merge(self.bestedge[b]);
                }
            }
        }
        for b in n..2 * n {
            if self.base[b] != NIL
                && self.parent[b] == NIL
                && self.label[b] == 2
                && (kind == Delta::None || self.dual[b] < delta)
            {
                delta = self.dual[b];
                kind = Delta::Expand(b);
            }
        }
        if kind == Delta::None {
            kind = Delta::Exhausted;
            delta = self.dual[..n].iter().copied().min().unwrap_or(0).max(0);
        }
        for v in 0..n {
            match self.label[self.inblossom[v]] {
                1 => self.dual[v] -= delta,
                2 => self.dual[v] += delta,
                _ => {}
            }
        }
        for b in n..2 * n {
            if self.base[b] != NIL && self.parent[b] == NIL {
                match self.label[b] {
                    1 => self.dual[b] += delta,
                    2 => self.dual[b] -= delta,
                    _ => {}
                }
            }
        }
        match kind {
            Delta::None | Delta::Exhausted => return true,
            Delta::Grow(k) => {
                self.allowed[k] = true;
                let (i, j, _) = self.edges[k];
                let i = if self.label[self.inblossom[i]] == 0 { j } else { i };
                self.queue.push(i);
            }
            Delta::Merge(k) => {
                self.allowed[k] = true;
                self.queue.push(self.edges[k].0);
            }
            Delta::Expand(b) => self.expand_blossom(b, false),
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    /// Best (cardinality, weight) over all matchings, by exhaustion.
    fn brute(n: usize, edges: &[(usize, usize, i64)]) -> (usize, i64) {
        fn go(used: &mut Vec<bool>, edges: &[(usize, usize, i64)], from: usize) -> (usize, i64) {
            let mut best = (0, 0);
            for k in from..edges.len() {
                let (i, j, w) = edges[k];
                if used[i] || used[j] {
                    continue;
                }
                used[i] = true;
                used[j] = true;
                let (c, s) = go(used, edges, k + 1);
                used[i] = false;
                used[j] = false;
                best = best.max((c + 1, s + w));
            }
            best
        }
        go(&mut vec![false; n], edges, 0)
    }

    fn evaluate(edges: &[(usize, usize, i64)], mate: &[Option<usize>]) -> (usize, i64) {
        let mut total = (0, 0);
        for &(i, j, w) in edges {
            if mate[i] == Some(j) {
                assert_eq!(mate[j], Some(i));
                total = (total.0 + 1, total.1 + w);
            }
        }
        total
    }

    #[test]
    fn empty_graph() {
        assert_eq!(max_weight_matching(3, &[]), vec![None, None, None]);
    }
    #[test]
    fn single_edge() {
        assert_eq!(
            max_weight_matching(2, &[(0, 1, 1)]),
            vec![Some(1), Some(0)]
        );
    }
    #[test]
    fn prefers_cardinality_over_weight() {
        // a heavy middle edge loses to two light outer edges
        let edges = [(0, 1, 2), (1, 2, 10), (2, 3, 2)];
        let mate = max_weight_matching(4, &edges);
        assert_eq!(mate, vec![Some(1), Some(0), Some(3), Some(2)]);
    }
    #[test]
    fn odd_cycle_blossom() {
        let edges = [(0, 1, 8), (0, 2, 9), (1, 2, 10), (2, 3, 7), (0, 5, 5), (3, 4, 6)];
        let mate = max_weight_matching(6, &edges);
        assert_eq!(evaluate(&edges, &mate), brute(6, &edges));
    }
    #[test]
    fn agrees_with_exhaustion() {
        let ref mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..300 {
            let n = rng.random_range(2..=9);
            let mut edges = Vec::new();
            for i in 0..n {
                for j in i + 1..n {
                    if rng.random_bool(0.5) {
                        edges.push((i, j, rng.random_range(1..=32)));
                    }
                }
            }
            let mate = max_weight_matching(n, &edges);
            assert_eq!(evaluate(&edges, &mate), brute(n, &edges), "{:?}", edges);
        }
    }
}
