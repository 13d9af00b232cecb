//! The agglomerative merge loop, driven by the Lance–Williams recurrence.
//!
//! State is arena-style: the n documents occupy slots `0..n`, each slot
//! carrying the arena id of the cluster it currently represents. A merge
//! writes the union into one slot, tombstones the other, and updates the
//! triangular distance table row for the surviving slot in O(D); no
//! centroid is ever recomputed.
//!
//! The pair to merge is found through per-slot nearest-neighbor caching:
//! after a merge, only slots whose cached neighbor pointed at one of the
//! merged clusters need a rescan; everyone else at most adopts the new
//! cluster if it comes closer. The global minimum is then a single O(D)
//! scan over the cache.
//!
//! # Tie-breaking
//!
//! Candidate pairs whose distances are equal within `tie_epsilon` are
//! ordered by their (smaller id, larger id) arena-id pair, smallest
//! first. Merge order, and therefore output, is fully deterministic.

use crate::cluster::dendrogram::{Dendrogram, Merge};
use crate::error::{Error, Result};
use crate::similarity::{condensed_index, DistanceMatrix};

/// Linkage method: how inter-cluster distance is defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Linkage {
    /// Single linkage: minimum distance between clusters.
    Single,
    /// Complete linkage: maximum distance between clusters.
    Complete,
    /// Average linkage: size-weighted mean distance.
    Average,
    /// Ward's method: minimize within-cluster variance.
    #[default]
    Ward,
}

/// Agglomerative hierarchical clustering.
///
/// Builds a [`Dendrogram`] from a pairwise [`DistanceMatrix`]. Building
/// runs once; cutting the result is cheap and repeatable.
#[derive(Debug, Clone)]
pub struct AgglomerativeClustering {
    linkage: Linkage,
    tie_epsilon: f64,
}

impl Default for AgglomerativeClustering {
    fn default() -> Self {
        Self::new()
    }
}

impl AgglomerativeClustering {
    /// Create a clusterer with Ward linkage.
    pub fn new() -> Self {
        Self {
            linkage: Linkage::Ward,
            tie_epsilon: 1e-12,
        }
    }

    /// Set the linkage method.
    pub fn with_linkage(mut self, linkage: Linkage) -> Self {
        self.linkage = linkage;
        self
    }

    /// Set the equality tolerance used when tie-breaking candidate
    /// merge pairs.
    pub fn with_tie_epsilon(mut self, epsilon: f64) -> Self {
        self.tie_epsilon = epsilon;
        self
    }

    /// Run the merge loop to completion and record the dendrogram.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyInput`] when the distance matrix has no documents.
    pub fn fit(&self, distances: &DistanceMatrix) -> Result<Dendrogram> {
        let n = distances.n_docs();
        if n == 0 {
            return Err(Error::EmptyInput);
        }

        let mut merges = Vec::with_capacity(n.saturating_sub(1));
        if n >= 2 {
            let mut state = LinkageState::init(distances, self.linkage, self.tie_epsilon);
            for step in 0..(n - 1) {
                merges.push(state.merge_once(n + step));
            }
        }

        Ok(Dendrogram::new(distances.docs().to_vec(), merges))
    }
}

/// Mutable merge-loop state: triangular distance table over slots plus
/// per-slot cluster bookkeeping.
struct LinkageState {
    n: usize,
    table: Vec<f64>,
    active: Vec<bool>,
    arena: Vec<usize>,
    sizes: Vec<usize>,
    /// Cached nearest active neighbor per slot: (distance, other slot).
    nn: Vec<(f64, usize)>,
    remaining: usize,
    linkage: Linkage,
    tie_epsilon: f64,
}

impl LinkageState {
    fn init(distances: &DistanceMatrix, linkage: Linkage, tie_epsilon: f64) -> Self {
        let n = distances.n_docs();
        let mut table = Vec::with_capacity(n * (n - 1) / 2);
        for i in 0..n {
            for j in (i + 1)..n {
                table.push(distances.get(i, j));
            }
        }

        let mut state = Self {
            n,
            table,
            active: vec![true; n],
            arena: (0..n).collect(),
            sizes: vec![1; n],
            nn: vec![(f64::INFINITY, usize::MAX); n],
            remaining: n,
            linkage,
            tie_epsilon,
        };
        for s in 0..n {
            state.nn[s] = state.best_neighbor(s);
        }
        state
    }

    fn dist(&self, a: usize, b: usize) -> f64 {
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        self.table[condensed_index(self.n, lo, hi)]
    }

    fn set_dist(&mut self, a: usize, b: usize, value: f64) {
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let idx = condensed_index(self.n, lo, hi);
        self.table[idx] = value;
    }

    /// Arena-id pair of two slots, smaller id first.
    fn pair_ids(&self, a: usize, b: usize) -> (usize, usize) {
        let (x, y) = (self.arena[a], self.arena[b]);
        if x < y {
            (x, y)
        } else {
            (y, x)
        }
    }

    /// Whether candidate (d1, p1) beats (d2, p2) under the deterministic
    /// ordering: smaller distance, then lexicographically smaller pair.
    fn better(&self, d1: f64, p1: (usize, usize), d2: f64, p2: (usize, usize)) -> bool {
        if d1 + self.tie_epsilon < d2 {
            return true;
        }
        if d2 + self.tie_epsilon < d1 {
            return false;
        }
        p1 < p2
    }

    /// Nearest active neighbor of `slot`. Requires at least one other
    /// active slot.
    fn best_neighbor(&self, slot: usize) -> (f64, usize) {
        let mut best: Option<(f64, usize)> = None;
        for other in 0..self.n {
            if other == slot || !self.active[other] {
                continue;
            }
            let d = self.dist(slot, other);
            match best {
                None => best = Some((d, other)),
                Some((bd, bt)) => {
                    if self.better(
                        d,
                        self.pair_ids(slot, other),
                        bd,
                        self.pair_ids(slot, bt),
                    ) {
                        best = Some((d, other));
                    }
                }
            }
        }
        best.expect("best_neighbor called with no other active slot")
    }

    /// Perform one merge, assigning `new_id` to the union.
    fn merge_once(&mut self, new_id: usize) -> Merge {
        // Global minimum over the nearest-neighbor cache.
        let mut best: Option<(f64, (usize, usize), usize)> = None;
        for s in 0..self.n {
            if !self.active[s] {
                continue;
            }
            let (d, t) = self.nn[s];
            let pair = self.pair_ids(s, t);
            match best {
                None => best = Some((d, pair, s)),
                Some((bd, bp, _)) => {
                    if self.better(d, pair, bd, bp) {
                        best = Some((d, pair, s));
                    }
                }
            }
        }
        let (d_merge, (id_a, id_b), s) = best.expect("merge_once called with < 2 clusters");
        let t = self.nn[s].1;
        let (keep, gone) = (s.min(t), s.max(t));

        // Lance-Williams row update for the surviving slot.
        let (n_keep, n_gone) = (self.sizes[keep], self.sizes[gone]);
        for u in 0..self.n {
            if u == keep || u == gone || !self.active[u] {
                continue;
            }
            let updated = lance_williams(
                self.linkage,
                self.dist(u, keep),
                self.dist(u, gone),
                d_merge,
                self.sizes[u],
                n_keep,
                n_gone,
            );
            self.set_dist(u, keep, updated);
        }

        self.active[gone] = false;
        self.sizes[keep] = n_keep + n_gone;
        self.arena[keep] = new_id;
        self.remaining -= 1;

        // Repair the neighbor cache. Distances changed only toward the
        // surviving slot, so a full rescan is needed only where the
        // cached neighbor was one of the merged slots.
        if self.remaining > 1 {
            for u in 0..self.n {
                if u == keep || !self.active[u] {
                    continue;
                }
                let (cur_d, cur_t) = self.nn[u];
                if cur_t == keep || cur_t == gone {
                    self.nn[u] = self.best_neighbor(u);
                } else {
                    let d = self.dist(u, keep);
                    if self.better(
                        d,
                        self.pair_ids(u, keep),
                        cur_d,
                        self.pair_ids(u, cur_t),
                    ) {
                        self.nn[u] = (d, keep);
                    }
                }
            }
            self.nn[keep] = self.best_neighbor(keep);
        }

        Merge {
            cluster_a: id_a,
            cluster_b: id_b,
            distance: d_merge,
            size: n_keep + n_gone,
        }
    }
}

/// Distance from cluster `u` to the union of `i` and `j`, given the
/// pre-merge distances and cluster sizes.
fn lance_williams(
    linkage: Linkage,
    d_ui: f64,
    d_uj: f64,
    d_ij: f64,
    n_u: usize,
    n_i: usize,
    n_j: usize,
) -> f64 {
    match linkage {
        Linkage::Single => d_ui.min(d_uj),
        Linkage::Complete => d_ui.max(d_uj),
        Linkage::Average => {
            let (ni, nj) = (n_i as f64, n_j as f64);
            (ni * d_ui + nj * d_uj) / (ni + nj)
        }
        Linkage::Ward => {
            let (nu, ni, nj) = (n_u as f64, n_i as f64, n_j as f64);
            let total = nu + ni + nj;
            // Applied to distances in the SciPy square-root form; the
            // argument can dip below zero by rounding, hence the clamp.
            (((nu + ni) * d_ui * d_ui + (nu + nj) * d_uj * d_uj - nu * d_ij * d_ij) / total)
                .max(0.0)
                .sqrt()
        }
    }
}
