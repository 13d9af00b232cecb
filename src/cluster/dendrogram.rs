//! Dendrogram: the recorded merge history of an agglomerative run.
//!
//! Cluster ids follow the SciPy/MATLAB convention:
//! - leaves (original documents): `0..n-1`
//! - the cluster created by merge *i*: `n + i`
//!
//! A dendrogram is built once by [`AgglomerativeClustering::fit`] and is
//! immutable afterwards; cutting it (by target cluster count or by
//! height) is a pure function that may be invoked repeatedly.
//!
//! [`AgglomerativeClustering::fit`]: crate::cluster::AgglomerativeClustering::fit

use std::collections::HashMap;

use crate::error::{Error, Result};

/// A single merge operation.
#[derive(Debug, Clone, Copy)]
pub struct Merge {
    /// First merged cluster id (always the smaller id).
    pub cluster_a: usize,
    /// Second merged cluster id.
    pub cluster_b: usize,
    /// Linkage distance at which the merge occurred.
    pub distance: f64,
    /// Size of the resulting cluster.
    pub size: usize,
}

/// Binary merge tree over documents.
#[derive(Debug, Clone)]
pub struct Dendrogram {
    docs: Vec<String>,
    merges: Vec<Merge>,
}

impl Dendrogram {
    pub(crate) fn new(docs: Vec<String>, merges: Vec<Merge>) -> Self {
        debug_assert_eq!(merges.len(), docs.len().saturating_sub(1));
        Self { docs, merges }
    }

    /// Number of original documents (leaves).
    pub fn n_docs(&self) -> usize {
        self.docs.len()
    }

    /// Document ids in leaf order.
    pub fn docs(&self) -> &[String] {
        &self.docs
    }

    /// Number of recorded merges (always `n_docs - 1`).
    pub fn n_merges(&self) -> usize {
        self.merges.len()
    }

    /// Iterate over merges in merge order.
    pub fn merges(&self) -> impl Iterator<Item = &Merge> {
        self.merges.iter()
    }

    /// The merge heights, in merge order.
    pub fn distances(&self) -> Vec<f64> {
        self.merges.iter().map(|m| m.distance).collect()
    }

    /// Cut the tree into exactly `k` flat clusters.
    ///
    /// Applies the first `n_docs - k` merges and labels every document
    /// by the cluster it belongs to at that point. Labels are renumbered
    /// `0..k` by first occurrence in document order, so output is stable
    /// across runs.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidClusterCount`] unless `1 <= k <= n_docs`.
    pub fn cut_to_k(&self, k: usize) -> Result<ClusterAssignment> {
        let n = self.docs.len();
        if k == 0 || k > n {
            return Err(Error::InvalidClusterCount {
                requested: k,
                n_docs: n,
            });
        }
        Ok(self.cut(n - k))
    }

    /// Cut the tree at a height threshold: every merge with
    /// `distance <= threshold` is applied.
    ///
    /// The resulting cluster count depends on the data; use
    /// [`Dendrogram::cut_to_k`] when an exact count is required.
    pub fn cut_at_distance(&self, threshold: f64) -> ClusterAssignment {
        let applied = self
            .merges
            .iter()
            .take_while(|m| m.distance <= threshold)
            .count();
        self.cut(applied)
    }

    /// Apply the first `applied` merges and label the leaves.
    fn cut(&self, applied: usize) -> ClusterAssignment {
        let n = self.docs.len();

        // parent[id] links a cluster to the merge that absorbed it.
        // Ids above n + applied never appear as parents here.
        let mut parent: Vec<usize> = (0..n + applied).collect();
        for (i, merge) in self.merges.iter().take(applied).enumerate() {
            let created = n + i;
            parent[merge.cluster_a] = created;
            parent[merge.cluster_b] = created;
        }

        // Resolve each leaf to its root, renumbering roots by first
        // occurrence so labels are stable.
        let mut label_of_root: HashMap<usize, usize> = HashMap::new();
        let mut labels = Vec::with_capacity(n);
        for leaf in 0..n {
            let mut id = leaf;
            while parent[id] != id {
                id = parent[id];
            }
            let next = label_of_root.len();
            labels.push(*label_of_root.entry(id).or_insert(next));
        }

        ClusterAssignment {
            docs: self.docs.clone(),
            labels,
            n_clusters: n - applied,
        }
    }
}

/// Flat cluster labels for every document, produced by cutting a
/// dendrogram.
///
/// Labels are `0..n_clusters` with no intrinsic order; equal labels mean
/// same cluster, nothing more.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterAssignment {
    docs: Vec<String>,
    labels: Vec<usize>,
    n_clusters: usize,
}

impl ClusterAssignment {
    /// Number of documents.
    pub fn n_docs(&self) -> usize {
        self.docs.len()
    }

    /// Number of distinct cluster labels.
    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    /// Document ids, in the original row order.
    pub fn docs(&self) -> &[String] {
        &self.docs
    }

    /// Cluster label per document, aligned with [`Self::docs`].
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Iterate over `(document id, label)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.docs
            .iter()
            .map(|d| d.as_str())
            .zip(self.labels.iter().copied())
    }

    /// Label of a document id, if the document is part of this
    /// assignment.
    pub fn label_of(&self, doc: &str) -> Option<usize> {
        self.docs
            .iter()
            .position(|d| d == doc)
            .map(|i| self.labels[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("doc-{i}")).collect()
    }

    fn four_leaf_tree() -> Dendrogram {
        // 0,1 join first, then 2,3, then the two pairs.
        Dendrogram::new(
            docs(4),
            vec![
                Merge { cluster_a: 0, cluster_b: 1, distance: 0.1, size: 2 },
                Merge { cluster_a: 2, cluster_b: 3, distance: 0.2, size: 2 },
                Merge { cluster_a: 4, cluster_b: 5, distance: 0.9, size: 4 },
            ],
        )
    }

    #[test]
    fn cut_at_k_equals_n_is_singletons() {
        let a = four_leaf_tree().cut_to_k(4).unwrap();
        assert_eq!(a.labels(), &[0, 1, 2, 3]);
        assert_eq!(a.n_clusters(), 4);
    }

    #[test]
    fn cut_at_k_one_is_single_cluster() {
        let a = four_leaf_tree().cut_to_k(1).unwrap();
        assert_eq!(a.labels(), &[0, 0, 0, 0]);
    }

    #[test]
    fn cut_at_two_splits_pairs() {
        let a = four_leaf_tree().cut_to_k(2).unwrap();
        assert_eq!(a.labels(), &[0, 0, 1, 1]);
        assert_eq!(a.label_of("doc-2"), Some(1));
        assert_eq!(a.label_of("nope"), None);
    }

    #[test]
    fn out_of_range_k_is_rejected() {
        let d = four_leaf_tree();
        for k in [0, 5] {
            let err = d.cut_to_k(k).unwrap_err();
            assert_eq!(
                err,
                Error::InvalidClusterCount { requested: k, n_docs: 4 }
            );
            assert!(err.is_invalid_input());
        }
    }

    #[test]
    fn cut_at_distance_thresholds() {
        let d = four_leaf_tree();
        assert_eq!(d.cut_at_distance(0.0).n_clusters(), 4);
        assert_eq!(d.cut_at_distance(0.15).n_clusters(), 3);
        assert_eq!(d.cut_at_distance(0.5).n_clusters(), 2);
        assert_eq!(d.cut_at_distance(1.0).n_clusters(), 1);
    }

    #[test]
    fn single_document_tree() {
        let d = Dendrogram::new(docs(1), vec![]);
        let a = d.cut_to_k(1).unwrap();
        assert_eq!(a.labels(), &[0]);
        assert_eq!(a.n_clusters(), 1);
    }
}
