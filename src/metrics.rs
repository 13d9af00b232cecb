//! Clustering evaluation metrics.
//!
//! Measures for comparing a produced cluster assignment against
//! reference labels. Useful for validating a pipeline against corpora
//! with known topic structure.
//!
//! | Metric | Range | Best | Properties |
//! |--------|-------|------|------------|
//! | [`nmi`] | [0, 1] | 1 | Normalized, comparable across datasets |
//! | [`ari`] | [-1, 1] | 1 | Corrected for chance |
//! | [`purity`] | [0, 1] | 1 | Simple, biased toward many clusters |
//!
//! # Example
//!
//! ```rust
//! use thema::metrics::{ari, nmi, purity};
//!
//! let pred = [0, 0, 1, 1];
//! let truth = [0, 0, 1, 1];
//! assert!((ari(&pred, &truth) - 1.0).abs() < 0.01);
//! assert!((nmi(&pred, &truth) - 1.0).abs() < 0.01);
//! assert!((purity(&pred, &truth) - 1.0).abs() < 0.01);
//! ```
//!
//! # References
//!
//! - Hubert & Arabie (1985). "Comparing partitions" (ARI)
//! - Strehl & Ghosh (2002). "Cluster ensembles" (NMI)

use std::collections::HashMap;

/// Joint label counts and total item count.
fn build_contingency_table(
    pred: &[usize],
    truth: &[usize],
) -> (HashMap<(usize, usize), usize>, usize) {
    let mut joint = HashMap::new();
    for (&p, &t) in pred.iter().zip(truth.iter()) {
        *joint.entry((p, t)).or_insert(0) += 1;
    }
    (joint, pred.len())
}

#[inline]
fn comb2(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// Normalized Mutual Information between two clusterings.
///
/// ```text
/// NMI(U, V) = 2 · I(U; V) / (H(U) + H(V))
/// ```
///
/// Returns a score in [0, 1]; 1 means perfect agreement. Mismatched or
/// empty inputs score 0.
pub fn nmi(pred: &[usize], truth: &[usize]) -> f64 {
    if pred.len() != truth.len() || pred.is_empty() {
        return 0.0;
    }

    let (joint, n) = build_contingency_table(pred, truth);
    let n_f = n as f64;

    let mut p_pred = HashMap::new();
    let mut p_truth = HashMap::new();
    for &p in pred {
        *p_pred.entry(p).or_insert(0usize) += 1;
    }
    for &t in truth {
        *p_truth.entry(t).or_insert(0usize) += 1;
    }

    let entropy = |counts: &HashMap<usize, usize>| -> f64 {
        counts
            .values()
            .map(|&c| {
                let p = c as f64 / n_f;
                if p > 0.0 {
                    -p * p.ln()
                } else {
                    0.0
                }
            })
            .sum()
    };
    let h_pred = entropy(&p_pred);
    let h_truth = entropy(&p_truth);

    let mut mi = 0.0;
    for (&(p, t), &count) in &joint {
        let p_joint = count as f64 / n_f;
        let p_p = p_pred[&p] as f64 / n_f;
        let p_t = p_truth[&t] as f64 / n_f;
        if p_joint > 0.0 {
            mi += p_joint * (p_joint / (p_p * p_t)).ln();
        }
    }

    let denom = h_pred + h_truth;
    if denom > 0.0 {
        2.0 * mi / denom
    } else {
        1.0 // both clusterings are constant
    }
}

/// Adjusted Rand Index between two clusterings.
///
/// Corrected-for-chance agreement: 0 for random, 1 for identical
/// partitions, negative for worse-than-random.
pub fn ari(pred: &[usize], truth: &[usize]) -> f64 {
    if pred.len() != truth.len() || pred.is_empty() {
        return 0.0;
    }

    let (joint, n) = build_contingency_table(pred, truth);

    let mut row_sums = HashMap::new();
    let mut col_sums = HashMap::new();
    for (&(p, t), &count) in &joint {
        *row_sums.entry(p).or_insert(0usize) += count;
        *col_sums.entry(t).or_insert(0usize) += count;
    }

    let sum_comb_ij: f64 = joint.values().map(|&c| comb2(c) as f64).sum();
    let sum_comb_a: f64 = row_sums.values().map(|&a| comb2(a) as f64).sum();
    let sum_comb_b: f64 = col_sums.values().map(|&b| comb2(b) as f64).sum();
    let comb_n = comb2(n) as f64;

    let expected = sum_comb_a * sum_comb_b / comb_n;
    let max_index = (sum_comb_a + sum_comb_b) / 2.0;

    let denom = max_index - expected;
    if denom.abs() < 1e-10 {
        return 1.0; // both partitions identical up to relabeling
    }
    (sum_comb_ij - expected) / denom
}

/// Purity of a clustering with respect to reference labels.
///
/// For each cluster, take its most common reference label; purity is the
/// fraction of items covered that way. Biased toward many clusters
/// (each item alone scores 1.0), so read it together with [`ari`].
pub fn purity(pred: &[usize], truth: &[usize]) -> f64 {
    if pred.len() != truth.len() || pred.is_empty() {
        return 0.0;
    }

    let n = pred.len();
    let (joint, _) = build_contingency_table(pred, truth);

    let mut cluster_maxes: HashMap<usize, usize> = HashMap::new();
    for (&(p, _), &count) in &joint {
        let current = cluster_maxes.entry(p).or_insert(0);
        *current = (*current).max(count);
    }

    let correct: usize = cluster_maxes.values().sum();
    correct as f64 / n as f64
}
