//! Cosine distances between weighted document vectors.
//!
//! Every document row is normalized to unit Euclidean length, so the
//! similarity between two documents is the dot product of their unit
//! vectors:
//!
//! ```text
//! u_d = w_d / ||w_d||₂
//! sim(a, b) = u_a · u_b          ∈ [0, 1] for nonnegative weights
//! dist(a, b) = 1 − sim(a, b)     ∈ [0, 1]
//! ```
//!
//! The full pairwise computation is the dense `U × Uᵗ` product; this is
//! the throughput-critical O(D²·T) stage that sets the practical corpus
//! size ceiling (thousands of documents, not millions). The result is
//! stored as the condensed upper triangle: symmetric by construction,
//! zero diagonal.
//!
//! # Degenerate rows
//!
//! A document whose weighted row is all zeros (e.g., every term it
//! contains is ubiquitous and got `idf = 0`) has no direction. By
//! convention its distance to every document, itself included, is
//! exactly 1.0 rather than a division by zero. Only when *every* row is
//! degenerate does the computation fail: there is nothing to cluster.
//!
//! # Parallelism
//!
//! With the `parallel` feature, row blocks of the pairwise product are
//! computed on rayon workers. Blocks are disjoint, so assembly is plain
//! concatenation; results are bit-identical to the sequential path.

use ndarray::Array2;

use crate::error::{Error, Result};
use crate::matrix::WeightedMatrix;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Deviations below this are clamped to exactly zero so the diagonal
/// invariant survives floating-point rounding.
const DISTANCE_EPSILON: f64 = 1e-12;

/// Symmetric pairwise document distance matrix, condensed upper-triangle
/// storage.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    docs: Vec<String>,
    condensed: Vec<f64>,
    degenerate: Vec<bool>,
}

impl DistanceMatrix {
    /// Build from an explicit condensed buffer (row-major upper
    /// triangle, length n·(n−1)/2 for n documents). No rows are marked
    /// degenerate.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyInput`] for zero documents; [`Error::ShapeMismatch`]
    /// when the buffer length does not match the document count.
    pub fn from_condensed(docs: Vec<String>, condensed: Vec<f64>) -> Result<Self> {
        if docs.is_empty() {
            return Err(Error::EmptyInput);
        }
        let n = docs.len();
        let expected = n * (n - 1) / 2;
        if condensed.len() != expected {
            return Err(Error::ShapeMismatch {
                expected,
                found: condensed.len(),
            });
        }
        Ok(Self {
            degenerate: vec![false; n],
            docs,
            condensed,
        })
    }

    /// Number of documents.
    pub fn n_docs(&self) -> usize {
        self.docs.len()
    }

    /// Document ids in row order.
    pub fn docs(&self) -> &[String] {
        &self.docs
    }

    /// Distance between documents `i` and `j`. Symmetric; the diagonal
    /// is 0 except for degenerate rows, which are 1 everywhere by
    /// convention.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        if i == j {
            return if self.degenerate[i] { 1.0 } else { 0.0 };
        }
        let (lo, hi) = if i < j { (i, j) } else { (j, i) };
        self.condensed[condensed_index(self.n_docs(), lo, hi)]
    }

    /// True when row `i` had zero norm.
    pub fn is_degenerate(&self, i: usize) -> bool {
        self.degenerate[i]
    }

    /// The raw condensed upper triangle (row-major, i < j).
    pub fn condensed(&self) -> &[f64] {
        &self.condensed
    }
}

/// Index of pair `(i, j)` with `i < j` in the condensed buffer.
#[inline]
pub(crate) fn condensed_index(n: usize, i: usize, j: usize) -> usize {
    debug_assert!(i < j && j < n);
    i * n - i * (i + 1) / 2 + (j - i - 1)
}

/// Compute pairwise cosine distances between all document rows.
///
/// # Errors
///
/// [`Error::EmptyInput`] for zero documents; [`Error::DegenerateCorpus`]
/// when every row has zero norm.
pub fn cosine_distance(weighted: &WeightedMatrix) -> Result<DistanceMatrix> {
    let n = weighted.n_docs();
    if n == 0 {
        return Err(Error::EmptyInput);
    }

    let mut norms = vec![0.0f64; n];
    for (row, norm) in norms.iter_mut().enumerate() {
        let (_, values) = weighted.row(row);
        *norm = values.iter().map(|v| v * v).sum::<f64>().sqrt();
    }
    let degenerate: Vec<bool> = norms.iter().map(|&norm| norm == 0.0).collect();
    if degenerate.iter().all(|&d| d) {
        return Err(Error::DegenerateCorpus);
    }

    // Dense row-normalized matrix for the pairwise products. Density is
    // expected here: the output is dense regardless of input sparsity.
    let mut unit = Array2::<f64>::zeros((n, weighted.n_terms()));
    for row in 0..n {
        if degenerate[row] {
            continue;
        }
        let (cols, values) = weighted.row(row);
        for (&col, &value) in cols.iter().zip(values) {
            unit[[row, col]] = value / norms[row];
        }
    }

    let row_block = |i: usize| -> Vec<f64> {
        let u_i = unit.row(i);
        ((i + 1)..n)
            .map(|j| {
                if degenerate[i] || degenerate[j] {
                    1.0
                } else {
                    clamp(1.0 - u_i.dot(&unit.row(j)))
                }
            })
            .collect()
    };

    #[cfg(feature = "parallel")]
    let blocks: Vec<Vec<f64>> = (0..n.saturating_sub(1))
        .into_par_iter()
        .map(row_block)
        .collect();
    #[cfg(not(feature = "parallel"))]
    let blocks: Vec<Vec<f64>> = (0..n.saturating_sub(1)).map(row_block).collect();

    Ok(DistanceMatrix {
        docs: weighted.docs().to_vec(),
        condensed: blocks.into_iter().flatten().collect(),
        degenerate,
    })
}

#[inline]
fn clamp(distance: f64) -> f64 {
    if distance < DISTANCE_EPSILON {
        0.0
    } else {
        distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::TermDocMatrix;
    use crate::weighting::{apply_tf_idf, compute_idf};
    use proptest::prelude::*;

    fn weighted(rows: &[(&str, &[(&str, u32)])]) -> WeightedMatrix {
        let mut b = TermDocMatrix::builder();
        for (doc, entries) in rows {
            for (term, count) in *entries {
                b.add(doc, term, *count);
            }
        }
        let m = b.build();
        let idf = compute_idf(&m).unwrap();
        apply_tf_idf(&m, &idf).unwrap()
    }

    #[test]
    fn identical_rows_have_zero_distance() {
        let w = weighted(&[
            ("a", &[("x", 2), ("y", 1)]),
            ("b", &[("x", 2), ("y", 1)]),
            ("c", &[("z", 3)]),
        ]);
        let d = cosine_distance(&w).unwrap();

        assert_eq!(d.get(0, 1), 0.0);
        assert_eq!(d.get(0, 0), 0.0);
    }

    #[test]
    fn disjoint_rows_have_unit_distance() {
        let w = weighted(&[
            ("a", &[("x", 2)]),
            ("b", &[("y", 5)]),
            ("c", &[("x", 1), ("y", 1)]),
        ]);
        let d = cosine_distance(&w).unwrap();

        assert!((d.get(0, 1) - 1.0).abs() < 1e-12);
        // "c" shares support with both, so it sits strictly between.
        assert!(d.get(0, 2) > 0.0 && d.get(0, 2) < 1.0);
    }

    #[test]
    fn symmetric_accessor() {
        let w = weighted(&[
            ("a", &[("x", 1), ("y", 3)]),
            ("b", &[("y", 2), ("z", 1)]),
            ("c", &[("x", 4)]),
        ]);
        let d = cosine_distance(&w).unwrap();

        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(d.get(i, j), d.get(j, i));
            }
        }
    }

    #[test]
    fn degenerate_row_is_unit_distance_everywhere() {
        // "the" appears in every document, so idf = 0 and doc "b" (which
        // contains nothing else) has a zero-norm weighted row.
        let w = weighted(&[
            ("a", &[("the", 1), ("x", 2)]),
            ("b", &[("the", 4)]),
            ("c", &[("the", 1), ("x", 1)]),
        ]);
        let d = cosine_distance(&w).unwrap();

        assert!(d.is_degenerate(1));
        assert_eq!(d.get(1, 0), 1.0);
        assert_eq!(d.get(1, 2), 1.0);
        assert_eq!(d.get(1, 1), 1.0); // degenerate diagonal convention
        assert_eq!(d.get(0, 0), 0.0);
    }

    #[test]
    fn all_degenerate_corpus_is_rejected() {
        let w = weighted(&[("a", &[("the", 1)]), ("b", &[("the", 2)])]);
        assert_eq!(cosine_distance(&w).unwrap_err(), Error::DegenerateCorpus);
    }

    #[test]
    fn single_document_is_fine() {
        // A lone document makes every term ubiquitous under ln(N/df), so
        // build the weighted row directly rather than through TF-IDF.
        let w = WeightedMatrix::from_parts(
            vec!["a".to_string()],
            vec!["x".to_string()],
            vec![0, 1],
            vec![0],
            vec![1.5],
        );
        let d = cosine_distance(&w).unwrap();
        assert_eq!(d.n_docs(), 1);
        assert_eq!(d.get(0, 0), 0.0);
    }

    #[test]
    fn from_condensed_validates_length() {
        let docs = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let err = DistanceMatrix::from_condensed(docs, vec![0.5, 0.5]).unwrap_err();
        assert_eq!(
            err,
            Error::ShapeMismatch {
                expected: 3,
                found: 2
            }
        );
    }

    proptest! {
        // Random count matrices: distances stay in [0, 1], the accessor
        // is symmetric, and the diagonal is 0 or the degenerate 1.
        #[test]
        fn distance_bounds_hold(
            entries in proptest::collection::vec(
                (0usize..6, 0usize..6, 1u32..6), 1..40,
            )
        ) {
            let mut b = TermDocMatrix::builder();
            b.add("doc-0", "term-0", 1);
            for (doc, term, count) in entries {
                b.add(&format!("doc-{doc}"), &format!("term-{term}"), count);
            }
            let m = b.build();
            let idf = compute_idf(&m).unwrap();
            let w = apply_tf_idf(&m, &idf).unwrap();

            match cosine_distance(&w) {
                Err(Error::DegenerateCorpus) => {} // every term ubiquitous
                Err(other) => prop_assert!(false, "unexpected error: {other}"),
                Ok(d) => {
                    let n = d.n_docs();
                    for i in 0..n {
                        for j in 0..n {
                            let dist = d.get(i, j);
                            prop_assert!((0.0..=1.0).contains(&dist));
                            prop_assert_eq!(dist, d.get(j, i));
                        }
                        let diag = d.get(i, i);
                        prop_assert!(diag == 0.0 || (diag == 1.0 && d.is_degenerate(i)));
                    }
                }
            }
        }
    }
}
