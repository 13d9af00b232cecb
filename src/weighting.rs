//! TF-IDF weighting of term-document counts.
//!
//! Raw counts overweight terms that are common everywhere. TF-IDF
//! rescales each count by how rare the term is across the corpus:
//!
//! ```text
//! idf(t)       = ln(N / df(t))        N = documents, df = docs containing t
//! weight(d, t) = count(d, t) × idf(t)
//! ```
//!
//! A term appearing in every document gets `idf = 0` and contributes
//! nothing to distances downstream. That is intentional, not a bug: such
//! a term carries no information about which documents belong together.
//!
//! Both functions are pure; the IDF vector is computed once per corpus
//! and immutable afterwards. No row or column normalization happens
//! here: unit-length scaling is the similarity stage's job.

use crate::error::{Error, Result};
use crate::matrix::{TermDocMatrix, WeightedMatrix};

/// Per-term inverse document frequency, aligned to a matrix's term
/// order. Immutable after construction.
#[derive(Debug, Clone)]
pub struct IdfVector {
    terms: Vec<String>,
    values: Vec<f64>,
}

impl IdfVector {
    /// Number of terms.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when no terms are present.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Term ids, in the source matrix's column order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// IDF value for column `col`.
    pub fn value(&self, col: usize) -> f64 {
        self.values[col]
    }

    /// IDF value for a term id, if present.
    pub fn of(&self, term: &str) -> Option<f64> {
        self.terms
            .iter()
            .position(|t| t == term)
            .map(|i| self.values[i])
    }
}

/// Compute the inverse document frequency of every term in the matrix.
///
/// # Errors
///
/// [`Error::EmptyInput`] when the matrix has zero documents;
/// [`Error::ZeroDocumentFrequency`] when a registered term occurs in no
/// document (`ln(N / 0)` is undefined; such terms must be filtered out
/// upstream).
pub fn compute_idf(matrix: &TermDocMatrix) -> Result<IdfVector> {
    let n = matrix.n_docs();
    if n == 0 {
        return Err(Error::EmptyInput);
    }

    let df = matrix.document_frequencies();
    let mut values = Vec::with_capacity(df.len());
    for (col, &d) in df.iter().enumerate() {
        if d == 0 {
            return Err(Error::ZeroDocumentFrequency {
                term: matrix.terms()[col].clone(),
            });
        }
        values.push((n as f64 / d as f64).ln());
    }

    Ok(IdfVector {
        terms: matrix.terms().to_vec(),
        values,
    })
}

/// Weight every count by its term's IDF: `count(d, t) × idf(t)`.
///
/// Zero counts stay zero, so the output has exactly the input's sparsity
/// pattern.
///
/// # Errors
///
/// [`Error::TermMismatch`] when the IDF vector's term keys differ from
/// the matrix's.
pub fn apply_tf_idf(matrix: &TermDocMatrix, idf: &IdfVector) -> Result<WeightedMatrix> {
    if matrix.terms() != idf.terms() {
        return Err(Error::TermMismatch {
            expected: matrix.n_terms(),
            found: idf.len(),
        });
    }

    let mut row_ptr = Vec::with_capacity(matrix.n_docs() + 1);
    let mut col_idx = Vec::with_capacity(matrix.nnz());
    let mut values = Vec::with_capacity(matrix.nnz());

    row_ptr.push(0);
    for row in 0..matrix.n_docs() {
        for (col, count) in matrix.row(row) {
            col_idx.push(col);
            values.push(f64::from(count) * idf.value(col));
        }
        row_ptr.push(col_idx.len());
    }

    Ok(WeightedMatrix::from_parts(
        matrix.docs().to_vec(),
        matrix.terms().to_vec(),
        row_ptr,
        col_idx,
        values,
    ))
}
