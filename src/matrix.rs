//! Sparse term-document matrices.
//!
//! The pipeline's input is a **term-document count matrix**: rows are
//! documents (unique string ids), columns are terms (unique strings),
//! values are nonnegative occurrence counts. Absent entries mean zero.
//!
//! Counts are stored in compressed-row (CSR) form: one row-pointer array,
//! one column-index array, one value array. Iteration over nonzeros is
//! explicit; no dense allocation happens until the similarity stage,
//! where density is expected anyway.
//!
//! # Usage
//!
//! ```rust
//! use thema::TermDocMatrix;
//!
//! let mut builder = TermDocMatrix::builder();
//! builder.add("doc-a", "wheat", 2);
//! builder.add("doc-a", "harvest", 1);
//! builder.add("doc-b", "wheat", 1);
//! let matrix = builder.build();
//!
//! assert_eq!(matrix.n_docs(), 2);
//! assert_eq!(matrix.n_terms(), 2);
//! assert_eq!(matrix.count("doc-a", "wheat"), 2);
//! assert_eq!(matrix.count("doc-b", "harvest"), 0);
//! ```

use std::collections::HashMap;

/// Sparse nonnegative integer matrix of documents × terms.
///
/// Rows and columns are keyed by unique string ids, assigned dense
/// indices in first-appearance order. Immutable once built.
#[derive(Debug, Clone)]
pub struct TermDocMatrix {
    docs: Vec<String>,
    terms: Vec<String>,
    doc_index: HashMap<String, usize>,
    term_index: HashMap<String, usize>,
    row_ptr: Vec<usize>,
    col_idx: Vec<usize>,
    values: Vec<u32>,
}

impl TermDocMatrix {
    /// Start building a matrix.
    pub fn builder() -> TermDocMatrixBuilder {
        TermDocMatrixBuilder::new()
    }

    /// Number of documents (rows).
    pub fn n_docs(&self) -> usize {
        self.docs.len()
    }

    /// Number of terms (columns).
    pub fn n_terms(&self) -> usize {
        self.terms.len()
    }

    /// Document ids in row order.
    pub fn docs(&self) -> &[String] {
        &self.docs
    }

    /// Term ids in column order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Row index of a document id, if present.
    pub fn doc_position(&self, doc: &str) -> Option<usize> {
        self.doc_index.get(doc).copied()
    }

    /// Column index of a term id, if present.
    pub fn term_position(&self, term: &str) -> Option<usize> {
        self.term_index.get(term).copied()
    }

    /// Nonzero entries of row `row` as `(column, count)` pairs, in
    /// ascending column order.
    pub fn row(&self, row: usize) -> impl Iterator<Item = (usize, u32)> + '_ {
        let (lo, hi) = (self.row_ptr[row], self.row_ptr[row + 1]);
        self.col_idx[lo..hi]
            .iter()
            .copied()
            .zip(self.values[lo..hi].iter().copied())
    }

    /// Count for a `(doc, term)` pair; zero when either key is unknown
    /// or the entry is absent.
    pub fn count(&self, doc: &str, term: &str) -> u32 {
        let (Some(&r), Some(&c)) = (self.doc_index.get(doc), self.term_index.get(term)) else {
            return 0;
        };
        let (lo, hi) = (self.row_ptr[r], self.row_ptr[r + 1]);
        match self.col_idx[lo..hi].binary_search(&c) {
            Ok(pos) => self.values[lo + pos],
            Err(_) => 0,
        }
    }

    /// Total number of stored nonzero entries.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Document frequency per term: in how many documents each term
    /// occurs at least once. Indexed by column.
    pub fn document_frequencies(&self) -> Vec<usize> {
        let mut df = vec![0usize; self.terms.len()];
        for row in 0..self.docs.len() {
            for (col, count) in self.row(row) {
                if count > 0 {
                    df[col] += 1;
                }
            }
        }
        df
    }
}

/// Incremental builder for [`TermDocMatrix`].
///
/// Repeated `add` calls for the same `(doc, term)` pair accumulate.
/// Adding a zero count still registers the document and term keys, so a
/// term can legitimately end up with zero document frequency (which the
/// weighting stage then rejects).
#[derive(Debug, Clone, Default)]
pub struct TermDocMatrixBuilder {
    docs: Vec<String>,
    terms: Vec<String>,
    doc_index: HashMap<String, usize>,
    term_index: HashMap<String, usize>,
    rows: Vec<HashMap<usize, u32>>,
}

impl TermDocMatrixBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `count` occurrences of `term` in `doc`.
    pub fn add(&mut self, doc: &str, term: &str, count: u32) -> &mut Self {
        let row = match self.doc_index.get(doc) {
            Some(&r) => r,
            None => {
                let r = self.docs.len();
                self.docs.push(doc.to_string());
                self.doc_index.insert(doc.to_string(), r);
                self.rows.push(HashMap::new());
                r
            }
        };
        let col = match self.term_index.get(term) {
            Some(&c) => c,
            None => {
                let c = self.terms.len();
                self.terms.push(term.to_string());
                self.term_index.insert(term.to_string(), c);
                c
            }
        };
        if count > 0 {
            *self.rows[row].entry(col).or_insert(0) += count;
        }
        self
    }

    /// Finalize into an immutable CSR matrix.
    pub fn build(self) -> TermDocMatrix {
        let mut row_ptr = Vec::with_capacity(self.docs.len() + 1);
        let mut col_idx = Vec::new();
        let mut values = Vec::new();

        row_ptr.push(0);
        for row in &self.rows {
            let mut entries: Vec<(usize, u32)> =
                row.iter().map(|(&c, &v)| (c, v)).collect();
            entries.sort_unstable_by_key(|&(c, _)| c);
            for (c, v) in entries {
                col_idx.push(c);
                values.push(v);
            }
            row_ptr.push(col_idx.len());
        }

        TermDocMatrix {
            docs: self.docs,
            terms: self.terms,
            doc_index: self.doc_index,
            term_index: self.term_index,
            row_ptr,
            col_idx,
            values,
        }
    }
}

/// TF-IDF weighted matrix: same shape and keys as the count matrix it
/// was derived from, real-valued nonnegative entries.
///
/// Not normalized; unit-length row normalization is the similarity
/// stage's job.
#[derive(Debug, Clone)]
pub struct WeightedMatrix {
    docs: Vec<String>,
    terms: Vec<String>,
    row_ptr: Vec<usize>,
    col_idx: Vec<usize>,
    values: Vec<f64>,
}

impl WeightedMatrix {
    pub(crate) fn from_parts(
        docs: Vec<String>,
        terms: Vec<String>,
        row_ptr: Vec<usize>,
        col_idx: Vec<usize>,
        values: Vec<f64>,
    ) -> Self {
        Self {
            docs,
            terms,
            row_ptr,
            col_idx,
            values,
        }
    }

    /// Number of documents (rows).
    pub fn n_docs(&self) -> usize {
        self.docs.len()
    }

    /// Number of terms (columns).
    pub fn n_terms(&self) -> usize {
        self.terms.len()
    }

    /// Document ids in row order.
    pub fn docs(&self) -> &[String] {
        &self.docs
    }

    /// Term ids in column order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Nonzero entries of row `row` as parallel column/value slices.
    pub fn row(&self, row: usize) -> (&[usize], &[f64]) {
        let (lo, hi) = (self.row_ptr[row], self.row_ptr[row + 1]);
        (&self.col_idx[lo..hi], &self.values[lo..hi])
    }

    /// Weight for a `(doc index, term index)` pair; zero when absent.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        let (lo, hi) = (self.row_ptr[row], self.row_ptr[row + 1]);
        match self.col_idx[lo..hi].binary_search(&col) {
            Ok(pos) => self.values[lo + pos],
            Err(_) => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_accumulates() {
        let mut b = TermDocMatrix::builder();
        b.add("d1", "alpha", 1);
        b.add("d1", "alpha", 2);
        let m = b.build();

        assert_eq!(m.count("d1", "alpha"), 3);
        assert_eq!(m.nnz(), 1);
    }

    #[test]
    fn test_zero_count_registers_keys() {
        let mut b = TermDocMatrix::builder();
        b.add("d1", "ghost", 0);
        let m = b.build();

        assert_eq!(m.n_docs(), 1);
        assert_eq!(m.n_terms(), 1);
        assert_eq!(m.nnz(), 0);
        assert_eq!(m.count("d1", "ghost"), 0);
    }

    #[test]
    fn test_rows_sorted_by_column() {
        let mut b = TermDocMatrix::builder();
        b.add("d1", "zeta", 1);
        b.add("d1", "alpha", 1);
        b.add("d2", "alpha", 4);
        let m = b.build();

        // "zeta" got column 0, "alpha" column 1; CSR rows must still be
        // in ascending column order.
        let cols: Vec<usize> = m.row(0).map(|(c, _)| c).collect();
        assert_eq!(cols, vec![0, 1]);
        assert_eq!(m.count("d2", "alpha"), 4);
        assert_eq!(m.count("d2", "zeta"), 0);
    }

    #[test]
    fn test_document_frequencies() {
        let mut b = TermDocMatrix::builder();
        b.add("d1", "both", 2);
        b.add("d2", "both", 1);
        b.add("d2", "solo", 7);
        b.add("d2", "phantom", 0);
        let m = b.build();

        let df = m.document_frequencies();
        assert_eq!(df[m.term_position("both").unwrap()], 2);
        assert_eq!(df[m.term_position("solo").unwrap()], 1);
        assert_eq!(df[m.term_position("phantom").unwrap()], 0);
    }

    #[test]
    fn test_first_appearance_order() {
        let mut b = TermDocMatrix::builder();
        b.add("b-doc", "t1", 1);
        b.add("a-doc", "t2", 1);
        let m = b.build();

        assert_eq!(m.docs(), &["b-doc".to_string(), "a-doc".to_string()]);
        assert_eq!(m.doc_position("a-doc"), Some(1));
        assert_eq!(m.doc_position("missing"), None);
    }
}
