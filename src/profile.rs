//! Cluster profiling: which terms make a cluster what it is.
//!
//! A term characterizes a cluster when it is more prevalent inside the
//! cluster than across the corpus at large:
//!
//! ```text
//! p(t)   = count(t) / count(all terms)            corpus-wide
//! p_c(t) = count_c(t) / count_c(all terms)        within cluster c
//! score  = p_c(t) − p(t)
//! ```
//!
//! Positive scores mean over-represented, negative under-represented. A
//! cluster containing the whole corpus scores exactly 0 on every term.
//!
//! Raw counts are used here, not TF-IDF weights: the profile answers
//! "what do these documents actually say", and the prevalence-difference
//! score already discounts corpus-wide filler on its own.

use crate::cluster::ClusterAssignment;
use crate::error::{Error, Result};
use crate::matrix::TermDocMatrix;

/// A term with its distinctiveness score for one cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredTerm {
    /// The term id.
    pub term: String,
    /// Cluster relative frequency minus corpus relative frequency.
    pub score: f64,
}

/// Size and characteristic terms of one cluster.
#[derive(Debug, Clone)]
pub struct ClusterSummary {
    /// Cluster label, as in the assignment.
    pub label: usize,
    /// Number of documents in the cluster.
    pub size: usize,
    /// Top terms by descending distinctiveness. At most `top_n`; empty
    /// when the cluster has no term occurrences at all.
    pub terms: Vec<ScoredTerm>,
}

/// Profile every cluster of an assignment: document count plus the
/// `top_n` most distinctive terms.
///
/// Summaries are returned in label order (`0..n_clusters`).
///
/// # Errors
///
/// [`Error::UnknownDocument`] when the assignment references a document
/// the matrix does not contain.
pub fn summarize(
    matrix: &TermDocMatrix,
    assignment: &ClusterAssignment,
    top_n: usize,
) -> Result<Vec<ClusterSummary>> {
    let n_terms = matrix.n_terms();
    let k = assignment.n_clusters();

    // Corpus-wide relative frequencies.
    let mut corpus_counts = vec![0u64; n_terms];
    for row in 0..matrix.n_docs() {
        for (col, count) in matrix.row(row) {
            corpus_counts[col] += u64::from(count);
        }
    }
    let corpus_total: u64 = corpus_counts.iter().sum();

    // Per-cluster counts, restricted to the assignment's documents.
    let mut cluster_counts = vec![vec![0u64; n_terms]; k];
    let mut cluster_sizes = vec![0usize; k];
    for (doc, label) in assignment.iter() {
        let row = matrix
            .doc_position(doc)
            .ok_or_else(|| Error::UnknownDocument {
                doc: doc.to_string(),
            })?;
        cluster_sizes[label] += 1;
        for (col, count) in matrix.row(row) {
            cluster_counts[label][col] += u64::from(count);
        }
    }

    let mut summaries = Vec::with_capacity(k);
    for label in 0..k {
        let counts = &cluster_counts[label];
        let cluster_total: u64 = counts.iter().sum();

        let mut terms: Vec<ScoredTerm> = Vec::new();
        if cluster_total > 0 {
            for (col, &count) in counts.iter().enumerate() {
                // Terms absent from the cluster are skipped entirely;
                // they could only ever score <= 0.
                if count == 0 {
                    continue;
                }
                let p_cluster = count as f64 / cluster_total as f64;
                let p_corpus = corpus_counts[col] as f64 / corpus_total as f64;
                terms.push(ScoredTerm {
                    term: matrix.terms()[col].clone(),
                    score: p_cluster - p_corpus,
                });
            }
            terms.sort_by(|a, b| {
                b.score
                    .partial_cmp(&a.score)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.term.cmp(&b.term))
            });
            terms.truncate(top_n);
        }

        summaries.push(ClusterSummary {
            label,
            size: cluster_sizes[label],
            terms,
        });
    }

    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::AgglomerativeClustering;
    use crate::similarity::DistanceMatrix;

    fn matrix(rows: &[(&str, &[(&str, u32)])]) -> TermDocMatrix {
        let mut b = TermDocMatrix::builder();
        for (doc, entries) in rows {
            for (term, count) in *entries {
                b.add(doc, term, *count);
            }
        }
        b.build()
    }

    /// Assignment over the given docs, produced by actually cutting a
    /// trivial dendrogram so label renumbering stays realistic.
    fn assignment_for(docs: &[&str], k: usize, condensed: Vec<f64>) -> ClusterAssignment {
        let d = DistanceMatrix::from_condensed(
            docs.iter().map(|s| s.to_string()).collect(),
            condensed,
        )
        .unwrap();
        AgglomerativeClustering::new()
            .fit(&d)
            .unwrap()
            .cut_to_k(k)
            .unwrap()
    }

    #[test]
    fn whole_corpus_cluster_scores_zero() {
        let m = matrix(&[
            ("d1", &[("a", 3), ("b", 1)]),
            ("d2", &[("b", 2), ("c", 4)]),
        ]);
        let a = assignment_for(&["d1", "d2"], 1, vec![0.5]);

        let summaries = summarize(&m, &a, 10).unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].size, 2);
        for term in &summaries[0].terms {
            assert_eq!(term.score, 0.0);
        }
    }

    #[test]
    fn distinctive_terms_rank_first() {
        // d1/d2 are about wheat, d3/d4 about ships.
        let m = matrix(&[
            ("d1", &[("wheat", 4), ("field", 2), ("report", 1)]),
            ("d2", &[("wheat", 3), ("field", 1), ("report", 1)]),
            ("d3", &[("ship", 5), ("port", 2), ("report", 1)]),
            ("d4", &[("ship", 2), ("port", 3), ("report", 1)]),
        ]);
        let a = assignment_for(
            &["d1", "d2", "d3", "d4"],
            2,
            vec![0.1, 0.9, 0.9, 0.9, 0.9, 0.1],
        );

        let summaries = summarize(&m, &a, 2).unwrap();
        assert_eq!(summaries[0].size, 2);
        assert_eq!(summaries[1].size, 2);

        let wheat_cluster = &summaries[a.label_of("d1").unwrap()];
        assert_eq!(wheat_cluster.terms[0].term, "wheat");
        assert!(wheat_cluster.terms[0].score > 0.0);
        assert_eq!(wheat_cluster.terms.len(), 2); // top_n respected

        let ship_cluster = &summaries[a.label_of("d3").unwrap()];
        assert_eq!(ship_cluster.terms[0].term, "ship");
    }

    #[test]
    fn shared_term_scores_near_zero() {
        // "report" occurs evenly; its distinctiveness should be small
        // and below the cluster-specific terms.
        let m = matrix(&[
            ("d1", &[("wheat", 9), ("report", 1)]),
            ("d2", &[("ship", 9), ("report", 1)]),
        ]);
        let a = assignment_for(&["d1", "d2"], 2, vec![1.0]);

        let summaries = summarize(&m, &a, 10).unwrap();
        for summary in &summaries {
            let report = summary.terms.iter().find(|t| t.term == "report").unwrap();
            assert!(report.score < summary.terms[0].score);
            assert!(report.score.abs() < 0.01);
        }
    }

    #[test]
    fn empty_cluster_yields_empty_terms() {
        let m = matrix(&[
            ("d1", &[("a", 2)]),
            ("d2", &[("empty", 0)]), // registered, but the row is empty
        ]);
        let a = assignment_for(&["d1", "d2"], 2, vec![1.0]);

        let summaries = summarize(&m, &a, 5).unwrap();
        let empty = &summaries[a.label_of("d2").unwrap()];
        assert_eq!(empty.size, 1);
        assert!(empty.terms.is_empty());
    }

    #[test]
    fn unknown_document_is_rejected() {
        let m = matrix(&[("d1", &[("a", 1)])]);
        let a = assignment_for(&["d1", "ghost"], 2, vec![1.0]);

        let err = summarize(&m, &a, 5).unwrap_err();
        assert_eq!(
            err,
            Error::UnknownDocument {
                doc: "ghost".to_string()
            }
        );
        assert!(err.is_dimension_mismatch());
    }

    #[test]
    fn score_ties_break_by_term() {
        // Two terms with identical distribution: alphabetical order.
        let m = matrix(&[("d1", &[("beta", 1), ("alpha", 1)])]);
        let a = assignment_for(&["d1"], 1, vec![]);

        let summaries = summarize(&m, &a, 2).unwrap();
        assert_eq!(summaries[0].terms[0].term, "alpha");
        assert_eq!(summaries[0].terms[1].term, "beta");
    }
}
