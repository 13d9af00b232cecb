//! One-shot pipeline: count matrix → TF-IDF → cosine distances → Ward
//! dendrogram → flat clusters → per-cluster term profiles.
//!
//! Each stage remains independently callable; this module only chains
//! them for the common case. The returned [`TopicModel`] keeps the
//! dendrogram, so exploring a different cluster count is a cheap re-cut,
//! not a re-build.
//!
//! # Example
//!
//! ```rust
//! use thema::{TermDocMatrix, TopicClustering};
//!
//! let mut builder = TermDocMatrix::builder();
//! builder.add("a", "wheat", 2).add("a", "field", 1);
//! builder.add("b", "wheat", 3).add("b", "field", 2);
//! builder.add("c", "ship", 4).add("c", "port", 1);
//! builder.add("d", "ship", 1).add("d", "port", 2);
//! let matrix = builder.build();
//!
//! let model = TopicClustering::new(2).with_top_terms(3).fit(&matrix)?;
//!
//! assert_eq!(model.assignment().n_clusters(), 2);
//! assert_eq!(model.assignment().label_of("a"), model.assignment().label_of("b"));
//! for summary in model.summaries() {
//!     println!("cluster {} ({} docs): {:?}", summary.label, summary.size, summary.terms);
//! }
//! # Ok::<(), thema::Error>(())
//! ```

use crate::cluster::{AgglomerativeClustering, ClusterAssignment, Dendrogram, Linkage};
use crate::error::Result;
use crate::matrix::TermDocMatrix;
use crate::profile::{summarize, ClusterSummary};
use crate::similarity::cosine_distance;
use crate::weighting::{apply_tf_idf, compute_idf};

/// End-to-end topic clustering runner.
#[derive(Debug, Clone)]
pub struct TopicClustering {
    n_clusters: usize,
    top_terms: usize,
    linkage: Linkage,
}

impl TopicClustering {
    /// Cluster into `n_clusters` flat clusters.
    pub fn new(n_clusters: usize) -> Self {
        Self {
            n_clusters,
            top_terms: 10,
            linkage: Linkage::Ward,
        }
    }

    /// Number of characteristic terms to report per cluster.
    pub fn with_top_terms(mut self, top_terms: usize) -> Self {
        self.top_terms = top_terms;
        self
    }

    /// Linkage method for the merge loop.
    pub fn with_linkage(mut self, linkage: Linkage) -> Self {
        self.linkage = linkage;
        self
    }

    /// Run all four stages over a count matrix.
    ///
    /// # Errors
    ///
    /// Propagates every stage's validation error unchanged; see
    /// [`crate::Error`].
    pub fn fit(&self, matrix: &TermDocMatrix) -> Result<TopicModel> {
        let idf = compute_idf(matrix)?;
        let weighted = apply_tf_idf(matrix, &idf)?;
        let distances = cosine_distance(&weighted)?;
        let dendrogram = AgglomerativeClustering::new()
            .with_linkage(self.linkage)
            .fit(&distances)?;
        let assignment = dendrogram.cut_to_k(self.n_clusters)?;
        let summaries = summarize(matrix, &assignment, self.top_terms)?;

        Ok(TopicModel {
            dendrogram,
            assignment,
            summaries,
        })
    }
}

/// The fitted result: flat assignment, per-cluster profiles, and the
/// dendrogram they were cut from.
#[derive(Debug, Clone)]
pub struct TopicModel {
    dendrogram: Dendrogram,
    assignment: ClusterAssignment,
    summaries: Vec<ClusterSummary>,
}

impl TopicModel {
    /// The full merge tree; cut it again for other cluster counts.
    pub fn dendrogram(&self) -> &Dendrogram {
        &self.dendrogram
    }

    /// Cluster label per document.
    pub fn assignment(&self) -> &ClusterAssignment {
        &self.assignment
    }

    /// Per-cluster size and characteristic terms, in label order.
    pub fn summaries(&self) -> &[ClusterSummary] {
        &self.summaries
    }
}
