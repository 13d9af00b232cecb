//! # thema
//!
//! Topic clustering for document corpora. Given a sparse term-document
//! count matrix, `thema` weights it, measures pairwise document
//! similarity, clusters hierarchically, and profiles what each cluster
//! is about:
//!
//! ```text
//! counts ──► TF-IDF ──► cosine distances ──► Ward dendrogram ──► flat cut
//!    │                                                              │
//!    └────────────────► cluster term profiles ◄────────────────────┘
//! ```
//!
//! Every stage is a pure function over an immutable artifact and is
//! independently usable; [`TopicClustering`] chains them for the common
//! case. Tokenization, stopword filtering, and rendering are out of
//! scope: the input is an already-built count matrix, the output is an
//! assignment plus ranked characteristic terms per cluster.
//!
//! The **`parallel`** feature computes the pairwise distance stage (the
//! O(D²·T) throughput ceiling of the whole pipeline) on rayon workers.

pub mod cluster;
/// Error types used across `thema`.
pub mod error;
pub mod matrix;
pub mod metrics;
pub mod pipeline;
pub mod profile;
pub mod similarity;
pub mod weighting;

pub use cluster::{AgglomerativeClustering, ClusterAssignment, Dendrogram, Linkage, Merge};
pub use error::{Error, Result};
pub use matrix::{TermDocMatrix, TermDocMatrixBuilder, WeightedMatrix};
pub use metrics::{ari, nmi, purity};
pub use pipeline::{TopicClustering, TopicModel};
pub use profile::{summarize, ClusterSummary, ScoredTerm};
pub use similarity::{cosine_distance, DistanceMatrix};
pub use weighting::{apply_tf_idf, compute_idf, IdfVector};
