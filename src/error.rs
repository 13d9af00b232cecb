use core::fmt;

/// Result alias for `thema`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the weighting, similarity, clustering, and
/// profiling stages.
///
/// Variants fall into two kinds: malformed or out-of-domain input
/// ([`Error::is_invalid_input`]) and shape/key disagreement between two
/// supposedly aligned artifacts ([`Error::is_dimension_mismatch`]).
/// Every error is raised synchronously at the point of detection; the
/// pipeline is deterministic, so nothing is retried internally.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Input had zero documents.
    EmptyInput,

    /// A term is registered in the matrix but occurs in no document,
    /// making `ln(N / df)` undefined.
    ZeroDocumentFrequency {
        /// The offending term.
        term: String,
    },

    /// Every document row has zero norm; there is nothing to cluster.
    DegenerateCorpus,

    /// A condensed distance buffer does not correspond to any square
    /// symmetric matrix.
    ShapeMismatch {
        /// Expected buffer length (n·(n−1)/2).
        expected: usize,
        /// Length found.
        found: usize,
    },

    /// Invalid number of clusters requested.
    InvalidClusterCount {
        /// Requested count.
        requested: usize,
        /// Number of documents.
        n_docs: usize,
    },

    /// Term keys of two supposedly aligned artifacts disagree.
    TermMismatch {
        /// Number of terms expected.
        expected: usize,
        /// Number of terms found.
        found: usize,
    },

    /// A cluster assignment references a document the matrix does not
    /// contain.
    UnknownDocument {
        /// The offending document id.
        doc: String,
    },
}

impl Error {
    /// True for malformed or out-of-domain input.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Error::EmptyInput
                | Error::ZeroDocumentFrequency { .. }
                | Error::DegenerateCorpus
                | Error::ShapeMismatch { .. }
                | Error::InvalidClusterCount { .. }
        )
    }

    /// True when keys/shapes between two aligned artifacts disagree.
    pub fn is_dimension_mismatch(&self) -> bool {
        matches!(
            self,
            Error::TermMismatch { .. } | Error::UnknownDocument { .. }
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyInput => write!(f, "empty input provided"),
            Error::ZeroDocumentFrequency { term } => {
                write!(f, "term '{term}' has zero document frequency")
            }
            Error::DegenerateCorpus => {
                write!(f, "every document row has zero norm; nothing to cluster")
            }
            Error::ShapeMismatch { expected, found } => {
                write!(
                    f,
                    "condensed buffer length {found} does not match a square matrix (expected {expected})"
                )
            }
            Error::InvalidClusterCount { requested, n_docs } => {
                write!(f, "cannot create {requested} clusters from {n_docs} documents")
            }
            Error::TermMismatch { expected, found } => {
                write!(f, "term keys disagree: expected {expected} terms, found {found}")
            }
            Error::UnknownDocument { doc } => {
                write!(f, "assignment references unknown document '{doc}'")
            }
        }
    }
}

impl std::error::Error for Error {}
