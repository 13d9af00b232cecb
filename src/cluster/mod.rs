//! Agglomerative hierarchical clustering over a document distance matrix.
//!
//! Bottom-up clustering: every document starts as its own cluster, and
//! the two closest clusters are merged repeatedly until one remains. The
//! merge history forms a **dendrogram**: a binary tree that can be cut
//! into any number of flat clusters without re-running the merge loop.
//!
//! # Linkage Methods
//!
//! The key choice: how do we define "distance between clusters"?
//!
//! | Linkage | Formula | Effect |
//! |---------|---------|--------|
//! | Single | min(d(a,b)) for a∈A, b∈B | Chaining; elongated clusters |
//! | Complete | max(d(a,b)) | Compact, spherical clusters |
//! | Average | mean(d(a,b)) | Balanced compromise |
//! | Ward | Δ variance | Minimizes within-cluster variance |
//!
//! Ward is the default; it merges the pair whose union increases total
//! within-cluster variance the least:
//!
//! ```text
//! Δ(A,B) = (nₐ × nᵦ)/(nₐ + nᵦ) × ||μₐ - μᵦ||²
//! ```
//!
//! All four rules are driven by the **Lance–Williams recurrence**: after
//! merging clusters *i* and *j*, the distance from any cluster *u* to
//! the union is a closed-form combination of d(u,i), d(u,j), d(i,j) and
//! the cluster sizes. No centroids are ever recomputed; each merge costs
//! O(D) table updates instead of O(D·T).
//!
//! # Build once, cut repeatedly
//!
//! Building the dendrogram is the expensive step. Cutting is a pure
//! O(D) function of the dendrogram and `k`, so exploring different
//! cluster counts reuses one build:
//!
//! ```text
//!         6 (height=1.0)
//!        / \
//!       4   5 (height=0.7)
//!      / \ / \
//!     0  1 2  3 (leaves)
//! ```

mod agglomerative;
mod dendrogram;

pub use agglomerative::{AgglomerativeClustering, Linkage};
pub use dendrogram::{ClusterAssignment, Dendrogram, Merge};
