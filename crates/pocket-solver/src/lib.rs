//! Shortest move sequences between permutation states.
//!
//! The search is a bounded bidirectional breadth-first search over any
//! [`PermutationGroup`]. A concrete permutation library and the 2x2x2 pocket
//! cube's quarter twists are included so the solver can be used end to end.

pub mod cube;
pub mod error;
pub mod perm;
pub mod search;

// Re-export main types
pub use error::{InputError, PermError};
pub use perm::{Arrangement, GeneratorSet, NamedPerm, Perm, PermutationGroup, Twist};
pub use search::{
    expand, reconstruct, search, shortest_path, Expansion, ParentMap, SearchConfig, SearchResult,
};
