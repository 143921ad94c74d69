//! Error types for permutation parsing and CLI input.
//!
//! The search itself never fails: it either finds a path or reports that none
//! exists within the bound. Errors only arise while building states and
//! generator sets from untrusted input.

use thiserror::Error;

/// Errors raised while constructing permutations or generator sets
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PermError {
    #[error("value {value} appears more than once")]
    Duplicate { value: u8 },

    #[error("value {value} is out of range for a permutation of length {len}")]
    OutOfRange { value: u8, len: usize },

    #[error("permutation length {0} exceeds the supported maximum of 256")]
    TooLong(usize),

    #[error("permutation lengths differ: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("cannot parse permutation: {0}")]
    Parse(String),

    #[error("generator set is empty")]
    EmptyGenerators,

    #[error("generator name {0:?} is used more than once")]
    DuplicateName(String),

    /// The inverse of this generator is not itself a generator
    #[error("generator {0:?} has no inverse in the set")]
    NotInverseClosed(String),

    #[error("unknown move {0:?}")]
    UnknownMove(String),
}

/// Errors raised while reading solver input
#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Perm(#[from] PermError),

    #[error("must provide either a file path or --stdin")]
    MissingInput,
}
