//! Crate-wide error type.
//!
//! Every structural problem with a module set is fatal at the point of
//! detection: construction aborts and no partial analysis is returned.

use std::fmt;

/// Which declaration list a dangling name was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Upstream,
    Downstream,
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relation::Upstream => f.write_str("upstream"),
            Relation::Downstream => f.write_str("downstream"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("duplicate module name: \"{name}\"")]
    DuplicateModule { name: String },

    #[error("module is registered as \"{key}\", but has name: \"{name}\"")]
    NameMismatch { key: String, name: String },

    #[error("module \"{module}\" declares unknown {relation} module \"{reference}\"")]
    UnknownReference {
        module: String,
        reference: String,
        relation: Relation,
    },

    #[error("unlimited transitive dependencies found (cycle) for module: \"{module}\"")]
    Cycle { module: String },

    #[error("connector must not be horizontal, but was: ({x1},{y1})-({x2},{y2})")]
    DegenerateSegment { x1: i64, y1: i64, x2: i64, y2: i64 },

    #[error("internal consistency failure: {0}")]
    InternalConsistency(String),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("invalid declaration pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
