//! Error types for the navigation store.

use thiserror::Error;

use crate::blocker::BlockerKey;
use crate::path::PathError;

/// A blocker predicate failed instead of answering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct PredicateError {
    message: String,
}

impl PredicateError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors returned by [`Router`](crate::Router) operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The navigation target is malformed.
    #[error("invalid navigation target: {0}")]
    Path(#[from] PathError),

    /// One of the configured initial entries is malformed.
    #[error("invalid initial entry {index}: {source}")]
    InvalidEntry {
        index: usize,
        #[source]
        source: PathError,
    },

    /// A blocker predicate failed; the transition was aborted.
    #[error("blocker {key} failed: {source}")]
    Blocker {
        key: BlockerKey,
        #[source]
        source: PredicateError,
    },
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, Error>;
