//! Error types for the adapter layer.

use navbridge_store::{PathError, PredicateError};
use thiserror::Error;

/// Errors surfaced by [`History`](crate::History) implementations.
#[derive(Debug, Error)]
pub enum Error {
    /// The navigation store rejected the operation.
    #[error("navigation store error: {0}")]
    Store(#[from] navbridge_store::Error),

    /// A target could not be resolved by the native history.
    #[error("invalid target: {0}")]
    Path(#[from] PathError),

    /// A native history prompt failed while deciding a transition.
    #[error("block prompt failed: {0}")]
    Predicate(#[from] PredicateError),
}

pub type Result<T> = std::result::Result<T, Error>;
