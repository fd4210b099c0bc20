use std::sync::Arc;

use thiserror::Error;

/// Outcome of a trigger that did not produce data.
#[derive(Debug, Error)]
pub enum FetchError<E> {
    /// The operation ran and failed. The same error is recorded in state.
    #[error("operation failed: {0}")]
    Failed(Arc<E>),

    /// The owning scope was cancelled; state was left untouched.
    #[error("cancelled")]
    Cancelled,

    #[error("refresh requested before any trigger")]
    NeverTriggered,
}

impl<E> FetchError<E> {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled)
    }

    /// The operation error, if the operation ran.
    pub fn source_error(&self) -> Option<&E> {
        match self {
            FetchError::Failed(e) => Some(e),
            _ => None,
        }
    }
}
