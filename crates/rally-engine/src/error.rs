use thiserror::Error;

use crate::dispatch::DispatchError;

/// Errors produced inside a handler or job invocation.  These are caught
/// and logged at the invocation boundary; they never reach the scheduler.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Store error: {0}")]
    Store(#[from] rally_store::StoreError),

    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EngineError>;
