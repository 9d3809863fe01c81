//! Error types for control-plane and release-history access.

use thiserror::Error;

/// Result type alias for collaborator calls.
pub type PlaneResult<T> = Result<T, ControlPlaneError>;

/// Failures reported by the control plane or the release-history store.
///
/// These are the precondition-style failures of an operation: if one of
/// them surfaces before a mutation request was accepted, the operation
/// aborts with no side effect to compensate.
#[derive(Debug, Error)]
pub enum ControlPlaneError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("control plane unreachable: {0}")]
    Unreachable(String),

    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("protocol error: {0}")]
    Protocol(String),
}
