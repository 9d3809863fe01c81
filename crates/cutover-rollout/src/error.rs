//! Error taxonomy for rollback and switch operations.
//!
//! Everything here is fatal and means no mutation happened (or, for
//! `SwitchNotObserved`, that the caller must not assume it did).
//! Post-mutation verification shortfalls are not errors; they surface as
//! `Outcome::Degraded` warnings instead.

use thiserror::Error;

use cutover_core::{ControlPlaneError, Variant};

use crate::gate::CONFIRM_VAR;

/// Result type alias for rollout operations.
pub type RolloutResult<T> = Result<T, RolloutError>;

#[derive(Debug, Error)]
pub enum RolloutError {
    /// "previous" requested while the release is at revision 1.
    #[error("release {release} is at revision 1, there is no prior revision")]
    NoPriorRevision { release: String },

    /// Explicit revision target outside the valid range.
    #[error("invalid revision {0}: revisions start at 1")]
    InvalidRevision(i64),

    /// Production guard tripped before any mutation was attempted.
    #[error("namespace {namespace:?} is protected; set {CONFIRM_VAR}=yes to confirm")]
    SafetyBlocked { namespace: String },

    /// The control plane does not know the release.
    #[error("release {0} not found")]
    ReleaseNotFound(String),

    /// Collaborator failure before the mutation was accepted.
    #[error(transparent)]
    ControlPlane(#[from] ControlPlaneError),

    /// The route selector holds a value that is neither variant.
    #[error("traffic route for {release} has unexpected selector {selector:?}")]
    InconsistentRoute { release: String, selector: String },

    /// The selector patch did not take effect as read back; routing state
    /// and desired state have diverged.
    #[error("switch to {expected} not observed: selector reads {observed:?}")]
    SwitchNotObserved { expected: Variant, observed: String },
}
