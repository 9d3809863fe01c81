//! Revision resolution — turns a target specifier into a concrete
//! revision ordinal.
//!
//! Read-only against the release snapshot. An explicit target is taken
//! verbatim; whether it exists in history is the control plane's concern
//! at apply time.

use std::fmt;
use std::str::FromStr;

use cutover_core::{Release, Revision};

use crate::error::{RolloutError, RolloutResult};

/// What the operator asked to roll back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevisionTarget {
    /// The revision immediately before the current one.
    Previous,
    /// An explicit ordinal, validated for range but not existence.
    Explicit(i64),
}

impl fmt::Display for RevisionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RevisionTarget::Previous => f.write_str("previous"),
            RevisionTarget::Explicit(n) => write!(f, "{n}"),
        }
    }
}

/// Error for target specifiers that are neither "previous" nor an integer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid revision target {0:?}, expected \"previous\" or a revision number")]
pub struct ParseTargetError(pub String);

impl FromStr for RevisionTarget {
    type Err = ParseTargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "previous" {
            return Ok(RevisionTarget::Previous);
        }
        s.parse::<i64>()
            .map(RevisionTarget::Explicit)
            .map_err(|_| ParseTargetError(s.to_string()))
    }
}

/// Resolve `target` against the release's current revision.
pub fn resolve(release: &Release, target: RevisionTarget) -> RolloutResult<Revision> {
    match target {
        RevisionTarget::Previous => {
            if release.current_revision <= 1 {
                Err(RolloutError::NoPriorRevision {
                    release: release.release_ref().to_string(),
                })
            } else {
                Ok(release.current_revision - 1)
            }
        }
        RevisionTarget::Explicit(n) if n <= 0 => Err(RolloutError::InvalidRevision(n)),
        RevisionTarget::Explicit(n) => Ok(n as Revision),
    }
}
