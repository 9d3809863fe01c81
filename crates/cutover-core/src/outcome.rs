//! Operation outcome — success, or success with reduced confidence.
//!
//! Once a mutation request has been accepted by the control plane it is
//! not compensated automatically; post-mutation verification failures
//! (readiness timeout, health probe exhaustion) therefore downgrade the
//! outcome instead of turning it into an error. Fatal failures, where
//! nothing was mutated, stay on the `Err` arm of the operation's `Result`.

use serde::Serialize;

/// Outcome of a completed mutation, carrying the operation's report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome<T> {
    /// Mutation performed and verified.
    Success { detail: T },
    /// Mutation performed, but verification could not be confirmed.
    Degraded { detail: T, warning: String },
}

impl<T> Outcome<T> {
    pub fn success(detail: T) -> Self {
        Outcome::Success { detail }
    }

    pub fn degraded(detail: T, warning: impl Into<String>) -> Self {
        Outcome::Degraded {
            detail,
            warning: warning.into(),
        }
    }

    /// The operation's report, regardless of confidence.
    pub fn detail(&self) -> &T {
        match self {
            Outcome::Success { detail } => detail,
            Outcome::Degraded { detail, .. } => detail,
        }
    }

    /// The degradation warning, if any.
    pub fn warning(&self) -> Option<&str> {
        match self {
            Outcome::Success { .. } => None,
            Outcome::Degraded { warning, .. } => Some(warning),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Outcome::Degraded { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_has_no_warning() {
        let outcome = Outcome::success(42);
        assert!(!outcome.is_degraded());
        assert_eq!(outcome.warning(), None);
        assert_eq!(*outcome.detail(), 42);
    }

    #[test]
    fn degraded_carries_warning_and_detail() {
        let outcome = Outcome::degraded(42, "availability not confirmed");
        assert!(outcome.is_degraded());
        assert_eq!(outcome.warning(), Some("availability not confirmed"));
        assert_eq!(*outcome.detail(), 42);
    }

    #[test]
    fn outcome_serializes_tagged() {
        let json = serde_json::to_value(Outcome::success("ok")).unwrap();
        assert_eq!(json["outcome"], "success");
        assert_eq!(json["detail"], "ok");

        let json = serde_json::to_value(Outcome::degraded("ok", "slow")).unwrap();
        assert_eq!(json["outcome"], "degraded");
        assert_eq!(json["warning"], "slow");
    }
}
