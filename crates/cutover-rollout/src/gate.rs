//! Production safety gate.
//!
//! Stateless and side-effect-free; must be evaluated before any mutating
//! call. Protected namespaces fail closed unless the operator confirmed
//! via the environment.

use std::collections::BTreeSet;

use tracing::debug;

use crate::error::{RolloutError, RolloutResult};

/// Environment variable that confirms mutations in protected namespaces.
pub const CONFIRM_VAR: &str = "CUTOVER_CONFIRM_PRODUCTION";

/// Guard for destructive operations against protected namespaces.
#[derive(Debug, Clone)]
pub struct SafetyGate {
    protected: BTreeSet<String>,
}

impl Default for SafetyGate {
    fn default() -> Self {
        Self {
            protected: ["production", "prod"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl SafetyGate {
    /// Gate with exactly the given protected namespaces.
    pub fn new(protected: impl IntoIterator<Item = String>) -> Self {
        Self {
            protected: protected.into_iter().collect(),
        }
    }

    /// Add a namespace to the protected set.
    pub fn protect(&mut self, namespace: &str) {
        self.protected.insert(namespace.to_string());
    }

    pub fn is_protected(&self, namespace: &str) -> bool {
        self.protected.contains(namespace)
    }

    /// Pass unless `namespace` is protected and no confirmation is present.
    pub fn authorize(&self, namespace: &str, confirmation_present: bool) -> RolloutResult<()> {
        if self.is_protected(namespace) && !confirmation_present {
            return Err(RolloutError::SafetyBlocked {
                namespace: namespace.to_string(),
            });
        }
        debug!(namespace, confirmed = confirmation_present, "safety gate passed");
        Ok(())
    }
}
