//! Command implementations and shared CLI plumbing.

pub mod rollback;
pub mod status;
pub mod switch;

use cutover_rollout::{SafetyGate, CONFIRM_VAR};

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Whether the operator confirmed production mutations via the environment.
pub(crate) fn confirmation_from_env() -> bool {
    std::env::var(CONFIRM_VAR)
        .map(|value| is_affirmative(&value))
        .unwrap_or(false)
}

fn is_affirmative(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}

/// Default gate plus any namespaces passed on the command line.
pub(crate) fn safety_gate(extra: &[String]) -> SafetyGate {
    let mut gate = SafetyGate::default();
    for namespace in extra {
        gate.protect(namespace);
    }
    gate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn affirmative_values() {
        assert!(is_affirmative("yes"));
        assert!(is_affirmative("true"));
        assert!(is_affirmative("1"));
        assert!(is_affirmative(" YES "));
    }

    #[test]
    fn non_affirmative_values() {
        assert!(!is_affirmative(""));
        assert!(!is_affirmative("no"));
        assert!(!is_affirmative("0"));
        assert!(!is_affirmative("yess"));
    }

    #[test]
    fn gate_includes_cli_namespaces() {
        let gate = safety_gate(&["api-prod".to_string()]);
        assert!(gate.is_protected("api-prod"));
        assert!(gate.is_protected("production"));
        assert!(!gate.is_protected("staging"));
    }
}
