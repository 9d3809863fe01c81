//! Domain types for release rollback and traffic cutover.
//!
//! All durable state lives in the external control plane and release
//! history store; the types here are read snapshots and addressing. They
//! are serializable to/from JSON for the control-plane wire format and
//! for CLI reporting.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Integer ordinal of a release revision. Revisions start at 1 and are
/// strictly increasing; 0 is never a valid revision.
pub type Revision = u64;

// ── Release ───────────────────────────────────────────────────────

/// Namespace-scoped address of a release.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReleaseRef {
    pub namespace: String,
    pub name: String,
}

impl ReleaseRef {
    pub fn new(namespace: &str, name: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
        }
    }
}

impl fmt::Display for ReleaseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Snapshot of a deployable release as reported by the history store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Release {
    pub name: String,
    pub namespace: String,
    /// Revision currently applied as the live manifest.
    pub current_revision: Revision,
    /// Past revisions, oldest first. Ordinals are strictly increasing.
    pub history: Vec<RevisionRecord>,
    /// Health endpoint for post-mutation verification, if configured.
    pub health: Option<HealthEndpoint>,
}

impl Release {
    pub fn release_ref(&self) -> ReleaseRef {
        ReleaseRef::new(&self.namespace, &self.name)
    }
}

/// One historical revision of a release's manifest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RevisionRecord {
    pub revision: Revision,
    /// Opaque reference to the manifest stored by the control plane.
    pub manifest_ref: String,
}

/// Where to probe a release's health.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthEndpoint {
    /// Listen address (`host:port`).
    pub address: String,
    /// HTTP path to probe (e.g. "/healthz").
    pub path: String,
}

// ── Traffic routing ───────────────────────────────────────────────

/// One of the two parallel deployment variants used for cutover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    Blue,
    Green,
}

impl Variant {
    /// The opposite variant.
    pub fn other(self) -> Self {
        match self {
            Variant::Blue => Variant::Green,
            Variant::Green => Variant::Blue,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Variant::Blue => "blue",
            Variant::Green => "green",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for selector values that are neither "blue" nor "green".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown variant {0:?}, expected \"blue\" or \"green\"")]
pub struct UnknownVariant(pub String);

impl FromStr for Variant {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blue" => Ok(Variant::Blue),
            "green" => Ok(Variant::Green),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// The routing selector as read from the control plane.
///
/// The selector is kept as the raw string: exactly one variant should be
/// active, but the route is externally owned, so an unexpected value must
/// surface as an inconsistency instead of being coerced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrafficRoute {
    pub selector: String,
}

impl TrafficRoute {
    /// Parse the selector into a known variant, if it is one.
    pub fn variant(&self) -> Option<Variant> {
        self.selector.parse().ok()
    }
}

// ── Availability ──────────────────────────────────────────────────

/// Readiness snapshot for a release, as reported by the control plane.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Availability {
    /// All expected replicas are ready.
    pub available: bool,
    pub ready_replicas: u32,
    pub desired_replicas: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_ref_display() {
        let rref = ReleaseRef::new("staging", "api");
        assert_eq!(rref.to_string(), "staging/api");
    }

    #[test]
    fn variant_parses_known_labels() {
        assert_eq!("blue".parse::<Variant>(), Ok(Variant::Blue));
        assert_eq!("green".parse::<Variant>(), Ok(Variant::Green));
    }

    #[test]
    fn variant_rejects_unknown_label() {
        let err = "canary".parse::<Variant>().unwrap_err();
        assert_eq!(err, UnknownVariant("canary".to_string()));
    }

    #[test]
    fn variant_other_flips() {
        assert_eq!(Variant::Blue.other(), Variant::Green);
        assert_eq!(Variant::Green.other(), Variant::Blue);
    }

    #[test]
    fn route_with_unexpected_selector_is_not_a_variant() {
        let route = TrafficRoute {
            selector: "purple".to_string(),
        };
        assert_eq!(route.variant(), None);
    }

    #[test]
    fn release_serializes_roundtrip() {
        let release = Release {
            name: "api".to_string(),
            namespace: "staging".to_string(),
            current_revision: 5,
            history: vec![
                RevisionRecord {
                    revision: 4,
                    manifest_ref: "sha256:aaa".to_string(),
                },
                RevisionRecord {
                    revision: 5,
                    manifest_ref: "sha256:bbb".to_string(),
                },
            ],
            health: Some(HealthEndpoint {
                address: "10.0.0.7:8000".to_string(),
                path: "/health/ready".to_string(),
            }),
        };
        let json = serde_json::to_string(&release).unwrap();
        let back: Release = serde_json::from_str(&json).unwrap();
        assert_eq!(back, release);
    }

    #[test]
    fn variant_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&Variant::Blue).unwrap(), "\"blue\"");
        assert_eq!(
            serde_json::from_str::<Variant>("\"green\"").unwrap(),
            Variant::Green
        );
    }
}
