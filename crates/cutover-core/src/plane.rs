//! Collaborator contracts — the release-history store and the cluster
//! control plane.
//!
//! Both are externally owned, multi-operator shared state. Implementations
//! must treat every read as an eventually-consistent snapshot: a read
//! issued immediately after a write is allowed to return the old value,
//! which is why callers re-read after a settle delay when they need to
//! verify a mutation took effect.

use async_trait::async_trait;

use crate::error::PlaneResult;
use crate::types::{Availability, Release, ReleaseRef, Revision, TrafficRoute, Variant};

/// Read access to the ordered revision history of releases.
#[async_trait]
pub trait ReleaseHistory: Send + Sync {
    /// Fetch the release snapshot, including its current revision and
    /// revision history.
    async fn release(&self, release: &ReleaseRef) -> PlaneResult<Release>;
}

/// Mutation and readiness surface of the cluster control plane.
#[async_trait]
pub trait ControlPlane: Send + Sync {
    /// Request that `revision` become the release's live manifest.
    ///
    /// The call may block until the control plane accepts the request.
    /// Acceptance does not imply readiness; poll [`Self::availability`].
    async fn apply_revision(&self, release: &ReleaseRef, revision: Revision) -> PlaneResult<()>;

    /// Current readiness snapshot for the release.
    async fn availability(&self, release: &ReleaseRef) -> PlaneResult<Availability>;

    /// Read the active traffic route selector.
    async fn traffic_route(&self, release: &ReleaseRef) -> PlaneResult<TrafficRoute>;

    /// Atomically patch the traffic route selector to `target`.
    async fn patch_traffic_route(&self, release: &ReleaseRef, target: Variant) -> PlaneResult<()>;
}
