//! In-memory fake of the control plane and history store (testing only).
//!
//! `FakeCluster` satisfies both [`ReleaseHistory`] and [`ControlPlane`]
//! without any external dependency, and exposes knobs for the failure
//! modes downstream crates need to exercise: a release that never becomes
//! available, a route patch that never lands, a selector corrupted to an
//! unknown value, and an apply call the control plane rejects.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{ControlPlaneError, PlaneResult};
use crate::plane::{ControlPlane, ReleaseHistory};
use crate::types::{Availability, Release, ReleaseRef, Revision, TrafficRoute, Variant};

#[derive(Debug)]
struct Entry {
    release: Release,
    selector: String,
    /// Number of unavailable polls before the release reports available;
    /// `None` means it never does.
    ready_after: Option<u32>,
    polls: u32,
    /// When set, route patches are accepted but never take effect.
    freeze_route: bool,
    reject_apply: bool,
    applied: Vec<Revision>,
    patched: Vec<String>,
}

/// In-memory cluster shared behind an `Arc`, cheap to clone into the
/// component under test while the test keeps a handle for inspection.
#[derive(Debug, Clone, Default)]
pub struct FakeCluster {
    entries: Arc<Mutex<HashMap<String, Entry>>>,
}

impl FakeCluster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a release, routed to `selector` and available immediately.
    pub fn insert_release(&self, release: Release, selector: Variant) {
        let key = release.release_ref().to_string();
        let mut entries = self.entries.lock().expect("entries lock");
        entries.insert(
            key,
            Entry {
                release,
                selector: selector.as_str().to_string(),
                ready_after: Some(0),
                polls: 0,
                freeze_route: false,
                reject_apply: false,
                applied: Vec::new(),
                patched: Vec::new(),
            },
        );
    }

    fn with_entry<R>(&self, release: &ReleaseRef, f: impl FnOnce(&mut Entry) -> R) -> R {
        let mut entries = self.entries.lock().expect("entries lock");
        let entry = entries
            .get_mut(&release.to_string())
            .expect("release registered in FakeCluster");
        f(entry)
    }

    /// The release reports unavailable for the first `polls` availability
    /// reads, then available.
    pub fn set_ready_after(&self, release: &ReleaseRef, polls: u32) {
        self.with_entry(release, |e| e.ready_after = Some(polls));
    }

    /// The release never reports available.
    pub fn set_never_ready(&self, release: &ReleaseRef) {
        self.with_entry(release, |e| e.ready_after = None);
    }

    /// Route patches are accepted but silently dropped.
    pub fn freeze_route(&self, release: &ReleaseRef) {
        self.with_entry(release, |e| e.freeze_route = true);
    }

    /// Overwrite the selector with an arbitrary raw value.
    pub fn set_selector_raw(&self, release: &ReleaseRef, selector: &str) {
        self.with_entry(release, |e| e.selector = selector.to_string());
    }

    /// The next apply calls are rejected by the control plane.
    pub fn reject_apply(&self, release: &ReleaseRef) {
        self.with_entry(release, |e| e.reject_apply = true);
    }

    /// Revisions that have been applied, in call order.
    pub fn applied_revisions(&self, release: &ReleaseRef) -> Vec<Revision> {
        self.with_entry(release, |e| e.applied.clone())
    }

    /// Selector values that have been patched, in call order.
    pub fn patched_selectors(&self, release: &ReleaseRef) -> Vec<String> {
        self.with_entry(release, |e| e.patched.clone())
    }

    /// Current raw selector value.
    pub fn selector(&self, release: &ReleaseRef) -> String {
        self.with_entry(release, |e| e.selector.clone())
    }
}

#[async_trait]
impl ReleaseHistory for FakeCluster {
    async fn release(&self, release: &ReleaseRef) -> PlaneResult<Release> {
        let entries = self.entries.lock().expect("entries lock");
        entries
            .get(&release.to_string())
            .map(|e| e.release.clone())
            .ok_or_else(|| ControlPlaneError::NotFound(release.to_string()))
    }
}

#[async_trait]
impl ControlPlane for FakeCluster {
    async fn apply_revision(&self, release: &ReleaseRef, revision: Revision) -> PlaneResult<()> {
        let mut entries = self.entries.lock().expect("entries lock");
        let entry = entries
            .get_mut(&release.to_string())
            .ok_or_else(|| ControlPlaneError::NotFound(release.to_string()))?;
        if entry.reject_apply {
            return Err(ControlPlaneError::Rejected(format!(
                "apply of revision {revision} rejected"
            )));
        }
        entry.applied.push(revision);
        entry.release.current_revision = revision;
        Ok(())
    }

    async fn availability(&self, release: &ReleaseRef) -> PlaneResult<Availability> {
        let mut entries = self.entries.lock().expect("entries lock");
        let entry = entries
            .get_mut(&release.to_string())
            .ok_or_else(|| ControlPlaneError::NotFound(release.to_string()))?;
        entry.polls += 1;
        let available = match entry.ready_after {
            Some(after) => entry.polls > after,
            None => false,
        };
        Ok(Availability {
            available,
            ready_replicas: if available { 3 } else { 1 },
            desired_replicas: 3,
        })
    }

    async fn traffic_route(&self, release: &ReleaseRef) -> PlaneResult<TrafficRoute> {
        let entries = self.entries.lock().expect("entries lock");
        entries
            .get(&release.to_string())
            .map(|e| TrafficRoute {
                selector: e.selector.clone(),
            })
            .ok_or_else(|| ControlPlaneError::NotFound(release.to_string()))
    }

    async fn patch_traffic_route(&self, release: &ReleaseRef, target: Variant) -> PlaneResult<()> {
        let mut entries = self.entries.lock().expect("entries lock");
        let entry = entries
            .get_mut(&release.to_string())
            .ok_or_else(|| ControlPlaneError::NotFound(release.to_string()))?;
        entry.patched.push(target.as_str().to_string());
        if !entry.freeze_route {
            entry.selector = target.as_str().to_string();
        }
        Ok(())
    }
}
