//! Traffic switcher — blue/green cutover with read-back verification.
//!
//! The route selector is externally owned, eventually-consistent state:
//! a read issued right after the patch may still show the old value, so
//! verification waits a settle delay before re-reading. A re-read that
//! still disagrees is fatal for the switch: routing state and desired
//! state have diverged and the caller must not assume success.

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{info, warn};

use cutover_core::{ControlPlane, Outcome, ReleaseRef, Variant};

use crate::error::{RolloutError, RolloutResult};

/// Report of a completed (or no-op) traffic switch.
#[derive(Debug, Clone, Serialize)]
pub struct SwitchReport {
    pub release: String,
    pub from: Variant,
    pub to: Variant,
    /// False when the route already pointed at the target.
    pub changed: bool,
    pub elapsed: Duration,
}

/// Toggles which variant receives live traffic.
pub struct TrafficSwitcher<C> {
    plane: C,
    settle_delay: Duration,
}

impl<C: ControlPlane> TrafficSwitcher<C> {
    pub fn new(plane: C, settle_delay: Duration) -> Self {
        Self {
            plane,
            settle_delay,
        }
    }

    /// Route the release's traffic to `target`, verifying by re-read.
    ///
    /// Health-gated cutover is the caller's concern: probe the target
    /// variant before calling this, and again after to confirm live
    /// traffic is healthy (switching back on failure).
    pub async fn switch_to(
        &self,
        release: &ReleaseRef,
        target: Variant,
    ) -> RolloutResult<Outcome<SwitchReport>> {
        let started = Instant::now();

        let route = self.plane.traffic_route(release).await?;
        let current = route
            .variant()
            .ok_or_else(|| RolloutError::InconsistentRoute {
                release: release.to_string(),
                selector: route.selector.clone(),
            })?;

        if current == target {
            info!(release = %release, variant = %target, "traffic already routed to target");
            return Ok(Outcome::success(SwitchReport {
                release: release.to_string(),
                from: current,
                to: target,
                changed: false,
                elapsed: started.elapsed(),
            }));
        }

        info!(release = %release, from = %current, to = %target, "switching traffic");
        self.plane.patch_traffic_route(release, target).await?;

        // The selector is an eventually-consistent snapshot; give the
        // patch time to propagate before verifying.
        tokio::time::sleep(self.settle_delay).await;

        let observed = self.plane.traffic_route(release).await?;
        if observed.variant() == Some(target) {
            info!(release = %release, variant = %target, "traffic switch verified");
            Ok(Outcome::success(SwitchReport {
                release: release.to_string(),
                from: current,
                to: target,
                changed: true,
                elapsed: started.elapsed(),
            }))
        } else {
            warn!(
                release = %release,
                expected = %target,
                observed = %observed.selector,
                "traffic switch not observed on re-read"
            );
            Err(RolloutError::SwitchNotObserved {
                expected: target,
                observed: observed.selector,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cutover_core::fakes::FakeCluster;
    use cutover_core::Release;

    fn switcher(cluster: &FakeCluster) -> TrafficSwitcher<FakeCluster> {
        TrafficSwitcher::new(cluster.clone(), Duration::from_millis(5))
    }

    fn fixture() -> Release {
        Release {
            name: "api".to_string(),
            namespace: "staging".to_string(),
            current_revision: 5,
            history: vec![],
            health: None,
        }
    }

    #[tokio::test]
    async fn switch_patches_and_verifies() {
        let cluster = FakeCluster::new();
        cluster.insert_release(fixture(), Variant::Blue);
        let rref = ReleaseRef::new("staging", "api");

        let outcome = switcher(&cluster)
            .switch_to(&rref, Variant::Green)
            .await
            .unwrap();

        assert!(!outcome.is_degraded());
        let report = outcome.detail();
        assert_eq!(report.from, Variant::Blue);
        assert_eq!(report.to, Variant::Green);
        assert!(report.changed);
        assert_eq!(cluster.selector(&rref), "green");
    }

    #[tokio::test]
    async fn switch_to_current_variant_is_a_noop() {
        let cluster = FakeCluster::new();
        cluster.insert_release(fixture(), Variant::Blue);
        let rref = ReleaseRef::new("staging", "api");

        let outcome = switcher(&cluster)
            .switch_to(&rref, Variant::Blue)
            .await
            .unwrap();

        assert!(!outcome.detail().changed);
        // No patch was issued and the selector is untouched.
        assert!(cluster.patched_selectors(&rref).is_empty());
        assert_eq!(cluster.selector(&rref), "blue");
    }

    #[tokio::test]
    async fn round_trip_restores_original_selector() {
        let cluster = FakeCluster::new();
        cluster.insert_release(fixture(), Variant::Blue);
        let rref = ReleaseRef::new("staging", "api");
        let switcher = switcher(&cluster);

        switcher.switch_to(&rref, Variant::Green).await.unwrap();
        assert_eq!(cluster.selector(&rref), "green");

        switcher.switch_to(&rref, Variant::Blue).await.unwrap();
        assert_eq!(cluster.selector(&rref), "blue");
    }

    #[tokio::test]
    async fn patch_that_never_lands_is_not_observed() {
        let cluster = FakeCluster::new();
        cluster.insert_release(fixture(), Variant::Blue);
        let rref = ReleaseRef::new("staging", "api");
        cluster.freeze_route(&rref);

        let err = switcher(&cluster)
            .switch_to(&rref, Variant::Green)
            .await
            .unwrap_err();

        match err {
            RolloutError::SwitchNotObserved { expected, observed } => {
                assert_eq!(expected, Variant::Green);
                assert_eq!(observed, "blue");
            }
            other => panic!("expected SwitchNotObserved, got {other}"),
        }
    }

    #[tokio::test]
    async fn unexpected_selector_is_a_consistency_error() {
        let cluster = FakeCluster::new();
        cluster.insert_release(fixture(), Variant::Blue);
        let rref = ReleaseRef::new("staging", "api");
        cluster.set_selector_raw(&rref, "canary");

        let err = switcher(&cluster)
            .switch_to(&rref, Variant::Green)
            .await
            .unwrap_err();

        assert!(matches!(err, RolloutError::InconsistentRoute { .. }));
    }
}
