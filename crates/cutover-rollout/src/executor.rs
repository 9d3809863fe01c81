//! Rollback executor — drives a release to a resolved target revision.
//!
//! Apply, then poll readiness, then probe health. Fatal errors are
//! reserved for failures that mean no mutation happened; once the apply
//! call is accepted, readiness timeouts and failed probes downgrade the
//! outcome to degraded instead of failing it, since the mutation is
//! already in flight and is not compensated automatically.

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{info, warn};

use cutover_core::{ControlPlane, ControlPlaneError, Outcome, Release, Revision};
use cutover_health::{HealthCheckResult, HealthProbe};

use crate::error::{RolloutError, RolloutResult};
use crate::wait::{ReadinessWait, WaitSummary};

/// Report of a completed rollback, degraded or not.
#[derive(Debug, Clone, Serialize)]
pub struct RollbackReport {
    pub namespace: String,
    pub release: String,
    pub from_revision: Revision,
    pub to_revision: Revision,
    pub availability: WaitSummary,
    /// Probe result; `None` when the release has no health endpoint.
    pub health: Option<HealthCheckResult>,
    pub elapsed: Duration,
}

/// Executes revision rollbacks against the control plane.
pub struct RollbackExecutor<C> {
    plane: C,
    wait: ReadinessWait,
    probe: HealthProbe,
}

impl<C: ControlPlane> RollbackExecutor<C> {
    pub fn new(plane: C, wait: ReadinessWait, probe: HealthProbe) -> Self {
        Self { plane, wait, probe }
    }

    /// Drive `release` to `target`.
    ///
    /// `target == current_revision` still re-applies: the control plane
    /// may have drifted from the recorded revision.
    pub async fn rollback(
        &self,
        release: &Release,
        target: Revision,
    ) -> RolloutResult<Outcome<RollbackReport>> {
        let rref = release.release_ref();
        let started = Instant::now();

        info!(
            release = %rref,
            from = release.current_revision,
            to = target,
            "applying revision"
        );
        match self.plane.apply_revision(&rref, target).await {
            Ok(()) => {}
            Err(ControlPlaneError::NotFound(what)) => {
                return Err(RolloutError::ReleaseNotFound(what));
            }
            Err(e) => return Err(e.into()),
        }

        let mut warnings = Vec::new();

        let availability = self.wait.wait_for_available(&self.plane, &rref).await;
        if !availability.available {
            warnings.push(format!(
                "availability not confirmed within {:?}",
                self.wait.timeout
            ));
        }

        let health = match &release.health {
            Some(endpoint) => {
                let result = self.probe.check(&endpoint.address, &endpoint.path).await;
                if !result.passed {
                    let cause = result
                        .last_error
                        .as_deref()
                        .map(|e| format!(": {e}"))
                        .unwrap_or_default();
                    warnings.push(format!(
                        "health check failed after {} attempts{cause}",
                        result.attempts
                    ));
                }
                Some(result)
            }
            None => None,
        };

        let report = RollbackReport {
            namespace: release.namespace.clone(),
            release: release.name.clone(),
            from_revision: release.current_revision,
            to_revision: target,
            availability,
            health,
            elapsed: started.elapsed(),
        };

        if warnings.is_empty() {
            info!(release = %rref, revision = target, "rollback verified");
            Ok(Outcome::success(report))
        } else {
            let warning = warnings.join("; ");
            warn!(release = %rref, revision = target, %warning, "rollback degraded");
            Ok(Outcome::degraded(report, warning))
        }
    }
}
