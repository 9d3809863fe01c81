//! Bounded readiness wait — deadline plus poll interval, returning a
//! structured summary instead of a boolean exit code.
//!
//! Used after a mutation request has been accepted, so collaborator read
//! errors during the wait are recorded and treated as a not-yet-available
//! poll: the operation degrades on timeout rather than aborting.

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, warn};

use cutover_core::{ControlPlane, ReleaseRef};

/// Deadline and poll cadence for an availability wait.
#[derive(Debug, Clone, Copy)]
pub struct ReadinessWait {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for ReadinessWait {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(300),
            poll_interval: Duration::from_secs(5),
        }
    }
}

/// What a readiness wait observed.
#[derive(Debug, Clone, Serialize)]
pub struct WaitSummary {
    pub available: bool,
    /// Availability reads issued (≥ 1).
    pub polls: u32,
    pub elapsed: Duration,
    /// Last collaborator read error, if polls failed along the way.
    pub last_error: Option<String>,
}

impl ReadinessWait {
    /// Poll until the release reports available or the deadline passes.
    /// Always issues at least one poll.
    pub async fn wait_for_available<C: ControlPlane>(
        &self,
        plane: &C,
        release: &ReleaseRef,
    ) -> WaitSummary {
        let started = Instant::now();
        let deadline = started + self.timeout;
        let mut polls = 0;
        let mut last_error = None;

        loop {
            polls += 1;
            match plane.availability(release).await {
                Ok(availability) if availability.available => {
                    debug!(release = %release, polls, "release available");
                    return WaitSummary {
                        available: true,
                        polls,
                        elapsed: started.elapsed(),
                        last_error: None,
                    };
                }
                Ok(availability) => {
                    debug!(
                        release = %release,
                        ready = availability.ready_replicas,
                        desired = availability.desired_replicas,
                        "release not yet available"
                    );
                }
                Err(e) => {
                    warn!(release = %release, error = %e, "availability read failed, retrying");
                    last_error = Some(e.to_string());
                }
            }

            if Instant::now() >= deadline {
                break;
            }
            tokio::time::sleep(self.poll_interval).await;
        }

        warn!(release = %release, polls, timeout = ?self.timeout, "availability wait deadline passed");
        WaitSummary {
            available: false,
            polls,
            elapsed: started.elapsed(),
            last_error,
        }
    }
}
