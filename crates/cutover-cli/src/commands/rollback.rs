//! `cutover rollback` — drive a release to a target revision.

use std::time::Duration;

use tracing::debug;

use cutover_client::HttpControlPlane;
use cutover_core::{ReleaseHistory, ReleaseRef};
use cutover_health::HealthProbe;
use cutover_rollout::{resolve, ReadinessWait, RevisionTarget, RollbackExecutor};

use super::{confirmation_from_env, safety_gate, OutputFormat};

pub struct RollbackArgs {
    pub endpoint: String,
    pub namespace: String,
    pub release: String,
    pub target: RevisionTarget,
    pub timeout: u64,
    pub poll_interval: u64,
    pub retries: u32,
    pub probe_interval: u64,
    pub production_namespaces: Vec<String>,
    pub format: OutputFormat,
}

pub async fn run(args: RollbackArgs) -> anyhow::Result<()> {
    // Gate before anything that could mutate.
    let gate = safety_gate(&args.production_namespaces);
    gate.authorize(&args.namespace, confirmation_from_env())?;

    let plane = HttpControlPlane::new(args.endpoint.clone());
    let rref = ReleaseRef::new(&args.namespace, &args.release);
    let release = plane.release(&rref).await?;
    let target = resolve(&release, args.target)?;
    debug!(release = %rref, from = release.current_revision, to = target, "rollback requested");

    if args.format == OutputFormat::Text {
        println!("release:          {rref}");
        println!("current revision: {}", release.current_revision);
        println!("target revision:  {target}");
    }

    let wait = ReadinessWait {
        timeout: Duration::from_secs(args.timeout),
        poll_interval: Duration::from_secs(args.poll_interval),
    };
    let probe = HealthProbe::new(
        args.retries,
        Duration::from_secs(args.probe_interval),
        Duration::from_secs(5),
    );
    let executor = RollbackExecutor::new(plane, wait, probe);
    let outcome = executor.rollback(&release, target).await?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
        OutputFormat::Text => {
            let report = outcome.detail();
            let health = match &report.health {
                Some(h) if h.passed => format!("passed ({} attempts)", h.attempts),
                Some(h) => format!("failed ({} attempts)", h.attempts),
                None => "skipped (no health endpoint)".to_string(),
            };
            println!("health:           {health}");
            match outcome.warning() {
                None => println!(
                    "✓ {rref} now at revision {} ({:.1}s)",
                    report.to_revision,
                    report.elapsed.as_secs_f64()
                ),
                Some(warning) => {
                    println!(
                        "⚠ {rref} now at revision {}, degraded: {warning}",
                        report.to_revision
                    );
                }
            }
        }
    }
    Ok(())
}
