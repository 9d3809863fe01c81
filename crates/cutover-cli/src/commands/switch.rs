//! `cutover switch` — blue/green cutover of the traffic route.

use std::time::Duration;

use tracing::debug;

use cutover_client::HttpControlPlane;
use cutover_core::{ReleaseRef, Variant};
use cutover_rollout::TrafficSwitcher;

use super::{confirmation_from_env, safety_gate, OutputFormat};

pub struct SwitchArgs {
    pub endpoint: String,
    pub variant: Variant,
    pub namespace: String,
    pub release: String,
    pub settle_delay: u64,
    pub production_namespaces: Vec<String>,
    pub format: OutputFormat,
}

pub async fn run(args: SwitchArgs) -> anyhow::Result<()> {
    let gate = safety_gate(&args.production_namespaces);
    gate.authorize(&args.namespace, confirmation_from_env())?;

    let plane = HttpControlPlane::new(args.endpoint.clone());
    let rref = ReleaseRef::new(&args.namespace, &args.release);
    debug!(release = %rref, variant = %args.variant, "traffic switch requested");
    let switcher = TrafficSwitcher::new(plane, Duration::from_secs(args.settle_delay));
    let outcome = switcher.switch_to(&rref, args.variant).await?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
        OutputFormat::Text => {
            let report = outcome.detail();
            if report.changed {
                println!(
                    "✓ traffic for {rref} switched from {} to {} ({:.1}s)",
                    report.from,
                    report.to,
                    report.elapsed.as_secs_f64()
                );
            } else {
                println!("✓ traffic for {rref} already routed to {}", report.to);
            }
        }
    }
    Ok(())
}
