//! `cutover status` — read-only snapshot of a release.

use cutover_client::HttpControlPlane;
use cutover_core::{ControlPlane, ReleaseHistory, ReleaseRef};

use super::OutputFormat;

pub async fn run(
    endpoint: &str,
    namespace: &str,
    release: &str,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let plane = HttpControlPlane::new(endpoint);
    let rref = ReleaseRef::new(namespace, release);

    let release = plane.release(&rref).await?;
    let availability = plane.availability(&rref).await?;
    let route = plane.traffic_route(&rref).await?;

    match format {
        OutputFormat::Json => {
            let status = serde_json::json!({
                "release": release,
                "availability": availability,
                "route": route,
            });
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        OutputFormat::Text => {
            println!("release:   {rref}");
            println!("revision:  {}", release.current_revision);
            println!("route:     {}", route.selector);
            println!(
                "available: {} ({}/{} ready)",
                availability.available, availability.ready_replicas, availability.desired_replicas
            );
            if !release.history.is_empty() {
                println!("history:");
                for record in &release.history {
                    println!("  {:>4}  {}", record.revision, record.manifest_ref);
                }
            }
        }
    }
    Ok(())
}
