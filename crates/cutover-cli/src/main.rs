//! cutover — move live traffic between release versions.
//!
//! Three operations against the cluster control plane:
//! - `rollback`: drive a release to an explicit or previous revision,
//!   wait for availability, verify health.
//! - `switch`: blue/green cutover of the traffic route selector, verified
//!   by re-read.
//! - `status`: release, revision history, route, and availability.
//!
//! Mutations in protected namespaces require the
//! `CUTOVER_CONFIRM_PRODUCTION` environment variable. Exit code 0 covers
//! degraded outcomes (the mutation happened; verification is the part
//! that fell short); fatal errors exit non-zero.

use clap::{Parser, Subcommand};

use cutover_core::Variant;
use cutover_rollout::RevisionTarget;

mod commands;

use commands::OutputFormat;

#[derive(Parser)]
#[command(
    name = "cutover",
    about = "Release rollback and blue/green cutover against the cluster control plane",
    version,
    propagate_version = true,
)]
struct Cli {
    /// Control-plane API address (host:port).
    #[arg(long, global = true, default_value = "127.0.0.1:8443")]
    endpoint: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Roll a release back (or forward) to a specific revision.
    Rollback {
        /// Namespace of the release.
        namespace: String,
        /// Release name.
        release: String,
        /// Target revision: a revision number or "previous".
        target: RevisionTarget,
        /// Seconds to wait for the release to become available.
        #[arg(long, default_value = "300")]
        timeout: u64,
        /// Seconds between availability polls.
        #[arg(long, default_value = "5")]
        poll_interval: u64,
        /// Health probe attempts.
        #[arg(long, default_value = "3")]
        retries: u32,
        /// Seconds between health probe attempts.
        #[arg(long, default_value = "5")]
        probe_interval: u64,
        /// Additional namespaces to treat as protected.
        #[arg(long = "production-namespace")]
        production_namespaces: Vec<String>,
        /// Output format: text or json.
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },
    /// Switch live traffic to the blue or green variant.
    Switch {
        /// Variant to route traffic to.
        variant: Variant,
        /// Namespace of the release.
        namespace: String,
        /// Release name.
        release: String,
        /// Seconds to let the routing patch settle before verifying.
        #[arg(long, default_value = "2")]
        settle_delay: u64,
        /// Additional namespaces to treat as protected.
        #[arg(long = "production-namespace")]
        production_namespaces: Vec<String>,
        /// Output format: text or json.
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },
    /// Show a release's revisions, route, and availability.
    Status {
        /// Namespace of the release.
        namespace: String,
        /// Release name.
        release: String,
        /// Output format: text or json.
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,cutover=debug".parse().expect("default filter")),
        )
        .init();

    let cli = Cli::parse();
    let endpoint = cli.endpoint.clone();

    match cli.command {
        Commands::Rollback {
            namespace,
            release,
            target,
            timeout,
            poll_interval,
            retries,
            probe_interval,
            production_namespaces,
            format,
        } => {
            commands::rollback::run(commands::rollback::RollbackArgs {
                endpoint,
                namespace,
                release,
                target,
                timeout,
                poll_interval,
                retries,
                probe_interval,
                production_namespaces,
                format,
            })
            .await
        }
        Commands::Switch {
            variant,
            namespace,
            release,
            settle_delay,
            production_namespaces,
            format,
        } => {
            commands::switch::run(commands::switch::SwitchArgs {
                endpoint,
                variant,
                namespace,
                release,
                settle_delay,
                production_namespaces,
                format,
            })
            .await
        }
        Commands::Status {
            namespace,
            release,
            format,
        } => commands::status::run(&endpoint, &namespace, &release, format).await,
    }
}
