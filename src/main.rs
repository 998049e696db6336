//! rup - Rancher service rolling upgrade CLI tool.
//!
//! Upgrades a set of services concurrently under a fixed worker pool:
//! check the upgrade action, begin the in-service upgrade, wait until the
//! server reports it finishable, finish it, then report per-service
//! outcomes.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error, info};

use rup::config::{Args, Config};
use rup::directory::ServiceDirectory;
use rup::dispatch::{Dispatcher, build_jobs};
use rup::output;
use rup::rancher::api::RancherApi;
use rup::rancher::client::RancherClient;

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let config = Config::from_args(args);

    // Initialize logging
    if let Err(e) = init_tracing(&config.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    debug!("Starting rup - Rancher Service Upgrade Tool");

    tokio::select! {
        result = run(&config) => {
            if let Err(e) = result {
                error!("{}", e);
                std::process::exit(1);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received SIGINT, aborting run");
            std::process::exit(130);
        }
    }
}

/// Main application logic.
async fn run(config: &Config) -> Result<()> {
    config.validate()?;

    let client = RancherClient::new(&config.url, &config.access_key, &config.secret_key)
        .context("Failed to build Rancher client")?;
    let api: Arc<dyn RancherApi> = Arc::new(client);

    let directory = ServiceDirectory::build(api.as_ref())
        .await
        .context("Failed to build the service directory")?;
    info!("Service directory built: {} services known", directory.len());

    let jobs = build_jobs(&config.services, &config.image_prefix, &config.tag);

    if config.dry_run {
        output::print_plan(&jobs, &directory);
        return Ok(());
    }

    info!(
        "Dispatching {} upgrade job(s) across {} worker(s)",
        jobs.len(),
        config.parallelism
    );
    let dispatcher = Dispatcher::new(
        api,
        Arc::new(directory),
        config.parallelism,
        config.poll.clone(),
    );
    let summary = dispatcher.run(jobs).await;

    output::print_summary(&summary);
    Ok(())
}

/// Initialize tracing subscriber.
fn init_tracing(log_level: &str) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .map_err(|e| anyhow::anyhow!("Failed to initialize log filter: {}", e))?;

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    Ok(())
}
