//! Network Plan Controller
//!
//! Plans network reservations for every instance of a deployment:
//! - which persisted reservations are kept
//! - which reservations must be allocated
//! - which reservations must be released
//!
//! Reads the deployment state document named by `DEPLOYMENT_STATE` and writes
//! a JSON plan report to `PLAN_OUTPUT` (stdout when unset).

mod config;
mod controller;
mod error;
mod ledger;
mod report;
mod state;

use anyhow::Context;
use config::Config;
use controller::Controller;
use state::DeploymentState;
use std::io::Write;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    info!("Starting Network Plan Controller");

    let config = Config::from_env()?;
    info!("Configuration:");
    info!("  Deployment state: {}", config.state_path.display());
    info!(
        "  Plan output: {}",
        config
            .output_path
            .as_ref()
            .map_or_else(|| "stdout".to_string(), |path| path.display().to_string())
    );
    info!("  Workers: {}", config.workers);

    let state = DeploymentState::load(&config.state_path)
        .await
        .with_context(|| format!("loading deployment state {}", config.state_path.display()))?;

    let controller = Controller::new(config.workers)?;
    let report = controller.run(&state).await.context("planning deployment")?;
    let json = report.to_json().context("rendering plan report")?;

    match &config.output_path {
        Some(path) => tokio::fs::write(path, json)
            .await
            .with_context(|| format!("writing plan report {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}").context("writing plan report to stdout")?;
        }
    }

    info!("Network Plan Controller finished");
    Ok(())
}
