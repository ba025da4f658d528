//! `imagepub` application entry point.
//!
//! Builds the container image for the project in the configured context
//! directory and publishes it to the registry. Uses `eyre` for opaque error
//! handling at the application boundary, converting domain-specific errors
//! into human-readable reports.
//!
//! Configuration is loaded with layered precedence via `OrthoConfig`:
//! 1. Application defaults
//! 2. CI action inputs (`INPUT_*` environment variables)
//! 3. Command-line arguments

use clap::Parser;
use eyre::{Report, Result as EyreResult};
use imagepub::api::{PublishParams, publish};
use imagepub::build::SystemBuildRunner;
use imagepub::config::{Cli, PublishConfig, load_config};
use imagepub::engine::{DaemonEndpoint, EngineConnector};
use imagepub::error::{ContainerError, Result as PublishResult};
use imagepub::platform::Platform;
use mockable::DefaultEnv;
use tracing::Level;

/// Application entry point.
///
/// Any error ends the run with a report on standard error and exit status 1.
fn main() -> EyreResult<()> {
    let cli = Cli::parse();
    let action_config = load_config(&cli, &DefaultEnv::new()).map_err(Report::from)?;
    init_tracing(action_config.verbose);

    let config = action_config.resolve().map_err(Report::from)?;
    run(&config).map_err(Report::from)
}

/// Install the log subscriber; diagnostics are only shown when verbose.
fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();
}

/// Connect to the daemon and publish, returning domain-specific errors.
///
/// Keeps semantic errors inside the run loop so the CLI boundary owns
/// conversion to `eyre::Report`.
fn run(config: &PublishConfig) -> PublishResult<()> {
    let platform = Platform::detect();
    tracing::debug!(%platform, "detected platform");

    let endpoint = DaemonEndpoint::for_platform(platform)?;
    tracing::debug!(%endpoint, "using container engine endpoint");

    let runtime = tokio::runtime::Runtime::new().map_err(|error| {
        ContainerError::RuntimeCreationFailed {
            message: error.to_string(),
        }
    })?;

    let mut stdout = std::io::stdout();
    let images = runtime.block_on(publish(PublishParams {
        config,
        build_runner: &SystemBuildRunner,
        connect_registry: || EngineConnector::connect_endpoint(&endpoint),
        progress: &mut stdout,
    }))?;

    tracing::info!(latest = %images.latest, versioned = %images.versioned, "published image");
    Ok(())
}
