//! Build-and-publish orchestration.
//!
//! Validates the project directory, builds the image, then tags and pushes
//! it. Each step only runs if the previous one succeeded; the first failure
//! is returned unchanged. The registry client is only created once the
//! build has succeeded, so an invalid project never touches the daemon.

use std::io::Write;

use crate::build::{BuildCommand, BuildRunner, run_build};
use crate::config::PublishConfig;
use crate::engine::{EngineConnector, ImageRegistryClient, PushRequest};
use crate::error::Result as PublishResult;
use crate::project::{ImageReferences, ProjectManifest};

/// Parameters for a publish run.
///
/// Groups the arguments required by [`publish`] into a single struct to
/// satisfy the "no more than four parameters" convention.
pub struct PublishParams<'a, R: BuildRunner, F, W: Write> {
    /// Resolved configuration.
    pub config: &'a PublishConfig,
    /// Executes the image build.
    pub build_runner: &'a R,
    /// Creates the client that tags and pushes the built image.
    pub connect_registry: F,
    /// Receives push progress records when verbose output is enabled.
    pub progress: &'a mut W,
}

/// References of a successfully published image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedImages {
    /// Fully qualified `latest` reference.
    pub latest: String,
    /// Fully qualified versioned reference.
    pub versioned: String,
}

/// Build the image in the configured context and publish it.
///
/// # Errors
///
/// Returns `PublishError` variants:
/// - `ProjectError::MissingFile` / `InvalidFile` if the context directory is
///   not publishable. Nothing is built in that case.
/// - `BuildError::SpawnFailed` / `Failed` if the build does not succeed.
///   Nothing is tagged or pushed in that case.
/// - Any error returned by `connect_registry`.
/// - `ContainerError::TagFailed` / `PushFailed` if the registry steps fail.
pub async fn publish<R, F, C, W>(
    params: PublishParams<'_, R, F, W>,
) -> PublishResult<PublishedImages>
where
    R: BuildRunner,
    F: FnOnce() -> PublishResult<C>,
    C: ImageRegistryClient,
    W: Write,
{
    let PublishParams {
        config,
        build_runner,
        connect_registry,
        progress,
    } = params;

    tracing::debug!(
        path = %config.context_path,
        registry = config.registry(),
        owner = %config.owner,
        "publishing project"
    );

    let manifest = ProjectManifest::load(&config.context_path)?;
    tracing::debug!(
        name = %manifest.package.name,
        version = %manifest.package.version,
        build_number = manifest.build_counter.build_number,
        "loaded package metadata"
    );

    let references = ImageReferences::new(
        config.registry(),
        &config.owner,
        &manifest.package,
        manifest.build_counter,
    );
    let images = PublishedImages {
        latest: references.latest(),
        versioned: references.versioned(),
    };
    tracing::debug!(
        latest = %images.latest,
        versioned = %images.versioned,
        "derived image references"
    );

    let command = BuildCommand::new(
        images.latest.as_str(),
        config.npm_token.as_deref(),
        &config.context_path,
    );
    run_build(build_runner, &command).await?;

    let registry_client = connect_registry()?;
    let request = PushRequest::new(references, config.credentials.clone(), config.verbose);
    EngineConnector::tag_and_push(&registry_client, &request, progress).await?;

    Ok(images)
}
