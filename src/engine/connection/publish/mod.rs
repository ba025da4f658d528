//! Image tagging and registry pushes.
//!
//! After the build, the `latest` image is tagged with the versioned reference
//! and both references are pushed. Pushes are strictly sequential: the
//! versioned push starts only after the `latest` push stream has ended
//! cleanly. Bollard calls sit behind a trait seam so the sequence can be
//! unit-tested without a live daemon.

use std::future::Future;
use std::io::Write;
use std::pin::Pin;

use bollard::auth::DockerCredentials;
use bollard::models::PushImageInfo;
use bollard::query_parameters::{PushImageOptionsBuilder, TagImageOptionsBuilder};
use bollard::{Docker, errors::Error as BollardError};
use futures_util::{Stream, StreamExt};
use serde_json::Value;

use super::EngineConnector;
use crate::config::RegistryCredentials;
use crate::error::{ContainerError, PublishError};
use crate::project::{ImageReferences, LATEST_TAG};

/// Boxed future type returned by [`ImageRegistryClient::tag_image`].
pub type TagImageFuture<'a> = Pin<Box<dyn Future<Output = Result<(), BollardError>> + Send + 'a>>;

/// Boxed stream type returned by [`ImageRegistryClient::push_image`].
pub type PushImageStream<'a> =
    Pin<Box<dyn Stream<Item = Result<PushImageInfo, BollardError>> + Send + 'a>>;

/// Behaviour required to tag and push images.
pub trait ImageRegistryClient {
    /// Tag image `source` as `repository:tag`.
    fn tag_image(&self, source: &str, repository: &str, tag: &str) -> TagImageFuture<'_>;

    /// Push `repository:tag`, yielding the daemon's progress records.
    fn push_image(
        &self,
        repository: &str,
        tag: &str,
        credentials: DockerCredentials,
    ) -> PushImageStream<'_>;
}

impl ImageRegistryClient for Docker {
    fn tag_image(&self, source: &str, repository: &str, tag: &str) -> TagImageFuture<'_> {
        let source_owned = String::from(source);
        let options = TagImageOptionsBuilder::default()
            .repo(repository)
            .tag(tag)
            .build();
        Box::pin(async move { Self::tag_image(self, &source_owned, Some(options)).await })
    }

    fn push_image(
        &self,
        repository: &str,
        tag: &str,
        credentials: DockerCredentials,
    ) -> PushImageStream<'_> {
        let options = PushImageOptionsBuilder::default().tag(tag).build();
        Box::pin(Self::push_image(
            self,
            repository,
            Some(options),
            Some(credentials),
        ))
    }
}

/// Everything needed to tag and push a freshly built image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushRequest {
    references: ImageReferences,
    credentials: RegistryCredentials,
    forward_progress: bool,
}

impl PushRequest {
    /// Create a push request for `references` authenticated by `credentials`.
    ///
    /// When `forward_progress` is set, each progress record is written to the
    /// progress sink as a JSON line.
    #[must_use]
    pub const fn new(
        references: ImageReferences,
        credentials: RegistryCredentials,
        forward_progress: bool,
    ) -> Self {
        Self {
            references,
            credentials,
            forward_progress,
        }
    }

    /// Return the image references being published.
    #[must_use]
    pub const fn references(&self) -> &ImageReferences {
        &self.references
    }

    fn docker_credentials(&self) -> DockerCredentials {
        DockerCredentials {
            username: Some(self.credentials.username.clone()),
            password: Some(self.credentials.password.clone()),
            serveraddress: Some(self.credentials.server_address.clone()),
            ..DockerCredentials::default()
        }
    }
}

impl EngineConnector {
    /// Tag the built image and push both references (async version).
    ///
    /// Steps: tag `latest` as the versioned reference, push `latest`, then
    /// push the versioned reference once the first push has completed.
    ///
    /// # Errors
    ///
    /// Returns `ContainerError::TagFailed` when the daemon rejects the tag and
    /// `ContainerError::PushFailed` when either push fails. The versioned push
    /// is never attempted after a failed `latest` push.
    pub async fn tag_and_push<C: ImageRegistryClient, W: Write>(
        client: &C,
        request: &PushRequest,
        progress: &mut W,
    ) -> Result<(), PublishError> {
        let refs = request.references();
        let latest = refs.latest();
        let versioned = refs.versioned();
        tracing::debug!(image = %latest, "retrieved built image");

        client
            .tag_image(&latest, refs.repository(), refs.version_tag())
            .await
            .map_err(|error| {
                PublishError::from(ContainerError::TagFailed {
                    image: latest.clone(),
                    target: versioned.clone(),
                    message: error.to_string(),
                })
            })?;
        tracing::debug!(image = %latest, tag = refs.version_tag(), "tagged image");

        for tag in [LATEST_TAG, refs.version_tag()] {
            Self::push_one(client, request, tag, progress).await?;
        }

        Ok(())
    }

    async fn push_one<C: ImageRegistryClient, W: Write>(
        client: &C,
        request: &PushRequest,
        tag: &str,
        progress: &mut W,
    ) -> Result<(), PublishError> {
        let repository = request.references().repository();
        let image = format!("{repository}:{tag}");
        tracing::debug!(image = %image, "pushing image");

        let push_failed = |message: String| {
            PublishError::from(ContainerError::PushFailed {
                image: image.clone(),
                message,
            })
        };

        let mut stream = client.push_image(repository, tag, request.docker_credentials());
        while let Some(item) = stream.next().await {
            let info = item.map_err(|error| push_failed(error.to_string()))?;
            let record =
                serde_json::to_value(&info).map_err(|error| push_failed(error.to_string()))?;

            if request.forward_progress {
                writeln!(progress, "{record}").map_err(|error| push_failed(error.to_string()))?;
            }
            if let Some(message) = progress_error(&record) {
                return Err(push_failed(message));
            }
        }

        tracing::info!(image = %image, "successfully pushed");
        Ok(())
    }
}

/// Extract the `errorDetail` message carried by a push progress record.
fn progress_error(record: &Value) -> Option<String> {
    record
        .get("errorDetail")
        .and_then(|detail| detail.get("message"))
        .and_then(Value::as_str)
        .map(String::from)
}
