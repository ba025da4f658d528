//! Semantic error types for the imagepub action.
//!
//! Each pipeline stage owns a `thiserror` enum describing the conditions it can
//! fail with. [`PublishError`] aggregates them so the orchestration can use `?`
//! throughout, while the binary converts the final error into an
//! `eyre::Report` at the process boundary. Every variant is fatal: the action
//! has no retry tier.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur while loading and resolving action configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// One or more required inputs were not supplied.
    #[error("missing required configuration: {field}")]
    MissingRequired {
        /// The names of the missing inputs, comma separated.
        field: String,
    },

    /// The defaults layer could not be serialised.
    #[error("failed to prepare configuration layers: {message}")]
    ParseError {
        /// A description of the failure.
        message: String,
    },

    /// The `OrthoConfig` library rejected the merged layers.
    #[error("configuration loading failed: {0}")]
    OrthoConfig(Arc<ortho_config::OrthoError>),
}

/// Errors raised while validating the project directory.
#[derive(Debug, Error)]
pub enum ProjectError {
    /// A file the build cannot proceed without is absent.
    #[error("{file} not found in path: {context}")]
    MissingFile {
        /// The name of the missing file.
        file: &'static str,
        /// The context path that was searched.
        context: Utf8PathBuf,
    },

    /// A project file exists but could not be read or parsed.
    #[error("failed to read '{path}': {message}")]
    InvalidFile {
        /// The path to the offending file.
        path: Utf8PathBuf,
        /// A description of the failure.
        message: String,
    },
}

/// Errors raised by the external image build step.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The build tool could not be started.
    #[error("failed to start image build `{command}`: {message}")]
    SpawnFailed {
        /// The rendered (redacted) command line.
        command: String,
        /// A description of the spawn failure.
        message: String,
    },

    /// The build tool exited unsuccessfully.
    #[error("image build `{command}` failed: {status}")]
    Failed {
        /// The rendered (redacted) command line.
        command: String,
        /// A description of how the process ended.
        status: String,
    },
}

/// Errors that can occur while talking to the container engine.
#[derive(Debug, Error)]
pub enum ContainerError {
    /// The host platform has no daemon connection strategy.
    #[error("unsupported platform for container engine connection: {platform}")]
    UnsupportedPlatform {
        /// The detected platform name.
        platform: String,
    },

    /// Failed to connect to the container engine.
    #[error("failed to connect to container engine: {message}")]
    ConnectionFailed {
        /// A description of the connection failure.
        message: String,
    },

    /// The container engine socket was not found.
    #[error("container engine socket not found: {path}")]
    SocketNotFound {
        /// The path where the socket was expected.
        path: Utf8PathBuf,
    },

    /// Permission denied when accessing the container engine socket.
    #[error("permission denied accessing container socket: {path}")]
    PermissionDenied {
        /// The path to the socket.
        path: Utf8PathBuf,
    },

    /// The async runtime driving engine calls could not be created.
    #[error("failed to create async runtime: {message}")]
    RuntimeCreationFailed {
        /// A description of the failure.
        message: String,
    },

    /// The engine rejected the tag operation.
    #[error("failed to tag image '{image}' as '{target}': {message}")]
    TagFailed {
        /// The source image reference.
        image: String,
        /// The requested target reference.
        target: String,
        /// A description of the failure.
        message: String,
    },

    /// The engine or registry rejected a push.
    #[error("failed to push image '{image}': {message}")]
    PushFailed {
        /// The reference being pushed.
        image: String,
        /// A description of the failure.
        message: String,
    },
}

/// Top-level error type for the imagepub action.
///
/// At the application boundary (`main.rs`) this is converted into an
/// `eyre::Report`, printed to standard error, and the process exits non-zero.
#[derive(Debug, Error)]
pub enum PublishError {
    /// An error occurred while loading configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The project directory failed validation.
    #[error(transparent)]
    Project(#[from] ProjectError),

    /// The image build failed.
    #[error(transparent)]
    Build(#[from] BuildError),

    /// A container engine operation failed.
    #[error(transparent)]
    Container(#[from] ContainerError),
}

/// A specialised `Result` type for imagepub operations.
pub type Result<T> = std::result::Result<T, PublishError>;
