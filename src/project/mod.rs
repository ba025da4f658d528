//! Project directory validation and metadata loading.
//!
//! A publishable project directory contains:
//!
//! - `package.json` (required) with string `name` and `version` fields,
//! - `Dockerfile` (required, content not inspected),
//! - `build-info.json` (optional) with an unsigned integer `buildNumber`.
//!
//! The build counter file belongs to whatever produced it; it is only read
//! here. The directory is accessed through a `cap_std` directory handle.

mod image_name;

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{ProjectError, PublishError};

pub use image_name::{ImageReferences, LATEST_TAG};

/// Package descriptor file name.
pub const PACKAGE_FILE: &str = "package.json";

/// Build instruction file name.
pub const DOCKERFILE: &str = "Dockerfile";

/// Build counter file name.
pub const BUILD_INFO_FILE: &str = "build-info.json";

/// Name and version read from `package.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PackageDescriptor {
    /// Package name, used as the image name.
    pub name: String,
    /// Package version, the first half of the image tag.
    pub version: String,
}

/// Build counter read from `build-info.json`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildCounter {
    /// Monotonic build number maintained outside this action.
    pub build_number: u64,
}

/// Validated contents of a project directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectManifest {
    /// Parsed package descriptor.
    pub package: PackageDescriptor,
    /// Build counter, zero when `build-info.json` is absent.
    pub build_counter: BuildCounter,
}

impl ProjectManifest {
    /// Validate `context` and load its package metadata.
    ///
    /// Checks run in order: `package.json` must exist and parse, `Dockerfile`
    /// must exist, then `build-info.json` is read if present. A context
    /// directory that cannot be opened is reported as a missing
    /// `package.json`.
    ///
    /// # Errors
    ///
    /// Returns `ProjectError::MissingFile` when `package.json` or `Dockerfile`
    /// is absent, and `ProjectError::InvalidFile` when a present file cannot
    /// be read or parsed.
    pub fn load(context: &Utf8Path) -> Result<Self, PublishError> {
        let Ok(dir) = Dir::open_ambient_dir(context, ambient_authority()) else {
            return Err(missing(PACKAGE_FILE, context));
        };

        let package: PackageDescriptor = read_json(&dir, context, PACKAGE_FILE)?
            .ok_or_else(|| missing(PACKAGE_FILE, context))?;
        tracing::debug!(name = %package.name, version = %package.version, "read {PACKAGE_FILE}");

        if !dir.exists(DOCKERFILE) {
            return Err(missing(DOCKERFILE, context));
        }

        let build_counter: BuildCounter =
            read_json(&dir, context, BUILD_INFO_FILE)?.unwrap_or_default();
        tracing::debug!(
            build_number = build_counter.build_number,
            "resolved build counter"
        );

        Ok(Self {
            package,
            build_counter,
        })
    }
}

fn missing(file: &'static str, context: &Utf8Path) -> PublishError {
    PublishError::from(ProjectError::MissingFile {
        file,
        context: context.to_path_buf(),
    })
}

/// Read and parse `file_name` from `dir`, returning `None` when it does not
/// exist.
fn read_json<T: DeserializeOwned>(
    dir: &Dir,
    context: &Utf8Path,
    file_name: &str,
) -> Result<Option<T>, PublishError> {
    let path: Utf8PathBuf = context.join(file_name);
    let invalid = |message: String| {
        PublishError::from(ProjectError::InvalidFile {
            path: path.clone(),
            message,
        })
    };

    let content = match dir.read_to_string(file_name) {
        Ok(text) => text,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(error) => return Err(invalid(error.to_string())),
    };

    serde_json::from_str(&content)
        .map(Some)
        .map_err(|error| invalid(error.to_string()))
}
