//! Image reference derivation from package metadata.

use super::{BuildCounter, PackageDescriptor};

/// Tag applied to every build in addition to the versioned tag.
pub const LATEST_TAG: &str = "latest";

/// The two references an image is published under.
///
/// The repository is `<registry>/<owner>/<name>`; the versioned tag is
/// `<version>-<buildNumber>`. No validation is performed: the registry decides
/// whether a reference is acceptable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReferences {
    repository: String,
    version_tag: String,
}

impl ImageReferences {
    /// Derive references for `package` at `counter` under `registry/owner`.
    #[must_use]
    pub fn new(
        registry: &str,
        owner: &str,
        package: &PackageDescriptor,
        counter: BuildCounter,
    ) -> Self {
        Self {
            repository: format!("{registry}/{owner}/{}", package.name),
            version_tag: format!("{}-{}", package.version, counter.build_number),
        }
    }

    /// Return the repository without a tag.
    #[must_use]
    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Return the versioned tag (`<version>-<buildNumber>`).
    #[must_use]
    pub fn version_tag(&self) -> &str {
        &self.version_tag
    }

    /// Return the fully qualified `latest` reference.
    #[must_use]
    pub fn latest(&self) -> String {
        format!("{}:{LATEST_TAG}", self.repository)
    }

    /// Return the fully qualified versioned reference.
    #[must_use]
    pub fn versioned(&self) -> String {
        format!("{}:{}", self.repository, self.version_tag)
    }
}
