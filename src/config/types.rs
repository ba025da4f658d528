//! Configuration data types for imagepub.

use camino::Utf8PathBuf;
use ortho_config::{OrthoConfig, OrthoResult, PostMergeContext, PostMergeHook};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Context path used when the `path` input is not supplied.
pub const DEFAULT_CONTEXT_PATH: &str = ".";

/// Merged action configuration.
///
/// Values arrive through layered precedence (lowest to highest): defaults,
/// action inputs (`INPUT_*` environment variables), command-line flags.
/// Required inputs stay optional here so that the merge itself never fails on
/// absence; [`ActionConfig::resolve`] reports every missing input at once.
#[derive(Debug, Clone, Default, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "IMAGEPUB", post_merge_hook)]
pub struct ActionConfig {
    /// Registry account name.
    pub username: Option<String>,

    /// Registry password or access token.
    #[ortho_config(skip_cli)]
    pub password: Option<String>,

    /// Registry host, also used as the credential server address.
    pub registry: Option<String>,

    /// Namespace under the registry the image is published to.
    pub owner: Option<String>,

    /// Directory holding `package.json` and `Dockerfile`.
    #[ortho_config(skip_cli)]
    pub path: Option<Utf8PathBuf>,

    /// Token forwarded to the build as the `NPM_TOKEN` build argument.
    #[ortho_config(skip_cli)]
    pub npm_token: Option<String>,

    /// Emit diagnostics and forward push progress to standard output.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub verbose: bool,
}

impl ActionConfig {
    /// Validate required inputs and produce the immutable run configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingRequired` listing every required input
    /// (`username`, `password`, `registry`, `owner`) that is absent or blank.
    pub fn resolve(&self) -> Result<PublishConfig> {
        let mut missing = Vec::new();
        let username = required(self.username.as_deref(), "username", &mut missing);
        let password = required(self.password.as_deref(), "password", &mut missing);
        let registry = required(self.registry.as_deref(), "registry", &mut missing);
        let owner = required(self.owner.as_deref(), "owner", &mut missing);

        let (Some(user), Some(pass), Some(server), Some(namespace)) =
            (username, password, registry, owner)
        else {
            return Err(ConfigError::MissingRequired {
                field: missing.join(", "),
            }
            .into());
        };

        Ok(PublishConfig {
            credentials: RegistryCredentials {
                username: String::from(user),
                password: String::from(pass),
                server_address: String::from(server),
            },
            owner: String::from(namespace),
            context_path: self
                .path
                .clone()
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_CONTEXT_PATH)),
            npm_token: self.npm_token.clone(),
            verbose: self.verbose,
        })
    }
}

fn required<'a>(
    value: Option<&'a str>,
    field: &'static str,
    missing: &mut Vec<&'static str>,
) -> Option<&'a str> {
    let present = value.filter(|candidate| !candidate.trim().is_empty());
    if present.is_none() {
        missing.push(field);
    }
    present
}

fn drop_blank(value: &mut Option<String>) {
    if value.as_deref().is_some_and(|text| text.trim().is_empty()) {
        *value = None;
    }
}

impl PostMergeHook for ActionConfig {
    fn post_merge(&mut self, _ctx: &PostMergeContext) -> OrthoResult<()> {
        // Blank inputs mean "not supplied" for every string input.
        drop_blank(&mut self.username);
        drop_blank(&mut self.password);
        drop_blank(&mut self.registry);
        drop_blank(&mut self.owner);
        drop_blank(&mut self.npm_token);
        if self.path.as_ref().is_some_and(|path| path.as_str().is_empty()) {
            self.path = None;
        }
        Ok(())
    }
}

/// Credentials handed to the registry when pushing.
#[derive(Clone, PartialEq, Eq)]
pub struct RegistryCredentials {
    /// Registry account name.
    pub username: String,
    /// Registry password or access token.
    pub password: String,
    /// Registry server address.
    pub server_address: String,
}

impl std::fmt::Debug for RegistryCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryCredentials")
            .field("username", &self.username)
            .field("password", &"***")
            .field("server_address", &self.server_address)
            .finish()
    }
}

/// Immutable configuration for a single publish run.
///
/// Built once by [`ActionConfig::resolve`] and passed by reference to every
/// pipeline step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishConfig {
    /// Registry credentials; `server_address` doubles as the registry host.
    pub credentials: RegistryCredentials,
    /// Registry namespace.
    pub owner: String,
    /// Build context directory.
    pub context_path: Utf8PathBuf,
    /// Optional `NPM_TOKEN` build argument.
    pub npm_token: Option<String>,
    /// Verbose output flag.
    pub verbose: bool,
}

impl PublishConfig {
    /// Return the registry host.
    #[must_use]
    pub fn registry(&self) -> &str {
        &self.credentials.server_address
    }
}
