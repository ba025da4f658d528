//! External image build invocation.
//!
//! The image is built by `docker buildx build`, treated as a black box. The
//! command is executed directly (no shell) with inherited standard streams, so
//! the builder's own output reaches the CI log as it is produced. A small trait
//! seam keeps the orchestration testable without a builder on the host.

use std::fmt;
use std::future::Future;
use std::io;
use std::pin::Pin;
use std::process::ExitStatus;

use camino::{Utf8Path, Utf8PathBuf};

use crate::error::{BuildError, PublishError};

/// Program used to build images.
pub const BUILDER_PROGRAM: &str = "docker";

/// Name of the build argument carrying the npm token.
pub const NPM_TOKEN_BUILD_ARG: &str = "NPM_TOKEN";

const REDACTED: &str = "***";

/// How a build process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildExit {
    /// The builder exited with status zero.
    Success,
    /// The builder exited with a non-zero status.
    Code(i32),
    /// The builder was terminated without an exit code (e.g. by a signal).
    Terminated,
}

impl From<ExitStatus> for BuildExit {
    fn from(status: ExitStatus) -> Self {
        match status.code() {
            _ if status.success() => Self::Success,
            Some(code) => Self::Code(code),
            None => Self::Terminated,
        }
    }
}

impl fmt::Display for BuildExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("exit status 0"),
            Self::Code(code) => write!(f, "exit status {code}"),
            Self::Terminated => f.write_str("terminated without an exit status"),
        }
    }
}

/// Boxed future type returned by [`BuildRunner::run`].
pub type BuildFuture<'a> = Pin<Box<dyn Future<Output = io::Result<BuildExit>> + Send + 'a>>;

/// Behaviour required to execute an image build.
pub trait BuildRunner {
    /// Run `command` to completion.
    fn run(&self, command: &BuildCommand) -> BuildFuture<'_>;
}

/// Runs builds as child processes of the action.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBuildRunner;

impl BuildRunner for SystemBuildRunner {
    fn run(&self, command: &BuildCommand) -> BuildFuture<'_> {
        let mut process = tokio::process::Command::new(command.program());
        process.args(command.args());
        Box::pin(async move {
            let status = process.status().await?;
            Ok(BuildExit::from(status))
        })
    }
}

/// A `docker buildx build` invocation.
#[derive(Clone, PartialEq, Eq)]
pub struct BuildCommand {
    tag: String,
    npm_token: Option<String>,
    context: Utf8PathBuf,
}

impl BuildCommand {
    /// Build `context` tagged as `tag`, passing `npm_token` as the
    /// `NPM_TOKEN` build argument when supplied.
    #[must_use]
    pub fn new(tag: impl Into<String>, npm_token: Option<&str>, context: &Utf8Path) -> Self {
        Self {
            tag: tag.into(),
            npm_token: npm_token
                .filter(|token| !token.is_empty())
                .map(String::from),
            context: context.to_path_buf(),
        }
    }

    /// Return the program to execute.
    #[must_use]
    pub const fn program(&self) -> &'static str {
        BUILDER_PROGRAM
    }

    /// Return the argument vector passed to [`Self::program`].
    #[must_use]
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            String::from("buildx"),
            String::from("build"),
            String::from("-t"),
            self.tag.clone(),
        ];
        if let Some(ref token) = self.npm_token {
            args.push(String::from("--build-arg"));
            args.push(format!("{NPM_TOKEN_BUILD_ARG}={token}"));
        }
        args.push(String::from(self.context.as_str()));
        args
    }

    /// Return the image tag the build produces.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Render the command line with the context path quoted.
    #[must_use]
    pub fn command_line(&self) -> String {
        self.render(self.npm_token.as_deref())
    }

    /// Render the command line with the npm token masked, for diagnostics.
    #[must_use]
    pub fn redacted(&self) -> String {
        self.render(self.npm_token.as_ref().map(|_| REDACTED))
    }

    fn render(&self, token: Option<&str>) -> String {
        let build_arg = token
            .map(|value| format!(" --build-arg {NPM_TOKEN_BUILD_ARG}={value}"))
            .unwrap_or_default();
        format!(
            "{BUILDER_PROGRAM} buildx build -t {}{build_arg} \"{}\"",
            self.tag, self.context
        )
    }
}

impl fmt::Debug for BuildCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

/// Run `command` through `runner`, failing unless the build succeeds.
///
/// # Errors
///
/// Returns `BuildError::SpawnFailed` when the builder cannot be started and
/// `BuildError::Failed` when it exits unsuccessfully.
pub async fn run_build<R: BuildRunner>(
    runner: &R,
    command: &BuildCommand,
) -> Result<(), PublishError> {
    tracing::debug!(command = %command.redacted(), "executing image build");

    let exit = runner.run(command).await.map_err(|error| {
        PublishError::from(BuildError::SpawnFailed {
            command: command.redacted(),
            message: error.to_string(),
        })
    })?;

    if exit == BuildExit::Success {
        tracing::debug!(tag = command.tag(), "image build finished");
        Ok(())
    } else {
        Err(BuildError::Failed {
            command: command.redacted(),
            status: exit.to_string(),
        }
        .into())
    }
}
