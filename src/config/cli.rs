//! Command-line argument definitions for imagepub.
//!
//! Inside a CI run every value normally arrives as an action input. The flags
//! exist so the same binary can be driven by hand; any flag given here
//! overrides the matching input.

use camino::Utf8PathBuf;
use clap::Parser;

/// Command-line interface for imagepub.
#[derive(Debug, Default, Parser)]
#[command(name = "imagepub")]
#[command(
    author,
    version,
    about = "Build a package's container image and push it to a registry"
)]
pub struct Cli {
    /// Registry account name.
    #[arg(long)]
    pub username: Option<String>,

    /// Registry password or access token.
    #[arg(long)]
    pub password: Option<String>,

    /// Registry host.
    #[arg(long)]
    pub registry: Option<String>,

    /// Registry namespace the image is published under.
    #[arg(long)]
    pub owner: Option<String>,

    /// Build context directory.
    #[arg(long)]
    pub path: Option<Utf8PathBuf>,

    /// Token passed to the build as `NPM_TOKEN`.
    #[arg(long)]
    pub npm_token: Option<String>,

    /// Print diagnostics and push progress.
    #[arg(long)]
    pub verbose: bool,
}
