//! Configuration system for imagepub.
//!
//! Configuration is merged by the `ortho_config` crate from three layers:
//! defaults, the CI action inputs, and command-line flags (highest). The merged
//! [`ActionConfig`] is then resolved into an immutable [`PublishConfig`] that
//! every pipeline step receives by reference.
//!
//! # Action inputs
//!
//! | input       | required | default |
//! |-------------|----------|---------|
//! | `username`  | yes      |         |
//! | `password`  | yes      |         |
//! | `registry`  | yes      |         |
//! | `owner`     | yes      |         |
//! | `path`      | no       | `.`     |
//! | `npm_token` | no       | none    |
//! | `verbose`   | no       | `false` |

mod cli;
mod loader;
mod types;

#[cfg(test)]
mod tests;

pub use cli::Cli;
pub use loader::{ActionInputs, input_env_var, input_env_var_names, load_config};
pub use types::{ActionConfig, DEFAULT_CONTEXT_PATH, PublishConfig, RegistryCredentials};
