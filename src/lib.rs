//! Build a container image from a Node-style project and publish it.
//!
//! `imagepub` runs as a CI action step. It reads `package.json` (and the
//! optional `build-info.json` build counter) from a project directory, builds
//! the image with `docker buildx build`, then tags it and pushes
//! `<registry>/<owner>/<name>:latest` and
//! `<registry>/<owner>/<name>:<version>-<buildNumber>` to the registry.
//!
//! # Modules
//!
//! - [`api`]: The publish pipeline over injected build and registry clients
//! - [`build`]: Build command construction and execution
//! - [`config`]: Configuration with layered precedence (CLI > action inputs > defaults)
//! - [`engine`]: Container engine connection, tagging and pushing
//! - [`error`]: Semantic error types for the application
//! - [`platform`]: Host platform detection
//! - [`project`]: Project directory validation and image naming

pub mod api;
pub mod build;
pub mod config;
pub mod engine;
pub mod error;
pub mod platform;
pub mod project;
