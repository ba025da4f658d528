//! Container engine connection, tagging and pushing.
//!
//! The daemon endpoint is not configurable; it is chosen from the host
//! platform:
//!
//! - Windows: `tcp://127.0.0.1:2375`
//! - Linux and unrecognised platforms: `unix:///var/run/docker.sock`
//! - macOS: unsupported

mod connection;

pub use connection::{
    DaemonEndpoint, EngineConnector, ImageRegistryClient, LINUX_DAEMON_SOCKET, PushImageStream,
    PushRequest, TagImageFuture, WINDOWS_DAEMON_HOST, WINDOWS_DAEMON_PORT,
};
