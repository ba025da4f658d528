//! Daemon endpoint resolution and container engine connection.
//!
//! The endpoint is fixed per platform: Windows hosts reach the daemon over TCP
//! on `127.0.0.1:2375`, Linux hosts through `/var/run/docker.sock`. macOS is
//! recognised but has no connection strategy and is rejected.

mod error_classification;
mod publish;

use std::fmt;

use bollard::Docker;

use crate::error::{ContainerError, PublishError};
use crate::platform::Platform;

use self::error_classification::classify_connection_error;
pub use self::publish::{ImageRegistryClient, PushImageStream, PushRequest, TagImageFuture};

/// Connection timeout in seconds for Docker API connections.
const CONNECTION_TIMEOUT_SECS: u64 = 120;

/// Daemon TCP host used on Windows.
pub const WINDOWS_DAEMON_HOST: &str = "127.0.0.1";

/// Daemon TCP port used on Windows.
pub const WINDOWS_DAEMON_PORT: u16 = 2375;

/// Daemon socket path used on Linux.
pub const LINUX_DAEMON_SOCKET: &str = "/var/run/docker.sock";

/// Where the container engine daemon listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DaemonEndpoint {
    /// Plain TCP endpoint.
    Tcp {
        /// Host name or address.
        host: String,
        /// TCP port.
        port: u16,
    },
    /// Local Unix socket.
    Socket {
        /// Filesystem path of the socket.
        path: String,
    },
}

impl DaemonEndpoint {
    /// Resolve the daemon endpoint for `platform`.
    ///
    /// # Errors
    ///
    /// Returns `ContainerError::UnsupportedPlatform` for [`Platform::Mac`].
    pub fn for_platform(platform: Platform) -> Result<Self, PublishError> {
        match platform {
            Platform::Windows => Ok(Self::Tcp {
                host: String::from(WINDOWS_DAEMON_HOST),
                port: WINDOWS_DAEMON_PORT,
            }),
            Platform::Linux => Ok(Self::Socket {
                path: String::from(LINUX_DAEMON_SOCKET),
            }),
            Platform::Mac => Err(ContainerError::UnsupportedPlatform {
                platform: platform.to_string(),
            }
            .into()),
        }
    }

    /// Return the endpoint as a URI understood by the engine client.
    #[must_use]
    pub fn uri(&self) -> String {
        match self {
            Self::Tcp { host, port } => format!("tcp://{host}:{port}"),
            Self::Socket { path } => format!("unix://{path}"),
        }
    }
}

impl fmt::Display for DaemonEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri())
    }
}

/// Provides methods to connect to the container engine and drive it.
pub struct EngineConnector;

impl EngineConnector {
    /// Connect to the daemon at `endpoint`.
    ///
    /// TCP endpoints are reached over HTTP. Socket endpoints must exist when
    /// the client is created; nothing else is checked until the first
    /// request.
    ///
    /// # Errors
    ///
    /// Returns `ContainerError::ConnectionFailed`, `SocketNotFound`, or
    /// `PermissionDenied` if the client cannot be created.
    pub fn connect_endpoint(endpoint: &DaemonEndpoint) -> Result<Docker, PublishError> {
        let (uri, connection) = match endpoint {
            DaemonEndpoint::Tcp { host, port } => {
                let uri = format!("http://{host}:{port}");
                let connection = Docker::connect_with_http(
                    &uri,
                    CONNECTION_TIMEOUT_SECS,
                    bollard::API_DEFAULT_VERSION,
                );
                (uri, connection)
            }
            DaemonEndpoint::Socket { .. } => {
                let uri = endpoint.uri();
                let connection = Docker::connect_with_socket(
                    &uri,
                    CONNECTION_TIMEOUT_SECS,
                    bollard::API_DEFAULT_VERSION,
                );
                (uri, connection)
            }
        };

        connection.map_err(|error| PublishError::from(classify_connection_error(&error, &uri)))
    }
}
