//! Errors shared by the client types.

use std::io;

use thiserror::Error;

/// Result type for client actions.
pub type ClientResult<T> = Result<T, ClientError>;

/// Everything that can go wrong between the host and a device.
///
/// The host only ever sees booleans and `Option`s, so most of these are
/// logged and swallowed at the `connect`/`send` boundary.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A required parameter was left empty.
    #[error("insufficient input: address and port are required")]
    InsufficientInput,
    /// A parameter could not be parsed or resolved.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Creating or connecting the socket failed.
    #[error("connection failure: {0}")]
    ConnectionFailure(#[source] io::Error),
    /// The OS refused the datagram.
    #[error("send failure: {0}")]
    SendFailure(#[source] io::Error),
    /// Send was called without a socket.
    #[error("client is not connected")]
    NotConnected,
    /// No client type is registered under this tag.
    #[error("unknown client type: {0}")]
    UnknownClientType(String),
}
