//! Send RGB colors to lighting devices, one UDP datagram per color.
//!
//! A lighting host adds clients through a [`host::ClientRegistry`], feeds
//! them colors once per frame and tears them down when done. The only wire
//! format is three bytes: red, green, blue.

pub mod client;
pub mod config;
pub mod device;
pub mod effect;
pub mod error;
pub mod host;

pub use crate::client::{ChannelMapping, ColorSample, Endpoint, UdpClient};
pub use crate::error::{ClientError, ClientResult};
pub use crate::host::{ClientRegistry, ClientType, HostClient};
