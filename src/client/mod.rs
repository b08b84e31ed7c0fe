//! UDP client that pushes one RGB color per datagram to a device.

use std::fmt;
use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs, UdpSocket};

use tracing::{debug, warn};

use crate::error::{ClientError, ClientResult};

mod color;
pub use self::color::{ChannelMapping, ColorSample};

/// Type tag the host shows in its add-client menu.
pub const CLIENT_TYPE: &str = "UDP";

/// Human-readable client identifier.
pub const CLIENT_ID: &str = "UDP Client";

/// Remote device address. Immutable once a client holds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// IP literal or hostname.
    pub address: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new<S: Into<String>>(address: S, port: u16) -> Endpoint {
        Endpoint {
            address: address.into(),
            port,
        }
    }

    /// Resolve to every matching socket address, in resolver order.
    pub fn resolve(&self) -> ClientResult<Vec<SocketAddr>> {
        let addrs: Vec<SocketAddr> = (self.address.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|err| ClientError::InvalidArgument(format!("{}: {}", self, err)))?
            .collect();
        if addrs.is_empty() {
            return Err(ClientError::InvalidArgument(format!("{}: no addresses", self)));
        }
        Ok(addrs)
    }
}

/// Bind an ephemeral socket and connect it to the first address that works.
fn connect_first(addrs: &[SocketAddr]) -> io::Result<UdpSocket> {
    let mut last_err = None;
    for remote in addrs {
        let local: SocketAddr = if remote.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let attempt = UdpSocket::bind(local).and_then(|socket| {
            socket.connect(remote)?;
            Ok(socket)
        });
        match attempt {
            Ok(socket) => return Ok(socket),
            Err(err) => {
                debug!("connect to {} failed: {}", remote, err);
                last_err = Some(err);
            }
        }
    }
    Err(last_err.unwrap_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "no addresses to connect to")
    }))
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.address, self.port)
    }
}

/// Sends colors to a single device.
///
/// The client is connected exactly when it holds a socket. Dropping it
/// closes the socket.
#[derive(Debug)]
pub struct UdpClient {
    endpoint: Endpoint,
    /// Present only while connected.
    socket: Option<UdpSocket>,
    mapping: ChannelMapping,
}

impl UdpClient {
    /// Build a new client for `endpoint` and try to connect right away.
    ///
    /// A failed connection attempt still yields a client; check
    /// `is_connected` or call `connect` again later.
    pub fn new(endpoint: Endpoint, mapping: ChannelMapping) -> UdpClient {
        let mut client = UdpClient::disconnected(endpoint, mapping);
        client.connect();
        client
    }

    /// Build a client without touching the network.
    pub fn disconnected(endpoint: Endpoint, mapping: ChannelMapping) -> UdpClient {
        UdpClient {
            endpoint,
            socket: None,
            mapping,
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn mapping(&self) -> ChannelMapping {
        self.mapping
    }

    /// `address:port` as entered by the user.
    pub fn connection_address(&self) -> String {
        self.endpoint.to_string()
    }

    pub fn is_connected(&self) -> bool {
        self.socket.is_some()
    }

    /// Local address of the socket while connected.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.socket.as_ref().and_then(|socket| socket.local_addr().ok())
    }

    /// Connect, reporting why it failed.
    pub fn try_connect(&mut self) -> ClientResult<()> {
        if self.socket.is_some() {
            return Ok(());
        }

        let addrs = self.endpoint.resolve()?;
        let socket = connect_first(&addrs).map_err(ClientError::ConnectionFailure)?;

        debug!(
            "connected to {} ({:?})",
            self.endpoint,
            socket.peer_addr().ok()
        );
        self.socket = Some(socket);
        Ok(())
    }

    /// Connect if needed. Returns the resulting connection state.
    pub fn connect(&mut self) -> bool {
        if let Err(err) = self.try_connect() {
            warn!("unable to connect to {}: {}", self.endpoint, err);
        }
        self.is_connected()
    }

    /// Close the socket. Safe to call any number of times.
    pub fn disconnect(&mut self) {
        if self.socket.take().is_some() {
            debug!("disconnected from {}", self.endpoint);
        }
    }

    /// Send one sample as a single 3-byte datagram.
    pub fn try_send(&self, sample: ColorSample) -> ClientResult<()> {
        let socket = self.socket.as_ref().ok_or(ClientError::NotConnected)?;
        let buf = sample.to_bytes(self.mapping);
        let written = socket.send(&buf).map_err(ClientError::SendFailure)?;
        if written != buf.len() {
            return Err(ClientError::SendFailure(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("short datagram: {} of {} bytes", written, buf.len()),
            )));
        }
        Ok(())
    }

    /// Send a color. True means the datagram was handed to the OS, not
    /// that the device got it. Never reconnects.
    pub fn send(&self, red: f32, green: f32, blue: f32) -> bool {
        if self.socket.is_none() {
            return false;
        }
        match self.try_send(ColorSample::new(red, green, blue)) {
            Ok(()) => true,
            Err(err) => {
                warn!("send to {} failed: {}", self.endpoint, err);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_display() {
        let endpoint = Endpoint::new("10.0.0.7", 9909);
        assert_eq!(endpoint.to_string(), "10.0.0.7:9909");
    }

    #[test]
    fn resolve_literal() {
        let endpoint = Endpoint::new("127.0.0.1", 41000);
        let addrs = endpoint.resolve().unwrap();
        assert_eq!(addrs, vec!["127.0.0.1:41000".parse::<SocketAddr>().unwrap()]);
    }

    #[test]
    fn resolve_garbage_is_invalid_argument() {
        let endpoint = Endpoint::new("not an address", 1);
        match endpoint.resolve() {
            Err(ClientError::InvalidArgument(_)) => {}
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn disconnected_client_does_not_send() {
        let endpoint = Endpoint::new("127.0.0.1", 9);
        let client = UdpClient::disconnected(endpoint, ChannelMapping::Wrapping);
        assert!(!client.is_connected());
        assert!(!client.send(1.0, 1.0, 1.0));
        match client.try_send(ColorSample::new(0.0, 0.0, 0.0)) {
            Err(ClientError::NotConnected) => {}
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn bad_address_leaves_client_disconnected() {
        let endpoint = Endpoint::new("not an address", 9909);
        let mut client = UdpClient::new(endpoint, ChannelMapping::Wrapping);
        assert!(!client.is_connected());
        assert!(!client.connect());
        client.disconnect();
        client.disconnect();
        assert!(!client.is_connected());
    }

    #[test]
    fn connect_is_idempotent() {
        let endpoint = Endpoint::new("127.0.0.1", 9);
        let mut client = UdpClient::new(endpoint, ChannelMapping::Wrapping);
        assert!(client.is_connected());
        let local = client.local_addr();
        assert!(client.connect());
        assert_eq!(client.local_addr(), local);
        assert_eq!(client.connection_address(), "127.0.0.1:9");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn connect_first_falls_through_to_a_working_address() {
        let device = UdpSocket::bind("127.0.0.1:0").unwrap();
        let good = device.local_addr().unwrap();
        // Broadcast needs SO_BROADCAST, so connecting to it is refused.
        let bad: SocketAddr = "255.255.255.255:9".parse().unwrap();

        let socket = connect_first(&[bad, good]).unwrap();
        assert_eq!(socket.peer_addr().unwrap(), good);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn connect_first_reports_the_last_error() {
        let bad: SocketAddr = "255.255.255.255:9".parse().unwrap();
        assert!(connect_first(&[bad]).is_err());
        assert!(connect_first(&[]).is_err());
    }
}
