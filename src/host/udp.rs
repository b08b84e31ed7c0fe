//! Factory for UDP clients.

use tracing::debug;

use super::{ClientType, HostClient, ParameterDescriptor};
use crate::client::{ChannelMapping, Endpoint, UdpClient, CLIENT_TYPE};
use crate::error::{ClientError, ClientResult};

/// Labels of the add-client dialog. Values come back in this order.
pub const ADDRESS_LABEL: &str = "IP Address:";
pub const PORT_LABEL: &str = "Port:";

/// Creates `UdpClient`s from an address and a port.
#[derive(Debug, Clone, Copy, Default)]
pub struct UdpClientType {
    mapping: ChannelMapping,
}

impl UdpClientType {
    pub fn new(mapping: ChannelMapping) -> UdpClientType {
        UdpClientType { mapping }
    }

    /// Build the concrete client. Connection is attempted eagerly.
    pub fn create_udp(&self, values: &[String]) -> ClientResult<Option<UdpClient>> {
        let address = values.get(0).map(String::as_str).unwrap_or("");
        let port = values.get(1).map(String::as_str).unwrap_or("");

        if address.is_empty() || port.is_empty() {
            return Ok(None);
        }

        let port: u16 = port
            .parse()
            .map_err(|_| ClientError::InvalidArgument(format!("bad port: {:?}", port)))?;

        debug!("creating UDP client for {}:{}", address, port);
        Ok(Some(UdpClient::new(Endpoint::new(address, port), self.mapping)))
    }
}

impl ClientType for UdpClientType {
    fn tag(&self) -> &'static str {
        CLIENT_TYPE
    }

    fn describe_parameters(&self) -> Vec<ParameterDescriptor> {
        vec![
            ParameterDescriptor::text(ADDRESS_LABEL),
            ParameterDescriptor::text(PORT_LABEL),
        ]
    }

    fn create(&self, values: &[String]) -> ClientResult<Option<Box<dyn HostClient>>> {
        Ok(self
            .create_udp(values)?
            .map(|client| Box::new(client) as Box<dyn HostClient>))
    }
}
