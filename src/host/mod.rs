//! The contract between the lighting host and its output clients.
//!
//! The host knows client types only by their tag. It asks a type which
//! parameters to collect, hands the collected strings back positionally,
//! and then drives the client it gets through connect/send/disconnect.

use std::collections::HashMap;

use crate::client::{ChannelMapping, UdpClient};
use crate::error::{ClientError, ClientResult};

pub mod udp;
pub use self::udp::UdpClientType;

/// A live client as the host sees it.
pub trait HostClient {
    /// Tag of the type that created this client.
    fn client_type(&self) -> &'static str;
    /// Human-readable identifier.
    fn id(&self) -> &str;
    /// Where the client sends to, for display.
    fn connection_address(&self) -> String;
    /// Connect if needed. Returns the resulting connection state.
    fn connect(&mut self) -> bool;
    /// Disconnect if needed.
    fn disconnect(&mut self);
    fn is_connected(&self) -> bool;
    /// Push one color with channels in 0..1.
    fn send(&self, red: f32, green: f32, blue: f32) -> bool;
}

impl HostClient for UdpClient {
    fn client_type(&self) -> &'static str {
        crate::client::CLIENT_TYPE
    }

    fn id(&self) -> &str {
        crate::client::CLIENT_ID
    }

    fn connection_address(&self) -> String {
        UdpClient::connection_address(self)
    }

    fn connect(&mut self) -> bool {
        UdpClient::connect(self)
    }

    fn disconnect(&mut self) {
        UdpClient::disconnect(self)
    }

    fn is_connected(&self) -> bool {
        UdpClient::is_connected(self)
    }

    fn send(&self, red: f32, green: f32, blue: f32) -> bool {
        UdpClient::send(self, red, green, blue)
    }
}

/// Widget the host should render for a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
}

/// One entry of the add-client dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDescriptor {
    pub label: &'static str,
    pub kind: InputKind,
}

impl ParameterDescriptor {
    pub fn text(label: &'static str) -> ParameterDescriptor {
        ParameterDescriptor {
            label,
            kind: InputKind::Text,
        }
    }
}

/// A kind of client the host can add.
pub trait ClientType {
    /// Stable tag shown in the host's client menu.
    fn tag(&self) -> &'static str;
    /// Parameters to collect, in the order `create` reads them.
    fn describe_parameters(&self) -> Vec<ParameterDescriptor>;
    /// Build a client from the collected values.
    ///
    /// `Ok(None)` means the input was incomplete and the host should let the
    /// user try again.
    fn create(&self, values: &[String]) -> ClientResult<Option<Box<dyn HostClient>>>;
}

/// Client types by tag.
#[derive(Default)]
pub struct ClientRegistry {
    types: HashMap<&'static str, Box<dyn ClientType>>,
}

impl ClientRegistry {
    pub fn new() -> ClientRegistry {
        ClientRegistry::default()
    }

    /// Registry with every built-in client type.
    pub fn with_defaults(mapping: ChannelMapping) -> ClientRegistry {
        let mut registry = ClientRegistry::new();
        registry.register(Box::new(UdpClientType::new(mapping)));
        registry
    }

    /// Add a client type, returning whatever was registered under its tag.
    pub fn register(&mut self, client_type: Box<dyn ClientType>) -> Option<Box<dyn ClientType>> {
        self.types.insert(client_type.tag(), client_type)
    }

    pub fn get(&self, tag: &str) -> Option<&dyn ClientType> {
        self.types.get(tag).map(|client_type| client_type.as_ref())
    }

    /// Registered tags, sorted for menus.
    pub fn tags(&self) -> Vec<&'static str> {
        let mut tags: Vec<&'static str> = self.types.keys().copied().collect();
        tags.sort_unstable();
        tags
    }

    pub fn create(
        &self,
        tag: &str,
        values: &[String],
    ) -> ClientResult<Option<Box<dyn HostClient>>> {
        self.get(tag)
            .ok_or_else(|| ClientError::UnknownClientType(tag.to_owned()))?
            .create(values)
    }
}
