use std::collections::BTreeMap;
use std::path::Path;
use std::{fs, io};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::client::ChannelMapping;
use crate::error::ClientError;
use crate::host::{ClientRegistry, HostClient};

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Root {
    /// Byte conversion for every client.
    #[serde(default)]
    pub channels: ChannelMapping,
    /// Clients by name.
    #[serde(default)]
    pub clients: BTreeMap<String, Client>,
}

/// A client as it would be added through the host's dialog.
#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    /// Client type tag, e.g. "UDP".
    #[serde(rename = "type")]
    pub client_type: String,
    /// Dialog values in the order the type describes them.
    #[serde(default)]
    pub parameters: Vec<String>,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("error reading config file: {0}")]
    Io(#[from] io::Error),
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("client {0} has no type")]
    MissingType(String),
    #[error("client {name}: {source}")]
    Client {
        name: String,
        #[source]
        source: ClientError,
    },
    #[error("client {0} is missing parameters")]
    Incomplete(String),
}

pub fn read_config_yaml<T: AsRef<Path>>(path: T) -> ConfigResult<Root> {
    let file = fs::File::open(path)?;
    let reader = io::BufReader::new(file);
    let root: Root = serde_yaml::from_reader(reader)?;
    check(root)
}

pub fn read_config_json<T: AsRef<Path>>(path: T) -> ConfigResult<Root> {
    let file = fs::File::open(path)?;
    let reader = io::BufReader::new(file);
    let root: Root = serde_json::from_reader(reader)?;
    check(root)
}

pub fn parse_config_yaml(text: &str) -> ConfigResult<Root> {
    let root: Root = serde_yaml::from_str(text)?;
    check(root)
}

/// Read a config file, picking the format from its extension.
pub fn read_config<T: AsRef<Path>>(path: T) -> ConfigResult<Root> {
    let path = path.as_ref();
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => read_config_json(path),
        _ => read_config_yaml(path),
    }
}

/// Quick sanity check for the configuration.
fn check(root: Root) -> ConfigResult<Root> {
    for (name, client) in &root.clients {
        if client.client_type.trim().is_empty() {
            return Err(ConfigError::MissingType(name.clone()));
        }
    }
    Ok(root)
}

/// Create every configured client, in name order.
pub fn open_clients(
    root: &Root,
    registry: &ClientRegistry,
) -> ConfigResult<Vec<(String, Box<dyn HostClient>)>> {
    let mut clients = Vec::with_capacity(root.clients.len());
    for (name, entry) in &root.clients {
        let client = registry
            .create(&entry.client_type, &entry.parameters)
            .map_err(|source| ConfigError::Client {
                name: name.clone(),
                source,
            })?
            .ok_or_else(|| ConfigError::Incomplete(name.clone()))?;
        info!(
            "{} client {} -> {} ({})",
            client.client_type(),
            name,
            client.connection_address(),
            if client.is_connected() { "connected" } else { "not connected" }
        );
        clients.push((name.clone(), client));
    }
    Ok(clients)
}
