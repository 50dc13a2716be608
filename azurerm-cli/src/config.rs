//! Configuration file loading
//!
//! ```json
//! {
//!   "provider": { "subscription_id": "...", "environment": "public" },
//!   "backend": { "type": "local", "path": "azurerm.state.json" },
//!   "resources": [
//!     { "type": "data_factory", "name": "adf", "attributes": { "location": "westeurope" } }
//!   ]
//! }
//! ```

use std::collections::HashSet;
use std::path::Path;

use azurerm_core::resource::{Resource, Value};
use azurerm_provider::metadata;
use azurerm_sdk::Environment;
use azurerm_state::BackendConfig;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub provider: ProviderConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub resources: Vec<ResourceEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ProviderConfig {
    pub subscription_id: String,
    /// Cloud name (`public`, `china`, `usgovernment`)
    #[serde(default = "default_environment")]
    pub environment: String,
    /// Resource Manager endpoint overriding the cloud's
    #[serde(default)]
    pub endpoint: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResourceEntry {
    /// Resource type, with or without the `azurerm_` prefix
    #[serde(rename = "type")]
    pub resource_type: String,
    pub name: String,
    #[serde(default)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

fn default_environment() -> String {
    "public".to_string()
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        Self::parse(&content).map_err(|e| format!("{}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> Result<Self, String> {
        serde_json::from_str(content).map_err(|e| format!("Parse error: {}", e))
    }

    /// Desired resources in declaration order
    pub fn resources(&self) -> Result<Vec<Resource>, String> {
        let mut seen = HashSet::new();
        let mut resources = Vec::with_capacity(self.resources.len());
        for entry in &self.resources {
            let resource_type =
                metadata::resource_name(&entry.resource_type).unwrap_or(&entry.resource_type);
            let mut resource = Resource::new(resource_type, &entry.name);
            if !seen.insert(resource.address.clone()) {
                return Err(format!("{} is declared more than once", resource.address));
            }
            for (key, value) in &entry.attributes {
                if let Some(value) = Value::from_json(value) {
                    resource.attributes.insert(key.clone(), value);
                }
            }
            resources.push(resource);
        }
        Ok(resources)
    }
}

impl ProviderConfig {
    pub fn environment(&self) -> Result<Environment, String> {
        if let Some(endpoint) = &self.endpoint {
            return Ok(Environment::custom(endpoint.as_str()));
        }
        Environment::from_name(&self.environment)
            .ok_or_else(|| format!("Unknown environment: {}", self.environment))
    }
}
