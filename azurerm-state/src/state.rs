//! State file structures for persisting managed resources

use std::collections::HashMap;

use azurerm_core::resource::{ResourceAddress, State, Value};
use serde::{Deserialize, Serialize};

/// The main state file structure that persists to the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateFile {
    /// State file format version
    pub version: u32,
    /// Monotonically increasing number for each state modification
    pub serial: u64,
    /// Unique identifier for this state lineage (prevents accidental overwrites)
    pub lineage: String,
    /// Version of the provider that last modified this state
    pub provider_version: String,
    /// All managed resources and their last known attributes
    pub resources: Vec<ResourceState>,
}

impl StateFile {
    /// Current state file format version
    pub const CURRENT_VERSION: u32 = 1;

    /// Create a new empty state file
    pub fn new() -> Self {
        Self::with_lineage(uuid::Uuid::new_v4().to_string())
    }

    pub fn with_lineage(lineage: String) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            serial: 0,
            lineage,
            provider_version: env!("CARGO_PKG_VERSION").to_string(),
            resources: Vec::new(),
        }
    }

    /// Increment serial and stamp the provider version for a new state write
    pub fn increment_serial(&mut self) {
        self.serial += 1;
        self.provider_version = env!("CARGO_PKG_VERSION").to_string();
    }

    pub fn find_resource(&self, address: &ResourceAddress) -> Option<&ResourceState> {
        self.resources.iter().find(|r| r.address() == *address)
    }

    /// Add or replace the entry of a resource
    pub fn upsert_resource(&mut self, resource: ResourceState) {
        let address = resource.address();
        match self.resources.iter_mut().find(|r| r.address() == address) {
            Some(existing) => *existing = resource,
            None => self.resources.push(resource),
        }
    }

    pub fn remove_resource(&mut self, address: &ResourceAddress) -> Option<ResourceState> {
        let pos = self.resources.iter().position(|r| r.address() == *address)?;
        Some(self.resources.remove(pos))
    }

    /// Recorded states keyed by address, as the planner consumes them
    pub fn states(&self) -> HashMap<ResourceAddress, State> {
        self.resources
            .iter()
            .map(|r| (r.address(), r.to_state()))
            .collect()
    }
}

impl Default for StateFile {
    fn default() -> Self {
        Self::new()
    }
}

/// State of a single managed resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceState {
    /// Resource type without the provider prefix (e.g., "data_factory")
    pub resource_type: String,
    pub name: String,
    /// Provider name (e.g., "azurerm")
    pub provider: String,
    /// ARM resource ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    /// All attributes of the resource as JSON values
    pub attributes: HashMap<String, serde_json::Value>,
}

impl ResourceState {
    pub fn new(
        resource_type: impl Into<String>,
        name: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            resource_type: resource_type.into(),
            name: name.into(),
            provider: provider.into(),
            identifier: None,
            attributes: HashMap::new(),
        }
    }

    /// Record the state returned by a provider
    pub fn from_state(state: &State, provider: impl Into<String>) -> Self {
        Self {
            resource_type: state.address.resource_type.clone(),
            name: state.address.name.clone(),
            provider: provider.into(),
            identifier: state.identifier.clone(),
            attributes: state
                .attributes
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    pub fn address(&self) -> ResourceAddress {
        ResourceAddress::new(&self.resource_type, &self.name)
    }

    /// The recorded resource as an existing provider state
    ///
    /// JSON `null` attributes have no configuration value and are dropped.
    pub fn to_state(&self) -> State {
        let attributes = self
            .attributes
            .iter()
            .filter_map(|(k, v)| Value::from_json(v).map(|v| (k.clone(), v)))
            .collect();
        let state = State::existing(self.address(), attributes);
        match &self.identifier {
            Some(identifier) => state.with_identifier(identifier),
            None => state,
        }
    }
}
