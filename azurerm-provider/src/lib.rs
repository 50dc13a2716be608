//! AzureRM Provider
//!
//! Azure Resource Manager Provider implementation.
//!
//! ## Module Structure
//!
//! - `services` - Per-service schemas, validators, resource IDs and expand/flatten
//! - `resources` - Resource type definitions and generic ARM mappings
//! - `provider` - AzureRmProvider implementation
//! - `metadata` - Resource type naming

pub mod error;
pub mod metadata;
pub mod provider;
pub mod resources;
pub mod services;

// Re-export main types
pub use error::{ExpandError, ExpandResult};
pub use provider::{AzureRmProvider, expand_body};

use azurerm_core::provider::{BoxFuture, Provider, ProviderResult, ResourceType};
use azurerm_core::resource::{Resource, ResourceAddress, State};

use metadata::PROVIDER_NAME;
use resources::resource_types;

// =============================================================================
// Provider Trait Implementation
// =============================================================================

impl Provider for AzureRmProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn resource_types(&self) -> Vec<Box<dyn ResourceType>> {
        resource_types(self.features())
    }

    fn read(
        &self,
        address: &ResourceAddress,
        identifier: Option<&str>,
        prior: Option<&State>,
    ) -> BoxFuture<'_, ProviderResult<State>> {
        let address = address.clone();
        let identifier = identifier.map(|s| s.to_string());
        let prior = prior.map(|s| s.attributes.clone());
        Box::pin(async move {
            self.read_resource(&address, identifier.as_deref(), prior.as_ref())
                .await
        })
    }

    fn create(&self, resource: &Resource) -> BoxFuture<'_, ProviderResult<State>> {
        let resource = resource.clone();
        Box::pin(async move { self.create_resource(&resource).await })
    }

    fn update(
        &self,
        address: &ResourceAddress,
        identifier: &str,
        _from: &State,
        to: &Resource,
    ) -> BoxFuture<'_, ProviderResult<State>> {
        let address = address.clone();
        let identifier = identifier.to_string();
        let to = to.clone();
        Box::pin(async move { self.update_resource(&address, &identifier, &to).await })
    }

    fn delete(
        &self,
        address: &ResourceAddress,
        identifier: &str,
    ) -> BoxFuture<'_, ProviderResult<()>> {
        let address = address.clone();
        let identifier = identifier.to_string();
        Box::pin(async move { self.delete_resource(&address, &identifier).await })
    }
}
