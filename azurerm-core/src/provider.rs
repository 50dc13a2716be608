//! Provider - Trait abstracting resource operations
//!
//! A Provider maps resource configuration onto a management API.
//! It is responsible for converting Effects into actual API calls.

use std::future::Future;
use std::pin::Pin;

use crate::resource::{Resource, ResourceAddress, State};
use crate::schema::ResourceSchema;

/// Error type for Provider operations
#[derive(Debug)]
pub struct ProviderError {
    pub message: String,
    pub address: Option<ResourceAddress>,
    pub cause: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref address) = self.address {
            write!(f, "[{}] {}", address, self.message)?;
        } else {
            write!(f, "{}", self.message)?;
        }
        if let Some(ref cause) = self.cause {
            write!(f, ": {}", cause)?;
        }
        Ok(())
    }
}

impl std::error::Error for ProviderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_ref()
            .map(|e| e.as_ref() as &dyn std::error::Error)
    }
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            address: None,
            cause: None,
        }
    }

    pub fn for_resource(mut self, address: ResourceAddress) -> Self {
        self.address = Some(address);
        self
    }

    pub fn with_cause(mut self, cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Return type for async operations
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Definition of resource types that a Provider can handle
pub trait ResourceType: Send + Sync {
    /// Resource type name without the provider prefix (e.g., "data_factory")
    fn name(&self) -> &'static str;

    /// Configuration schema for this resource type
    fn schema(&self) -> ResourceSchema;
}

/// Main Provider trait
///
/// All operations are async and involve side effects.
pub trait Provider: Send + Sync {
    /// Name of this Provider (e.g., "azurerm")
    fn name(&self) -> &'static str;

    /// List of resource types this Provider can handle
    fn resource_types(&self) -> Vec<Box<dyn ResourceType>>;

    /// Schema of a resource type, if this Provider handles it
    fn schema(&self, resource_type: &str) -> Option<ResourceSchema> {
        self.resource_types()
            .into_iter()
            .find(|t| t.name() == resource_type)
            .map(|t| t.schema())
    }

    /// Get the current state of a resource
    ///
    /// `prior` is the last recorded state; values the service never returns
    /// (secrets) are carried over from it. Returns `State::not_found()` if the
    /// resource does not exist.
    fn read(
        &self,
        address: &ResourceAddress,
        identifier: Option<&str>,
        prior: Option<&State>,
    ) -> BoxFuture<'_, ProviderResult<State>>;

    /// Create a resource
    ///
    /// Returns State with identifier set to the ARM resource ID
    fn create(&self, resource: &Resource) -> BoxFuture<'_, ProviderResult<State>>;

    /// Update a resource in place
    fn update(
        &self,
        address: &ResourceAddress,
        identifier: &str,
        from: &State,
        to: &Resource,
    ) -> BoxFuture<'_, ProviderResult<State>>;

    /// Delete a resource
    fn delete(
        &self,
        address: &ResourceAddress,
        identifier: &str,
    ) -> BoxFuture<'_, ProviderResult<()>>;
}

/// Provider implementation for Box<dyn Provider>
/// This enables dynamic dispatch for Providers
impl Provider for Box<dyn Provider> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn resource_types(&self) -> Vec<Box<dyn ResourceType>> {
        (**self).resource_types()
    }

    fn schema(&self, resource_type: &str) -> Option<ResourceSchema> {
        (**self).schema(resource_type)
    }

    fn read(
        &self,
        address: &ResourceAddress,
        identifier: Option<&str>,
        prior: Option<&State>,
    ) -> BoxFuture<'_, ProviderResult<State>> {
        (**self).read(address, identifier, prior)
    }

    fn create(&self, resource: &Resource) -> BoxFuture<'_, ProviderResult<State>> {
        (**self).create(resource)
    }

    fn update(
        &self,
        address: &ResourceAddress,
        identifier: &str,
        from: &State,
        to: &Resource,
    ) -> BoxFuture<'_, ProviderResult<State>> {
        (**self).update(address, identifier, from, to)
    }

    fn delete(
        &self,
        address: &ResourceAddress,
        identifier: &str,
    ) -> BoxFuture<'_, ProviderResult<()>> {
        (**self).delete(address, identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{AttributeSchema, AttributeType};

    struct WidgetType;

    impl ResourceType for WidgetType {
        fn name(&self) -> &'static str {
            "widget"
        }

        fn schema(&self) -> ResourceSchema {
            ResourceSchema::new("widget")
                .attribute(AttributeSchema::new("name", AttributeType::String).required())
        }
    }

    // Mock Provider for testing
    struct MockProvider;

    impl Provider for MockProvider {
        fn name(&self) -> &'static str {
            "mock"
        }

        fn resource_types(&self) -> Vec<Box<dyn ResourceType>> {
            vec![Box::new(WidgetType)]
        }

        fn read(
            &self,
            address: &ResourceAddress,
            _identifier: Option<&str>,
            _prior: Option<&State>,
        ) -> BoxFuture<'_, ProviderResult<State>> {
            let address = address.clone();
            Box::pin(async move { Ok(State::not_found(address)) })
        }

        fn create(&self, resource: &Resource) -> BoxFuture<'_, ProviderResult<State>> {
            let address = resource.address.clone();
            let attrs = resource.attributes.clone();
            Box::pin(async move {
                Ok(State::existing(address, attrs).with_identifier("/subscriptions/mock"))
            })
        }

        fn update(
            &self,
            address: &ResourceAddress,
            _identifier: &str,
            _from: &State,
            to: &Resource,
        ) -> BoxFuture<'_, ProviderResult<State>> {
            let address = address.clone();
            let attrs = to.attributes.clone();
            Box::pin(async move { Ok(State::existing(address, attrs)) })
        }

        fn delete(
            &self,
            _address: &ResourceAddress,
            _identifier: &str,
        ) -> BoxFuture<'_, ProviderResult<()>> {
            Box::pin(async { Ok(()) })
        }
    }

    #[tokio::test]
    async fn mock_provider_read_returns_not_found() {
        let provider = MockProvider;
        let address = ResourceAddress::new("widget", "example");
        let state = provider.read(&address, None, None).await.unwrap();
        assert!(!state.exists);
    }

    #[tokio::test]
    async fn mock_provider_create_returns_existing() {
        let provider: Box<dyn Provider> = Box::new(MockProvider);
        let resource = Resource::new("widget", "example");
        let state = provider.create(&resource).await.unwrap();
        assert!(state.exists);
        assert_eq!(state.identifier, Some("/subscriptions/mock".to_string()));
    }

    #[test]
    fn schema_lookup_by_type_name() {
        let provider = MockProvider;
        assert!(provider.schema("widget").is_some());
        assert!(provider.schema("gadget").is_none());
    }

    #[test]
    fn error_display_includes_address_and_cause() {
        let err = ProviderError::new("failed to create")
            .for_resource(ResourceAddress::new("widget", "a"))
            .with_cause(std::io::Error::other("connection reset"));
        assert_eq!(
            err.to_string(),
            "[widget.a] failed to create: connection reset"
        );
    }
}
