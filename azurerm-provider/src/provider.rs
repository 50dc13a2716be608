//! AzureRM Provider implementation
//!
//! Resources listed in the [`ResourceConfig`] table are mapped generically:
//! attributes are written to and read from dotted JSON paths of the ARM body.
//! The Linux scale set goes through its own expand/flatten functions.

use std::collections::HashMap;

use azurerm_core::features::Features;
use azurerm_core::provider::{ProviderError, ProviderResult};
use azurerm_core::resource::{Attributes, AttributesExt, Resource, ResourceAddress, State, Value};
use azurerm_resourceids::ResourceId;
use azurerm_sdk::services::compute::virtual_machine_scale_sets::VirtualMachineScaleSetId;
use azurerm_sdk::{ArmClient, ClientOptions, NO_BODY, RequestOptions};
use reqwest::Method;

use crate::resources::{Presence, ResourceConfig, resource_config, resource_types};
use crate::services::compute::client::ComputeClient;
use crate::services::compute::linux_virtual_machine_scale_set as linux_vmss;

/// Provider for Azure Resource Manager
pub struct AzureRmProvider {
    client: ArmClient,
    compute: ComputeClient,
    subscription_id: String,
    features: Features,
}

impl AzureRmProvider {
    pub fn new(
        options: &ClientOptions,
        subscription_id: impl Into<String>,
        features: Features,
    ) -> azurerm_sdk::Result<Self> {
        Ok(Self::from_client(ArmClient::new(options)?, subscription_id, features))
    }

    pub fn from_client(client: ArmClient, subscription_id: impl Into<String>, features: Features) -> Self {
        Self {
            compute: ComputeClient::from_client(client.clone()),
            client,
            subscription_id: subscription_id.into(),
            features,
        }
    }

    pub fn subscription_id(&self) -> &str {
        &self.subscription_id
    }

    pub fn features(&self) -> Features {
        self.features
    }

    /// ARM resource ID a resource will be created under
    pub fn resource_id(&self, resource: &Resource) -> ProviderResult<String> {
        let attrs = &resource.attributes;
        if resource.address.resource_type == linux_vmss::RESOURCE_TYPE {
            return Ok(linux_vmss::resource_id(&self.subscription_id, attrs).id());
        }
        let config = config_for(&resource.address)?;
        Ok((config.format_id)(
            &self.subscription_id,
            attrs.str_or_empty("resource_group_name"),
            attrs.str_or_empty("name"),
        ))
    }

    // =========================================================================
    // Resource Operations
    // =========================================================================

    /// Read a resource by its ARM resource ID
    pub async fn read_resource(
        &self,
        address: &ResourceAddress,
        identifier: Option<&str>,
        prior: Option<&Attributes>,
    ) -> ProviderResult<State> {
        let identifier = match identifier {
            Some(id) => id,
            None => return Ok(State::not_found(address.clone())),
        };

        if address.resource_type == linux_vmss::RESOURCE_TYPE {
            return self.read_scale_set(address, identifier, prior).await;
        }

        let config = config_for(address)?;
        let options = RequestOptions::new(Method::GET, identifier, config.api_version);
        let response = match self.client.execute(&options, NO_BODY).await {
            Ok(response) => response,
            Err(e) if e.is_not_found() => {
                log::debug!("{} no longer exists", identifier);
                return Ok(State::not_found(address.clone()));
            }
            Err(e) => return Err(api_error(address, "failed to read resource", e)),
        };
        let body: serde_json::Value = response
            .json()
            .map_err(|e| api_error(address, "failed to decode resource", e))?;

        let (resource_group, name) = (config.parse_id)(identifier).map_err(|e| {
            ProviderError::new(format!("parsing resource ID {:?}", identifier))
                .for_resource(address.clone())
                .with_cause(e)
        })?;

        let mut attributes = flatten_body(config, &body);
        attributes.insert("id".to_string(), Value::string(identifier));
        attributes.insert("name".to_string(), Value::string(name));
        attributes.insert("resource_group_name".to_string(), Value::string(resource_group));

        Ok(State::existing(address.clone(), attributes).with_identifier(identifier))
    }

    async fn read_scale_set(
        &self,
        address: &ResourceAddress,
        identifier: &str,
        prior: Option<&Attributes>,
    ) -> ProviderResult<State> {
        let id = parse_scale_set_id(address, identifier)?;
        let scale_set = self
            .compute
            .vm_scale_set_client
            .get(&id)
            .await
            .map_err(|e| api_error(address, "failed to read scale set", e))?;
        match scale_set {
            Some(scale_set) => {
                let attributes = linux_vmss::flatten(&scale_set, prior, self.features);
                Ok(State::existing(address.clone(), attributes).with_identifier(id.id()))
            }
            None => Ok(State::not_found(address.clone())),
        }
    }

    /// Create a resource, failing when one already exists under its ID
    pub async fn create_resource(&self, resource: &Resource) -> ProviderResult<State> {
        let address = &resource.address;
        let identifier = self.resource_id(resource)?;

        if self.read_resource(address, Some(&identifier), None).await?.exists {
            return Err(ProviderError::new(format!(
                "a resource with the ID {:?} already exists and needs to be imported into state",
                identifier
            ))
            .for_resource(address.clone()));
        }

        self.put_resource(resource, &identifier).await?;
        log::info!("created {} ({})", address, identifier);
        self.read_resource(address, Some(&identifier), Some(&resource.attributes))
            .await
    }

    /// Update a resource in place
    pub async fn update_resource(
        &self,
        address: &ResourceAddress,
        identifier: &str,
        to: &Resource,
    ) -> ProviderResult<State> {
        if address.resource_type == linux_vmss::RESOURCE_TYPE {
            let id = parse_scale_set_id(address, identifier)?;
            let update = linux_vmss::expand_update(&with_defaults(to, self.features))
                .map_err(|e| expand_error(address, e))?;
            self.compute
                .vm_scale_set_client
                .update(&id, &update)
                .await
                .map_err(|e| api_error(address, "failed to update scale set", e))?;
        } else {
            self.put_resource(to, identifier).await?;
        }
        log::info!("updated {}", address);
        self.read_resource(address, Some(identifier), Some(&to.attributes))
            .await
    }

    /// Delete a resource and wait for the deletion to finish
    pub async fn delete_resource(&self, address: &ResourceAddress, identifier: &str) -> ProviderResult<()> {
        if address.resource_type == linux_vmss::RESOURCE_TYPE {
            let id = parse_scale_set_id(address, identifier)?;
            return self
                .compute
                .vm_scale_set_client
                .delete(&id, false)
                .await
                .map_err(|e| api_error(address, "failed to delete scale set", e));
        }

        let config = config_for(address)?;
        let options =
            RequestOptions::new(Method::DELETE, identifier, config.api_version).expect(&[200, 202, 204]);
        self.client
            .execute_long_running(&options, NO_BODY)
            .await
            .map_err(|e| api_error(address, "failed to delete resource", e))?;
        log::info!("deleted {}", address);
        Ok(())
    }

    async fn put_resource(&self, resource: &Resource, identifier: &str) -> ProviderResult<()> {
        let address = &resource.address;
        if address.resource_type == linux_vmss::RESOURCE_TYPE {
            let id = parse_scale_set_id(address, identifier)?;
            let model = linux_vmss::expand(&with_defaults(resource, self.features))
                .map_err(|e| expand_error(address, e))?;
            return self
                .compute
                .vm_scale_set_client
                .create_or_update(&id, &model)
                .await
                .map_err(|e| api_error(address, "failed to create scale set", e));
        }

        let config = config_for(address)?;
        let body = build_body(config, &with_defaults(resource, self.features));
        let options = RequestOptions::new(Method::PUT, identifier, config.api_version).expect(&[200, 201]);
        self.client
            .execute_long_running(&options, Some(&body))
            .await
            .map_err(|e| api_error(address, "failed to create or update resource", e))?;
        Ok(())
    }
}

/// Request body sent when creating `resource`
pub fn expand_body(resource: &Resource, features: Features) -> ProviderResult<serde_json::Value> {
    let attrs = with_defaults(resource, features);
    if resource.address.resource_type == linux_vmss::RESOURCE_TYPE {
        let model = linux_vmss::expand(&attrs).map_err(|e| expand_error(&resource.address, e))?;
        return serde_json::to_value(&model).map_err(|e| {
            ProviderError::new("failed to encode request body")
                .for_resource(resource.address.clone())
                .with_cause(e)
        });
    }
    let config = config_for(&resource.address)?;
    Ok(build_body(config, &attrs))
}

fn config_for(address: &ResourceAddress) -> ProviderResult<&'static ResourceConfig> {
    resource_config(&address.resource_type).ok_or_else(|| {
        ProviderError::new(format!("Unknown resource type: {}", address.resource_type))
            .for_resource(address.clone())
    })
}

/// Attributes of `resource` with schema defaults filled in
fn with_defaults(resource: &Resource, features: Features) -> Attributes {
    let mut attrs = resource.attributes.clone();
    if let Some(t) = resource_types(features)
        .into_iter()
        .find(|t| t.name() == resource.address.resource_type)
    {
        t.schema().apply_defaults(&mut attrs);
    }
    attrs
}

fn parse_scale_set_id(address: &ResourceAddress, identifier: &str) -> ProviderResult<VirtualMachineScaleSetId> {
    VirtualMachineScaleSetId::parse_insensitively(identifier).map_err(|e| {
        ProviderError::new(format!("parsing resource ID {:?}", identifier))
            .for_resource(address.clone())
            .with_cause(e)
    })
}

fn api_error(address: &ResourceAddress, message: &str, cause: azurerm_sdk::Error) -> ProviderError {
    ProviderError::new(message).for_resource(address.clone()).with_cause(cause)
}

fn expand_error(address: &ResourceAddress, cause: crate::error::ExpandError) -> ProviderError {
    ProviderError::new("invalid configuration")
        .for_resource(address.clone())
        .with_cause(cause)
}

// =========================================================================
// Body Mapping Helpers
// =========================================================================

/// ARM request body for a table-mapped resource
pub fn build_body(config: &ResourceConfig, attrs: &Attributes) -> serde_json::Value {
    let mut body = serde_json::json!({ "location": attrs.str_or_empty("location") });

    if config.has_tags
        && let Some(Value::Map(tags)) = attrs.get("tags")
    {
        body["tags"] = Value::Map(tags.clone()).to_json();
    }

    for &(name, path, _, presence, _) in config.attributes {
        if presence == Presence::Computed {
            continue;
        }
        if let Some(value) = attrs.get(name) {
            set_json_path(&mut body, path, value.to_json());
        }
    }
    body
}

/// Attributes read back from an ARM response body
///
/// `name`, `resource_group_name` and `id` come from the resource ID and are
/// left to the caller.
pub fn flatten_body(config: &ResourceConfig, body: &serde_json::Value) -> Attributes {
    let mut attrs = HashMap::new();

    if let Some(location) = body.get("location").and_then(serde_json::Value::as_str) {
        attrs.insert("location".to_string(), Value::string(location));
    }
    if config.has_tags
        && let Some(tags) = body.get("tags").and_then(Value::from_json)
    {
        attrs.insert("tags".to_string(), tags);
    }

    for &(name, path, ..) in config.attributes {
        if let Some(value) = get_json_path(body, path).and_then(Value::from_json) {
            attrs.insert(name.to_string(), value);
        }
    }
    attrs
}

fn get_json_path<'a>(body: &'a serde_json::Value, path: &str) -> Option<&'a serde_json::Value> {
    path.split('.').try_fold(body, |current, key| current.get(key))
}

fn set_json_path(body: &mut serde_json::Value, path: &str, value: serde_json::Value) {
    let mut current = body;
    let mut keys = path.split('.').peekable();
    while let Some(key) = keys.next() {
        if !current.is_object() {
            *current = serde_json::Value::Object(serde_json::Map::new());
        }
        let serde_json::Value::Object(map) = current else {
            return;
        };
        if keys.peek().is_none() {
            map.insert(key.to_string(), value);
            return;
        }
        current = map
            .entry(key.to_string())
            .or_insert_with(|| serde_json::Value::Object(serde_json::Map::new()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{DATA_FACTORY_CONFIG, EXPRESS_ROUTE_PORT_CONFIG};
    use azurerm_sdk::{Environment, PollerOptions, StaticTokenAuthorizer};
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const FACTORY_ID: &str =
        "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.DataFactory/factories/adf";

    fn test_provider(server: &MockServer) -> AzureRmProvider {
        let options = ClientOptions::new(
            Environment::custom(server.uri()),
            Arc::new(StaticTokenAuthorizer::new("test-token")),
        )
        .with_poller(PollerOptions {
            interval: Duration::from_millis(10),
            max_attempts: 5,
        });
        AzureRmProvider::new(&options, "sub", Features::default()).unwrap()
    }

    fn data_factory() -> Resource {
        Resource::new("data_factory", "adf")
            .with_attribute("name", "adf")
            .with_attribute("resource_group_name", "rg")
            .with_attribute("location", "westeurope")
            .with_attribute("public_network_access", "Disabled")
            .with_attribute("identity_type", "SystemAssigned")
    }

    fn factory_body() -> serde_json::Value {
        json!({
            "id": FACTORY_ID,
            "name": "adf",
            "location": "westeurope",
            "tags": { "env": "test" },
            "identity": { "type": "SystemAssigned", "principalId": "p-1", "tenantId": "t-1" },
            "properties": { "publicNetworkAccess": "Disabled", "provisioningState": "Succeeded" }
        })
    }

    #[test]
    fn json_paths_create_nested_objects() {
        let mut body = json!({});
        set_json_path(&mut body, "properties.purviewConfiguration.purviewResourceId", json!("pv"));
        set_json_path(&mut body, "properties.publicNetworkAccess", json!("Enabled"));
        assert_eq!(
            body,
            json!({ "properties": {
                "purviewConfiguration": { "purviewResourceId": "pv" },
                "publicNetworkAccess": "Enabled"
            }})
        );
        assert_eq!(
            get_json_path(&body, "properties.purviewConfiguration.purviewResourceId"),
            Some(&json!("pv"))
        );
        assert_eq!(get_json_path(&body, "properties.missing.key"), None);
    }

    #[test]
    fn body_skips_computed_attributes() {
        let resource = Resource::new("express_route_port", "erp")
            .with_attribute("location", "westeurope")
            .with_attribute("peering_location", "Airtel-Chennai2-CLS")
            .with_attribute("bandwidth_in_gbps", 10i64)
            .with_attribute("encapsulation", "Dot1Q")
            .with_attribute("guid", "should-not-be-sent");
        let body = build_body(&EXPRESS_ROUTE_PORT_CONFIG, &resource.attributes);
        assert_eq!(
            body,
            json!({
                "location": "westeurope",
                "properties": {
                    "peeringLocation": "Airtel-Chennai2-CLS",
                    "bandwidthInGbps": 10,
                    "encapsulation": "Dot1Q"
                }
            })
        );
    }

    #[test]
    fn flatten_reads_mapped_and_computed_paths() {
        let attrs = flatten_body(&DATA_FACTORY_CONFIG, &factory_body());
        assert_eq!(attrs.str_or_empty("location"), "westeurope");
        assert_eq!(attrs.str_or_empty("public_network_access"), "Disabled");
        assert_eq!(attrs.str_or_empty("identity_principal_id"), "p-1");
        assert!(!attrs.contains_key("purview_id"));
        assert_eq!(
            attrs.get("tags"),
            Some(&Value::Map(HashMap::from([("env".to_string(), Value::string("test"))])))
        );
    }

    #[tokio::test]
    async fn read_without_identifier_is_not_found() {
        let server = MockServer::start().await;
        let provider = test_provider(&server);
        let state = provider
            .read_resource(&ResourceAddress::new("data_factory", "adf"), None, None)
            .await
            .unwrap();
        assert!(!state.exists);
    }

    #[tokio::test]
    async fn read_maps_404_to_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(FACTORY_ID))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": { "code": "ResourceNotFound", "message": "not found" }
            })))
            .mount(&server)
            .await;

        let provider = test_provider(&server);
        let state = provider
            .read_resource(&ResourceAddress::new("data_factory", "adf"), Some(FACTORY_ID), None)
            .await
            .unwrap();
        assert!(!state.exists);
    }

    #[tokio::test]
    async fn read_flattens_identity_fields() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(FACTORY_ID))
            .and(query_param("api-version", "2018-06-01"))
            .respond_with(ResponseTemplate::new(200).set_body_json(factory_body()))
            .mount(&server)
            .await;

        let provider = test_provider(&server);
        let state = provider
            .read_resource(&ResourceAddress::new("data_factory", "adf"), Some(FACTORY_ID), None)
            .await
            .unwrap();
        assert!(state.exists);
        assert_eq!(state.identifier.as_deref(), Some(FACTORY_ID));
        assert_eq!(state.attributes.str_or_empty("name"), "adf");
        assert_eq!(state.attributes.str_or_empty("resource_group_name"), "rg");
        assert_eq!(state.attributes.str_or_empty("identity_type"), "SystemAssigned");
    }

    #[tokio::test]
    async fn create_puts_body_then_reads_back() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(FACTORY_ID))
            .respond_with(ResponseTemplate::new(404))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path(FACTORY_ID))
            .and(body_json(json!({
                "location": "westeurope",
                "identity": { "type": "SystemAssigned" },
                "properties": { "publicNetworkAccess": "Disabled" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(factory_body()))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(FACTORY_ID))
            .respond_with(ResponseTemplate::new(200).set_body_json(factory_body()))
            .mount(&server)
            .await;

        let provider = test_provider(&server);
        let state = provider.create_resource(&data_factory()).await.unwrap();
        assert!(state.exists);
        assert_eq!(state.identifier.as_deref(), Some(FACTORY_ID));
        assert_eq!(state.attributes.str_or_empty("identity_principal_id"), "p-1");
    }

    #[tokio::test]
    async fn create_refuses_existing_resource() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(FACTORY_ID))
            .respond_with(ResponseTemplate::new(200).set_body_json(factory_body()))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let provider = test_provider(&server);
        let err = provider.create_resource(&data_factory()).await.unwrap_err();
        assert!(err.message.contains("already exists"), "{}", err);
    }

    #[tokio::test]
    async fn delete_waits_for_async_operation() {
        let server = MockServer::start().await;
        let operation = format!("{}/operations/op-1", server.uri());
        Mock::given(method("DELETE"))
            .and(path(FACTORY_ID))
            .respond_with(ResponseTemplate::new(202).insert_header("Azure-AsyncOperation", operation.as_str()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/operations/op-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "Succeeded" })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = test_provider(&server);
        provider
            .delete_resource(&ResourceAddress::new("data_factory", "adf"), FACTORY_ID)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn scale_set_read_recovers_password_from_prior() {
        let server = MockServer::start().await;
        let id = "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Compute/virtualMachineScaleSets/vmss";
        Mock::given(method("GET"))
            .and(path(id))
            .and(query_param("api-version", "2023-03-01"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": id,
                "name": "vmss",
                "location": "westeurope",
                "sku": { "name": "Standard_F2", "tier": "Standard", "capacity": 2 },
                "properties": {
                    "upgradePolicy": { "mode": "Manual" },
                    "virtualMachineProfile": {
                        "osProfile": { "computerNamePrefix": "vmss", "adminUsername": "adminuser" }
                    }
                }
            })))
            .mount(&server)
            .await;

        let provider = test_provider(&server);
        let prior = Attributes::from([("admin_password".to_string(), Value::string("P@ssw0rd1234!"))]);
        let state = provider
            .read_resource(
                &ResourceAddress::new("linux_virtual_machine_scale_set", "vmss"),
                Some(id),
                Some(&prior),
            )
            .await
            .unwrap();
        assert!(state.exists);
        assert_eq!(state.attributes.str_or_empty("admin_password"), "P@ssw0rd1234!");
        assert_eq!(state.attributes.str_or_empty("sku"), "Standard_F2");
        assert_eq!(state.attributes.int_or("instances", 0), 2);
    }

    #[tokio::test]
    async fn scale_set_delete_rejects_foreign_id() {
        let server = MockServer::start().await;
        let provider = test_provider(&server);
        let err = provider
            .delete_resource(
                &ResourceAddress::new("linux_virtual_machine_scale_set", "vmss"),
                FACTORY_ID,
            )
            .await
            .unwrap_err();
        assert!(err.message.contains("parsing resource ID"));
    }

    #[test]
    fn unknown_type_is_an_error() {
        let err = expand_body(&Resource::new("widget", "w"), Features::default()).unwrap_err();
        assert!(err.message.contains("Unknown resource type"));
    }

    #[test]
    fn expand_body_applies_no_computed_values() {
        let body = expand_body(&data_factory(), Features::default()).unwrap();
        assert_eq!(body["identity"], json!({ "type": "SystemAssigned" }));
        assert!(body["identity"].get("principalId").is_none());
    }
}
