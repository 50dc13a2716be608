//! Express Route Circuit Connections (`Microsoft.Network`, 2023-06-01)

use azurerm_resourceids::{ExpressRouteCircuitPeeringId, ResourceId};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::{ArmClient, ClientOptions, RequestOptions};
use crate::error::Result;

pub const API_VERSION: &str = "2023-06-01";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpressRouteCircuitConnection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<ExpressRouteCircuitConnectionPropertiesFormat>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpressRouteCircuitConnectionPropertiesFormat {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub circuit_connection_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,
}

/// Filter applied by [`ExpressRouteCircuitConnectionsClient::list_complete_matching_predicate`]
///
/// Each field that is set must equal the item's value; unset fields match anything.
#[derive(Debug, Clone, Default)]
pub struct ExpressRouteCircuitConnectionOperationPredicate {
    pub etag: Option<String>,
    pub id: Option<String>,
    pub name: Option<String>,
    pub type_: Option<String>,
}

impl ExpressRouteCircuitConnectionOperationPredicate {
    pub fn matches(&self, input: &ExpressRouteCircuitConnection) -> bool {
        fn field_matches(want: &Option<String>, got: &Option<String>) -> bool {
            match want {
                Some(want) => got.as_deref() == Some(want.as_str()),
                None => true,
            }
        }

        field_matches(&self.etag, &input.etag)
            && field_matches(&self.id, &input.id)
            && field_matches(&self.name, &input.name)
            && field_matches(&self.type_, &input.type_)
    }
}

#[derive(Clone)]
pub struct ExpressRouteCircuitConnectionsClient {
    client: ArmClient,
}

impl ExpressRouteCircuitConnectionsClient {
    pub fn new(options: &ClientOptions) -> Result<Self> {
        Ok(Self {
            client: ArmClient::new(options)?,
        })
    }

    pub fn from_client(client: ArmClient) -> Self {
        Self { client }
    }

    /// Every connection of a circuit peering, across all pages
    pub async fn list(&self, id: &ExpressRouteCircuitPeeringId) -> Result<Vec<ExpressRouteCircuitConnection>> {
        let options = RequestOptions::new(Method::GET, format!("{}/connections", id.id()), API_VERSION);
        self.client.execute_paged(&options).await
    }

    pub async fn list_complete(&self, id: &ExpressRouteCircuitPeeringId) -> Result<Vec<ExpressRouteCircuitConnection>> {
        self.list_complete_matching_predicate(id, &ExpressRouteCircuitConnectionOperationPredicate::default())
            .await
    }

    pub async fn list_complete_matching_predicate(
        &self,
        id: &ExpressRouteCircuitPeeringId,
        predicate: &ExpressRouteCircuitConnectionOperationPredicate,
    ) -> Result<Vec<ExpressRouteCircuitConnection>> {
        let items = self.list(id).await?;
        Ok(items.into_iter().filter(|item| predicate.matches(item)).collect())
    }
}
