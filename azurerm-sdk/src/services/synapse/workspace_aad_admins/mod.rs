//! Synapse workspace Azure AD administrators (`Microsoft.Synapse`, 2021-03-01)

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::{ArmClient, ClientOptions, NO_BODY, RequestOptions};
use crate::error::Result;
use crate::validation;

pub const API_VERSION: &str = "2021-03-01";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceAadAdminInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<AadAdminProperties>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AadAdminProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub administrator_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
}

/// Client scoped to one subscription, like the other track-1 style clients
#[derive(Clone)]
pub struct WorkspaceAadAdminsClient {
    client: ArmClient,
    subscription_id: String,
}

impl WorkspaceAadAdminsClient {
    pub fn new(options: &ClientOptions, subscription_id: impl Into<String>) -> Result<Self> {
        Ok(Self::from_client(ArmClient::new(options)?, subscription_id))
    }

    pub fn from_client(client: ArmClient, subscription_id: impl Into<String>) -> Self {
        Self {
            client,
            subscription_id: subscription_id.into(),
        }
    }

    fn path(&self, operation: &str, resource_group_name: &str, workspace_name: &str) -> Result<String> {
        validation::subscription_id(operation, &self.subscription_id)?;
        validation::resource_group_name(operation, resource_group_name)?;
        Ok(format!(
            "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Synapse/workspaces/{}/administrators/activeDirectory",
            self.subscription_id, resource_group_name, workspace_name
        ))
    }

    pub async fn create_or_update(
        &self,
        resource_group_name: &str,
        workspace_name: &str,
        aad_admin_info: &WorkspaceAadAdminInfo,
    ) -> Result<()> {
        let path = self.path(
            "WorkspaceAadAdminsClient.CreateOrUpdate",
            resource_group_name,
            workspace_name,
        )?;
        let options = RequestOptions::new(Method::PUT, path, API_VERSION).expect(&[200, 202]);
        self.client.execute_long_running(&options, Some(aad_admin_info)).await?;
        Ok(())
    }

    pub async fn get(&self, resource_group_name: &str, workspace_name: &str) -> Result<WorkspaceAadAdminInfo> {
        let path = self.path("WorkspaceAadAdminsClient.Get", resource_group_name, workspace_name)?;
        let options = RequestOptions::new(Method::GET, path, API_VERSION);
        self.client.execute(&options, NO_BODY).await?.json()
    }

    pub async fn delete(&self, resource_group_name: &str, workspace_name: &str) -> Result<()> {
        let path = self.path("WorkspaceAadAdminsClient.Delete", resource_group_name, workspace_name)?;
        let options = RequestOptions::new(Method::DELETE, path, API_VERSION).expect(&[200, 202, 204]);
        self.client.execute_long_running(&options, NO_BODY).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::test_client;
    use crate::error::Error;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ADMIN_PATH: &str =
        "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Synapse/workspaces/ws1/administrators/activeDirectory";

    #[tokio::test]
    async fn get_decodes_admin() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(ADMIN_PATH))
            .and(query_param("api-version", API_VERSION))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "activeDirectory",
                "properties": {"login": "admins", "administratorType": "ActiveDirectory", "tenantId": "tenant"}
            })))
            .mount(&server)
            .await;

        let client = WorkspaceAadAdminsClient::from_client(test_client(&server), "sub");
        let admin = client.get("rg", "ws1").await.unwrap();
        let properties = admin.properties.unwrap();
        assert_eq!(properties.login.as_deref(), Some("admins"));
        assert_eq!(properties.administrator_type.as_deref(), Some("ActiveDirectory"));
    }

    #[tokio::test]
    async fn create_or_update_sends_body() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path(ADMIN_PATH))
            .and(body_json(serde_json::json!({"properties": {"login": "admins", "sid": "object-id"}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"name": "activeDirectory"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = WorkspaceAadAdminsClient::from_client(test_client(&server), "sub");
        let input = WorkspaceAadAdminInfo {
            properties: Some(AadAdminProperties {
                login: Some("admins".to_string()),
                sid: Some("object-id".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        client.create_or_update("rg", "ws1", &input).await.unwrap();
    }

    #[tokio::test]
    async fn invalid_resource_group_is_rejected_before_sending() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = WorkspaceAadAdminsClient::from_client(test_client(&server), "sub");
        let err = client.delete("rg with spaces", "ws1").await.unwrap_err();
        match err {
            Error::Validation { operation, target, .. } => {
                assert_eq!(operation, "WorkspaceAadAdminsClient.Delete");
                assert_eq!(target, "resourceGroupName");
            }
            other => panic!("unexpected error {:?}", other),
        }

        let client = WorkspaceAadAdminsClient::from_client(test_client(&server), "");
        assert!(matches!(
            client.get("rg", "ws1").await,
            Err(Error::Validation { .. })
        ));
    }
}
