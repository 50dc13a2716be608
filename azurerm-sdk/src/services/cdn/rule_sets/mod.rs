//! CDN rule sets (`Microsoft.Cdn`, 2020-09-01)

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::{ArmClient, ClientOptions, NO_BODY, RequestOptions};
use crate::error::Result;
use crate::validation;

pub const API_VERSION: &str = "2020-09-01";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<RuleSetProperties>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSetProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployment_status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_value: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<UsageName>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageName {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub localized_value: Option<String>,
}

#[derive(Clone)]
pub struct RuleSetsClient {
    client: ArmClient,
    subscription_id: String,
}

impl RuleSetsClient {
    pub fn new(options: &ClientOptions, subscription_id: impl Into<String>) -> Result<Self> {
        Ok(Self::from_client(ArmClient::new(options)?, subscription_id))
    }

    pub fn from_client(client: ArmClient, subscription_id: impl Into<String>) -> Self {
        Self {
            client,
            subscription_id: subscription_id.into(),
        }
    }

    fn profile_path(&self, operation: &str, resource_group_name: &str, profile_name: &str) -> Result<String> {
        validation::subscription_id(operation, &self.subscription_id)?;
        validation::resource_group_name(operation, resource_group_name)?;
        Ok(format!(
            "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Cdn/profiles/{}",
            self.subscription_id, resource_group_name, profile_name
        ))
    }

    fn rule_set_path(
        &self,
        operation: &str,
        resource_group_name: &str,
        profile_name: &str,
        rule_set_name: &str,
    ) -> Result<String> {
        let profile = self.profile_path(operation, resource_group_name, profile_name)?;
        Ok(format!("{}/ruleSets/{}", profile, rule_set_name))
    }

    /// Create a rule set; the service takes no request body
    pub async fn create(&self, resource_group_name: &str, profile_name: &str, rule_set_name: &str) -> Result<RuleSet> {
        let path = self.rule_set_path("RuleSetsClient.Create", resource_group_name, profile_name, rule_set_name)?;
        let options = RequestOptions::new(Method::PUT, path, API_VERSION).expect(&[200, 201, 202]);
        let response = self.client.execute_long_running(&options, NO_BODY).await?;
        if response.has_body() {
            response.json()
        } else {
            self.get(resource_group_name, profile_name, rule_set_name).await
        }
    }

    pub async fn get(&self, resource_group_name: &str, profile_name: &str, rule_set_name: &str) -> Result<RuleSet> {
        let path = self.rule_set_path("RuleSetsClient.Get", resource_group_name, profile_name, rule_set_name)?;
        let options = RequestOptions::new(Method::GET, path, API_VERSION);
        self.client.execute(&options, NO_BODY).await?.json()
    }

    pub async fn delete(&self, resource_group_name: &str, profile_name: &str, rule_set_name: &str) -> Result<()> {
        let path = self.rule_set_path("RuleSetsClient.Delete", resource_group_name, profile_name, rule_set_name)?;
        let options = RequestOptions::new(Method::DELETE, path, API_VERSION).expect(&[200, 202, 204]);
        self.client.execute_long_running(&options, NO_BODY).await?;
        Ok(())
    }

    pub async fn list_by_profile(&self, resource_group_name: &str, profile_name: &str) -> Result<Vec<RuleSet>> {
        let profile = self.profile_path("RuleSetsClient.ListByProfile", resource_group_name, profile_name)?;
        let options = RequestOptions::new(Method::GET, format!("{}/ruleSets", profile), API_VERSION);
        self.client.execute_paged(&options).await
    }

    pub async fn list_resource_usage(
        &self,
        resource_group_name: &str,
        profile_name: &str,
        rule_set_name: &str,
    ) -> Result<Vec<Usage>> {
        let path = self.rule_set_path(
            "RuleSetsClient.ListResourceUsage",
            resource_group_name,
            profile_name,
            rule_set_name,
        )?;
        let options = RequestOptions::new(Method::POST, format!("{}/usages", path), API_VERSION);
        self.client.execute_paged(&options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::test_client;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PROFILE_PATH: &str = "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Cdn/profiles/profile1";

    #[tokio::test]
    async fn create_without_body() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path(format!("{}/ruleSets/rules1", PROFILE_PATH)))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "rules1",
                "properties": {"provisioningState": "Succeeded", "deploymentStatus": "NotStarted"}
            })))
            .mount(&server)
            .await;

        let client = RuleSetsClient::from_client(test_client(&server), "sub");
        let rule_set = client.create("rg", "profile1", "rules1").await.unwrap();
        assert_eq!(rule_set.name.as_deref(), Some("rules1"));
        assert_eq!(
            rule_set.properties.unwrap().deployment_status.as_deref(),
            Some("NotStarted")
        );
    }

    #[tokio::test]
    async fn list_by_profile_pages() {
        let server = MockServer::start().await;
        let next = format!("{}{}/ruleSets?$skiptoken=abc", server.uri(), PROFILE_PATH);
        Mock::given(method("GET"))
            .and(path(format!("{}/ruleSets", PROFILE_PATH)))
            .and(wiremock::matchers::query_param("api-version", API_VERSION))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "value": [{"name": "a"}],
                "nextLink": next
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("{}/ruleSets", PROFILE_PATH)))
            .and(wiremock::matchers::query_param("$skiptoken", "abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"value": [{"name": "b"}]})))
            .mount(&server)
            .await;

        let client = RuleSetsClient::from_client(test_client(&server), "sub");
        let rule_sets = client.list_by_profile("rg", "profile1").await.unwrap();
        let names: Vec<_> = rule_sets.iter().filter_map(|r| r.name.as_deref()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn list_resource_usage() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("{}/ruleSets/rules1/usages", PROFILE_PATH)))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "value": [{"unit": "Count", "currentValue": 3, "limit": 25, "name": {"value": "rule"}}]
            })))
            .mount(&server)
            .await;

        let client = RuleSetsClient::from_client(test_client(&server), "sub");
        let usages = client.list_resource_usage("rg", "profile1", "rules1").await.unwrap();
        assert_eq!(usages[0].current_value, Some(3));
        assert_eq!(usages[0].limit, Some(25));
    }
}
