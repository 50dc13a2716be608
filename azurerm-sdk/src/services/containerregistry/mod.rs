//! Container Registry webhooks (`Microsoft.ContainerRegistry`, 2021-08-01-preview)

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookCreateParameters {
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<WebhookPropertiesCreateParameters>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPropertiesCreateParameters {
    pub actions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_headers: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    pub service_uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_is_always_sent() {
        let json = serde_json::to_value(WebhookCreateParameters {
            location: "westeurope".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"location": "westeurope"}));
    }
}
