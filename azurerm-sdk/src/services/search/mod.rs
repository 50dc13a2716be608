//! Search services (`Microsoft.Search`, 2023-11-01)

use serde::{Deserialize, Serialize};

crate::string_enum! {
    AadAuthFailureMode {
        HttpFourZeroOneWithBearerChallenge => "http401WithBearerChallenge",
        HttpFourZeroThree => "http403",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPlaneAuthOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aad_or_api_key: Option<DataPlaneAadOrApiKeyAuthOption>,
    /// Free-form; the service sends an empty object when enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_only: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPlaneAadOrApiKeyAuthOption {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aad_auth_failure_mode: Option<AadAuthFailureMode>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_only_is_an_empty_object() {
        let options = DataPlaneAuthOptions {
            api_key_only: Some(serde_json::json!({})),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_string(&options).unwrap(),
            r#"{"apiKeyOnly":{}}"#
        );

        let decoded: DataPlaneAuthOptions = serde_json::from_str(
            r#"{"aadOrApiKey":{"aadAuthFailureMode":"http403"}}"#,
        )
        .unwrap();
        assert_eq!(
            decoded.aad_or_api_key.unwrap().aad_auth_failure_mode,
            Some(AadAuthFailureMode::HttpFourZeroThree)
        );
    }
}
