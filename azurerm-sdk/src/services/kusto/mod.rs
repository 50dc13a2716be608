//! Kusto database scripts (`Microsoft.Kusto`, 2022-02-01)

use serde::{Deserialize, Serialize};

crate::string_enum! {
    ProvisioningState {
        Creating => "Creating",
        Deleting => "Deleting",
        Failed => "Failed",
        Moving => "Moving",
        Running => "Running",
        Succeeded => "Succeeded",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continue_on_errors: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force_update_tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<ProvisioningState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script_url_sas_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_script() {
        let props: ScriptProperties = serde_json::from_value(serde_json::json!({
            "scriptUrl": "https://example.blob.core.windows.net/scripts/a.kql",
            "continueOnErrors": true,
            "provisioningState": "succeeded"
        }))
        .unwrap();
        assert_eq!(props.continue_on_errors, Some(true));
        assert_eq!(props.provisioning_state, Some(ProvisioningState::Succeeded));
        assert!(props.script_url_sas_token.is_none());
    }
}
