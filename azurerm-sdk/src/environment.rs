//! Azure cloud environments.

/// Endpoints of one Azure cloud
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    pub name: String,
    /// Base URL of the Resource Manager API
    pub resource_manager: String,
    /// Login authority used to acquire tokens
    pub authority: String,
    /// Audience tokens are requested for
    pub token_audience: String,
}

impl Environment {
    pub fn public() -> Self {
        Self::new(
            "public",
            "https://management.azure.com/",
            "https://login.microsoftonline.com/",
            "https://management.azure.com/",
        )
    }

    pub fn china() -> Self {
        Self::new(
            "china",
            "https://management.chinacloudapi.cn/",
            "https://login.chinacloudapi.cn/",
            "https://management.chinacloudapi.cn/",
        )
    }

    pub fn us_government() -> Self {
        Self::new(
            "usgovernment",
            "https://management.usgovcloudapi.net/",
            "https://login.microsoftonline.us/",
            "https://management.usgovcloudapi.net/",
        )
    }

    /// An environment pointing at an arbitrary endpoint, e.g. a local mock server
    pub fn custom(resource_manager: impl Into<String>) -> Self {
        let endpoint = resource_manager.into();
        Self::new("custom", &endpoint, &endpoint, &endpoint)
    }

    /// Look up a preset by name (`public`, `china`, `usgovernment`)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "public" | "azurepubliccloud" => Some(Self::public()),
            "china" | "azurechinacloud" => Some(Self::china()),
            "usgovernment" | "azureusgovernmentcloud" => Some(Self::us_government()),
            _ => None,
        }
    }

    /// OAuth2 scope for Resource Manager tokens
    pub fn scope(&self) -> String {
        format!("{}/.default", self.token_audience.trim_end_matches('/'))
    }

    fn new(name: &str, resource_manager: &str, authority: &str, token_audience: &str) -> Self {
        Self {
            name: name.to_string(),
            resource_manager: resource_manager.to_string(),
            authority: authority.to_string(),
            token_audience: token_audience.to_string(),
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::public()
    }
}
