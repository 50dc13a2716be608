//! Resource type naming

pub const PROVIDER_NAME: &str = "azurerm";

/// Full type name of a resource: the provider name, an underscore, then the
/// resource name (e.g. `azurerm_data_factory`)
pub fn type_name(provider: &str, resource: &str) -> String {
    format!("{}_{}", provider, resource)
}

/// The resource part of an `azurerm_` type name
pub fn resource_name(type_name: &str) -> Option<&str> {
    type_name
        .strip_prefix(PROVIDER_NAME)
        .and_then(|rest| rest.strip_prefix('_'))
        .filter(|rest| !rest.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_provider_name() {
        assert_eq!(type_name(PROVIDER_NAME, "data_factory"), "azurerm_data_factory");
        assert_eq!(type_name("examplecloud", "thing"), "examplecloud_thing");
    }

    #[test]
    fn strips_provider_name() {
        assert_eq!(resource_name("azurerm_express_route_port"), Some("express_route_port"));
        assert_eq!(resource_name("azurerm_"), None);
        assert_eq!(resource_name("azurermdata_factory"), None);
        assert_eq!(resource_name("azuread_application"), None);
    }
}
