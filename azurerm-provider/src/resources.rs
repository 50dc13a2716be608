//! Resource type configurations for Azure Resource Manager
//!
//! This module defines:
//! - Resource type definitions (implementing ResourceType trait)
//! - Mapping between configuration attributes and ARM request bodies for
//!   resources without nested blocks

use azurerm_core::features::Features;
use azurerm_core::provider::ResourceType;
use azurerm_core::schema::{AttributeSchema, AttributeType, ResourceSchema};
use azurerm_core::validation::{int_at_least, string_in_slice, string_is_not_empty};
use azurerm_resourceids::{ParseError, ResourceId};

use crate::services::compute::linux_virtual_machine_scale_set;
use crate::services::datafactory::parse::DataFactoryId;
use crate::services::network::parse::ExpressRoutePortId;

// =============================================================================
// Resource Configuration
// =============================================================================

/// Value type of a mapped attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrKind {
    String,
    Int,
    Bool,
    StringList,
    /// String restricted to the listed values (case-sensitive)
    Enum(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
    /// Set by the service, never sent
    Computed,
}

/// Attribute mapping: (attribute name, dotted JSON path in the ARM body, kind, presence, force_new)
pub type AttrMapping = (&'static str, &'static str, AttrKind, Presence, bool);

/// Resource type configuration
pub struct ResourceConfig {
    /// Resource type name without the provider prefix (e.g., "data_factory")
    pub resource_type: &'static str,
    /// ARM resource type (e.g., "Microsoft.DataFactory/factories")
    pub arm_type: &'static str,
    pub api_version: &'static str,
    pub attributes: &'static [AttrMapping],
    /// Whether this resource type uses tags
    pub has_tags: bool,
    /// Format the resource ID from subscription, resource group and name
    pub format_id: fn(&str, &str, &str) -> String,
    /// Parse a resource ID (ignoring casing) into resource group and name
    pub parse_id: fn(&str) -> Result<(String, String), ParseError>,
}

fn format_data_factory_id(subscription_id: &str, resource_group: &str, name: &str) -> String {
    DataFactoryId::new(subscription_id, resource_group, name).id()
}

fn parse_data_factory_id(input: &str) -> Result<(String, String), ParseError> {
    DataFactoryId::parse_insensitively(input).map(|id| (id.resource_group, id.factory_name))
}

fn format_express_route_port_id(subscription_id: &str, resource_group: &str, name: &str) -> String {
    ExpressRoutePortId::new(subscription_id, resource_group, name).id()
}

fn parse_express_route_port_id(input: &str) -> Result<(String, String), ParseError> {
    ExpressRoutePortId::parse_insensitively(input).map(|id| (id.resource_group, id.name))
}

// =============================================================================
// Data Factory
// =============================================================================

pub const DATA_FACTORY_CONFIG: ResourceConfig = ResourceConfig {
    resource_type: "data_factory",
    arm_type: "Microsoft.DataFactory/factories",
    api_version: "2018-06-01",
    attributes: &[
        (
            "public_network_access",
            "properties.publicNetworkAccess",
            AttrKind::Enum(&["Enabled", "Disabled"]),
            Presence::Optional,
            false,
        ),
        (
            "purview_id",
            "properties.purviewConfiguration.purviewResourceId",
            AttrKind::String,
            Presence::Optional,
            false,
        ),
        (
            "identity_type",
            "identity.type",
            AttrKind::Enum(&["SystemAssigned", "UserAssigned", "SystemAssigned,UserAssigned"]),
            Presence::Optional,
            false,
        ),
        ("identity_principal_id", "identity.principalId", AttrKind::String, Presence::Computed, false),
        ("identity_tenant_id", "identity.tenantId", AttrKind::String, Presence::Computed, false),
    ],
    has_tags: true,
    format_id: format_data_factory_id,
    parse_id: parse_data_factory_id,
};

// =============================================================================
// Network Resources
// =============================================================================

pub const EXPRESS_ROUTE_PORT_CONFIG: ResourceConfig = ResourceConfig {
    resource_type: "express_route_port",
    arm_type: "Microsoft.Network/expressRoutePorts",
    api_version: "2023-06-01",
    attributes: &[
        ("peering_location", "properties.peeringLocation", AttrKind::String, Presence::Required, true),
        ("bandwidth_in_gbps", "properties.bandwidthInGbps", AttrKind::Int, Presence::Required, false),
        (
            "encapsulation",
            "properties.encapsulation",
            AttrKind::Enum(&["Dot1Q", "QinQ"]),
            Presence::Required,
            true,
        ),
        (
            "billing_type",
            "properties.billingType",
            AttrKind::Enum(&["MeteredData", "UnlimitedData"]),
            Presence::Optional,
            false,
        ),
        ("ethertype", "properties.etherType", AttrKind::String, Presence::Computed, false),
        ("mtu", "properties.mtu", AttrKind::String, Presence::Computed, false),
        ("guid", "properties.resourceGuid", AttrKind::String, Presence::Computed, false),
        ("allocation_date", "properties.allocationDate", AttrKind::String, Presence::Computed, false),
    ],
    has_tags: true,
    format_id: format_express_route_port_id,
    parse_id: parse_express_route_port_id,
};

const CONFIGS: &[&ResourceConfig] = &[&DATA_FACTORY_CONFIG, &EXPRESS_ROUTE_PORT_CONFIG];

/// The generic mapping of a resource type, if it has one
pub fn resource_config(resource_type: &str) -> Option<&'static ResourceConfig> {
    CONFIGS.iter().copied().find(|c| c.resource_type == resource_type)
}

fn attribute_type(kind: AttrKind) -> AttributeType {
    match kind {
        AttrKind::String => string_is_not_empty(),
        AttrKind::Int => int_at_least(0),
        AttrKind::Bool => AttributeType::Bool,
        AttrKind::StringList => AttributeType::List(Box::new(AttributeType::String)),
        AttrKind::Enum(values) => string_in_slice(values, false),
    }
}

/// Schema of a table-mapped resource: the common ARM attributes plus its mappings
pub fn config_schema(config: &ResourceConfig) -> ResourceSchema {
    let mut schema = ResourceSchema::new(config.resource_type)
        .with_description(config.arm_type)
        .attribute(AttributeSchema::new("id", AttributeType::String).read_only())
        .attribute(
            AttributeSchema::new("name", string_is_not_empty())
                .required()
                .force_new(),
        )
        .attribute(
            AttributeSchema::new("resource_group_name", string_is_not_empty())
                .required()
                .force_new(),
        )
        .attribute(
            AttributeSchema::new("location", string_is_not_empty())
                .required()
                .force_new(),
        );

    if config.has_tags {
        schema = schema.attribute(AttributeSchema::new(
            "tags",
            AttributeType::Map(Box::new(AttributeType::String)),
        ));
    }

    for &(name, _, kind, presence, force_new) in config.attributes {
        let mut attribute = AttributeSchema::new(name, attribute_type(kind));
        attribute = match presence {
            Presence::Required => attribute.required(),
            Presence::Optional => attribute,
            Presence::Computed => attribute.read_only(),
        };
        if force_new {
            attribute = attribute.force_new();
        }
        schema = schema.attribute(attribute);
    }
    schema
}

// =============================================================================
// Resource Type Definitions
// =============================================================================

macro_rules! define_resource_type {
    ($name:ident, $config:expr) => {
        pub struct $name;
        impl ResourceType for $name {
            fn name(&self) -> &'static str {
                $config.resource_type
            }
            fn schema(&self) -> ResourceSchema {
                config_schema(&$config)
            }
        }
    };
}

define_resource_type!(DataFactoryType, DATA_FACTORY_CONFIG);
define_resource_type!(ExpressRoutePortType, EXPRESS_ROUTE_PORT_CONFIG);

pub struct LinuxVirtualMachineScaleSetType {
    pub features: Features,
}

impl ResourceType for LinuxVirtualMachineScaleSetType {
    fn name(&self) -> &'static str {
        linux_virtual_machine_scale_set::RESOURCE_TYPE
    }

    fn schema(&self) -> ResourceSchema {
        linux_virtual_machine_scale_set::schema(self.features)
    }
}

/// Returns all resource types supported by this provider
pub fn resource_types(features: Features) -> Vec<Box<dyn ResourceType>> {
    vec![
        Box::new(DataFactoryType),
        Box::new(ExpressRoutePortType),
        Box::new(LinuxVirtualMachineScaleSetType { features }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_type_is_listed_once() {
        let mut names: Vec<&str> = resource_types(Features::default()).iter().map(|t| t.name()).collect();
        names.sort();
        assert_eq!(
            names,
            vec!["data_factory", "express_route_port", "linux_virtual_machine_scale_set"]
        );
    }

    #[test]
    fn config_lookup() {
        assert_eq!(
            resource_config("express_route_port").map(|c| c.arm_type),
            Some("Microsoft.Network/expressRoutePorts")
        );
        assert!(resource_config("linux_virtual_machine_scale_set").is_none());
    }

    #[test]
    fn config_schema_marks_presence() {
        let schema = config_schema(&EXPRESS_ROUTE_PORT_CONFIG);
        assert!(schema.attributes["peering_location"].required);
        assert!(schema.attributes["guid"].read_only);
        assert!(!schema.attributes["billing_type"].required);
        assert_eq!(
            schema.force_new_attributes(),
            vec!["encapsulation", "location", "name", "peering_location", "resource_group_name"]
        );
    }

    #[test]
    fn ids_round_trip_through_config() {
        let id = (DATA_FACTORY_CONFIG.format_id)("sub", "rg", "adf");
        assert_eq!(
            id,
            "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.DataFactory/factories/adf"
        );
        assert_eq!(
            (DATA_FACTORY_CONFIG.parse_id)(&id.to_lowercase()).unwrap(),
            ("rg".to_string(), "adf".to_string())
        );
        assert!((EXPRESS_ROUTE_PORT_CONFIG.parse_id)(&id).is_err());
    }
}
