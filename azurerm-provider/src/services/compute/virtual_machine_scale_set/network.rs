use azurerm_core::resource::{Attributes, AttributesExt, Value};
use azurerm_core::schema::{AttributeSchema, AttributeType, BlockSchema};
use azurerm_core::validation::{int_between, string_in_slice, string_is_not_empty};
use azurerm_sdk::services::compute::virtual_machine_scale_sets::{
    ApiEntityReference, IpVersion, SubResource, VirtualMachineScaleSetIpConfiguration,
    VirtualMachineScaleSetIpConfigurationProperties, VirtualMachineScaleSetIpTag,
    VirtualMachineScaleSetNetworkConfiguration, VirtualMachineScaleSetNetworkConfigurationDnsSettings,
    VirtualMachineScaleSetNetworkConfigurationProperties, VirtualMachineScaleSetPublicIpAddressConfiguration,
    VirtualMachineScaleSetPublicIpAddressConfigurationDnsSettings,
    VirtualMachineScaleSetPublicIpAddressConfigurationProperties, VirtualMachineScaleSetUpdateIpConfiguration,
    VirtualMachineScaleSetUpdateIpConfigurationProperties, VirtualMachineScaleSetUpdateNetworkConfiguration,
    VirtualMachineScaleSetUpdateNetworkConfigurationProperties,
    VirtualMachineScaleSetUpdatePublicIpAddressConfiguration,
    VirtualMachineScaleSetUpdatePublicIpAddressConfigurationProperties,
};

use super::{block, blocks, non_empty, sub_resource_ids, sub_resources};
use crate::error::{ExpandError, ExpandResult};
use crate::services::network::validate::{
    application_security_group_id, network_security_group_id, public_ip_prefix_id, subnet_id,
};

const IPV6_PRIMARY_UNSUPPORTED: &str = "an IPv6 Primary IP Configuration is unsupported - instead add a IPv4 IP Configuration as the Primary and make the IPv6 IP Configuration the secondary";

fn ip_version_type() -> AttributeType {
    string_in_slice(IpVersion::possible_values(), false)
}

fn string_set() -> AttributeType {
    AttributeType::Set(Box::new(AttributeType::String))
}

fn string_list() -> AttributeType {
    AttributeType::List(Box::new(AttributeType::String))
}

pub fn network_interface_schema() -> AttributeSchema {
    AttributeSchema::new(
        "network_interface",
        AttributeType::block_list(
            BlockSchema::new()
                .attribute(
                    AttributeSchema::new("name", string_is_not_empty())
                        .required()
                        .force_new(),
                )
                .attribute(ip_configuration_schema())
                .attribute(AttributeSchema::new(
                    "dns_servers",
                    AttributeType::List(Box::new(string_is_not_empty())),
                ))
                .attribute(AttributeSchema::new("enable_accelerated_networking", AttributeType::Bool).with_default(false))
                .attribute(AttributeSchema::new("enable_ip_forwarding", AttributeType::Bool).with_default(false))
                .attribute(AttributeSchema::new("network_security_group_id", network_security_group_id()))
                .attribute(AttributeSchema::new("primary", AttributeType::Bool).with_default(false)),
        ),
    )
    .required()
}

pub fn network_interface_schema_for_data_source() -> AttributeSchema {
    let ip_tag = BlockSchema::new()
        .attribute(AttributeSchema::new("tag", AttributeType::String))
        .attribute(AttributeSchema::new("type", AttributeType::String));

    let public_ip_address = BlockSchema::new()
        .attribute(AttributeSchema::new("name", AttributeType::String))
        .attribute(AttributeSchema::new("domain_name_label", AttributeType::String))
        .attribute(AttributeSchema::new("idle_timeout_in_minutes", AttributeType::Int))
        .attribute(AttributeSchema::new("ip_tag", AttributeType::block_list(ip_tag.all_read_only())))
        .attribute(AttributeSchema::new("public_ip_prefix_id", AttributeType::String))
        .attribute(AttributeSchema::new("version", AttributeType::String));

    let ip_configuration = BlockSchema::new()
        .attribute(AttributeSchema::new("name", AttributeType::String))
        .attribute(AttributeSchema::new("application_gateway_backend_address_pool_ids", string_list()))
        .attribute(AttributeSchema::new("application_security_group_ids", string_list()))
        .attribute(AttributeSchema::new("load_balancer_backend_address_pool_ids", string_list()))
        .attribute(AttributeSchema::new("load_balancer_inbound_nat_rules_ids", string_list()))
        .attribute(AttributeSchema::new("primary", AttributeType::Bool))
        .attribute(AttributeSchema::new(
            "public_ip_address",
            AttributeType::block_list(public_ip_address.all_read_only()),
        ))
        .attribute(AttributeSchema::new("subnet_id", AttributeType::String))
        .attribute(AttributeSchema::new("version", AttributeType::String));

    let network_interface = BlockSchema::new()
        .attribute(AttributeSchema::new("name", AttributeType::String))
        .attribute(AttributeSchema::new(
            "ip_configuration",
            AttributeType::block_list(ip_configuration.all_read_only()),
        ))
        .attribute(AttributeSchema::new("dns_servers", string_list()))
        .attribute(AttributeSchema::new("enable_accelerated_networking", AttributeType::Bool))
        .attribute(AttributeSchema::new("enable_ip_forwarding", AttributeType::Bool))
        .attribute(AttributeSchema::new("network_security_group_id", AttributeType::String))
        .attribute(AttributeSchema::new("primary", AttributeType::Bool));

    AttributeSchema::new("network_interface", AttributeType::block_list(network_interface.all_read_only())).read_only()
}

fn ip_configuration_schema() -> AttributeSchema {
    AttributeSchema::new(
        "ip_configuration",
        AttributeType::block_list(
            BlockSchema::new()
                .attribute(AttributeSchema::new("name", string_is_not_empty()).required())
                .attribute(AttributeSchema::new("application_gateway_backend_address_pool_ids", string_set()))
                .attribute(
                    AttributeSchema::new(
                        "application_security_group_ids",
                        AttributeType::Set(Box::new(application_security_group_id())),
                    )
                    .max_items(20),
                )
                .attribute(AttributeSchema::new("load_balancer_backend_address_pool_ids", string_set()))
                .attribute(AttributeSchema::new("load_balancer_inbound_nat_rules_ids", string_set()))
                .attribute(AttributeSchema::new("primary", AttributeType::Bool).with_default(false))
                .attribute(public_ip_address_schema())
                .attribute(AttributeSchema::new("subnet_id", subnet_id()))
                .attribute(AttributeSchema::new("version", ip_version_type()).with_default(IpVersion::IPv4.as_str())),
        ),
    )
    .required()
}

fn public_ip_address_schema() -> AttributeSchema {
    AttributeSchema::new(
        "public_ip_address",
        AttributeType::block_list(
            BlockSchema::new()
                .attribute(AttributeSchema::new("name", string_is_not_empty()).required())
                .attribute(AttributeSchema::new("domain_name_label", string_is_not_empty()))
                .attribute(AttributeSchema::new("idle_timeout_in_minutes", int_between(4, 32)).computed())
                .attribute(
                    AttributeSchema::new(
                        "ip_tag",
                        AttributeType::block_list(
                            BlockSchema::new()
                                .attribute(
                                    AttributeSchema::new("tag", string_is_not_empty())
                                        .required()
                                        .force_new(),
                                )
                                .attribute(
                                    AttributeSchema::new("type", string_is_not_empty())
                                        .required()
                                        .force_new(),
                                ),
                        ),
                    )
                    .force_new(),
                )
                .attribute(
                    AttributeSchema::new("version", ip_version_type())
                        .with_default(IpVersion::IPv4.as_str())
                        .force_new(),
                )
                // requires the AllowBringYourOwnPublicIpAddress feature on Microsoft.Network
                .attribute(AttributeSchema::new("public_ip_prefix_id", public_ip_prefix_id()).force_new()),
        ),
    )
}

/// IP version of a configuration block, IPv4 when unset
fn ip_version(raw: &Attributes) -> IpVersion {
    match raw.str_or_empty("version") {
        "" => IpVersion::IPv4,
        version => IpVersion::parse(version),
    }
}

fn check_primary_version(raw: &Attributes) -> ExpandResult<(bool, IpVersion)> {
    let primary = raw.bool_or("primary", false);
    let version = ip_version(raw);
    if primary && version == IpVersion::IPv6 {
        return Err(ExpandError::conflict(IPV6_PRIMARY_UNSUPPORTED));
    }
    Ok((primary, version))
}

fn optional_sub_resource(raw: &Attributes, key: &str) -> Option<SubResource> {
    non_empty(raw.str_or_empty(key)).map(SubResource::new)
}

fn dns_settings(raw: &Attributes) -> VirtualMachineScaleSetNetworkConfigurationDnsSettings {
    VirtualMachineScaleSetNetworkConfigurationDnsSettings {
        dns_servers: Some(raw.string_list("dns_servers")),
    }
}

fn public_ip_dns_settings(raw: &Attributes) -> Option<VirtualMachineScaleSetPublicIpAddressConfigurationDnsSettings> {
    non_empty(raw.str_or_empty("domain_name_label"))
        .map(|domain_name_label| VirtualMachineScaleSetPublicIpAddressConfigurationDnsSettings { domain_name_label })
}

fn idle_timeout(raw: &Attributes) -> Option<i64> {
    Some(raw.int_or("idle_timeout_in_minutes", 0)).filter(|t| *t > 0)
}

pub fn expand_network_interface(input: &[Value]) -> ExpandResult<Vec<VirtualMachineScaleSetNetworkConfiguration>> {
    blocks(input)
        .map(|raw| {
            let ip_configurations = raw
                .blocks("ip_configuration")
                .into_iter()
                .map(expand_ip_configuration)
                .collect::<ExpandResult<Vec<_>>>()?;

            Ok(VirtualMachineScaleSetNetworkConfiguration {
                name: raw.str_or_empty("name").to_string(),
                properties: Some(VirtualMachineScaleSetNetworkConfigurationProperties {
                    dns_settings: Some(dns_settings(raw)),
                    enable_accelerated_networking: Some(raw.bool_or("enable_accelerated_networking", false)),
                    enable_ip_forwarding: Some(raw.bool_or("enable_ip_forwarding", false)),
                    ip_configurations,
                    network_security_group: optional_sub_resource(raw, "network_security_group_id"),
                    primary: Some(raw.bool_or("primary", false)),
                }),
            })
        })
        .collect()
}

fn expand_ip_configuration(raw: &Attributes) -> ExpandResult<VirtualMachineScaleSetIpConfiguration> {
    let (primary, version) = check_primary_version(raw)?;

    Ok(VirtualMachineScaleSetIpConfiguration {
        name: raw.str_or_empty("name").to_string(),
        properties: Some(VirtualMachineScaleSetIpConfigurationProperties {
            application_gateway_backend_address_pools: Some(sub_resources(
                raw.string_list("application_gateway_backend_address_pool_ids"),
            )),
            application_security_groups: Some(sub_resources(raw.string_list("application_security_group_ids"))),
            load_balancer_backend_address_pools: Some(sub_resources(
                raw.string_list("load_balancer_backend_address_pool_ids"),
            )),
            load_balancer_inbound_nat_pools: Some(sub_resources(raw.string_list("load_balancer_inbound_nat_rules_ids"))),
            primary: Some(primary),
            private_ip_address_version: Some(version),
            public_ip_address_configuration: raw.first_block("public_ip_address").map(expand_public_ip_address),
            subnet: non_empty(raw.str_or_empty("subnet_id")).map(|id| ApiEntityReference { id: Some(id) }),
        }),
    })
}

fn expand_public_ip_address(raw: &Attributes) -> VirtualMachineScaleSetPublicIpAddressConfiguration {
    let ip_tags = raw
        .blocks("ip_tag")
        .into_iter()
        .map(|tag| VirtualMachineScaleSetIpTag {
            tag: Some(tag.str_or_empty("tag").to_string()),
            ip_tag_type: Some(tag.str_or_empty("type").to_string()),
        })
        .collect();

    VirtualMachineScaleSetPublicIpAddressConfiguration {
        name: raw.str_or_empty("name").to_string(),
        properties: Some(VirtualMachineScaleSetPublicIpAddressConfigurationProperties {
            dns_settings: public_ip_dns_settings(raw),
            idle_timeout_in_minutes: idle_timeout(raw),
            ip_tags: Some(ip_tags),
            public_ip_address_version: Some(ip_version(raw)),
            public_ip_prefix: optional_sub_resource(raw, "public_ip_prefix_id"),
        }),
    }
}

pub fn expand_network_interface_update(
    input: &[Value],
) -> ExpandResult<Vec<VirtualMachineScaleSetUpdateNetworkConfiguration>> {
    blocks(input)
        .map(|raw| {
            let ip_configurations = raw
                .blocks("ip_configuration")
                .into_iter()
                .map(expand_ip_configuration_update)
                .collect::<ExpandResult<Vec<_>>>()?;

            Ok(VirtualMachineScaleSetUpdateNetworkConfiguration {
                name: Some(raw.str_or_empty("name").to_string()),
                properties: Some(VirtualMachineScaleSetUpdateNetworkConfigurationProperties {
                    dns_settings: Some(dns_settings(raw)),
                    enable_accelerated_networking: Some(raw.bool_or("enable_accelerated_networking", false)),
                    enable_ip_forwarding: Some(raw.bool_or("enable_ip_forwarding", false)),
                    ip_configurations: Some(ip_configurations),
                    network_security_group: optional_sub_resource(raw, "network_security_group_id"),
                    primary: Some(raw.bool_or("primary", false)),
                }),
            })
        })
        .collect()
}

fn expand_ip_configuration_update(raw: &Attributes) -> ExpandResult<VirtualMachineScaleSetUpdateIpConfiguration> {
    let (primary, version) = check_primary_version(raw)?;

    Ok(VirtualMachineScaleSetUpdateIpConfiguration {
        name: Some(raw.str_or_empty("name").to_string()),
        properties: Some(VirtualMachineScaleSetUpdateIpConfigurationProperties {
            application_gateway_backend_address_pools: Some(sub_resources(
                raw.string_list("application_gateway_backend_address_pool_ids"),
            )),
            application_security_groups: Some(sub_resources(raw.string_list("application_security_group_ids"))),
            load_balancer_backend_address_pools: Some(sub_resources(
                raw.string_list("load_balancer_backend_address_pool_ids"),
            )),
            load_balancer_inbound_nat_pools: Some(sub_resources(raw.string_list("load_balancer_inbound_nat_rules_ids"))),
            primary: Some(primary),
            private_ip_address_version: Some(version),
            public_ip_address_configuration: raw
                .first_block("public_ip_address")
                .map(expand_public_ip_address_update),
            subnet: non_empty(raw.str_or_empty("subnet_id")).map(|id| ApiEntityReference { id: Some(id) }),
        }),
    })
}

// ip tags, version and prefix are immutable so the update shape omits them
fn expand_public_ip_address_update(raw: &Attributes) -> VirtualMachineScaleSetUpdatePublicIpAddressConfiguration {
    VirtualMachineScaleSetUpdatePublicIpAddressConfiguration {
        name: Some(raw.str_or_empty("name").to_string()),
        properties: Some(VirtualMachineScaleSetUpdatePublicIpAddressConfigurationProperties {
            dns_settings: public_ip_dns_settings(raw),
            idle_timeout_in_minutes: idle_timeout(raw),
        }),
    }
}

pub fn flatten_network_interface(input: Option<&Vec<VirtualMachineScaleSetNetworkConfiguration>>) -> Vec<Value> {
    input
        .into_iter()
        .flatten()
        .filter_map(|nic| {
            let props = nic.properties.as_ref()?;
            let dns_servers = props
                .dns_settings
                .as_ref()
                .and_then(|d| d.dns_servers.clone())
                .unwrap_or_default();

            Some(block([
                ("name", Value::string(&nic.name)),
                ("dns_servers", Value::strings(dns_servers)),
                (
                    "enable_accelerated_networking",
                    Value::Bool(props.enable_accelerated_networking.unwrap_or(false)),
                ),
                ("enable_ip_forwarding", Value::Bool(props.enable_ip_forwarding.unwrap_or(false))),
                (
                    "ip_configuration",
                    Value::List(props.ip_configurations.iter().map(flatten_ip_configuration).collect()),
                ),
                (
                    "network_security_group_id",
                    Value::string(
                        props
                            .network_security_group
                            .as_ref()
                            .and_then(|n| n.id.clone())
                            .unwrap_or_default(),
                    ),
                ),
                ("primary", Value::Bool(props.primary.unwrap_or(false))),
            ]))
        })
        .collect()
}

fn flatten_ip_configuration(input: &VirtualMachineScaleSetIpConfiguration) -> Value {
    let Some(props) = &input.properties else {
        return Value::Map(Attributes::new());
    };

    let public_ip_address: Vec<Value> = props
        .public_ip_address_configuration
        .iter()
        .map(flatten_public_ip_address)
        .collect();

    block([
        ("name", Value::string(&input.name)),
        ("primary", Value::Bool(props.primary.unwrap_or(false))),
        ("public_ip_address", Value::List(public_ip_address)),
        (
            "subnet_id",
            Value::string(props.subnet.as_ref().and_then(|s| s.id.clone()).unwrap_or_default()),
        ),
        (
            "version",
            Value::string(
                props
                    .private_ip_address_version
                    .as_ref()
                    .map(|v| v.as_str())
                    .unwrap_or_default(),
            ),
        ),
        (
            "application_gateway_backend_address_pool_ids",
            sub_resource_ids(props.application_gateway_backend_address_pools.as_ref()),
        ),
        (
            "application_security_group_ids",
            sub_resource_ids(props.application_security_groups.as_ref()),
        ),
        (
            "load_balancer_backend_address_pool_ids",
            sub_resource_ids(props.load_balancer_backend_address_pools.as_ref()),
        ),
        (
            "load_balancer_inbound_nat_rules_ids",
            sub_resource_ids(props.load_balancer_inbound_nat_pools.as_ref()),
        ),
    ])
}

fn flatten_public_ip_address(input: &VirtualMachineScaleSetPublicIpAddressConfiguration) -> Value {
    let Some(props) = &input.properties else {
        return Value::Map(Attributes::new());
    };

    let ip_tags = props
        .ip_tags
        .iter()
        .flatten()
        .map(|tag| {
            block([
                ("tag", Value::string(tag.tag.clone().unwrap_or_default())),
                ("type", Value::string(tag.ip_tag_type.clone().unwrap_or_default())),
            ])
        })
        .collect();

    block([
        ("name", Value::string(&input.name)),
        (
            "domain_name_label",
            Value::string(
                props
                    .dns_settings
                    .as_ref()
                    .map(|d| d.domain_name_label.clone())
                    .unwrap_or_default(),
            ),
        ),
        ("idle_timeout_in_minutes", Value::Int(props.idle_timeout_in_minutes.unwrap_or(0))),
        ("ip_tag", Value::List(ip_tags)),
        (
            "public_ip_prefix_id",
            Value::string(
                props
                    .public_ip_prefix
                    .as_ref()
                    .and_then(|p| p.id.clone())
                    .unwrap_or_default(),
            ),
        ),
        (
            "version",
            Value::string(
                props
                    .public_ip_address_version
                    .as_ref()
                    .map(|v| v.as_str())
                    .unwrap_or_default(),
            ),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUBNET: &str =
        "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Network/virtualNetworks/vnet/subnets/internal";
    const NSG: &str = "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Network/networkSecurityGroups/nsg";

    fn ip_configuration(primary: bool, version: &str) -> Value {
        block([
            ("name", Value::string("internal")),
            ("primary", Value::Bool(primary)),
            ("version", Value::string(version)),
            ("subnet_id", Value::string(SUBNET)),
            ("load_balancer_backend_address_pool_ids", Value::strings(["/pool/a", "/pool/b"])),
            (
                "public_ip_address",
                Value::List(vec![block([
                    ("name", Value::string("pip")),
                    ("domain_name_label", Value::string("example")),
                    ("idle_timeout_in_minutes", Value::Int(0)),
                    (
                        "ip_tag",
                        Value::List(vec![block([
                            ("tag", Value::string("/Sql")),
                            ("type", Value::string("FirstPartyUsage")),
                        ])]),
                    ),
                ])]),
            ),
        ])
    }

    fn network_interface(ip: Value) -> Vec<Value> {
        vec![block([
            ("name", Value::string("nic")),
            ("primary", Value::Bool(true)),
            ("dns_servers", Value::strings(["10.0.0.4"])),
            ("network_security_group_id", Value::string(NSG)),
            ("ip_configuration", Value::List(vec![ip])),
        ])]
    }

    #[test]
    fn expands_network_interface() {
        let nics = expand_network_interface(&network_interface(ip_configuration(true, "IPv4"))).unwrap();
        assert_eq!(nics.len(), 1);
        let props = nics[0].properties.as_ref().unwrap();
        assert_eq!(props.network_security_group, Some(SubResource::new(NSG)));
        assert_eq!(props.enable_ip_forwarding, Some(false));
        assert_eq!(
            props.dns_settings.as_ref().unwrap().dns_servers,
            Some(vec!["10.0.0.4".to_string()])
        );

        let ip = props.ip_configurations[0].properties.as_ref().unwrap();
        assert_eq!(ip.subnet.as_ref().unwrap().id.as_deref(), Some(SUBNET));
        assert_eq!(ip.load_balancer_backend_address_pools.as_ref().unwrap().len(), 2);
        assert_eq!(ip.application_security_groups, Some(Vec::new()));

        let pip = ip.public_ip_address_configuration.as_ref().unwrap().properties.as_ref().unwrap();
        assert_eq!(pip.dns_settings.as_ref().unwrap().domain_name_label, "example");
        assert_eq!(pip.idle_timeout_in_minutes, None);
        assert_eq!(pip.ip_tags.as_ref().unwrap()[0].ip_tag_type.as_deref(), Some("FirstPartyUsage"));
        assert_eq!(pip.public_ip_address_version, Some(IpVersion::IPv4));
    }

    #[test]
    fn rejects_ipv6_primary() {
        let input = network_interface(ip_configuration(true, "IPv6"));
        let err = expand_network_interface(&input).unwrap_err();
        assert_eq!(err.to_string(), IPV6_PRIMARY_UNSUPPORTED);
        assert!(expand_network_interface_update(&input).is_err());

        let secondary = network_interface(ip_configuration(false, "IPv6"));
        assert!(expand_network_interface(&secondary).is_ok());
    }

    #[test]
    fn update_omits_immutable_public_ip_fields() {
        let nics = expand_network_interface_update(&network_interface(ip_configuration(true, "IPv4"))).unwrap();
        let ip = &nics[0].properties.as_ref().unwrap().ip_configurations.as_ref().unwrap()[0];
        let pip = ip.properties.as_ref().unwrap().public_ip_address_configuration.as_ref().unwrap();
        assert_eq!(pip.name.as_deref(), Some("pip"));
        let json = serde_json::to_value(pip).unwrap();
        assert!(json["properties"].get("ipTags").is_none());
        assert_eq!(json["properties"]["dnsSettings"]["domainNameLabel"], "example");
    }

    #[test]
    fn flatten_restores_configuration() {
        let input = network_interface(ip_configuration(true, "IPv4"));
        let nics = expand_network_interface(&input).unwrap();
        let flattened = flatten_network_interface(Some(&nics));

        let nic = flattened[0].as_map().unwrap();
        assert_eq!(nic.str_or_empty("network_security_group_id"), NSG);
        assert_eq!(nic.string_list("dns_servers"), vec!["10.0.0.4"]);

        let ip = nic.first_block("ip_configuration").unwrap();
        assert_eq!(ip.str_or_empty("subnet_id"), SUBNET);
        assert_eq!(ip.str_or_empty("version"), "IPv4");
        assert_eq!(ip.string_list("load_balancer_backend_address_pool_ids"), vec!["/pool/a", "/pool/b"]);

        let pip = ip.first_block("public_ip_address").unwrap();
        assert_eq!(pip.str_or_empty("domain_name_label"), "example");
        assert_eq!(pip.int_or("idle_timeout_in_minutes", -1), 0);
        assert_eq!(pip.first_block("ip_tag").unwrap().str_or_empty("tag"), "/Sql");
    }

    #[test]
    fn flatten_skips_interfaces_without_properties() {
        let nics = vec![VirtualMachineScaleSetNetworkConfiguration {
            name: "empty".to_string(),
            properties: None,
        }];
        assert!(flatten_network_interface(Some(&nics)).is_empty());
        assert!(flatten_network_interface(None).is_empty());
    }

    #[test]
    fn data_source_schema_is_computed() {
        let schema = network_interface_schema_for_data_source();
        assert!(schema.read_only);
        assert!(!network_interface_schema().read_only);

        let AttributeType::List(inner) = &schema.attr_type else {
            panic!("expected a block list");
        };
        let AttributeType::Block(block) = inner.as_ref() else {
            panic!("expected a block");
        };
        assert!(block.attributes.values().all(|a| a.read_only && !a.required));

        let AttributeType::List(ip_inner) = &block.attributes["ip_configuration"].attr_type else {
            panic!("expected a block list");
        };
        let AttributeType::Block(ip_block) = ip_inner.as_ref() else {
            panic!("expected a block");
        };
        assert!(ip_block.attributes["subnet_id"].read_only);
        assert!(ip_block.attributes["public_ip_address"].read_only);
    }
}
