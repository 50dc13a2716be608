//! `azurerm_linux_virtual_machine_scale_set`
//!
//! The resource schema plus the conversions between its attributes and the
//! `Microsoft.Compute/virtualMachineScaleSets` models. Cross-field rules the
//! schema cannot express are checked while expanding.

use std::collections::HashMap;

use azurerm_core::features::Features;
use azurerm_core::resource::{Attributes, AttributesExt, Value};
use azurerm_core::schema::{AttributeSchema, AttributeType, BlockSchema, ResourceSchema};
use azurerm_core::validation::{
    int_at_least, iso8601_duration_between, string_custom, string_in_slice, string_is_base64, string_is_not_empty,
};
use azurerm_resourceids::ResourceId;
use azurerm_sdk::services::compute::virtual_machine_scale_sets::{
    ApiEntityReference, ApplicationProfile, AutomaticRepairsPolicy, BillingProfile, ImageReference, LinuxConfiguration,
    OperatingSystemTypes, ScaleInPolicy, ScheduledEventsProfile, Sku, SpotRestorePolicy, SshConfiguration,
    SshPublicKey, SubResource, UpgradeMode, UpgradePolicy, VirtualMachineEvictionPolicyTypes,
    VirtualMachinePriorityTypes, VirtualMachineScaleSet, VirtualMachineScaleSetExtensionProfile,
    VirtualMachineScaleSetId, VirtualMachineScaleSetNetworkProfile, VirtualMachineScaleSetOsProfile,
    VirtualMachineScaleSetProperties, VirtualMachineScaleSetScaleInRules, VirtualMachineScaleSetStorageProfile,
    VirtualMachineScaleSetUpdate, VirtualMachineScaleSetUpdateNetworkProfile, VirtualMachineScaleSetUpdateProperties,
    VirtualMachineScaleSetUpdateStorageProfile, VirtualMachineScaleSetUpdateVmProfile, VirtualMachineScaleSetVmProfile,
};

use super::validate::linux_admin_password;
use super::virtual_machine_scale_set::{self as vmss, block, blocks, first_block, non_empty};
use crate::error::{ExpandError, ExpandResult};

pub const RESOURCE_TYPE: &str = "linux_virtual_machine_scale_set";

const DEFAULT_EXTENSIONS_TIME_BUDGET: &str = "PT1H30M";
const DEFAULT_MAX_BID_PRICE: f64 = -1.0;
const SKU_TIER: &str = "Standard";

pub fn schema(features: Features) -> ResourceSchema {
    let mut schema = ResourceSchema::new(RESOURCE_TYPE)
        .with_description("Linux Virtual Machine Scale Set")
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
        )
        .attribute(AttributeSchema::new("sku", string_is_not_empty()).required())
        .attribute(AttributeSchema::new("instances", int_at_least(0)).required())
        .attribute(
            AttributeSchema::new("admin_username", string_is_not_empty())
                .required()
                .force_new(),
        )
        .attribute(
            AttributeSchema::new("admin_password", linux_admin_password())
                .sensitive()
                .force_new(),
        )
        .attribute(admin_ssh_key_schema())
        .attribute(
            AttributeSchema::new("disable_password_authentication", AttributeType::Bool)
                .with_default(true)
                .force_new(),
        )
        .attribute(
            AttributeSchema::new("computer_name_prefix", string_is_not_empty())
                .computed()
                .force_new(),
        )
        .attribute(AttributeSchema::new("custom_data", string_is_base64()).sensitive())
        .attribute(AttributeSchema::new("user_data", string_is_base64()))
        .attribute(
            AttributeSchema::new("provision_vm_agent", AttributeType::Bool)
                .with_default(true)
                .force_new(),
        )
        .attribute(
            AttributeSchema::new("source_image_id", string_is_not_empty()).conflicts_with(&["source_image_reference"]),
        )
        .attribute(source_image_reference_schema())
        .attribute(vmss::os_disk_schema())
        .attribute(vmss::data_disk_schema())
        .attribute(vmss::network_interface_schema())
        .attribute(AttributeSchema::new("health_probe_id", string_is_not_empty()))
        .attribute(
            AttributeSchema::new("upgrade_mode", string_in_slice(UpgradeMode::possible_values(), false))
                .with_default(UpgradeMode::Manual.as_str())
                .force_new(),
        )
        .attribute(vmss::automatic_os_upgrade_policy_schema())
        .attribute(vmss::rolling_upgrade_policy_schema())
        .attribute(vmss::automatic_repairs_policy_schema())
        .attribute(vmss::extensions_schema())
        .attribute(
            AttributeSchema::new("extensions_time_budget", iso8601_duration_between("PT15M", "PT2H"))
                .with_default(DEFAULT_EXTENSIONS_TIME_BUDGET),
        )
        .attribute(vmss::additional_capabilities_schema())
        .attribute(vmss::gallery_application_schema(features))
        .attribute(vmss::scale_in_policy_schema(features))
        .attribute(vmss::spot_restore_policy_schema())
        .attribute(vmss::termination_notification_schema(features))
        .attribute(
            AttributeSchema::new(
                "priority",
                string_in_slice(
                    &[
                        VirtualMachinePriorityTypes::Regular.as_str(),
                        VirtualMachinePriorityTypes::Spot.as_str(),
                    ],
                    false,
                ),
            )
            .with_default(VirtualMachinePriorityTypes::Regular.as_str())
            .force_new(),
        )
        .attribute(
            AttributeSchema::new(
                "eviction_policy",
                string_in_slice(VirtualMachineEvictionPolicyTypes::possible_values(), false),
            )
            .force_new(),
        )
        .attribute(AttributeSchema::new("max_bid_price", max_bid_price()).with_default("-1"))
        .attribute(AttributeSchema::new("overprovision", AttributeType::Bool).with_default(true))
        .attribute(AttributeSchema::new("single_placement_group", AttributeType::Bool).with_default(true))
        .attribute(
            AttributeSchema::new("do_not_run_extensions_on_overprovisioned_machines", AttributeType::Bool)
                .with_default(false),
        )
        .attribute(
            AttributeSchema::new("platform_fault_domain_count", int_at_least(1))
                .computed()
                .force_new(),
        )
        .attribute(AttributeSchema::new("proximity_placement_group_id", string_is_not_empty()).force_new())
        .attribute(AttributeSchema::new("zones", AttributeType::Set(Box::new(AttributeType::String))).force_new())
        .attribute(
            AttributeSchema::new("zone_balance", AttributeType::Bool)
                .with_default(false)
                .force_new(),
        )
        .attribute(AttributeSchema::new(
            "tags",
            AttributeType::Map(Box::new(AttributeType::String)),
        ))
        .attribute(AttributeSchema::new("unique_id", AttributeType::String).read_only());

    if !features.four_point_oh_beta {
        schema = schema
            .attribute(vmss::gallery_applications_schema(features))
            .attribute(vmss::terminate_notification_schema())
            .attribute(
                AttributeSchema::new(
                    "scale_in_policy",
                    string_in_slice(VirtualMachineScaleSetScaleInRules::possible_values(), false),
                )
                .computed()
                .deprecated("`scale_in_policy` will be removed in favour of the `scale_in` code block in version 4.0 of the AzureRM Provider.")
                .conflicts_with(&["scale_in"]),
            );
    }
    schema
}

fn admin_ssh_key_schema() -> AttributeSchema {
    AttributeSchema::new(
        "admin_ssh_key",
        AttributeType::block_set(
            BlockSchema::new()
                .attribute(
                    AttributeSchema::new("public_key", string_is_not_empty())
                        .required()
                        .force_new(),
                )
                .attribute(
                    AttributeSchema::new("username", string_is_not_empty())
                        .required()
                        .force_new(),
                ),
        ),
    )
}

fn source_image_reference_schema() -> AttributeSchema {
    AttributeSchema::new(
        "source_image_reference",
        AttributeType::block_list(
            BlockSchema::new()
                .attribute(AttributeSchema::new("publisher", string_is_not_empty()).required())
                .attribute(AttributeSchema::new("offer", string_is_not_empty()).required())
                .attribute(AttributeSchema::new("sku", string_is_not_empty()).required())
                .attribute(AttributeSchema::new("version", string_is_not_empty()).required()),
        ),
    )
    .max_items(1)
    .conflicts_with(&["source_image_id"])
}

/// Decimal price in US dollars, or `-1` to pay up to the on-demand price
fn max_bid_price() -> AttributeType {
    string_custom("MaxBidPrice", |s| match s.parse::<f64>() {
        Ok(price) if price == DEFAULT_MAX_BID_PRICE || price > 0.0 => Ok(()),
        Ok(_) => Err(format!("expected value to be -1 or greater than 0, got {}", s)),
        Err(_) => Err(format!("expected value to be a number, got {}", s)),
    })
}

/// ID of the scale set described by `attrs`
pub fn resource_id(subscription_id: &str, attrs: &Attributes) -> VirtualMachineScaleSetId {
    VirtualMachineScaleSetId::new(
        subscription_id,
        attrs.str_or_empty("resource_group_name"),
        attrs.str_or_empty("name"),
    )
}

/// Build the create request for a scale set
pub fn expand(attrs: &Attributes) -> ExpandResult<VirtualMachineScaleSet> {
    let zones = attrs.string_list("zones");
    if attrs.bool_or("zone_balance", false) && zones.is_empty() {
        return Err(ExpandError::conflict(
            "`zone_balance` can only be set to `true` when availability zones are specified",
        ));
    }

    let additional_capabilities = vmss::expand_additional_capabilities(attrs.list("additional_capabilities"));
    let ultra_ssd_enabled = additional_capabilities.ultra_ssd_enabled.unwrap_or(false);

    let health_probe_id = non_empty(attrs.str_or_empty("health_probe_id"));
    let (extension_profile, has_health_extension) = expand_extension_profile(attrs)?;
    let has_health_check = health_probe_id.is_some() || has_health_extension;

    let upgrade_policy = expand_upgrade_policy(attrs, !zones.is_empty(), has_health_check)?;
    let automatic_repairs_policy = expand_automatic_repairs_policy(attrs, has_health_check)?;
    let spot = expand_spot_settings(attrs)?;

    let os_disk = vmss::expand_os_disk(attrs.list("os_disk"), OperatingSystemTypes::Linux)?;
    let data_disks = vmss::expand_data_disk(attrs.list("data_disk"), ultra_ssd_enabled)?;
    let network_interfaces = vmss::expand_network_interface(attrs.list("network_interface"))?;

    let virtual_machine_profile = VirtualMachineScaleSetVmProfile {
        application_profile: Some(expand_application_profile(attrs)),
        billing_profile: spot.billing_profile,
        eviction_policy: spot.eviction_policy,
        extension_profile: Some(extension_profile),
        network_profile: Some(VirtualMachineScaleSetNetworkProfile {
            health_probe: health_probe_id.map(|id| ApiEntityReference { id: Some(id) }),
            network_interface_configurations: Some(network_interfaces),
        }),
        os_profile: Some(expand_os_profile(attrs)?),
        priority: Some(spot.priority),
        scheduled_events_profile: expand_scheduled_events_profile(attrs),
        storage_profile: Some(VirtualMachineScaleSetStorageProfile {
            data_disks: Some(data_disks),
            image_reference: Some(expand_image_reference(attrs)?),
            os_disk: Some(os_disk),
        }),
        user_data: non_empty(attrs.str_or_empty("user_data")),
    };

    Ok(VirtualMachineScaleSet {
        name: Some(attrs.str_or_empty("name").to_string()),
        location: attrs.str_or_empty("location").to_string(),
        tags: expand_tags(attrs),
        sku: Some(expand_sku(attrs)),
        zones: (!zones.is_empty()).then_some(zones),
        properties: Some(VirtualMachineScaleSetProperties {
            additional_capabilities: Some(additional_capabilities),
            automatic_repairs_policy,
            do_not_run_extensions_on_overprovisioned_vms: Some(
                attrs.bool_or("do_not_run_extensions_on_overprovisioned_machines", false),
            ),
            overprovision: Some(attrs.bool_or("overprovision", true)),
            platform_fault_domain_count: Some(attrs.int_or("platform_fault_domain_count", 0)).filter(|c| *c > 0),
            proximity_placement_group: non_empty(attrs.str_or_empty("proximity_placement_group_id"))
                .map(SubResource::new),
            scale_in_policy: expand_scale_in(attrs),
            single_placement_group: Some(attrs.bool_or("single_placement_group", true)),
            spot_restore_policy: spot.restore_policy,
            upgrade_policy: Some(upgrade_policy),
            virtual_machine_profile: Some(virtual_machine_profile),
            zone_balance: Some(attrs.bool_or("zone_balance", false)),
            ..Default::default()
        }),
        ..Default::default()
    })
}

/// Build the PATCH request applying in-place changes
///
/// Properties the service only accepts at creation are left out.
pub fn expand_update(attrs: &Attributes) -> ExpandResult<VirtualMachineScaleSetUpdate> {
    let zones = attrs.string_list("zones");
    let additional_capabilities = vmss::expand_additional_capabilities(attrs.list("additional_capabilities"));
    let ultra_ssd_enabled = additional_capabilities.ultra_ssd_enabled.unwrap_or(false);

    let (extension_profile, has_health_extension) = expand_extension_profile(attrs)?;
    let has_health_check = !attrs.str_or_empty("health_probe_id").is_empty() || has_health_extension;

    let upgrade_policy = expand_upgrade_policy(attrs, !zones.is_empty(), has_health_check)?;
    let automatic_repairs_policy = expand_automatic_repairs_policy(attrs, has_health_check)?;

    let virtual_machine_profile = VirtualMachineScaleSetUpdateVmProfile {
        extension_profile: Some(extension_profile),
        network_profile: Some(VirtualMachineScaleSetUpdateNetworkProfile {
            network_interface_configurations: Some(vmss::expand_network_interface_update(
                attrs.list("network_interface"),
            )?),
        }),
        scheduled_events_profile: expand_scheduled_events_profile(attrs),
        storage_profile: Some(VirtualMachineScaleSetUpdateStorageProfile {
            data_disks: Some(vmss::expand_data_disk(attrs.list("data_disk"), ultra_ssd_enabled)?),
            image_reference: Some(expand_image_reference(attrs)?),
            os_disk: vmss::expand_os_disk_update(attrs.list("os_disk")),
        }),
        user_data: non_empty(attrs.str_or_empty("user_data")),
    };

    Ok(VirtualMachineScaleSetUpdate {
        sku: Some(expand_sku(attrs)),
        tags: expand_tags(attrs),
        properties: Some(VirtualMachineScaleSetUpdateProperties {
            additional_capabilities: Some(additional_capabilities),
            automatic_repairs_policy,
            overprovision: Some(attrs.bool_or("overprovision", true)),
            scale_in_policy: expand_scale_in(attrs),
            single_placement_group: Some(attrs.bool_or("single_placement_group", true)),
            upgrade_policy: Some(upgrade_policy),
            virtual_machine_profile: Some(virtual_machine_profile),
        }),
    })
}

fn expand_sku(attrs: &Attributes) -> Sku {
    Sku {
        name: Some(attrs.str_or_empty("sku").to_string()),
        tier: Some(SKU_TIER.to_string()),
        capacity: Some(attrs.int_or("instances", 0)),
    }
}

fn expand_tags(attrs: &Attributes) -> Option<HashMap<String, String>> {
    let tags = attrs.get("tags").and_then(Value::as_map)?;
    Some(
        tags.iter()
            .filter_map(|(k, v)| v.as_str().map(|v| (k.clone(), v.to_string())))
            .collect(),
    )
}

fn expand_os_profile(attrs: &Attributes) -> ExpandResult<VirtualMachineScaleSetOsProfile> {
    let admin_username = attrs.str_or_empty("admin_username");
    let admin_password = non_empty(attrs.str_or_empty("admin_password"));
    let disable_password_authentication = attrs.bool_or("disable_password_authentication", true);
    let public_keys = expand_ssh_keys(attrs.list("admin_ssh_key"), admin_username)?;

    if !disable_password_authentication && admin_password.is_none() {
        return Err(ExpandError::conflict(
            "an `admin_password` must be specified if `disable_password_authentication` is set to `false`",
        ));
    }
    if disable_password_authentication && public_keys.is_empty() {
        return Err(ExpandError::conflict(
            "at least one `admin_ssh_key` must be specified when `disable_password_authentication` is set to `true`",
        ));
    }

    let computer_name_prefix = match attrs.str_or_empty("computer_name_prefix") {
        "" => attrs.str_or_empty("name"),
        prefix => prefix,
    };

    Ok(VirtualMachineScaleSetOsProfile {
        admin_password,
        admin_username: Some(admin_username.to_string()),
        computer_name_prefix: Some(computer_name_prefix.to_string()),
        custom_data: non_empty(attrs.str_or_empty("custom_data")),
        linux_configuration: Some(LinuxConfiguration {
            disable_password_authentication: Some(disable_password_authentication),
            provision_vm_agent: Some(attrs.bool_or("provision_vm_agent", true)),
            ssh: Some(SshConfiguration {
                public_keys: Some(public_keys),
            }),
        }),
    })
}

fn ssh_key_path(username: &str) -> String {
    format!("/home/{}/.ssh/authorized_keys", username)
}

// Keys can only be placed in the admin user's authorized_keys
fn expand_ssh_keys(input: &[Value], admin_username: &str) -> ExpandResult<Vec<SshPublicKey>> {
    blocks(input)
        .map(|raw| {
            let username = raw.str_or_empty("username");
            if username != admin_username {
                return Err(ExpandError::conflict(format!(
                    "the `username` of an `admin_ssh_key` must match `admin_username` ({:?}), got {:?}",
                    admin_username, username
                )));
            }
            Ok(SshPublicKey {
                key_data: Some(raw.str_or_empty("public_key").to_string()),
                path: Some(ssh_key_path(username)),
            })
        })
        .collect()
}

fn expand_image_reference(attrs: &Attributes) -> ExpandResult<ImageReference> {
    if let Some(id) = non_empty(attrs.str_or_empty("source_image_id")) {
        return Ok(ImageReference {
            id: Some(id),
            ..Default::default()
        });
    }

    let raw = first_block(attrs.list("source_image_reference")).ok_or_else(|| {
        ExpandError::conflict("one of either `source_image_id` or `source_image_reference` must be specified")
    })?;
    Ok(ImageReference {
        id: None,
        offer: Some(raw.str_or_empty("offer").to_string()),
        publisher: Some(raw.str_or_empty("publisher").to_string()),
        sku: Some(raw.str_or_empty("sku").to_string()),
        version: Some(raw.str_or_empty("version").to_string()),
    })
}

fn expand_extension_profile(attrs: &Attributes) -> ExpandResult<(VirtualMachineScaleSetExtensionProfile, bool)> {
    let expanded = vmss::expand_extensions(attrs.list("extension"))?;
    let mut profile = expanded.profile;
    profile.extensions_time_budget = Some(
        non_empty(attrs.str_or_empty("extensions_time_budget"))
            .unwrap_or_else(|| DEFAULT_EXTENSIONS_TIME_BUDGET.to_string()),
    );
    Ok((profile, expanded.has_health_extension))
}

fn expand_upgrade_policy(attrs: &Attributes, is_zonal: bool, has_health_check: bool) -> ExpandResult<UpgradePolicy> {
    let mode = match attrs.str_or_empty("upgrade_mode") {
        "" => UpgradeMode::Manual,
        mode => UpgradeMode::parse(mode),
    };
    let automatic_os_upgrade_policy =
        vmss::expand_automatic_os_upgrade_policy(attrs.list("automatic_os_upgrade_policy"));
    let rolling_upgrade_policy = vmss::expand_rolling_upgrade_policy(attrs.list("rolling_upgrade_policy"), is_zonal)?;

    if mode != UpgradeMode::Automatic && automatic_os_upgrade_policy.is_some() {
        return Err(ExpandError::conflict(
            "an `automatic_os_upgrade_policy` block cannot be specified when `upgrade_mode` is not set to `Automatic`",
        ));
    }

    let rolls = matches!(mode, UpgradeMode::Automatic | UpgradeMode::Rolling);
    if !rolls && rolling_upgrade_policy.is_some() {
        return Err(ExpandError::conflict(format!(
            "a `rolling_upgrade_policy` block cannot be specified when `upgrade_mode` is set to {:?}",
            mode.as_str()
        )));
    }
    if mode == UpgradeMode::Rolling && rolling_upgrade_policy.is_none() {
        return Err(ExpandError::conflict(
            "a `rolling_upgrade_policy` block must be specified when `upgrade_mode` is set to \"Rolling\"",
        ));
    }
    if rolls && !has_health_check {
        return Err(ExpandError::conflict(format!(
            "`health_probe_id` must be set or a health extension must be specified when `upgrade_mode` is set to {:?}",
            mode.as_str()
        )));
    }

    Ok(UpgradePolicy {
        automatic_os_upgrade_policy,
        mode: Some(mode),
        rolling_upgrade_policy,
    })
}

fn expand_automatic_repairs_policy(
    attrs: &Attributes,
    has_health_check: bool,
) -> ExpandResult<Option<AutomaticRepairsPolicy>> {
    let policy = vmss::expand_automatic_repairs_policy(attrs.list("automatic_instance_repair"));
    if policy.as_ref().and_then(|p| p.enabled).unwrap_or(false) && !has_health_check {
        return Err(ExpandError::conflict(
            "`automatic_instance_repair` can only be set if there is an application Health extension or a `health_probe_id` defined",
        ));
    }
    Ok(policy)
}

struct SpotSettings {
    priority: VirtualMachinePriorityTypes,
    eviction_policy: Option<VirtualMachineEvictionPolicyTypes>,
    billing_profile: Option<BillingProfile>,
    restore_policy: Option<SpotRestorePolicy>,
}

fn expand_spot_settings(attrs: &Attributes) -> ExpandResult<SpotSettings> {
    let priority = match attrs.str_or_empty("priority") {
        "" => VirtualMachinePriorityTypes::Regular,
        priority => VirtualMachinePriorityTypes::parse(priority),
    };
    let eviction_policy =
        non_empty(attrs.str_or_empty("eviction_policy")).map(|p| VirtualMachineEvictionPolicyTypes::parse(&p));
    let max_bid_price = match attrs.str_or_empty("max_bid_price") {
        "" => DEFAULT_MAX_BID_PRICE,
        price => price.parse::<f64>().map_err(|_| {
            ExpandError::conflict(format!("`max_bid_price` must be a number, got {:?}", price))
        })?,
    };
    let restore_policy = vmss::expand_spot_restore_policy(attrs.list("spot_restore_policy"));
    let is_spot = priority == VirtualMachinePriorityTypes::Spot;

    if is_spot && eviction_policy.is_none() {
        return Err(ExpandError::conflict(
            "an `eviction_policy` must be specified when `priority` is set to `Spot`",
        ));
    }
    if !is_spot && eviction_policy.is_some() {
        return Err(ExpandError::conflict(
            "an `eviction_policy` can only be specified when `priority` is set to `Spot`",
        ));
    }
    if !is_spot && max_bid_price != DEFAULT_MAX_BID_PRICE {
        return Err(ExpandError::conflict(
            "`max_bid_price` can only be configured when `priority` is set to `Spot`",
        ));
    }
    if !is_spot && restore_policy.as_ref().and_then(|p| p.enabled).unwrap_or(false) {
        return Err(ExpandError::conflict(
            "`spot_restore_policy` can only be enabled when `priority` is set to `Spot`",
        ));
    }

    Ok(SpotSettings {
        billing_profile: is_spot.then_some(BillingProfile {
            max_price: Some(max_bid_price),
        }),
        priority,
        eviction_policy,
        restore_policy,
    })
}

fn expand_application_profile(attrs: &Attributes) -> ApplicationProfile {
    let current = attrs.list("gallery_application");
    let deprecated = attrs.list("gallery_applications");
    let gallery_applications = if current.is_empty() && !deprecated.is_empty() {
        vmss::expand_gallery_applications(deprecated)
    } else {
        vmss::expand_gallery_application(current)
    };
    ApplicationProfile { gallery_applications }
}

fn expand_scale_in(attrs: &Attributes) -> Option<ScaleInPolicy> {
    if let Some(policy) = vmss::expand_scale_in_policy(attrs.list("scale_in")) {
        return Some(policy);
    }
    non_empty(attrs.str_or_empty("scale_in_policy")).map(|rule| ScaleInPolicy {
        force_deletion: None,
        rules: Some(vec![VirtualMachineScaleSetScaleInRules::parse(&rule)]),
    })
}

fn expand_scheduled_events_profile(attrs: &Attributes) -> Option<ScheduledEventsProfile> {
    let current = attrs.list("termination_notification");
    if current.is_empty() {
        vmss::expand_scheduled_events_profile(attrs.list("terminate_notification"))
    } else {
        vmss::expand_scheduled_events_profile(current)
    }
}

/// Attributes of a scale set read back from the service
///
/// `prior` is the last recorded state: `admin_password`, `custom_data` and the
/// extensions' `protected_settings` are never returned and are taken from it.
pub fn flatten(input: &VirtualMachineScaleSet, prior: Option<&Attributes>, features: Features) -> Attributes {
    let empty = Attributes::new();
    let prior = prior.unwrap_or(&empty);
    let mut attrs = Attributes::new();

    let parsed_id = input
        .id
        .as_deref()
        .and_then(|id| VirtualMachineScaleSetId::parse_insensitively(id).ok());
    if let Some(id) = &parsed_id {
        set(&mut attrs, "id", id.id());
        set(&mut attrs, "resource_group_name", id.resource_group_name.clone());
    }
    let name = input
        .name
        .clone()
        .or_else(|| parsed_id.as_ref().map(|id| id.virtual_machine_scale_set_name.clone()))
        .unwrap_or_default();
    set(&mut attrs, "name", name);
    set(&mut attrs, "location", input.location.as_str());
    set(&mut attrs, "tags", flatten_tags(input.tags.as_ref()));
    set(&mut attrs, "zones", Value::strings(input.zones.clone().unwrap_or_default()));

    let sku = input.sku.as_ref();
    set(&mut attrs, "sku", sku.and_then(|s| s.name.clone()).unwrap_or_default());
    set(&mut attrs, "instances", sku.and_then(|s| s.capacity).unwrap_or(0));

    let props = input.properties.as_ref();
    set(
        &mut attrs,
        "overprovision",
        props.and_then(|p| p.overprovision).unwrap_or(true),
    );
    set(
        &mut attrs,
        "single_placement_group",
        props.and_then(|p| p.single_placement_group).unwrap_or(true),
    );
    set(
        &mut attrs,
        "zone_balance",
        props.and_then(|p| p.zone_balance).unwrap_or(false),
    );
    set(
        &mut attrs,
        "do_not_run_extensions_on_overprovisioned_machines",
        props
            .and_then(|p| p.do_not_run_extensions_on_overprovisioned_vms)
            .unwrap_or(false),
    );
    set(
        &mut attrs,
        "platform_fault_domain_count",
        props.and_then(|p| p.platform_fault_domain_count).unwrap_or(0),
    );
    set(
        &mut attrs,
        "proximity_placement_group_id",
        props
            .and_then(|p| p.proximity_placement_group.as_ref())
            .and_then(|g| g.id.clone())
            .unwrap_or_default(),
    );
    set(
        &mut attrs,
        "unique_id",
        props.and_then(|p| p.unique_id.clone()).unwrap_or_default(),
    );
    set(
        &mut attrs,
        "additional_capabilities",
        Value::List(vmss::flatten_additional_capabilities(
            props.and_then(|p| p.additional_capabilities.as_ref()),
        )),
    );
    set(
        &mut attrs,
        "automatic_instance_repair",
        Value::List(vmss::flatten_automatic_repairs_policy(
            props.and_then(|p| p.automatic_repairs_policy.as_ref()),
        )),
    );
    set(
        &mut attrs,
        "spot_restore_policy",
        Value::List(vmss::flatten_spot_restore_policy(
            props.and_then(|p| p.spot_restore_policy.as_ref()),
        )),
    );

    let scale_in = props.and_then(|p| p.scale_in_policy.as_ref());
    set(&mut attrs, "scale_in", Value::List(vmss::flatten_scale_in_policy(scale_in)));
    if !features.four_point_oh_beta {
        let rule = scale_in
            .and_then(|s| s.rules.as_ref())
            .and_then(|rules| rules.first())
            .map(|r| r.as_str().to_string())
            .unwrap_or_default();
        set(&mut attrs, "scale_in_policy", rule);
    }

    flatten_upgrade_policy(&mut attrs, props.and_then(|p| p.upgrade_policy.as_ref()));

    let profile = props.and_then(|p| p.virtual_machine_profile.as_ref());
    flatten_os_profile(&mut attrs, profile.and_then(|p| p.os_profile.as_ref()), prior);

    set(
        &mut attrs,
        "priority",
        profile
            .and_then(|p| p.priority.as_ref())
            .map(|p| p.as_str().to_string())
            .unwrap_or_else(|| VirtualMachinePriorityTypes::Regular.as_str().to_string()),
    );
    set(
        &mut attrs,
        "eviction_policy",
        profile
            .and_then(|p| p.eviction_policy.as_ref())
            .map(|p| p.as_str().to_string())
            .unwrap_or_default(),
    );
    let max_bid_price = profile
        .and_then(|p| p.billing_profile.as_ref())
        .and_then(|b| b.max_price)
        .unwrap_or(DEFAULT_MAX_BID_PRICE);
    set(&mut attrs, "max_bid_price", max_bid_price.to_string());

    let user_data = profile
        .and_then(|p| p.user_data.clone())
        .unwrap_or_else(|| prior.str_or_empty("user_data").to_string());
    set(&mut attrs, "user_data", user_data);

    let storage = profile.and_then(|p| p.storage_profile.as_ref());
    let image = storage.and_then(|s| s.image_reference.as_ref());
    set(
        &mut attrs,
        "source_image_id",
        image.and_then(|i| i.id.clone()).unwrap_or_default(),
    );
    set(
        &mut attrs,
        "source_image_reference",
        Value::List(flatten_image_reference(image)),
    );
    set(
        &mut attrs,
        "os_disk",
        Value::List(vmss::flatten_os_disk(storage.and_then(|s| s.os_disk.as_ref()))),
    );
    set(
        &mut attrs,
        "data_disk",
        Value::List(vmss::flatten_data_disk(storage.and_then(|s| s.data_disks.as_ref()))),
    );

    let network = profile.and_then(|p| p.network_profile.as_ref());
    set(
        &mut attrs,
        "health_probe_id",
        network
            .and_then(|n| n.health_probe.as_ref())
            .and_then(|p| p.id.clone())
            .unwrap_or_default(),
    );
    set(
        &mut attrs,
        "network_interface",
        Value::List(vmss::flatten_network_interface(
            network.and_then(|n| n.network_interface_configurations.as_ref()),
        )),
    );

    let extension_profile = profile.and_then(|p| p.extension_profile.as_ref());
    set(
        &mut attrs,
        "extension",
        Value::List(vmss::flatten_extensions(extension_profile, prior.list("extension"))),
    );
    set(
        &mut attrs,
        "extensions_time_budget",
        extension_profile
            .and_then(|p| p.extensions_time_budget.clone())
            .unwrap_or_else(|| DEFAULT_EXTENSIONS_TIME_BUDGET.to_string()),
    );

    let notification = vmss::flatten_scheduled_events_profile(
        profile.and_then(|p| p.scheduled_events_profile.as_ref()),
    );
    let gallery_applications = profile
        .and_then(|p| p.application_profile.as_ref())
        .and_then(|a| a.gallery_applications.as_ref());
    set(
        &mut attrs,
        "gallery_application",
        Value::List(vmss::flatten_gallery_application(gallery_applications)),
    );
    if !features.four_point_oh_beta {
        set(&mut attrs, "terminate_notification", Value::List(notification.clone()));
        set(
            &mut attrs,
            "gallery_applications",
            Value::List(vmss::flatten_gallery_applications(gallery_applications)),
        );
    }
    set(&mut attrs, "termination_notification", Value::List(notification));

    attrs
}

fn set(attrs: &mut Attributes, key: &str, value: impl Into<Value>) {
    attrs.insert(key.to_string(), value.into());
}

fn flatten_tags(input: Option<&HashMap<String, String>>) -> Value {
    Value::Map(
        input
            .into_iter()
            .flatten()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect(),
    )
}

fn flatten_upgrade_policy(attrs: &mut Attributes, input: Option<&UpgradePolicy>) {
    set(
        attrs,
        "upgrade_mode",
        input
            .and_then(|p| p.mode.as_ref())
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| UpgradeMode::Manual.as_str().to_string()),
    );
    set(
        attrs,
        "automatic_os_upgrade_policy",
        Value::List(vmss::flatten_automatic_os_upgrade_policy(
            input.and_then(|p| p.automatic_os_upgrade_policy.as_ref()),
        )),
    );
    set(
        attrs,
        "rolling_upgrade_policy",
        Value::List(vmss::flatten_rolling_upgrade_policy(
            input.and_then(|p| p.rolling_upgrade_policy.as_ref()),
        )),
    );
}

fn flatten_os_profile(attrs: &mut Attributes, input: Option<&VirtualMachineScaleSetOsProfile>, prior: &Attributes) {
    let linux = input.and_then(|p| p.linux_configuration.as_ref());

    set(
        attrs,
        "admin_username",
        input.and_then(|p| p.admin_username.clone()).unwrap_or_default(),
    );
    set(
        attrs,
        "computer_name_prefix",
        input.and_then(|p| p.computer_name_prefix.clone()).unwrap_or_default(),
    );
    set(
        attrs,
        "disable_password_authentication",
        linux.and_then(|l| l.disable_password_authentication).unwrap_or(true),
    );
    set(
        attrs,
        "provision_vm_agent",
        linux.and_then(|l| l.provision_vm_agent).unwrap_or(true),
    );

    let keys: Vec<Value> = linux
        .and_then(|l| l.ssh.as_ref())
        .and_then(|s| s.public_keys.as_ref())
        .into_iter()
        .flatten()
        .map(|key| {
            let username = key
                .path
                .as_deref()
                .and_then(|p| p.strip_prefix("/home/"))
                .and_then(|p| p.strip_suffix("/.ssh/authorized_keys"))
                .unwrap_or_default();
            block([
                ("public_key", Value::string(key.key_data.clone().unwrap_or_default())),
                ("username", Value::string(username)),
            ])
        })
        .collect();
    set(attrs, "admin_ssh_key", Value::List(keys));

    for secret in ["admin_password", "custom_data"] {
        set(attrs, secret, prior.str_or_empty(secret));
    }
}

fn flatten_image_reference(input: Option<&ImageReference>) -> Vec<Value> {
    let Some(input) = input.filter(|i| i.id.is_none()) else {
        return Vec::new();
    };
    vec![block([
        ("publisher", Value::string(input.publisher.clone().unwrap_or_default())),
        ("offer", Value::string(input.offer.clone().unwrap_or_default())),
        ("sku", Value::string(input.sku.clone().unwrap_or_default())),
        ("version", Value::string(input.version.clone().unwrap_or_default())),
    ])]
}
