//! Schemas and expand/flatten functions shared by the scale set resources.
//!
//! Expand functions take the block list of one attribute (`attrs.list("os_disk")`)
//! and build the API model; flatten functions turn the API model back into a
//! block list. Defaults that the schema applies are repeated in expand so that
//! configurations which skipped `apply_defaults` still produce a valid request.

mod disks;
mod extensions;
mod network;
mod policies;

pub use disks::*;
pub use extensions::*;
pub use network::*;
pub use policies::*;

use azurerm_core::features::Features;
use azurerm_core::resource::{Attributes, AttributesExt, Value};
use azurerm_core::schema::{AttributeSchema, AttributeType, BlockSchema};
use azurerm_core::validation::{int_between, is_url_with_http_or_https, iso8601_duration_between, string_in_slice, string_is_not_empty};
use azurerm_sdk::services::compute::virtual_machine_scale_sets::{
    AdditionalCapabilities, ScaleInPolicy, SpotRestorePolicy, SubResource, VirtualMachineScaleSetScaleInRules,
    VmGalleryApplication,
};

use super::validate::gallery_application_version_id;

/// Map items of a block list
pub(crate) fn blocks(input: &[Value]) -> impl Iterator<Item = &Attributes> {
    input.iter().filter_map(Value::as_map)
}

pub(crate) fn first_block(input: &[Value]) -> Option<&Attributes> {
    blocks(input).next()
}

/// Build a block from attribute name/value pairs
pub(crate) fn block<const N: usize>(pairs: [(&str, Value); N]) -> Value {
    Value::Map(pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
}

pub(crate) fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

pub(crate) fn sub_resources(ids: Vec<String>) -> Vec<SubResource> {
    ids.into_iter().map(SubResource::new).collect()
}

/// IDs of a list of sub resources as a string list
pub(crate) fn sub_resource_ids(input: Option<&Vec<SubResource>>) -> Value {
    Value::strings(input.into_iter().flatten().filter_map(|s| s.id.clone()))
}

pub fn additional_capabilities_schema() -> AttributeSchema {
    AttributeSchema::new(
        "additional_capabilities",
        AttributeType::block_list(
            // requires the UltraSSDWithVMSS feature registered on the subscription
            BlockSchema::new().attribute(
                AttributeSchema::new("ultra_ssd_enabled", AttributeType::Bool)
                    .with_default(false)
                    .force_new(),
            ),
        ),
    )
    .max_items(1)
}

pub fn expand_additional_capabilities(input: &[Value]) -> AdditionalCapabilities {
    let mut capabilities = AdditionalCapabilities::default();
    if let Some(raw) = first_block(input) {
        capabilities.ultra_ssd_enabled = Some(raw.bool_or("ultra_ssd_enabled", false));
    }
    capabilities
}

pub fn flatten_additional_capabilities(input: Option<&AdditionalCapabilities>) -> Vec<Value> {
    let Some(input) = input else {
        return Vec::new();
    };
    vec![block([(
        "ultra_ssd_enabled",
        Value::Bool(input.ultra_ssd_enabled.unwrap_or(false)),
    )])]
}

fn gallery_application_order_schema() -> AttributeSchema {
    AttributeSchema::new("order", int_between(0, 2147483647))
        .with_default(0)
        .force_new()
}

// Pass-through value the service stores without interpreting
fn gallery_application_tag_schema() -> AttributeSchema {
    AttributeSchema::new("tag", string_is_not_empty()).force_new()
}

pub fn gallery_application_schema(features: Features) -> AttributeSchema {
    let mut schema = AttributeSchema::new(
        "gallery_application",
        AttributeType::block_list(
            BlockSchema::new()
                .attribute(
                    AttributeSchema::new("version_id", gallery_application_version_id())
                        .required()
                        .force_new(),
                )
                // e.g. https://mystorageaccount.blob.core.windows.net/configurations/settings.config
                .attribute(AttributeSchema::new("configuration_blob_uri", is_url_with_http_or_https()).force_new())
                .attribute(gallery_application_order_schema())
                .attribute(gallery_application_tag_schema()),
        ),
    )
    .max_items(100);

    if !features.four_point_oh_beta {
        schema = schema.computed().conflicts_with(&["gallery_applications"]);
    }
    schema
}

pub fn gallery_applications_schema(features: Features) -> AttributeSchema {
    let mut schema = AttributeSchema::new(
        "gallery_applications",
        AttributeType::block_list(
            BlockSchema::new()
                .attribute(
                    AttributeSchema::new("package_reference_id", gallery_application_version_id())
                        .required()
                        .force_new()
                        .deprecated(
                            "`package_reference_id` has been renamed to `version_id` and will be deprecated in 4.0",
                        ),
                )
                .attribute(
                    AttributeSchema::new("configuration_reference_blob_uri", is_url_with_http_or_https())
                        .force_new()
                        .deprecated(
                            "`configuration_reference_blob_uri` has been renamed to `configuration_blob_uri` and will be deprecated in 4.0",
                        ),
                )
                .attribute(gallery_application_order_schema())
                .attribute(gallery_application_tag_schema()),
        ),
    )
    .max_items(100)
    .conflicts_with(&["gallery_application"])
    .deprecated("`gallery_applications` has been renamed to `gallery_application` and will be deprecated in 4.0");

    if !features.four_point_oh_beta {
        schema = schema.computed();
    }
    schema
}

fn expand_gallery_application_blocks(
    input: &[Value],
    version_key: &str,
    configuration_key: &str,
) -> Option<Vec<VmGalleryApplication>> {
    if input.is_empty() {
        return None;
    }

    Some(
        blocks(input)
            .map(|raw| VmGalleryApplication {
                package_reference_id: raw.str_or_empty(version_key).to_string(),
                configuration_reference: Some(raw.str_or_empty(configuration_key).to_string()),
                order: Some(raw.int_or("order", 0)),
                tags: Some(raw.str_or_empty("tag").to_string()),
            })
            .collect(),
    )
}

fn flatten_gallery_application_blocks(
    input: Option<&Vec<VmGalleryApplication>>,
    version_key: &str,
    configuration_key: &str,
) -> Vec<Value> {
    input
        .into_iter()
        .flatten()
        .map(|app| {
            block([
                (version_key, Value::string(&app.package_reference_id)),
                (
                    configuration_key,
                    Value::string(app.configuration_reference.clone().unwrap_or_default()),
                ),
                ("order", Value::Int(app.order.unwrap_or(0))),
                ("tag", Value::string(app.tags.clone().unwrap_or_default())),
            ])
        })
        .collect()
}

pub fn expand_gallery_application(input: &[Value]) -> Option<Vec<VmGalleryApplication>> {
    expand_gallery_application_blocks(input, "version_id", "configuration_blob_uri")
}

pub fn flatten_gallery_application(input: Option<&Vec<VmGalleryApplication>>) -> Vec<Value> {
    flatten_gallery_application_blocks(input, "version_id", "configuration_blob_uri")
}

pub fn expand_gallery_applications(input: &[Value]) -> Option<Vec<VmGalleryApplication>> {
    expand_gallery_application_blocks(input, "package_reference_id", "configuration_reference_blob_uri")
}

pub fn flatten_gallery_applications(input: Option<&Vec<VmGalleryApplication>>) -> Vec<Value> {
    flatten_gallery_application_blocks(input, "package_reference_id", "configuration_reference_blob_uri")
}

pub fn scale_in_policy_schema(features: Features) -> AttributeSchema {
    let mut schema = AttributeSchema::new(
        "scale_in",
        AttributeType::block_list(
            BlockSchema::new()
                .attribute(
                    AttributeSchema::new(
                        "rule",
                        string_in_slice(VirtualMachineScaleSetScaleInRules::possible_values(), false),
                    )
                    .with_default(VirtualMachineScaleSetScaleInRules::Default.as_str()),
                )
                .attribute(AttributeSchema::new("force_deletion_enabled", AttributeType::Bool).with_default(false)),
        ),
    )
    .max_items(1);

    if !features.four_point_oh_beta {
        schema = schema.computed().conflicts_with(&["scale_in_policy"]);
    }
    schema
}

pub fn expand_scale_in_policy(input: &[Value]) -> Option<ScaleInPolicy> {
    let raw = first_block(input)?;
    let rule = match raw.str_or_empty("rule") {
        "" => VirtualMachineScaleSetScaleInRules::Default,
        rule => VirtualMachineScaleSetScaleInRules::parse(rule),
    };
    Some(ScaleInPolicy {
        rules: Some(vec![rule]),
        force_deletion: Some(raw.bool_or("force_deletion_enabled", false)),
    })
}

pub fn flatten_scale_in_policy(input: Option<&ScaleInPolicy>) -> Vec<Value> {
    let Some(input) = input else {
        return Vec::new();
    };

    let rule = input
        .rules
        .as_ref()
        .and_then(|rules| rules.first())
        .map(|r| r.as_str().to_string())
        .unwrap_or_else(|| VirtualMachineScaleSetScaleInRules::Default.as_str().to_string());

    vec![block([
        ("rule", Value::String(rule)),
        ("force_deletion_enabled", Value::Bool(input.force_deletion.unwrap_or(false))),
    ])]
}

pub fn spot_restore_policy_schema() -> AttributeSchema {
    AttributeSchema::new(
        "spot_restore_policy",
        AttributeType::block_list(
            BlockSchema::new()
                .attribute(
                    AttributeSchema::new("enabled", AttributeType::Bool)
                        .with_default(false)
                        .force_new(),
                )
                .attribute(
                    AttributeSchema::new("timeout", iso8601_duration_between("PT15M", "PT2H"))
                        .with_default("PT1H")
                        .force_new(),
                ),
        ),
    )
    .computed()
    .max_items(1)
}

pub fn expand_spot_restore_policy(input: &[Value]) -> Option<SpotRestorePolicy> {
    let raw = first_block(input)?;
    let timeout = match raw.str_or_empty("timeout") {
        "" => "PT1H",
        timeout => timeout,
    };
    Some(SpotRestorePolicy {
        enabled: Some(raw.bool_or("enabled", false)),
        restore_timeout: Some(timeout.to_string()),
    })
}

pub fn flatten_spot_restore_policy(input: Option<&SpotRestorePolicy>) -> Vec<Value> {
    let Some(input) = input else {
        return Vec::new();
    };
    vec![block([
        ("enabled", Value::Bool(input.enabled.unwrap_or(false))),
        (
            "timeout",
            Value::string(input.restore_timeout.clone().unwrap_or_default()),
        ),
    ])]
}
