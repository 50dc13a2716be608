//! Scale set extensions
//!
//! Extensions are an unordered set keyed by a hash of their identifying
//! fields. `protected_settings` is write-only on the service side, so flatten
//! copies it from the prior state of the extension with the same name.

use std::collections::{HashMap, HashSet};
use std::hash::Hasher;

use azurerm_core::resource::{Attributes, AttributesExt, Value};
use azurerm_core::schema::{AttributeSchema, AttributeType, BlockSchema};
use azurerm_core::validation::{is_url_with_http_or_https, resource_id, string_is_json, string_is_not_empty};
use azurerm_resourceids::KeyVaultId;
use azurerm_sdk::services::compute::virtual_machine_scale_sets::{
    KeyVaultSecretReference, SubResource, VirtualMachineScaleSetExtension, VirtualMachineScaleSetExtensionProfile,
    VirtualMachineScaleSetExtensionProperties,
};

use siphasher::sip::SipHasher13;

use super::{block, blocks, first_block, non_empty};
use crate::error::{ExpandError, ExpandResult};

const HEALTH_EXTENSION_TYPES: [&str; 2] = ["ApplicationHealthLinux", "ApplicationHealthWindows"];

pub fn protected_settings_from_key_vault_schema() -> AttributeSchema {
    AttributeSchema::new(
        "protected_settings_from_key_vault",
        AttributeType::block_list(
            BlockSchema::new()
                .attribute(AttributeSchema::new("secret_url", is_url_with_http_or_https()).required())
                .attribute(AttributeSchema::new("source_vault_id", resource_id::<KeyVaultId>()).required()),
        ),
    )
    .max_items(1)
}

pub fn expand_protected_settings_from_key_vault(input: &[Value]) -> Option<KeyVaultSecretReference> {
    let raw = first_block(input)?;
    Some(KeyVaultSecretReference {
        secret_url: raw.str_or_empty("secret_url").to_string(),
        source_vault: SubResource::new(raw.str_or_empty("source_vault_id")),
    })
}

pub fn flatten_protected_settings_from_key_vault(input: Option<&KeyVaultSecretReference>) -> Vec<Value> {
    let Some(input) = input else {
        return Vec::new();
    };
    vec![block([
        ("secret_url", Value::string(&input.secret_url)),
        (
            "source_vault_id",
            Value::string(input.source_vault.id.clone().unwrap_or_default()),
        ),
    ])]
}

pub fn extensions_schema() -> AttributeSchema {
    AttributeSchema::new(
        "extension",
        AttributeType::block_set(
            BlockSchema::new()
                .attribute(AttributeSchema::new("name", string_is_not_empty()).required())
                .attribute(AttributeSchema::new("publisher", string_is_not_empty()).required())
                .attribute(AttributeSchema::new("type", string_is_not_empty()).required())
                .attribute(AttributeSchema::new("type_handler_version", string_is_not_empty()).required())
                .attribute(AttributeSchema::new("auto_upgrade_minor_version", AttributeType::Bool).with_default(true))
                .attribute(AttributeSchema::new("automatic_upgrade_enabled", AttributeType::Bool))
                .attribute(AttributeSchema::new("force_update_tag", AttributeType::String))
                .attribute(AttributeSchema::new("protected_settings", string_is_json()).sensitive())
                // conflicts with protected_settings; checked per item in expand_extensions
                .attribute(protected_settings_from_key_vault_schema())
                .attribute(AttributeSchema::new(
                    "provision_after_extensions",
                    AttributeType::List(Box::new(AttributeType::String)),
                ))
                .attribute(AttributeSchema::new("settings", string_is_json())),
        ),
    )
    .computed()
}

/// Re-serialize a JSON document so whitespace and key order don't matter
fn normalize_json(input: &str) -> Option<String> {
    let value = serde_json::from_str::<serde_json::Value>(input).ok()?;
    let mut out = String::new();
    write_canonical_json(&value, &mut out);
    Some(out)
}

/// Compact JSON with object keys in sorted order at every level
fn write_canonical_json(value: &serde_json::Value, out: &mut String) {
    match value {
        serde_json::Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (i, (key, value)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&serde_json::Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical_json(value, out);
            }
            out.push('}');
        }
        serde_json::Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical_json(item, out);
            }
            out.push(']');
        }
        other => out.push_str(&other.to_string()),
    }
}

/// Identity of an extension block within the set
pub fn extension_hash(raw: &Attributes) -> u64 {
    let mut buf = String::new();
    for key in ["name", "publisher", "type", "type_handler_version"] {
        buf.push_str(raw.str_or_empty(key));
        buf.push('-');
    }
    buf.push_str(&format!("{}-", raw.bool_or("auto_upgrade_minor_version", true)));

    if let Some(tag) = raw.get("force_update_tag").and_then(Value::as_str) {
        buf.push_str(tag);
        buf.push('-');
    }
    if raw.contains_key("provision_after_extensions") {
        buf.push_str(&format!("{:?}-", raw.string_list("provision_after_extensions")));
    }

    for key in ["settings", "protected_settings"] {
        if let Some(settings) = normalize_json(raw.str_or_empty(key)) {
            buf.push_str(&settings);
            buf.push('-');
        }
    }

    if let Some(vault) = raw.first_block("protected_settings_from_key_vault") {
        buf.push_str(vault.str_or_empty("secret_url"));
        buf.push('-');
        buf.push_str(vault.str_or_empty("source_vault_id"));
        buf.push('-');
    }

    // set order recorded in state must not change between builds
    let mut hasher = SipHasher13::new_with_keys(0, 0);
    hasher.write(buf.as_bytes());
    hasher.finish()
}

fn parse_json(raw: &Attributes, field: &'static str) -> ExpandResult<Option<serde_json::Value>> {
    let Some(value) = non_empty(raw.str_or_empty(field)) else {
        return Ok(None);
    };
    serde_json::from_str(&value)
        .map(Some)
        .map_err(|source| ExpandError::InvalidJson { field, source })
}

fn string_or_empty(value: Option<&String>) -> Value {
    Value::string(value.cloned().unwrap_or_default())
}

/// The expanded profile plus whether an application health extension is present
#[derive(Debug)]
pub struct ExpandedExtensions {
    pub profile: VirtualMachineScaleSetExtensionProfile,
    pub has_health_extension: bool,
}

pub fn expand_extensions(input: &[Value]) -> ExpandResult<ExpandedExtensions> {
    let mut expanded = ExpandedExtensions {
        profile: VirtualMachineScaleSetExtensionProfile::default(),
        has_health_extension: false,
    };
    if input.is_empty() {
        return Ok(expanded);
    }

    let mut extensions = Vec::new();
    let mut seen = HashSet::new();
    for raw in blocks(input) {
        if !seen.insert(extension_hash(raw)) {
            log::debug!("skipping duplicate extension {:?}", raw.str_or_empty("name"));
            continue;
        }

        let extension_type = raw.str_or_empty("type").to_string();
        if HEALTH_EXTENSION_TYPES.contains(&extension_type.as_str()) {
            expanded.has_health_extension = true;
        }

        let protected_settings_from_key_vault =
            expand_protected_settings_from_key_vault(raw.list("protected_settings_from_key_vault"));
        let protected_settings = parse_json(raw, "protected_settings");
        if protected_settings_from_key_vault.is_some() && !raw.str_or_empty("protected_settings").is_empty() {
            return Err(ExpandError::conflict(
                "`protected_settings_from_key_vault` cannot be used with `protected_settings`",
            ));
        }

        extensions.push(VirtualMachineScaleSetExtension {
            id: None,
            name: Some(raw.str_or_empty("name").to_string()),
            properties: Some(VirtualMachineScaleSetExtensionProperties {
                auto_upgrade_minor_version: Some(raw.bool_or("auto_upgrade_minor_version", true)),
                enable_automatic_upgrade: Some(raw.bool_or("automatic_upgrade_enabled", false)),
                force_update_tag: raw
                    .get("force_update_tag")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                protected_settings: protected_settings?,
                protected_settings_from_key_vault,
                provision_after_extensions: Some(raw.string_list("provision_after_extensions")),
                provisioning_state: None,
                publisher: Some(raw.str_or_empty("publisher").to_string()),
                settings: parse_json(raw, "settings")?,
                type_: Some(extension_type),
                type_handler_version: Some(raw.str_or_empty("type_handler_version").to_string()),
            }),
        });
    }
    expanded.profile.extensions = Some(extensions);

    Ok(expanded)
}

/// Flatten extensions in hash order, taking `protected_settings` from `prior` (the
/// previously recorded `extension` blocks) since the service never returns it
pub fn flatten_extensions(input: Option<&VirtualMachineScaleSetExtensionProfile>, prior: &[Value]) -> Vec<Value> {
    let Some(extensions) = input.and_then(|p| p.extensions.as_ref()) else {
        return Vec::new();
    };

    let prior_by_name: HashMap<&str, &Attributes> = blocks(prior)
        .map(|ext| (ext.str_or_empty("name"), ext))
        .collect();

    let mut flattened: Vec<(u64, Value)> = extensions
        .iter()
        .map(|ext| {
            let name = ext.name.clone().unwrap_or_default();
            let props = ext.properties.as_ref();

            let settings = props
                .and_then(|p| p.settings.as_ref())
                .filter(|s| s.is_object())
                .map(|s| s.to_string())
                .unwrap_or_default();

            let protected_settings = prior_by_name
                .get(name.as_str())
                .map(|prior| prior.str_or_empty("protected_settings"))
                .filter(|s| !s.is_empty() && *s != "{}")
                .unwrap_or_default()
                .to_string();

            block([
                ("name", Value::String(name.clone())),
                (
                    "auto_upgrade_minor_version",
                    Value::Bool(props.and_then(|p| p.auto_upgrade_minor_version).unwrap_or(false)),
                ),
                (
                    "automatic_upgrade_enabled",
                    Value::Bool(props.and_then(|p| p.enable_automatic_upgrade).unwrap_or(false)),
                ),
                ("force_update_tag", string_or_empty(props.and_then(|p| p.force_update_tag.as_ref()))),
                (
                    "provision_after_extensions",
                    Value::strings(
                        props
                            .and_then(|p| p.provision_after_extensions.clone())
                            .unwrap_or_default(),
                    ),
                ),
                ("protected_settings", Value::String(protected_settings)),
                (
                    "protected_settings_from_key_vault",
                    Value::List(flatten_protected_settings_from_key_vault(
                        props.and_then(|p| p.protected_settings_from_key_vault.as_ref()),
                    )),
                ),
                ("publisher", string_or_empty(props.and_then(|p| p.publisher.as_ref()))),
                ("settings", Value::String(settings)),
                ("type", string_or_empty(props.and_then(|p| p.type_.as_ref()))),
                ("type_handler_version", string_or_empty(props.and_then(|p| p.type_handler_version.as_ref()))),
            ])
        })
        .map(|value| (value.as_map().map(extension_hash).unwrap_or_default(), value))
        .collect();

    // set order
    flattened.sort_by_key(|(hash, _)| *hash);
    flattened.into_iter().map(|(_, value)| value).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const VAULT: &str = "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.KeyVault/vaults/kv";

    fn extension(name: &str, extension_type: &str, extra: Vec<(&str, Value)>) -> Value {
        let mut attrs = Attributes::new();
        attrs.insert("name".to_string(), Value::string(name));
        attrs.insert("publisher".to_string(), Value::string("Microsoft.ManagedServices"));
        attrs.insert("type".to_string(), Value::string(extension_type));
        attrs.insert("type_handler_version".to_string(), Value::string("1.0"));
        for (k, v) in extra {
            attrs.insert(k.to_string(), v);
        }
        Value::Map(attrs)
    }

    fn key_vault() -> Value {
        Value::List(vec![block([
            ("secret_url", Value::string("https://kv.vault.azure.net/secrets/s/1")),
            ("source_vault_id", Value::string(VAULT)),
        ])])
    }

    #[test]
    fn empty_input_gives_empty_profile() {
        let expanded = expand_extensions(&[]).unwrap();
        assert!(expanded.profile.extensions.is_none());
        assert!(!expanded.has_health_extension);
    }

    #[test]
    fn detects_health_extension() {
        let input = vec![
            extension("custom", "CustomScript", vec![]),
            extension("health", "ApplicationHealthLinux", vec![]),
        ];
        let expanded = expand_extensions(&input).unwrap();
        assert!(expanded.has_health_extension);
        assert_eq!(expanded.profile.extensions.unwrap().len(), 2);

        let without = expand_extensions(&[extension("custom", "CustomScript", vec![])]).unwrap();
        assert!(!without.has_health_extension);
    }

    #[test]
    fn parses_settings_json() {
        let input = vec![extension(
            "custom",
            "CustomScript",
            vec![("settings", Value::string(r#"{"commandToExecute": "echo hi"}"#))],
        )];
        let expanded = expand_extensions(&input).unwrap();
        let props = expanded.profile.extensions.unwrap()[0].properties.clone().unwrap();
        assert_eq!(props.settings.unwrap()["commandToExecute"], "echo hi");
        assert_eq!(props.auto_upgrade_minor_version, Some(true));
        assert_eq!(props.protected_settings, None);

        let bad = vec![extension("custom", "CustomScript", vec![("settings", Value::string("{nope"))])];
        let err = expand_extensions(&bad).unwrap_err();
        assert!(err.to_string().starts_with("failed to parse JSON from `settings`"));
    }

    #[test]
    fn protected_settings_conflict_with_key_vault() {
        let input = vec![extension(
            "custom",
            "CustomScript",
            vec![
                ("protected_settings", Value::string(r#"{"secret": "x"}"#)),
                ("protected_settings_from_key_vault", key_vault()),
            ],
        )];
        let err = expand_extensions(&input).unwrap_err();
        assert_eq!(
            err.to_string(),
            "`protected_settings_from_key_vault` cannot be used with `protected_settings`"
        );

        let vault_only = vec![extension(
            "custom",
            "CustomScript",
            vec![("protected_settings_from_key_vault", key_vault())],
        )];
        let expanded = expand_extensions(&vault_only).unwrap();
        let reference = expanded.profile.extensions.unwrap()[0]
            .properties
            .clone()
            .unwrap()
            .protected_settings_from_key_vault
            .unwrap();
        assert_eq!(reference.source_vault, SubResource::new(VAULT));
    }

    #[test]
    fn flatten_recovers_protected_settings_from_prior_state() {
        let prior = vec![
            extension(
                "custom",
                "CustomScript",
                vec![("protected_settings", Value::string(r#"{"secret":"x"}"#))],
            ),
            extension("empty", "CustomScript", vec![("protected_settings", Value::string("{}"))]),
        ];
        let expanded = expand_extensions(&prior).unwrap();
        let mut profile = expanded.profile;
        // the service never echoes secrets
        for ext in profile.extensions.iter_mut().flatten() {
            if let Some(props) = ext.properties.as_mut() {
                props.protected_settings = None;
            }
        }

        let flattened = flatten_extensions(Some(&profile), &prior);
        let by_name: HashMap<_, _> = flattened
            .iter()
            .filter_map(Value::as_map)
            .map(|e| (e.str_or_empty("name").to_string(), e.clone()))
            .collect();
        assert_eq!(by_name["custom"].str_or_empty("protected_settings"), r#"{"secret":"x"}"#);
        assert_eq!(by_name["empty"].str_or_empty("protected_settings"), "");

        let without_prior = flatten_extensions(Some(&profile), &[]);
        assert_eq!(
            without_prior[0].as_map().unwrap().str_or_empty("protected_settings"),
            ""
        );
    }

    #[test]
    fn flatten_serializes_object_settings_only() {
        let profile = VirtualMachineScaleSetExtensionProfile {
            extensions: Some(vec![VirtualMachineScaleSetExtension {
                name: Some("custom".to_string()),
                properties: Some(VirtualMachineScaleSetExtensionProperties {
                    settings: Some(serde_json::json!("not an object")),
                    ..Default::default()
                }),
                ..Default::default()
            }]),
            extensions_time_budget: None,
        };
        let flattened = flatten_extensions(Some(&profile), &[]);
        assert_eq!(flattened[0].as_map().unwrap().str_or_empty("settings"), "");
        assert!(flatten_extensions(None, &[]).is_empty());
    }

    #[test]
    fn identical_extensions_collapse() {
        let input = vec![
            extension("custom", "CustomScript", vec![]),
            extension("custom", "CustomScript", vec![]),
        ];
        let expanded = expand_extensions(&input).unwrap();
        assert_eq!(expanded.profile.extensions.unwrap().len(), 1);
    }

    #[test]
    fn hash_ignores_json_whitespace() {
        let a = extension("custom", "CustomScript", vec![("settings", Value::string(r#"{"a": 1, "b": 2}"#))]);
        let b = extension("custom", "CustomScript", vec![("settings", Value::string(r#"{"b":2,"a":1}"#))]);
        let c = extension("custom", "CustomScript", vec![("settings", Value::string(r#"{"a":2}"#))]);
        let hash = |v: &Value| extension_hash(v.as_map().unwrap());
        assert_eq!(hash(&a), hash(&b));
        assert_ne!(hash(&a), hash(&c));
    }

    #[test]
    fn canonical_json_sorts_nested_keys() {
        assert_eq!(
            normalize_json(r#"{"b": {"y": [1, {"d": 1, "c": 2}], "x": "s"}, "a": null}"#).as_deref(),
            Some(r#"{"a":null,"b":{"x":"s","y":[1,{"c":2,"d":1}]}}"#)
        );
        assert_eq!(normalize_json("{nope"), None);
    }

    #[test]
    fn flatten_order_ignores_api_order() {
        let forward = expand_extensions(&[
            extension("alpha", "CustomScript", vec![]),
            extension("beta", "ApplicationHealthLinux", vec![]),
        ])
        .unwrap()
        .profile;
        let mut reversed = forward.clone();
        reversed.extensions.as_mut().unwrap().reverse();

        let names = |profile: &VirtualMachineScaleSetExtensionProfile| -> Vec<String> {
            flatten_extensions(Some(profile), &[])
                .iter()
                .map(|e| e.as_map().unwrap().str_or_empty("name").to_string())
                .collect()
        };
        assert_eq!(names(&forward), names(&reversed));
    }
}
