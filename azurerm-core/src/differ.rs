//! Differ - Compare desired state with current state to generate a Plan
//!
//! Compares the desired configuration with the state read back from the
//! provider, and generates the list of required Effects (Plan).

use std::collections::HashMap;

use crate::effect::Effect;
use crate::plan::Plan;
use crate::resource::{Attributes, Resource, ResourceAddress, State, Value};
use crate::schema::{AttributeSchema, AttributeType, BlockSchema, ResourceSchema};

/// Result of a diff operation
#[derive(Debug, Clone, PartialEq)]
pub enum Diff {
    /// Resource does not exist -> needs creation
    Create(Resource),
    /// Resource exists with differences -> needs update
    Update {
        address: ResourceAddress,
        from: State,
        to: Resource,
        changed_attributes: Vec<String>,
    },
    /// A force-new attribute differs -> needs replacement
    Replace {
        from: State,
        to: Resource,
        changed_attributes: Vec<String>,
    },
    /// Resource exists with no differences -> no action needed
    NoChange(ResourceAddress),
    /// Resource exists but not in desired state -> needs deletion
    Delete(State),
}

impl Diff {
    /// Returns whether this Diff involves a change
    pub fn is_change(&self) -> bool {
        !matches!(self, Diff::NoChange(_))
    }
}

/// Compare desired state with current state to compute a Diff
///
/// With a schema, a change to any force-new attribute turns the update into a
/// replacement, including force-new attributes inside nested blocks. Set
/// attributes are compared without regard to element order.
pub fn diff(desired: &Resource, current: &State, schema: Option<&ResourceSchema>) -> Diff {
    if !current.exists {
        return Diff::Create(desired.clone());
    }

    let changed = find_changed_attributes(&desired.attributes, &current.attributes, schema);

    if changed.is_empty() {
        return Diff::NoChange(desired.address.clone());
    }

    let force_new = schema.is_some_and(|s| {
        changed.iter().any(|name| {
            match (s.attributes.get(name), desired.attributes.get(name)) {
                (Some(attr), Some(value)) => {
                    requires_replacement(attr, value, current.attributes.get(name))
                }
                _ => false,
            }
        })
    });

    if force_new {
        Diff::Replace {
            from: current.clone(),
            to: desired.clone(),
            changed_attributes: changed,
        }
    } else {
        Diff::Update {
            address: desired.address.clone(),
            from: current.clone(),
            to: desired.clone(),
            changed_attributes: changed,
        }
    }
}

/// Find changed attributes between desired and current state
fn find_changed_attributes(
    desired: &Attributes,
    current: &Attributes,
    schema: Option<&ResourceSchema>,
) -> Vec<String> {
    let mut changed: Vec<String> = desired
        .iter()
        .filter(|(key, _)| !key.starts_with('_'))
        .filter(|(key, desired_value)| {
            let attr_type = schema
                .and_then(|s| s.attributes.get(key.as_str()))
                .map(|a| &a.attr_type);
            !current
                .get(key.as_str())
                .is_some_and(|current_value| value_matches(desired_value, current_value, attr_type))
        })
        .map(|(key, _)| key.clone())
        .collect();
    changed.sort();
    changed
}

/// Whether the current value satisfies the desired one
///
/// Maps only compare the keys present in the desired map, so values the
/// service computes inside nested blocks do not register as drift. Sets match
/// when every desired element pairs with a distinct current element.
fn value_matches(desired: &Value, current: &Value, attr_type: Option<&AttributeType>) -> bool {
    match (attr_type, desired, current) {
        (Some(AttributeType::Custom { base, .. }), _, _) => {
            value_matches(desired, current, Some(base.as_ref()))
        }
        (Some(AttributeType::Set(elem)), Value::List(d), Value::List(c)) => {
            set_matches(d, c, elem)
        }
        (_, Value::Map(d), Value::Map(c)) => d.iter().all(|(k, dv)| {
            c.get(k)
                .is_some_and(|cv| value_matches(dv, cv, member_type(attr_type, k)))
        }),
        (_, Value::List(d), Value::List(c)) => {
            let elem = element_type(attr_type);
            d.len() == c.len() && d.iter().zip(c).all(|(dv, cv)| value_matches(dv, cv, elem))
        }
        _ => desired == current,
    }
}

fn set_matches(desired: &[Value], current: &[Value], elem: &AttributeType) -> bool {
    if desired.len() != current.len() {
        return false;
    }
    let mut used = vec![false; current.len()];
    for dv in desired {
        let found = current
            .iter()
            .enumerate()
            .position(|(i, cv)| !used[i] && value_matches(dv, cv, Some(elem)));
        match found {
            Some(i) => used[i] = true,
            None => return false,
        }
    }
    true
}

fn element_type(attr_type: Option<&AttributeType>) -> Option<&AttributeType> {
    match attr_type {
        Some(AttributeType::List(inner) | AttributeType::Set(inner)) => Some(inner.as_ref()),
        Some(AttributeType::Custom { base, .. }) => element_type(Some(base.as_ref())),
        _ => None,
    }
}

fn member_type<'a>(attr_type: Option<&'a AttributeType>, key: &str) -> Option<&'a AttributeType> {
    match attr_type {
        Some(AttributeType::Block(block)) => block.attributes.get(key).map(|a| &a.attr_type),
        Some(AttributeType::Map(inner)) => Some(inner.as_ref()),
        Some(AttributeType::Custom { base, .. }) => member_type(Some(base.as_ref()), key),
        _ => None,
    }
}

/// The block schema of a list or set of blocks, and whether it is ordered
fn nested_block(attr_type: &AttributeType) -> Option<(&BlockSchema, bool)> {
    match attr_type {
        AttributeType::List(inner) => match inner.as_ref() {
            AttributeType::Block(block) => Some((block, true)),
            _ => None,
        },
        AttributeType::Set(inner) => match inner.as_ref() {
            AttributeType::Block(block) => Some((block, false)),
            _ => None,
        },
        AttributeType::Custom { base, .. } => nested_block(base),
        _ => None,
    }
}

/// Whether a changed attribute can only be applied by replacing the resource
///
/// List blocks are compared element by element. A set element that differs
/// forces replacement unless some current element agrees with it on every
/// force-new attribute.
fn requires_replacement(attr: &AttributeSchema, desired: &Value, current: Option<&Value>) -> bool {
    if attr.force_new {
        return true;
    }
    let (Some((block, ordered)), Value::List(d)) = (nested_block(&attr.attr_type), desired) else {
        return false;
    };
    let c: &[Value] = match current {
        Some(Value::List(c)) => c,
        _ => &[],
    };

    if ordered {
        d.iter()
            .enumerate()
            .any(|(i, dv)| block_requires_replacement(block, dv, c.get(i)))
    } else {
        let elem = element_type(Some(&attr.attr_type));
        d.iter()
            .filter(|dv| !c.iter().any(|cv| value_matches(dv, cv, elem)))
            .any(|dv| {
                if c.is_empty() {
                    block_requires_replacement(block, dv, None)
                } else {
                    c.iter().all(|cv| block_requires_replacement(block, dv, Some(cv)))
                }
            })
    }
}

fn block_requires_replacement(block: &BlockSchema, desired: &Value, current: Option<&Value>) -> bool {
    let Value::Map(d) = desired else {
        return false;
    };
    let c = match current {
        Some(Value::Map(c)) => Some(c),
        _ => None,
    };
    d.iter().any(|(key, dv)| {
        let Some(attr) = block.attributes.get(key) else {
            return false;
        };
        let cv = c.and_then(|c| c.get(key));
        if cv.is_some_and(|cv| value_matches(dv, cv, Some(&attr.attr_type))) {
            return false;
        }
        requires_replacement(attr, dv, cv)
    })
}

/// Compute Diff for multiple resources and generate a Plan
///
/// States whose address no longer appears in `desired` are planned for
/// deletion.
pub fn create_plan(
    desired: &[Resource],
    current_states: &HashMap<ResourceAddress, State>,
    schemas: &HashMap<String, ResourceSchema>,
) -> Plan {
    let mut plan = Plan::new();

    for resource in desired {
        let current = current_states
            .get(&resource.address)
            .cloned()
            .unwrap_or_else(|| State::not_found(resource.address.clone()));

        let d = diff(
            resource,
            &current,
            schemas.get(&resource.address.resource_type),
        );
        add_diff(&mut plan, d);
    }

    let mut orphans: Vec<&State> = current_states
        .values()
        .filter(|s| s.exists && !desired.iter().any(|r| r.address == s.address))
        .collect();
    orphans.sort_by(|a, b| a.address.to_string().cmp(&b.address.to_string()));
    for state in orphans {
        add_diff(&mut plan, Diff::Delete(state.clone()));
    }

    plan
}

fn add_diff(plan: &mut Plan, d: Diff) {
    match d {
        Diff::Create(r) => plan.add(Effect::Create(r)),
        Diff::Update {
            address,
            from,
            to,
            changed_attributes,
        } => plan.add(Effect::Update {
            address,
            from,
            to,
            changed_attributes,
        }),
        Diff::Replace {
            from,
            to,
            changed_attributes,
        } => plan.add(Effect::Replace {
            from,
            to,
            changed_attributes,
        }),
        Diff::NoChange(_) => {}
        Diff::Delete(state) => match state.identifier {
            Some(identifier) => plan.add(Effect::Delete {
                address: state.address,
                identifier,
            }),
            None => log::warn!(
                "{} has no recorded resource ID, skipping deletion",
                state.address
            ),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(name: &str) -> ResourceAddress {
        ResourceAddress::new("data_factory", name)
    }

    #[test]
    fn diff_create_when_not_exists() {
        let desired = Resource::new("data_factory", "test");
        let current = State::not_found(address("test"));

        let result = diff(&desired, &current, None);
        assert!(matches!(result, Diff::Create(_)));
    }

    #[test]
    fn diff_no_change_when_same() {
        let desired = Resource::new("data_factory", "test").with_attribute("location", "westeurope");

        let mut attrs = HashMap::new();
        attrs.insert("location".to_string(), Value::string("westeurope"));
        attrs.insert("id".to_string(), Value::string("/subscriptions/x"));
        let current = State::existing(address("test"), attrs);

        let result = diff(&desired, &current, None);
        assert!(matches!(result, Diff::NoChange(_)));
    }

    #[test]
    fn diff_update_when_different() {
        let desired = Resource::new("data_factory", "test")
            .with_attribute("public_network_enabled", false);

        let mut attrs = HashMap::new();
        attrs.insert("public_network_enabled".to_string(), Value::Bool(true));
        let current = State::existing(address("test"), attrs);

        let result = diff(&desired, &current, None);
        match result {
            Diff::Update {
                changed_attributes, ..
            } => {
                assert_eq!(changed_attributes, vec!["public_network_enabled"]);
            }
            _ => panic!("Expected Update"),
        }
    }

    #[test]
    fn diff_replace_when_force_new_changes() {
        let schema = ResourceSchema::new("data_factory")
            .attribute(AttributeSchema::new("location", AttributeType::String).force_new());
        let desired = Resource::new("data_factory", "test").with_attribute("location", "eastus");

        let mut attrs = HashMap::new();
        attrs.insert("location".to_string(), Value::string("westeurope"));
        let current = State::existing(address("test"), attrs);

        let result = diff(&desired, &current, Some(&schema));
        assert!(matches!(result, Diff::Replace { .. }));
    }

    #[test]
    fn nested_computed_values_are_not_drift() {
        let mut desired_disk = HashMap::new();
        desired_disk.insert("caching".to_string(), Value::string("ReadWrite"));
        let desired = Resource::new("scale_set", "test")
            .with_attribute("os_disk", Value::block(desired_disk.clone()));

        let mut current_disk = desired_disk;
        current_disk.insert("disk_size_gb".to_string(), Value::Int(30));
        let mut attrs = HashMap::new();
        attrs.insert("os_disk".to_string(), Value::block(current_disk));
        let current = State::existing(ResourceAddress::new("scale_set", "test"), attrs);

        assert!(!diff(&desired, &current, None).is_change());
    }

    fn os_disk_schema() -> ResourceSchema {
        ResourceSchema::new("scale_set").attribute(AttributeSchema::new(
            "os_disk",
            AttributeType::block_list(
                BlockSchema::new()
                    .attribute(AttributeSchema::new("caching", AttributeType::String))
                    .attribute(
                        AttributeSchema::new("storage_account_type", AttributeType::String)
                            .force_new(),
                    )
                    .attribute(AttributeSchema::new(
                        "diff_disk_settings",
                        AttributeType::block_list(BlockSchema::new().attribute(
                            AttributeSchema::new("option", AttributeType::String).force_new(),
                        )),
                    )),
            ),
        ))
    }

    fn os_disk(pairs: &[(&str, Value)]) -> Value {
        Value::block(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        )
    }

    fn scale_set_state(os_disk: Value) -> State {
        let mut attrs = HashMap::new();
        attrs.insert("os_disk".to_string(), os_disk);
        State::existing(ResourceAddress::new("scale_set", "test"), attrs)
    }

    #[test]
    fn nested_force_new_change_replaces() {
        let schema = os_disk_schema();
        let current = scale_set_state(os_disk(&[
            ("caching", Value::string("ReadWrite")),
            ("storage_account_type", Value::string("Standard_LRS")),
        ]));

        let desired = Resource::new("scale_set", "test").with_attribute(
            "os_disk",
            os_disk(&[
                ("caching", Value::string("ReadWrite")),
                ("storage_account_type", Value::string("Premium_LRS")),
            ]),
        );
        match diff(&desired, &current, Some(&schema)) {
            Diff::Replace {
                changed_attributes, ..
            } => assert_eq!(changed_attributes, vec!["os_disk"]),
            other => panic!("Expected Replace, got {:?}", other),
        }

        let caching_only = Resource::new("scale_set", "test").with_attribute(
            "os_disk",
            os_disk(&[
                ("caching", Value::string("ReadOnly")),
                ("storage_account_type", Value::string("Standard_LRS")),
            ]),
        );
        assert!(matches!(
            diff(&caching_only, &current, Some(&schema)),
            Diff::Update { .. }
        ));
    }

    #[test]
    fn adding_block_with_force_new_leaf_replaces() {
        let schema = os_disk_schema();
        let current = scale_set_state(os_disk(&[
            ("caching", Value::string("ReadOnly")),
            ("storage_account_type", Value::string("Standard_LRS")),
        ]));
        let mut settings = HashMap::new();
        settings.insert("option".to_string(), Value::string("Local"));
        let desired = Resource::new("scale_set", "test").with_attribute(
            "os_disk",
            os_disk(&[
                ("caching", Value::string("ReadOnly")),
                ("storage_account_type", Value::string("Standard_LRS")),
                ("diff_disk_settings", Value::block(settings)),
            ]),
        );

        assert!(matches!(
            diff(&desired, &current, Some(&schema)),
            Diff::Replace { .. }
        ));
    }

    fn extension(name: &str, version: &str) -> Value {
        let mut attrs = HashMap::new();
        attrs.insert("name".to_string(), Value::string(name));
        attrs.insert("type_handler_version".to_string(), Value::string(version));
        Value::Map(attrs)
    }

    fn extension_schema() -> ResourceSchema {
        ResourceSchema::new("scale_set")
            .attribute(AttributeSchema::new(
                "extension",
                AttributeType::block_set(
                    BlockSchema::new()
                        .attribute(AttributeSchema::new("name", AttributeType::String).force_new())
                        .attribute(AttributeSchema::new(
                            "type_handler_version",
                            AttributeType::String,
                        )),
                ),
            ))
            .attribute(AttributeSchema::new(
                "security_group_ids",
                AttributeType::Set(Box::new(AttributeType::String)),
            ))
            .attribute(AttributeSchema::new(
                "dns_servers",
                AttributeType::List(Box::new(AttributeType::String)),
            ))
    }

    #[test]
    fn set_order_is_not_drift() {
        let schema = extension_schema();

        let mut computed = extension("beta", "1.0");
        if let Value::Map(attrs) = &mut computed {
            attrs.insert("provisioning_state".to_string(), Value::string("Succeeded"));
        }
        let mut attrs = HashMap::new();
        attrs.insert(
            "extension".to_string(),
            Value::List(vec![computed, extension("alpha", "1.0")]),
        );
        attrs.insert("security_group_ids".to_string(), Value::strings(["b", "a"]));
        attrs.insert("dns_servers".to_string(), Value::strings(["10.0.0.4", "10.0.0.5"]));
        let current = State::existing(ResourceAddress::new("scale_set", "test"), attrs);

        let desired = Resource::new("scale_set", "test")
            .with_attribute(
                "extension",
                Value::List(vec![extension("alpha", "1.0"), extension("beta", "1.0")]),
            )
            .with_attribute("security_group_ids", Value::strings(["a", "b"]))
            .with_attribute("dns_servers", Value::strings(["10.0.0.4", "10.0.0.5"]));
        assert!(!diff(&desired, &current, Some(&schema)).is_change());

        let reordered_list = desired
            .clone()
            .with_attribute("dns_servers", Value::strings(["10.0.0.5", "10.0.0.4"]));
        match diff(&reordered_list, &current, Some(&schema)) {
            Diff::Update {
                changed_attributes, ..
            } => assert_eq!(changed_attributes, vec!["dns_servers"]),
            other => panic!("Expected Update, got {:?}", other),
        }
    }

    #[test]
    fn set_element_change_replaces_only_on_force_new() {
        let schema = extension_schema();
        let mut attrs = HashMap::new();
        attrs.insert(
            "extension".to_string(),
            Value::List(vec![extension("alpha", "1.0"), extension("beta", "1.0")]),
        );
        let current = State::existing(ResourceAddress::new("scale_set", "test"), attrs);

        let upgraded = Resource::new("scale_set", "test").with_attribute(
            "extension",
            Value::List(vec![extension("beta", "1.0"), extension("alpha", "2.0")]),
        );
        assert!(matches!(
            diff(&upgraded, &current, Some(&schema)),
            Diff::Update { .. }
        ));

        let renamed = Resource::new("scale_set", "test").with_attribute(
            "extension",
            Value::List(vec![extension("beta", "1.0"), extension("gamma", "1.0")]),
        );
        assert!(matches!(
            diff(&renamed, &current, Some(&schema)),
            Diff::Replace { .. }
        ));
    }

    #[test]
    fn create_plan_from_resources() {
        let resources = vec![
            Resource::new("data_factory", "new"),
            Resource::new("data_factory", "existing").with_attribute("managed_identity", true),
        ];

        let mut current_states = HashMap::new();
        let mut attrs = HashMap::new();
        attrs.insert("managed_identity".to_string(), Value::Bool(false));
        current_states.insert(
            address("existing"),
            State::existing(address("existing"), attrs),
        );
        current_states.insert(
            address("removed"),
            State::existing(address("removed"), HashMap::new())
                .with_identifier("/subscriptions/x/resourceGroups/rg/providers/Microsoft.DataFactory/factories/removed"),
        );

        let plan = create_plan(&resources, &current_states, &HashMap::new());

        assert_eq!(plan.effects().len(), 3);
        assert!(matches!(plan.effects()[0], Effect::Create(_)));
        assert!(matches!(plan.effects()[1], Effect::Update { .. }));
        assert!(matches!(plan.effects()[2], Effect::Delete { .. }));
    }
}
