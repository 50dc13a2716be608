use azurerm_core::features::Features;
use azurerm_core::resource::{AttributesExt, Value};
use azurerm_core::schema::{AttributeSchema, AttributeType, BlockSchema};
use azurerm_core::validation::{iso8601_duration, iso8601_duration_between};
use azurerm_sdk::services::compute::virtual_machine_scale_sets::{
    AutomaticOsUpgradePolicy, AutomaticRepairsPolicy, RollingUpgradePolicy, ScheduledEventsProfile,
    TerminateNotificationProfile,
};

use super::{block, first_block};
use crate::error::{ExpandError, ExpandResult};

const DEFAULT_TERMINATION_TIMEOUT: &str = "PT5M";
const DEFAULT_REPAIRS_GRACE_PERIOD: &str = "PT30M";

fn or_default(value: &str, default: &str) -> String {
    if value.is_empty() { default } else { value }.to_string()
}

pub fn automatic_os_upgrade_policy_schema() -> AttributeSchema {
    AttributeSchema::new(
        "automatic_os_upgrade_policy",
        AttributeType::block_list(
            BlockSchema::new()
                .attribute(AttributeSchema::new("disable_automatic_rollback", AttributeType::Bool).required())
                .attribute(AttributeSchema::new("enable_automatic_os_upgrade", AttributeType::Bool).required()),
        ),
    )
    .max_items(1)
}

pub fn expand_automatic_os_upgrade_policy(input: &[Value]) -> Option<AutomaticOsUpgradePolicy> {
    let raw = first_block(input)?;
    Some(AutomaticOsUpgradePolicy {
        disable_automatic_rollback: Some(raw.bool_or("disable_automatic_rollback", false)),
        enable_automatic_os_upgrade: Some(raw.bool_or("enable_automatic_os_upgrade", false)),
    })
}

pub fn flatten_automatic_os_upgrade_policy(input: Option<&AutomaticOsUpgradePolicy>) -> Vec<Value> {
    let Some(input) = input else {
        return Vec::new();
    };
    vec![block([
        (
            "disable_automatic_rollback",
            Value::Bool(input.disable_automatic_rollback.unwrap_or(false)),
        ),
        (
            "enable_automatic_os_upgrade",
            Value::Bool(input.enable_automatic_os_upgrade.unwrap_or(false)),
        ),
    ])]
}

pub fn rolling_upgrade_policy_schema() -> AttributeSchema {
    AttributeSchema::new(
        "rolling_upgrade_policy",
        AttributeType::block_list(
            BlockSchema::new()
                .attribute(AttributeSchema::new("cross_zone_upgrades_enabled", AttributeType::Bool))
                .attribute(AttributeSchema::new("max_batch_instance_percent", AttributeType::Int).required())
                .attribute(AttributeSchema::new("max_unhealthy_instance_percent", AttributeType::Int).required())
                .attribute(
                    AttributeSchema::new("max_unhealthy_upgraded_instance_percent", AttributeType::Int).required(),
                )
                .attribute(AttributeSchema::new("pause_time_between_batches", iso8601_duration()).required())
                .attribute(AttributeSchema::new(
                    "prioritize_unhealthy_instances_enabled",
                    AttributeType::Bool,
                )),
        ),
    )
    .force_new()
    .max_items(1)
}

/// Cross-zone upgrades only apply to scale sets deployed into zones
pub fn expand_rolling_upgrade_policy(input: &[Value], is_zonal: bool) -> ExpandResult<Option<RollingUpgradePolicy>> {
    let Some(raw) = first_block(input) else {
        return Ok(None);
    };

    let cross_zone = raw.bool_or("cross_zone_upgrades_enabled", false);
    if cross_zone && !is_zonal {
        return Err(ExpandError::conflict(
            "`rolling_upgrade_policy.0.cross_zone_upgrades_enabled` can only be set to `true` when `zones` is specified",
        ));
    }

    Ok(Some(RollingUpgradePolicy {
        enable_cross_zone_upgrade: is_zonal.then_some(cross_zone),
        max_batch_instance_percent: Some(raw.int_or("max_batch_instance_percent", 0)),
        max_unhealthy_instance_percent: Some(raw.int_or("max_unhealthy_instance_percent", 0)),
        max_unhealthy_upgraded_instance_percent: Some(raw.int_or("max_unhealthy_upgraded_instance_percent", 0)),
        pause_time_between_batches: Some(raw.str_or_empty("pause_time_between_batches").to_string()),
        prioritize_unhealthy_instances: Some(raw.bool_or("prioritize_unhealthy_instances_enabled", false)),
    }))
}

pub fn flatten_rolling_upgrade_policy(input: Option<&RollingUpgradePolicy>) -> Vec<Value> {
    let Some(input) = input else {
        return Vec::new();
    };
    vec![block([
        (
            "cross_zone_upgrades_enabled",
            Value::Bool(input.enable_cross_zone_upgrade.unwrap_or(false)),
        ),
        (
            "max_batch_instance_percent",
            Value::Int(input.max_batch_instance_percent.unwrap_or(0)),
        ),
        (
            "max_unhealthy_instance_percent",
            Value::Int(input.max_unhealthy_instance_percent.unwrap_or(0)),
        ),
        (
            "max_unhealthy_upgraded_instance_percent",
            Value::Int(input.max_unhealthy_upgraded_instance_percent.unwrap_or(0)),
        ),
        (
            "pause_time_between_batches",
            Value::string(input.pause_time_between_batches.clone().unwrap_or_default()),
        ),
        (
            "prioritize_unhealthy_instances_enabled",
            Value::Bool(input.prioritize_unhealthy_instances.unwrap_or(false)),
        ),
    ])]
}

fn notification_block() -> AttributeType {
    AttributeType::block_list(
        BlockSchema::new()
            .attribute(AttributeSchema::new("enabled", AttributeType::Bool).required())
            .attribute(
                AttributeSchema::new("timeout", iso8601_duration_between("PT5M", "PT15M"))
                    .with_default(DEFAULT_TERMINATION_TIMEOUT),
            ),
    )
}

// TODO: remove in 4.0
pub fn terminate_notification_schema() -> AttributeSchema {
    AttributeSchema::new("terminate_notification", notification_block())
        .computed()
        .max_items(1)
        .deprecated("`terminate_notification` has been renamed to `termination_notification` and will be removed in 4.0.")
        .conflicts_with(&["termination_notification"])
}

pub fn termination_notification_schema(features: Features) -> AttributeSchema {
    let schema = AttributeSchema::new("termination_notification", notification_block())
        .computed()
        .max_items(1);
    if features.four_point_oh_beta {
        schema
    } else {
        schema.conflicts_with(&["terminate_notification"])
    }
}

pub fn expand_scheduled_events_profile(input: &[Value]) -> Option<ScheduledEventsProfile> {
    let raw = first_block(input)?;
    Some(ScheduledEventsProfile {
        terminate_notification_profile: Some(TerminateNotificationProfile {
            enable: Some(raw.bool_or("enabled", false)),
            not_before_timeout: Some(or_default(raw.str_or_empty("timeout"), DEFAULT_TERMINATION_TIMEOUT)),
        }),
    })
}

/// Always yields one block: the service omits the profile once it is disabled
pub fn flatten_scheduled_events_profile(input: Option<&ScheduledEventsProfile>) -> Vec<Value> {
    let profile = input.and_then(|p| p.terminate_notification_profile.as_ref());
    let enabled = profile.and_then(|p| p.enable).unwrap_or(false);
    let timeout = profile
        .and_then(|p| p.not_before_timeout.clone())
        .unwrap_or_else(|| DEFAULT_TERMINATION_TIMEOUT.to_string());

    vec![block([
        ("enabled", Value::Bool(enabled)),
        ("timeout", Value::String(timeout)),
    ])]
}

pub fn automatic_repairs_policy_schema() -> AttributeSchema {
    AttributeSchema::new(
        "automatic_instance_repair",
        AttributeType::block_list(
            BlockSchema::new()
                .attribute(AttributeSchema::new("enabled", AttributeType::Bool).required())
                // the service accepts 30 to 90 minutes
                .attribute(
                    AttributeSchema::new("grace_period", iso8601_duration())
                        .with_default(DEFAULT_REPAIRS_GRACE_PERIOD),
                ),
        ),
    )
    .computed()
    .max_items(1)
}

pub fn expand_automatic_repairs_policy(input: &[Value]) -> Option<AutomaticRepairsPolicy> {
    let raw = first_block(input)?;
    Some(AutomaticRepairsPolicy {
        enabled: Some(raw.bool_or("enabled", false)),
        grace_period: Some(or_default(raw.str_or_empty("grace_period"), DEFAULT_REPAIRS_GRACE_PERIOD)),
    })
}

/// Always yields one block: the service omits the policy once it is disabled
pub fn flatten_automatic_repairs_policy(input: Option<&AutomaticRepairsPolicy>) -> Vec<Value> {
    let enabled = input.and_then(|p| p.enabled).unwrap_or(false);
    let grace_period = input
        .and_then(|p| p.grace_period.clone())
        .unwrap_or_else(|| DEFAULT_REPAIRS_GRACE_PERIOD.to_string());

    vec![block([
        ("enabled", Value::Bool(enabled)),
        ("grace_period", Value::String(grace_period)),
    ])]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rolling(cross_zone: bool) -> Vec<Value> {
        vec![block([
            ("cross_zone_upgrades_enabled", Value::Bool(cross_zone)),
            ("max_batch_instance_percent", Value::Int(21)),
            ("max_unhealthy_instance_percent", Value::Int(22)),
            ("max_unhealthy_upgraded_instance_percent", Value::Int(23)),
            ("pause_time_between_batches", Value::string("PT30S")),
            ("prioritize_unhealthy_instances_enabled", Value::Bool(true)),
        ])]
    }

    #[test]
    fn automatic_os_upgrade_policy() {
        let input = vec![block([
            ("disable_automatic_rollback", Value::Bool(true)),
            ("enable_automatic_os_upgrade", Value::Bool(false)),
        ])];
        let policy = expand_automatic_os_upgrade_policy(&input).unwrap();
        assert_eq!(policy.disable_automatic_rollback, Some(true));
        assert_eq!(flatten_automatic_os_upgrade_policy(Some(&policy)), input);
        assert!(expand_automatic_os_upgrade_policy(&[]).is_none());
    }

    #[test]
    fn cross_zone_upgrades_need_zones() {
        let err = expand_rolling_upgrade_policy(&rolling(true), false).unwrap_err();
        assert_eq!(
            err.to_string(),
            "`rolling_upgrade_policy.0.cross_zone_upgrades_enabled` can only be set to `true` when `zones` is specified"
        );

        let regional = expand_rolling_upgrade_policy(&rolling(false), false).unwrap().unwrap();
        assert_eq!(regional.enable_cross_zone_upgrade, None);

        let zonal = expand_rolling_upgrade_policy(&rolling(true), true).unwrap().unwrap();
        assert_eq!(zonal.enable_cross_zone_upgrade, Some(true));
        assert_eq!(flatten_rolling_upgrade_policy(Some(&zonal)), rolling(true));

        assert!(expand_rolling_upgrade_policy(&[], false).unwrap().is_none());
    }

    #[test]
    fn scheduled_events_default_when_absent() {
        let flattened = flatten_scheduled_events_profile(None);
        let raw = flattened[0].as_map().unwrap();
        assert!(!raw.bool_or("enabled", true));
        assert_eq!(raw.str_or_empty("timeout"), "PT5M");

        let input = vec![block([
            ("enabled", Value::Bool(true)),
            ("timeout", Value::string("PT10M")),
        ])];
        let profile = expand_scheduled_events_profile(&input).unwrap();
        assert_eq!(flatten_scheduled_events_profile(Some(&profile)), input);
    }

    #[test]
    fn notification_schemas_conflict_before_four_point_oh() {
        assert_eq!(
            termination_notification_schema(Features::default()).conflicts_with,
            vec!["terminate_notification"]
        );
        assert!(termination_notification_schema(Features::four_point_oh()).conflicts_with.is_empty());
        assert!(terminate_notification_schema().deprecated.is_some());
    }

    #[test]
    fn automatic_repairs_default_when_absent() {
        let flattened = flatten_automatic_repairs_policy(None);
        let raw = flattened[0].as_map().unwrap();
        assert!(!raw.bool_or("enabled", true));
        assert_eq!(raw.str_or_empty("grace_period"), "PT30M");

        let input = vec![block([
            ("enabled", Value::Bool(true)),
            ("grace_period", Value::string("PT60M")),
        ])];
        let policy = expand_automatic_repairs_policy(&input).unwrap();
        assert_eq!(flatten_automatic_repairs_policy(Some(&policy)), input);
    }
}
