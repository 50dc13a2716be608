//! Client-side checks on request parameters, run before any request is sent.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

static RESOURCE_GROUP_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-\w\._\(\)]+$").expect("resource group pattern compiles"));

fn invalid(operation: &str, target: &str, message: impl Into<String>) -> Error {
    Error::Validation {
        operation: operation.to_string(),
        target: target.to_string(),
        message: message.into(),
    }
}

pub fn subscription_id(operation: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(invalid(operation, "subscriptionId", "must have a length of at least 1"));
    }
    Ok(())
}

/// Resource group names: 1 to 90 characters of word characters, `-`, `.`, `_`, `(` and `)`
pub fn resource_group_name(operation: &str, value: &str) -> Result<()> {
    let length = value.chars().count();
    if length > 90 {
        return Err(invalid(operation, "resourceGroupName", "must have a length of at most 90"));
    }
    if length < 1 {
        return Err(invalid(operation, "resourceGroupName", "must have a length of at least 1"));
    }
    if !RESOURCE_GROUP_NAME.is_match(value) {
        return Err(invalid(
            operation,
            "resourceGroupName",
            format!("must match pattern {}", RESOURCE_GROUP_NAME.as_str()),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_group_names() {
        assert!(resource_group_name("op", "my-rg_1.(test)").is_ok());
        assert!(resource_group_name("op", "").is_err());
        assert!(resource_group_name("op", &"a".repeat(90)).is_ok());
        assert!(resource_group_name("op", &"a".repeat(91)).is_err());

        let err = resource_group_name("WorkspaceAadAdminsClient.Get", "bad/name").unwrap_err();
        assert_eq!(
            err.to_string(),
            r"WorkspaceAadAdminsClient.Get: invalid value for resourceGroupName: must match pattern ^[-\w\._\(\)]+$"
        );
    }

    #[test]
    fn subscription_must_not_be_empty() {
        assert!(subscription_id("op", "").is_err());
        assert!(subscription_id("op", "00000000-0000-0000-0000-000000000000").is_ok());
    }
}
