use azurerm_core::schema::AttributeType;
use azurerm_core::validation::{resource_id, string_custom};

use super::parse::{DiskEncryptionSetId, GalleryApplicationVersionId};

const DISALLOWED_PASSWORDS: [&str; 10] = [
    "abc@123",
    "P@$$w0rd",
    "P@ssw0rd",
    "P@ssword123",
    "Pa$$word",
    "pass@word1",
    "Password!",
    "Password1",
    "Password22",
    "iloveyou!",
];

/// Every reason `value` is not accepted as a Linux VM admin password
///
/// Azure requires 6 to 72 characters, rejects a list of common passwords and
/// wants 3 of: a lower case letter, an upper case letter, a digit and a
/// special character other than `_`.
pub fn linux_admin_password_errors(value: &str, key: &str) -> Vec<String> {
    if value.trim().is_empty() {
        return vec![format!("{:?} must not be empty", key)];
    }

    let mut errors = Vec::new();
    if value.len() < 6 || value.len() > 72 {
        errors.push(format!(
            "{:?} most be between {} and {} characters, got {}",
            key,
            6,
            72,
            value.len()
        ));
    }

    if DISALLOWED_PASSWORDS.contains(&value) {
        errors.push(format!(
            "{:?} specified is not allowed, got {:?}, cannot match: {:?}",
            key,
            value,
            DISALLOWED_PASSWORDS.join(", ")
        ));
    }

    let checks: [fn(char) -> bool; 4] = [
        |c| c.is_ascii_lowercase(),
        |c| c.is_ascii_uppercase(),
        |c| c.is_ascii_digit(),
        |c| !(c.is_ascii_alphanumeric() || c == '_'),
    ];
    let conditions = checks.iter().filter(|check| value.chars().any(|c| check(c))).count();
    if conditions < 3 {
        errors.push(format!(
            "{:?} has to fulfill 3 out of these 4 conditions: Has lower characters, Has upper characters, Has a digit, Has a special character other than \"_\", fullfiled only {} conditions",
            key, conditions
        ));
    }

    errors
}

pub fn linux_admin_password() -> AttributeType {
    string_custom("LinuxAdminPassword", |s| {
        let errors = linux_admin_password_errors(s, "admin_password");
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors.join("; "))
        }
    })
}

pub fn disk_encryption_set_id() -> AttributeType {
    resource_id::<DiskEncryptionSetId>()
}

pub fn gallery_application_version_id() -> AttributeType {
    resource_id::<GalleryApplicationVersionId>()
}
