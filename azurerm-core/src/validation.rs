//! Reusable attribute validators
//!
//! Each helper returns an [`AttributeType::Custom`] wrapping its base type,
//! so schemas read like `AttributeSchema::new("lun", int_between(0, 2000))`.

use std::sync::LazyLock;

use azurerm_resourceids::{ResourceId, validate_resource_id};
use regex::Regex;

use crate::resource::Value;
use crate::schema::{AttributeType, ValidateFn};

/// Build a custom attribute type from a base type and a validation function
pub fn custom(
    name: impl Into<String>,
    base: AttributeType,
    validate: impl Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
) -> AttributeType {
    AttributeType::Custom {
        name: name.into(),
        base: Box::new(base),
        validate: ValidateFn::new(validate),
    }
}

/// Build a custom string type from a function over `&str`
pub fn string_custom(
    name: impl Into<String>,
    validate: impl Fn(&str) -> Result<(), String> + Send + Sync + 'static,
) -> AttributeType {
    custom(name, AttributeType::String, move |value| match value {
        Value::String(s) => validate(s),
        _ => Err("Expected string".to_string()),
    })
}

fn int_custom(
    name: impl Into<String>,
    validate: impl Fn(i64) -> Result<(), String> + Send + Sync + 'static,
) -> AttributeType {
    custom(name, AttributeType::Int, move |value| match value {
        Value::Int(i) => validate(*i),
        _ => Err("Expected integer".to_string()),
    })
}

pub fn string_is_not_empty() -> AttributeType {
    string_custom("NonEmptyString", |s| {
        if s.is_empty() {
            Err("expected value to not be an empty string".to_string())
        } else {
            Ok(())
        }
    })
}

/// String restricted to a fixed set of values
pub fn string_in_slice(values: &[&str], ignore_case: bool) -> AttributeType {
    if !ignore_case {
        return AttributeType::Enum(values.iter().map(|v| v.to_string()).collect());
    }
    let allowed: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    string_custom("CaseInsensitiveEnum", move |s| {
        if allowed.iter().any(|v| v.eq_ignore_ascii_case(s)) {
            Ok(())
        } else {
            Err(format!(
                "expected value to be one of [{}], got {}",
                allowed.join(" "),
                s
            ))
        }
    })
}

pub fn int_between(min: i64, max: i64) -> AttributeType {
    int_custom(format!("IntBetween({}, {})", min, max), move |i| {
        if (min..=max).contains(&i) {
            Ok(())
        } else {
            Err(format!(
                "expected value to be in the range ({} - {}), got {}",
                min, max, i
            ))
        }
    })
}

pub fn int_at_least(min: i64) -> AttributeType {
    int_custom(format!("IntAtLeast({})", min), move |i| {
        if i >= min {
            Ok(())
        } else {
            Err(format!("expected value to be at least ({}), got {}", min, i))
        }
    })
}

pub fn is_url_with_http_or_https() -> AttributeType {
    string_custom("HttpUrl", |s| {
        if s.is_empty() {
            return Err("expected value to not be empty".to_string());
        }
        let url = url::Url::parse(s)
            .map_err(|e| format!("expected value to be a valid url, got {}: {}", s, e))?;
        if url.host_str().is_none_or(str::is_empty) {
            return Err(format!("expected value to have a host, got {}", s));
        }
        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(format!(
                "expected value to have a url with schema of: \"http,https\", got {}",
                other
            )),
        }
    })
}

pub fn string_is_json() -> AttributeType {
    string_custom("Json", |s| {
        if s.is_empty() {
            return Err("expected value to not be an empty string".to_string());
        }
        serde_json::from_str::<serde_json::Value>(s)
            .map(|_| ())
            .map_err(|e| format!("expected value to be valid JSON: {}", e))
    })
}

static BASE64: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9+/]*={0,2}$").expect("base64 pattern is valid")
});

/// Standard (padded) base64
pub fn string_is_base64() -> AttributeType {
    string_custom("Base64", |s| {
        if s.is_empty() {
            return Err("expected value to not be an empty string".to_string());
        }
        if s.len() % 4 != 0 || !BASE64.is_match(s) {
            return Err(format!("expected value to be a base64 string, got {}", s));
        }
        Ok(())
    })
}

/// String that must parse as the resource ID type `T`
pub fn resource_id<T: ResourceId + 'static>() -> AttributeType {
    string_custom(format!("{}Id", T::DESCRIPTION.replace(' ', "")), |s| {
        validate_resource_id::<T>(s, "value")
    })
}

static ISO8601_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^P(?:(\d+)Y)?(?:(\d+)M)?(?:(\d+)W)?(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+(?:\.\d+)?)S)?)?$",
    )
    .expect("ISO 8601 duration pattern is valid")
});

/// Parse an ISO 8601 duration (e.g. `PT1H30M`) into seconds
///
/// Years count as 365 days and months as 30 days.
pub fn parse_iso8601_duration(s: &str) -> Result<f64, String> {
    let invalid = || format!("expected value to be an ISO 8601 duration, got {:?}", s);

    if s == "P" || s.ends_with('T') {
        return Err(invalid());
    }
    let caps = ISO8601_DURATION.captures(s).ok_or_else(invalid)?;

    const UNITS: [f64; 7] = [
        365.0 * 86400.0,
        30.0 * 86400.0,
        7.0 * 86400.0,
        86400.0,
        3600.0,
        60.0,
        1.0,
    ];
    let mut seconds = 0.0;
    for (i, unit) in UNITS.iter().enumerate() {
        if let Some(m) = caps.get(i + 1) {
            let n: f64 = m.as_str().parse().map_err(|_| invalid())?;
            seconds += n * unit;
        }
    }
    Ok(seconds)
}

pub fn iso8601_duration() -> AttributeType {
    string_custom("Iso8601Duration", |s| parse_iso8601_duration(s).map(|_| ()))
}

/// ISO 8601 duration within an inclusive range of durations
pub fn iso8601_duration_between(min: &str, max: &str) -> AttributeType {
    let (min, max) = (min.to_string(), max.to_string());
    string_custom(format!("Iso8601DurationBetween({}, {})", min, max), move |s| {
        let value = parse_iso8601_duration(s)?;
        let lower = parse_iso8601_duration(&min)?;
        let upper = parse_iso8601_duration(&max)?;
        if value < lower || value > upper {
            return Err(format!(
                "expected value to be in the range ({} - {}), got {}",
                min, max, s
            ));
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Value {
        Value::String(v.to_string())
    }

    #[test]
    fn int_between_bounds_inclusive() {
        let t = int_between(4, 32);
        assert!(t.validate(&Value::Int(4)).is_ok());
        assert!(t.validate(&Value::Int(32)).is_ok());
        assert!(t.validate(&Value::Int(3)).is_err());
        assert!(t.validate(&Value::Int(33)).is_err());
        assert!(t.validate(&s("4")).is_err());
    }

    #[test]
    fn int_at_least_rejects_lower() {
        let t = int_at_least(1);
        assert!(t.validate(&Value::Int(1)).is_ok());
        assert!(t.validate(&Value::Int(0)).is_err());
    }

    #[test]
    fn string_in_slice_case_handling() {
        let sensitive = string_in_slice(&["Default", "NewestVM"], false);
        assert!(sensitive.validate(&s("NewestVM")).is_ok());
        assert!(sensitive.validate(&s("newestvm")).is_err());

        let insensitive = string_in_slice(&["Default", "NewestVM"], true);
        assert!(insensitive.validate(&s("newestvm")).is_ok());
        assert!(insensitive.validate(&s("OldestVM")).is_err());
    }

    #[test]
    fn url_scheme_checked() {
        let t = is_url_with_http_or_https();
        assert!(t.validate(&s("https://example.blob.core.windows.net/app")).is_ok());
        assert!(t.validate(&s("ftp://example.com/app")).is_err());
        assert!(t.validate(&s("not a url")).is_err());
        assert!(t.validate(&s("")).is_err());
    }

    #[test]
    fn json_strings() {
        let t = string_is_json();
        assert!(t.validate(&s(r#"{"commandToExecute":"echo hi"}"#)).is_ok());
        assert!(t.validate(&s("{")).is_err());
    }

    #[test]
    fn iso8601_durations() {
        assert_eq!(parse_iso8601_duration("PT1H").unwrap(), 3600.0);
        assert_eq!(parse_iso8601_duration("PT15M").unwrap(), 900.0);
        assert_eq!(parse_iso8601_duration("P1DT2S").unwrap(), 86402.0);
        assert!(parse_iso8601_duration("P").is_err());
        assert!(parse_iso8601_duration("PT").is_err());
        assert!(parse_iso8601_duration("1H").is_err());
    }

    #[test]
    fn iso8601_duration_range() {
        let t = iso8601_duration_between("PT15M", "PT2H");
        assert!(t.validate(&s("PT15M")).is_ok());
        assert!(t.validate(&s("PT1H")).is_ok());
        assert!(t.validate(&s("PT2H")).is_ok());
        assert!(t.validate(&s("PT14M")).is_err());
        assert!(t.validate(&s("PT3H")).is_err());
    }

    #[test]
    fn resource_id_validator() {
        let t = resource_id::<azurerm_resourceids::SubnetId>();
        assert!(
            t.validate(&s(
                "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Network/virtualNetworks/vnet/subnets/default"
            ))
            .is_ok()
        );
        assert!(
            t.validate(&s(
                "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Network/virtualNetworks/vnet"
            ))
            .is_err()
        );
    }

    #[test]
    fn base64_strings() {
        let t = string_is_base64();
        assert!(t.validate(&s("IyEvYmluL2Jhc2gK")).is_ok());
        assert!(t.validate(&s("aGk=")).is_ok());
        assert!(t.validate(&s("aGk")).is_err());
        assert!(t.validate(&s("#!/bin/bash")).is_err());
    }

    #[test]
    fn not_empty() {
        let t = string_is_not_empty();
        assert!(t.validate(&s("x")).is_ok());
        assert!(t.validate(&s("")).is_err());
    }
}
