//! Test helpers for resource ID types

use crate::{ResourceId, format_id};

/// Shared test table for resource ID types
///
/// Builds the example ID from the template, checks the format/parse round
/// trip, that every truncation of the example is rejected by both parsers,
/// that an upper-cased ID is rejected by the case-sensitive parser and that
/// the insensitive parser accepts upper-cased fixed segments.
pub fn check_resource_id<T: ResourceId + std::fmt::Debug + PartialEq>() {
    let segments = T::segments();
    let example_values: Vec<String> = segments
        .iter()
        .filter(|s| s.is_value())
        .map(|s| s.example_value())
        .collect();
    let expected = T::from_values(example_values.clone());
    let id = format_id(&segments, &example_values);

    assert_eq!(expected.id(), id, "formatter");
    assert_eq!(T::parse(&id).as_ref(), Ok(&expected), "parse {}", id);
    assert_eq!(
        T::parse_insensitively(&id).as_ref(),
        Ok(&expected),
        "parse insensitively {}",
        id
    );

    assert!(T::parse("").is_err(), "empty");
    assert!(T::parse("/").is_err(), "root");
    let mut prefix = String::new();
    for component in id.trim_start_matches('/').split('/') {
        let truncated = format!("{}/", prefix);
        assert!(T::parse(&truncated).is_err(), "truncated {}", truncated);
        assert!(
            T::parse_insensitively(&truncated).is_err(),
            "truncated insensitively {}",
            truncated
        );
        prefix = format!("{}/{}", prefix, component);
    }

    let upper = id.to_uppercase();
    if upper != id {
        assert!(T::parse(&upper).is_err(), "upper-cased {}", upper);
    }

    let mut fixed_upper = String::new();
    let mut values = example_values.iter();
    for segment in &segments {
        fixed_upper.push('/');
        match segment.fixed_value() {
            Some(fixed) => fixed_upper.push_str(&fixed.to_uppercase()),
            None => fixed_upper.push_str(values.next().map(String::as_str).unwrap_or("")),
        }
    }
    let parsed = T::parse_insensitively(&fixed_upper);
    assert_eq!(parsed.as_ref(), Ok(&expected), "upper-cased fixed {}", fixed_upper);
    assert_eq!(parsed.map(|p| p.id()), Ok(id), "canonical casing");
}
