//! Typed string enums for API constants.
//!
//! ARM adds enum values between API versions, so unknown values are kept in
//! an `Other` variant instead of failing to decode.

/// Declare a string enum with case-insensitive parsing and an `Other` fallback
///
/// ```ignore
/// string_enum! {
///     CachingTypes {
///         None => "None",
///         ReadOnly => "ReadOnly",
///         ReadWrite => "ReadWrite",
///     }
/// }
/// ```
#[macro_export]
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $value:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
            /// A value not known to this API version
            Other(String),
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $value,)+
                    Self::Other(value) => value,
                }
            }

            pub fn possible_values() -> &'static [&'static str] {
                &[$($value),+]
            }

            /// Parse ignoring case; unknown values become `Other`
            pub fn parse(input: &str) -> Self {
                $(
                    if input.eq_ignore_ascii_case($value) {
                        return Self::$variant;
                    }
                )+
                Self::Other(input.to_string())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::parse(value)
            }
        }

        impl $crate::__serde::Serialize for $name {
            fn serialize<S: $crate::__serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> $crate::__serde::Deserialize<'de> for $name {
            fn deserialize<D: $crate::__serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = <String as $crate::__serde::Deserialize>::deserialize(deserializer)?;
                Ok(Self::parse(&value))
            }
        }
    };
}

#[cfg(test)]
mod tests {
    crate::string_enum! {
        Caching {
            None => "None",
            ReadOnly => "ReadOnly",
            ReadWrite => "ReadWrite",
        }
    }

    #[test]
    fn parses_ignoring_case() {
        assert_eq!(Caching::parse("readonly"), Caching::ReadOnly);
        assert_eq!(Caching::parse("ReadWrite").as_str(), "ReadWrite");
        assert_eq!(
            Caching::parse("WriteOnly"),
            Caching::Other("WriteOnly".to_string())
        );
    }

    #[test]
    fn serde_uses_wire_value() {
        let json = serde_json::to_string(&Caching::ReadOnly).unwrap();
        assert_eq!(json, "\"ReadOnly\"");
        let parsed: Caching = serde_json::from_str("\"none\"").unwrap();
        assert_eq!(parsed, Caching::None);
        let other: Caching = serde_json::from_str("\"Future\"").unwrap();
        assert_eq!(other.to_string(), "Future");
    }

    #[test]
    fn possible_values_in_declaration_order() {
        assert_eq!(Caching::possible_values(), &["None", "ReadOnly", "ReadWrite"]);
    }
}
