//! AzureRM Resource IDs
//!
//! Typed Azure Resource Manager resource IDs. Each ID type is declared from
//! its ARM path template with [`define_resource_id!`]; parsing walks the
//! template segment by segment, and formatting writes fixed segments back in
//! their canonical casing so that `parse(id).id() == id` for well-formed input.
//!
//! ```ignore
//! define_resource_id!(
//!     ExpressRoutePortId,
//!     "Express Route Port",
//!     "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Network/expressRoutePorts/{expressRoutePortName}",
//!     { subscription_id, resource_group_name, express_route_port_name }
//! );
//! ```

pub mod common;
pub mod parser;
pub mod segment;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use common::{
    ExpressRouteCircuitPeeringId, KeyVaultId, ResourceGroupId, SubnetId, SubscriptionId,
};
pub use parser::{ParseError, ParseResult, Parser, format_id};
pub use segment::{Segment, SegmentKind};

/// A typed resource ID
pub trait ResourceId: Sized {
    /// Human-readable name of the resource type (e.g., "Express Route Port")
    const DESCRIPTION: &'static str;
    /// ARM path template with `{placeholder}` value segments
    const TEMPLATE: &'static str;

    /// Build from the values of the value segments, in template order
    fn from_values(values: Vec<String>) -> Self;

    /// Values of the value segments, in template order
    fn segment_values(&self) -> Vec<&str>;

    fn segments() -> Vec<Segment> {
        Segment::parse_template(Self::TEMPLATE)
    }

    fn from_parse_result(result: ParseResult) -> Self {
        Self::from_values(result.into_values())
    }

    /// Parse an ID, requiring the canonical casing of fixed segments
    fn parse(input: &str) -> Result<Self, ParseError> {
        let segments = Self::segments();
        let result = Parser::new(Self::DESCRIPTION, &segments).parse(input, false)?;
        Ok(Self::from_parse_result(result))
    }

    /// Parse an ID, accepting any casing of fixed segments
    fn parse_insensitively(input: &str) -> Result<Self, ParseError> {
        let segments = Self::segments();
        let result = Parser::new(Self::DESCRIPTION, &segments).parse(input, true)?;
        Ok(Self::from_parse_result(result))
    }

    /// The canonical ID string
    fn id(&self) -> String {
        format_id(&Self::segments(), &self.segment_values())
    }

    /// Description naming each value, e.g.
    /// `Data Factory (Subscription: "..." / Resource Group Name: "..." / Factory Name: "...")`
    fn describe(&self) -> String {
        let values = self.segment_values();
        let components: Vec<String> = Self::segments()
            .iter()
            .filter(|s| s.is_value())
            .zip(values)
            .map(|(segment, value)| format!("{}: {:?}", segment.label(), value))
            .collect();
        format!("{} ({})", Self::DESCRIPTION, components.join(" / "))
    }
}

/// Check that the value of attribute `key` parses as `T`
pub fn validate_resource_id<T: ResourceId>(input: &str, key: &str) -> Result<(), String> {
    T::parse(input)
        .map(|_| ())
        .map_err(|e| format!("expected {} to be a {} ID: {}", key, T::DESCRIPTION, e))
}

/// Declare a typed resource ID from its ARM path template
///
/// Field names map positionally onto the template's `{placeholder}` segments.
#[macro_export]
macro_rules! define_resource_id {
    (
        $(#[$meta:meta])*
        $name:ident, $description:literal, $template:literal, { $($field:ident),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name {
            $(pub $field: String,)+
        }

        impl $name {
            #[allow(clippy::too_many_arguments)]
            pub fn new($($field: impl Into<String>),+) -> Self {
                Self {
                    $($field: $field.into(),)+
                }
            }
        }

        impl $crate::ResourceId for $name {
            const DESCRIPTION: &'static str = $description;
            const TEMPLATE: &'static str = $template;

            fn from_values(values: Vec<String>) -> Self {
                let mut values = values.into_iter();
                Self {
                    $($field: values.next().unwrap_or_default(),)+
                }
            }

            fn segment_values(&self) -> Vec<&str> {
                vec![$(self.$field.as_str()),+]
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&$crate::ResourceId::describe(self))
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::ParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <Self as $crate::ResourceId>::parse(s)
            }
        }
    };
}
