//! Segments making up a resource ID template

use heck::{ToTitleCase, ToUpperCamelCase};

/// Example subscription used when rendering example IDs
pub const EXAMPLE_SUBSCRIPTION_ID: &str = "12345678-1234-9876-4563-123456789012";

/// Kind of a single path component
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentKind {
    /// Fixed text such as `resourceGroups` or `expressRoutePorts`
    Static(String),
    /// Resource provider namespace following `providers`, e.g. `Microsoft.Network`
    ResourceProvider(String),
    /// Value following `subscriptions`
    SubscriptionId,
    /// Value following `resourceGroups`
    ResourceGroup,
    /// Any other user-chosen name
    UserSpecified,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// camelCase name (`resourceGroupName`, `staticProviders`)
    pub name: String,
    pub kind: SegmentKind,
}

impl Segment {
    pub fn new(name: impl Into<String>, kind: SegmentKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Whether this segment carries a caller-supplied value
    pub fn is_value(&self) -> bool {
        matches!(
            self.kind,
            SegmentKind::SubscriptionId | SegmentKind::ResourceGroup | SegmentKind::UserSpecified
        )
    }

    /// The fixed text of a static or provider segment
    pub fn fixed_value(&self) -> Option<&str> {
        match &self.kind {
            SegmentKind::Static(v) | SegmentKind::ResourceProvider(v) => Some(v),
            _ => None,
        }
    }

    /// Human-readable label (`Subscription`, `Express Route Port Name`)
    pub fn label(&self) -> String {
        match self.kind {
            SegmentKind::SubscriptionId => "Subscription".to_string(),
            SegmentKind::ResourceGroup => "Resource Group Name".to_string(),
            _ => self.name.to_title_case(),
        }
    }

    /// Value used for this segment in example IDs
    pub fn example_value(&self) -> String {
        match &self.kind {
            SegmentKind::Static(v) | SegmentKind::ResourceProvider(v) => v.clone(),
            SegmentKind::SubscriptionId => EXAMPLE_SUBSCRIPTION_ID.to_string(),
            SegmentKind::ResourceGroup => "example-resource-group".to_string(),
            SegmentKind::UserSpecified => {
                let base = self.name.strip_suffix("Name").unwrap_or(&self.name);
                format!("{}Value", base)
            }
        }
    }

    /// Split an ARM path template into segments
    ///
    /// `{placeholder}` components become value segments; their kind follows
    /// from the preceding fixed component (`subscriptions`, `resourceGroups`).
    /// A fixed component directly after `providers` is a provider namespace.
    pub fn parse_template(template: &str) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut previous: Option<&str> = None;

        for part in template.split('/').filter(|p| !p.is_empty()) {
            let segment = if let Some(name) = part.strip_prefix('{').and_then(|p| p.strip_suffix('}')) {
                let kind = match previous {
                    Some(p) if p.eq_ignore_ascii_case("subscriptions") => SegmentKind::SubscriptionId,
                    Some(p) if p.eq_ignore_ascii_case("resourceGroups") => SegmentKind::ResourceGroup,
                    _ => SegmentKind::UserSpecified,
                };
                previous = None;
                Segment::new(name, kind)
            } else {
                let kind = match previous {
                    Some(p) if p.eq_ignore_ascii_case("providers") => {
                        SegmentKind::ResourceProvider(part.to_string())
                    }
                    _ => SegmentKind::Static(part.to_string()),
                };
                let name = match kind {
                    SegmentKind::ResourceProvider(_) => {
                        format!("staticMicrosoft{}", provider_suffix(part))
                    }
                    _ => format!("static{}", part.to_upper_camel_case()),
                };
                previous = Some(part);
                Segment::new(name, kind)
            };
            segments.push(segment);
        }

        segments
    }
}

fn provider_suffix(namespace: &str) -> String {
    namespace
        .split('.')
        .skip(1)
        .map(|p| p.to_upper_camel_case())
        .collect()
}
