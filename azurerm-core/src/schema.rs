//! Schema - Define type schemas for resources
//!
//! Every resource type declares the shape of its configuration: named,
//! typed attributes, nested blocks and the flags the host tool understands
//! (required, computed, force-new, sensitive). Validation walks a resource's
//! attribute map against its schema and reports every problem found, each
//! tagged with the dotted path of the offending attribute (`os_disk.0.caching`).

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::resource::{Attributes, Value};

/// Validation function attached to a custom attribute type
#[derive(Clone)]
pub struct ValidateFn(Arc<dyn Fn(&Value) -> Result<(), String> + Send + Sync>);

impl ValidateFn {
    pub fn new(f: impl Fn(&Value) -> Result<(), String> + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn call(&self, value: &Value) -> Result<(), String> {
        (self.0)(value)
    }
}

impl fmt::Debug for ValidateFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ValidateFn(..)")
    }
}

/// Attribute type
#[derive(Debug, Clone)]
pub enum AttributeType {
    /// String
    String,
    /// Integer
    Int,
    /// Boolean
    Bool,
    /// Enum (list of allowed values)
    Enum(Vec<String>),
    /// Custom type (base type check followed by a validation function)
    Custom {
        name: String,
        base: Box<AttributeType>,
        validate: ValidateFn,
    },
    /// Ordered list
    List(Box<AttributeType>),
    /// Unordered collection without duplicates
    Set(Box<AttributeType>),
    /// String-keyed map
    Map(Box<AttributeType>),
    /// Nested block (a map with its own attribute schema)
    Block(BlockSchema),
}

impl AttributeType {
    /// A list of nested blocks
    pub fn block_list(block: BlockSchema) -> Self {
        AttributeType::List(Box::new(AttributeType::Block(block)))
    }

    /// A set of nested blocks
    pub fn block_set(block: BlockSchema) -> Self {
        AttributeType::Set(Box::new(AttributeType::Block(block)))
    }

    /// Check if a value conforms to this type
    ///
    /// Returns the first error found; use [`ResourceSchema::validate`] to
    /// collect all of them.
    pub fn validate(&self, value: &Value) -> Result<(), TypeError> {
        let mut errors = Vec::new();
        self.collect_errors("", value, &mut errors);
        match errors.into_iter().next() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn collect_errors(&self, path: &str, value: &Value, errors: &mut Vec<TypeError>) {
        match (self, value) {
            (AttributeType::String, Value::String(_))
            | (AttributeType::Int, Value::Int(_))
            | (AttributeType::Bool, Value::Bool(_)) => {}

            (AttributeType::Enum(variants), Value::String(s)) => {
                if !variants.iter().any(|v| v == s) {
                    errors.push(at_path(
                        path,
                        TypeError::InvalidEnumVariant {
                            value: s.clone(),
                            expected: variants.clone(),
                        },
                    ));
                }
            }

            (AttributeType::Custom { base, validate, .. }, v) => {
                let before = errors.len();
                base.collect_errors(path, v, errors);
                if errors.len() == before
                    && let Err(message) = validate.call(v)
                {
                    errors.push(at_path(path, TypeError::ValidationFailed { message }));
                }
            }

            (AttributeType::List(inner), Value::List(items)) => {
                for (i, item) in items.iter().enumerate() {
                    inner.collect_errors(&join_path(path, i), item, errors);
                }
            }

            (AttributeType::Set(inner), Value::List(items)) => {
                for (i, item) in items.iter().enumerate() {
                    if items[..i].contains(item) {
                        errors.push(at_path(
                            &join_path(path, i),
                            TypeError::DuplicateSetItem,
                        ));
                        continue;
                    }
                    inner.collect_errors(&join_path(path, i), item, errors);
                }
            }

            (AttributeType::Map(inner), Value::Map(map)) => {
                let mut keys: Vec<&String> = map.keys().collect();
                keys.sort();
                for key in keys {
                    inner.collect_errors(&join_path(path, key), &map[key], errors);
                }
            }

            (AttributeType::Block(block), Value::Map(attrs)) => {
                collect_attribute_errors(&block.attributes, path, attrs, errors);
            }

            _ => errors.push(at_path(
                path,
                TypeError::TypeMismatch {
                    expected: self.type_name(),
                    got: value.type_name().to_string(),
                },
            )),
        }
    }

    fn apply_defaults(&self, value: &mut Value) {
        match (self, value) {
            (AttributeType::List(inner) | AttributeType::Set(inner), Value::List(items)) => {
                for item in items {
                    inner.apply_defaults(item);
                }
            }
            (AttributeType::Block(block), Value::Map(attrs)) => {
                apply_attribute_defaults(&block.attributes, attrs);
            }
            (AttributeType::Custom { base, .. }, v) => base.apply_defaults(v),
            _ => {}
        }
    }

    fn type_name(&self) -> String {
        match self {
            AttributeType::String => "String".to_string(),
            AttributeType::Int => "Int".to_string(),
            AttributeType::Bool => "Bool".to_string(),
            AttributeType::Enum(variants) => format!("Enum({})", variants.join(" | ")),
            AttributeType::Custom { name, .. } => name.clone(),
            AttributeType::List(inner) => format!("List<{}>", inner.type_name()),
            AttributeType::Set(inner) => format!("Set<{}>", inner.type_name()),
            AttributeType::Map(inner) => format!("Map<{}>", inner.type_name()),
            AttributeType::Block(_) => "Block".to_string(),
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// Type error
#[derive(Debug, Clone, thiserror::Error)]
pub enum TypeError {
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },

    #[error("Invalid enum variant '{value}', expected one of: {}", expected.join(", "))]
    InvalidEnumVariant {
        value: String,
        expected: Vec<String>,
    },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Required attribute '{name}' is missing")]
    MissingRequired { name: String },

    #[error("Attribute '{name}' is computed and cannot be set")]
    ReadOnly { name: String },

    #[error("Attribute '{name}' conflicts with '{other}'")]
    ConflictingAttributes { name: String, other: String },

    #[error("Expected at most {max} item(s), got {got}")]
    TooManyItems { max: usize, got: usize },

    #[error("Expected at least {min} item(s), got {got}")]
    TooFewItems { min: usize, got: usize },

    #[error("Duplicate set item")]
    DuplicateSetItem,

    #[error("{path}: {inner}")]
    AtPath { path: String, inner: Box<TypeError> },
}

impl TypeError {
    /// Dotted path of the attribute the error refers to, if any
    pub fn path(&self) -> Option<&str> {
        match self {
            TypeError::AtPath { path, .. } => Some(path),
            TypeError::MissingRequired { name }
            | TypeError::ReadOnly { name }
            | TypeError::ConflictingAttributes { name, .. } => Some(name),
            _ => None,
        }
    }
}

fn at_path(path: &str, error: TypeError) -> TypeError {
    if path.is_empty() {
        error
    } else {
        TypeError::AtPath {
            path: path.to_string(),
            inner: Box::new(error),
        }
    }
}

fn join_path(prefix: &str, segment: impl fmt::Display) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", prefix, segment)
    }
}

/// Attribute schema
#[derive(Debug, Clone)]
pub struct AttributeSchema {
    pub name: String,
    pub attr_type: AttributeType,
    pub required: bool,
    /// Value may be filled in by the service when not configured
    pub computed: bool,
    /// Value is only ever filled in by the service
    pub read_only: bool,
    /// A change to this attribute requires replacing the resource
    pub force_new: bool,
    /// Value is a secret and must not be displayed
    pub sensitive: bool,
    pub default: Option<Value>,
    pub description: Option<String>,
    /// Deprecation message shown when the attribute is used
    pub deprecated: Option<String>,
    /// Sibling attributes that cannot be set together with this one
    pub conflicts_with: Vec<String>,
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
}

impl AttributeSchema {
    pub fn new(name: impl Into<String>, attr_type: AttributeType) -> Self {
        Self {
            name: name.into(),
            attr_type,
            required: false,
            computed: false,
            read_only: false,
            force_new: false,
            sensitive: false,
            default: None,
            description: None,
            deprecated: None,
            conflicts_with: Vec::new(),
            min_items: None,
            max_items: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    /// Mark the attribute as computed-only
    pub fn read_only(mut self) -> Self {
        self.computed = true;
        self.read_only = true;
        self
    }

    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn deprecated(mut self, message: impl Into<String>) -> Self {
        self.deprecated = Some(message.into());
        self
    }

    pub fn conflicts_with(mut self, names: &[&str]) -> Self {
        self.conflicts_with
            .extend(names.iter().map(|n| n.to_string()));
        self
    }

    pub fn min_items(mut self, n: usize) -> Self {
        self.min_items = Some(n);
        self
    }

    pub fn max_items(mut self, n: usize) -> Self {
        self.max_items = Some(n);
        self
    }
}

/// Attribute schema of a nested block
#[derive(Debug, Clone, Default)]
pub struct BlockSchema {
    pub attributes: HashMap<String, AttributeSchema>,
}

impl BlockSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attribute(mut self, schema: AttributeSchema) -> Self {
        self.attributes.insert(schema.name.clone(), schema);
        self
    }

    /// Every attribute becomes computed-only (data source shape)
    pub fn all_read_only(mut self) -> Self {
        for schema in self.attributes.values_mut() {
            schema.required = false;
            schema.computed = true;
            schema.read_only = true;
            schema.default = None;
        }
        self
    }
}

/// Resource schema
#[derive(Debug, Clone)]
pub struct ResourceSchema {
    pub resource_type: String,
    pub attributes: HashMap<String, AttributeSchema>,
    pub description: Option<String>,
}

impl ResourceSchema {
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            attributes: HashMap::new(),
            description: None,
        }
    }

    pub fn attribute(mut self, schema: AttributeSchema) -> Self {
        self.attributes.insert(schema.name.clone(), schema);
        self
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// Validate resource attributes
    pub fn validate(&self, attributes: &Attributes) -> Result<(), Vec<TypeError>> {
        let mut errors = Vec::new();
        collect_attribute_errors(&self.attributes, "", attributes, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Fill in defaults for unset attributes, including inside configured blocks
    pub fn apply_defaults(&self, attributes: &mut Attributes) {
        apply_attribute_defaults(&self.attributes, attributes);
    }

    /// Top-level attributes whose change forces replacement
    pub fn force_new_attributes(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .attributes
            .values()
            .filter(|a| a.force_new)
            .map(|a| a.name.as_str())
            .collect();
        names.sort();
        names
    }

    /// Top-level attributes holding secrets
    pub fn sensitive_attributes(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .attributes
            .values()
            .filter(|a| a.sensitive)
            .map(|a| a.name.as_str())
            .collect();
        names.sort();
        names
    }
}

fn collect_attribute_errors(
    schemas: &HashMap<String, AttributeSchema>,
    prefix: &str,
    attributes: &Attributes,
    errors: &mut Vec<TypeError>,
) {
    let mut names: Vec<&String> = schemas.keys().collect();
    names.sort();

    for name in names {
        let schema = &schemas[name];
        let path = join_path(prefix, name);

        let Some(value) = attributes.get(name) else {
            if schema.required && schema.default.is_none() {
                errors.push(TypeError::MissingRequired { name: path });
            }
            continue;
        };

        if schema.read_only {
            errors.push(TypeError::ReadOnly { name: path });
            continue;
        }

        if let Some(message) = &schema.deprecated {
            log::warn!("{} is deprecated: {}", path, message);
        }

        for other in &schema.conflicts_with {
            if attributes.contains_key(other) {
                errors.push(TypeError::ConflictingAttributes {
                    name: path.clone(),
                    other: join_path(prefix, other),
                });
            }
        }

        if let Value::List(items) = value {
            if let Some(max) = schema.max_items
                && items.len() > max
            {
                errors.push(at_path(
                    &path,
                    TypeError::TooManyItems {
                        max,
                        got: items.len(),
                    },
                ));
            }
            if let Some(min) = schema.min_items
                && items.len() < min
            {
                errors.push(at_path(
                    &path,
                    TypeError::TooFewItems {
                        min,
                        got: items.len(),
                    },
                ));
            }
        }

        schema.attr_type.collect_errors(&path, value, errors);
    }
    // Unknown attributes are allowed (for flexibility)
}

fn apply_attribute_defaults(schemas: &HashMap<String, AttributeSchema>, attributes: &mut Attributes) {
    for (name, schema) in schemas {
        if !attributes.contains_key(name)
            && let Some(default) = &schema.default
        {
            attributes.insert(name.clone(), default.clone());
        }
        if let Some(value) = attributes.get_mut(name) {
            schema.attr_type.apply_defaults(value);
        }
    }
}
