//! Effect - Side effects represented as values
//!
//! An Effect describes one change against the management API. Nothing happens
//! until an Interpreter executes it.

use crate::resource::{Resource, ResourceAddress, State};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Create a resource that does not exist yet
    Create(Resource),
    /// Update an existing resource in place
    Update {
        address: ResourceAddress,
        from: State,
        to: Resource,
        changed_attributes: Vec<String>,
    },
    /// Delete and re-create a resource (a force-new attribute changed)
    Replace {
        from: State,
        to: Resource,
        changed_attributes: Vec<String>,
    },
    /// Delete a resource by its ARM resource ID
    Delete {
        address: ResourceAddress,
        identifier: String,
    },
}

impl Effect {
    pub fn address(&self) -> &ResourceAddress {
        match self {
            Effect::Create(r) => &r.address,
            Effect::Update { address, .. } | Effect::Delete { address, .. } => address,
            Effect::Replace { to, .. } => &to.address,
        }
    }

    /// Attributes whose change caused this effect
    pub fn changed_attributes(&self) -> &[String] {
        match self {
            Effect::Update {
                changed_attributes, ..
            }
            | Effect::Replace {
                changed_attributes, ..
            } => changed_attributes,
            _ => &[],
        }
    }
}
