//! AzureRM Core
//!
//! Configuration values, schemas, validators and planning shared by the
//! Azure Resource Manager provider toolkit

pub mod differ;
pub mod effect;
pub mod features;
pub mod interpreter;
pub mod plan;
pub mod provider;
pub mod resource;
pub mod schema;
pub mod validation;
