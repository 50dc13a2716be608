//! Service clients and models, one module per Resource Manager provider
//! namespace and API version.

pub mod automation;
pub mod cdn;
pub mod compute;
pub mod containerregistry;
pub mod devcenter;
pub mod kusto;
pub mod media;
pub mod network;
pub mod search;
pub mod synapse;
pub mod web;
