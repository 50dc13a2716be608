//! Virtual Machine Scale Sets (`Microsoft.Compute`, 2023-03-01)

mod client;
pub mod constants;
mod id;
pub mod models;

pub use client::VirtualMachineScaleSetsClient;
pub use constants::*;
pub use id::VirtualMachineScaleSetId;
pub use models::*;

pub const API_VERSION: &str = "2023-03-01";
