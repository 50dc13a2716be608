//! Per-service schemas, validators, resource IDs and API mappings

pub mod compute;
pub mod datafactory;
pub mod network;
pub mod storage;
pub mod vmware;
