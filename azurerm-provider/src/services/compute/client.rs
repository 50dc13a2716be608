use azurerm_sdk::services::compute::virtual_machine_scale_sets::VirtualMachineScaleSetsClient;
use azurerm_sdk::{ArmClient, ClientOptions, Result};

/// Compute service clients sharing one HTTP client
#[derive(Clone)]
pub struct ComputeClient {
    pub vm_scale_set_client: VirtualMachineScaleSetsClient,
}

impl ComputeClient {
    pub fn new(options: &ClientOptions) -> Result<Self> {
        Ok(Self::from_client(ArmClient::new(options)?))
    }

    pub fn from_client(client: ArmClient) -> Self {
        Self {
            vm_scale_set_client: VirtualMachineScaleSetsClient::from_client(client),
        }
    }
}
