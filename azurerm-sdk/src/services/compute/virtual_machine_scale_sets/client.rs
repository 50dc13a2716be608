use azurerm_resourceids::{ResourceGroupId, ResourceId};
use reqwest::Method;

use super::API_VERSION;
use super::id::VirtualMachineScaleSetId;
use super::models::{VirtualMachineScaleSet, VirtualMachineScaleSetUpdate};
use crate::client::{ArmClient, ClientOptions, NO_BODY, RequestOptions};
use crate::error::Result;

#[derive(Clone)]
pub struct VirtualMachineScaleSetsClient {
    client: ArmClient,
}

impl VirtualMachineScaleSetsClient {
    pub fn new(options: &ClientOptions) -> Result<Self> {
        Ok(Self {
            client: ArmClient::new(options)?,
        })
    }

    pub fn from_client(client: ArmClient) -> Self {
        Self { client }
    }

    /// Returns `Ok(None)` when the scale set does not exist
    pub async fn get(&self, id: &VirtualMachineScaleSetId) -> Result<Option<VirtualMachineScaleSet>> {
        let options = RequestOptions::new(Method::GET, id.id(), API_VERSION);
        match self.client.execute(&options, NO_BODY).await {
            Ok(response) => Ok(Some(response.json()?)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn create_or_update(
        &self,
        id: &VirtualMachineScaleSetId,
        input: &VirtualMachineScaleSet,
    ) -> Result<()> {
        let options = RequestOptions::new(Method::PUT, id.id(), API_VERSION).expect(&[200, 201]);
        self.client.execute_long_running(&options, Some(input)).await?;
        Ok(())
    }

    pub async fn update(
        &self,
        id: &VirtualMachineScaleSetId,
        input: &VirtualMachineScaleSetUpdate,
    ) -> Result<()> {
        let options = RequestOptions::new(Method::PATCH, id.id(), API_VERSION).expect(&[200, 202]);
        self.client.execute_long_running(&options, Some(input)).await?;
        Ok(())
    }

    pub async fn delete(&self, id: &VirtualMachineScaleSetId, force_deletion: bool) -> Result<()> {
        let mut options = RequestOptions::new(Method::DELETE, id.id(), API_VERSION).expect(&[200, 202, 204]);
        if force_deletion {
            options = options.with_query("forceDeletion", "true");
        }
        self.client.execute_long_running(&options, NO_BODY).await?;
        Ok(())
    }

    pub async fn list(&self, id: &ResourceGroupId) -> Result<Vec<VirtualMachineScaleSet>> {
        let path = format!("{}/providers/Microsoft.Compute/virtualMachineScaleSets", id.id());
        let options = RequestOptions::new(Method::GET, path, API_VERSION);
        self.client.execute_paged(&options).await
    }
}
