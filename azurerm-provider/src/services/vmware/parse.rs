use azurerm_resourceids::define_resource_id;

define_resource_id!(
    /// ID of an Azure VMware Solution cluster
    ClusterId,
    "Cluster",
    "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.AVS/privateClouds/{privateCloudName}/clusters/{clusterName}",
    { subscription_id, resource_group_name, private_cloud_name, cluster_name }
);

#[cfg(test)]
mod tests {
    use super::*;
    use azurerm_resourceids::testing::check_resource_id;

    #[test]
    fn shared_checks() {
        check_resource_id::<ClusterId>();
    }
}
