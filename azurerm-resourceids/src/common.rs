//! Resource IDs shared across services

use crate::define_resource_id;

define_resource_id!(
    /// ID of a subscription
    SubscriptionId,
    "Subscription",
    "/subscriptions/{subscriptionId}",
    { subscription_id }
);

define_resource_id!(
    /// ID of a resource group
    ResourceGroupId,
    "Resource Group",
    "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}",
    { subscription_id, resource_group_name }
);

define_resource_id!(
    /// ID of a Key Vault
    KeyVaultId,
    "Key Vault",
    "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.KeyVault/vaults/{vaultName}",
    { subscription_id, resource_group_name, vault_name }
);

define_resource_id!(
    /// ID of a virtual network subnet
    SubnetId,
    "Subnet",
    "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Network/virtualNetworks/{virtualNetworkName}/subnets/{subnetName}",
    { subscription_id, resource_group_name, virtual_network_name, subnet_name }
);

define_resource_id!(
    /// ID of an ExpressRoute circuit peering
    ExpressRouteCircuitPeeringId,
    "Express Route Circuit Peering",
    "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Network/expressRouteCircuits/{circuitName}/peerings/{peeringName}",
    { subscription_id, resource_group_name, circuit_name, peering_name }
);

impl SubnetId {
    /// The virtual network the subnet belongs to, as a resource group scoped pair
    pub fn resource_group(&self) -> ResourceGroupId {
        ResourceGroupId::new(&self.subscription_id, &self.resource_group_name)
    }
}

impl KeyVaultId {
    pub fn resource_group(&self) -> ResourceGroupId {
        ResourceGroupId::new(&self.subscription_id, &self.resource_group_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ResourceId;
    use crate::testing::check_resource_id;

    #[test]
    fn common_id_tables() {
        check_resource_id::<SubscriptionId>();
        check_resource_id::<ResourceGroupId>();
        check_resource_id::<KeyVaultId>();
        check_resource_id::<SubnetId>();
        check_resource_id::<ExpressRouteCircuitPeeringId>();
    }

    #[test]
    fn subnet_formatter() {
        let id = SubnetId::new("12345678-1234-9876-4563-123456789012", "resGroup1", "network1", "subnet1");
        assert_eq!(
            id.id(),
            "/subscriptions/12345678-1234-9876-4563-123456789012/resourceGroups/resGroup1/providers/Microsoft.Network/virtualNetworks/network1/subnets/subnet1"
        );
        assert_eq!(
            id.resource_group().id(),
            "/subscriptions/12345678-1234-9876-4563-123456789012/resourceGroups/resGroup1"
        );
    }

    #[test]
    fn describes_values() {
        let id = KeyVaultId::new("sub", "rg", "vault1");
        assert_eq!(
            id.to_string(),
            r#"Key Vault (Subscription: "sub" / Resource Group Name: "rg" / Vault Name: "vault1")"#
        );
    }

    #[test]
    fn from_str_parses() {
        let id: ResourceGroupId = "/subscriptions/sub/resourceGroups/rg".parse().unwrap();
        assert_eq!(id, ResourceGroupId::new("sub", "rg"));
        assert!("/subscriptions/sub/resourcegroups/rg".parse::<ResourceGroupId>().is_err());
        assert_eq!(
            ResourceGroupId::parse_insensitively("/SUBSCRIPTIONS/sub/resourcegroups/rg").unwrap(),
            ResourceGroupId::new("sub", "rg")
        );
    }
}
