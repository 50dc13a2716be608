use azurerm_resourceids::define_resource_id;

define_resource_id!(
    BlobInventoryPolicyId,
    "Blob Inventory Policy",
    "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Storage/storageAccounts/{storageAccountName}/inventoryPolicies/{inventoryPolicyName}",
    { subscription_id, resource_group, storage_account_name, inventory_policy_name }
);

#[cfg(test)]
mod tests {
    use super::*;
    use azurerm_resourceids::ResourceId;
    use azurerm_resourceids::testing::check_resource_id;

    const VALID: &str = "/subscriptions/12345678-1234-9876-4563-123456789012/resourceGroups/resGroup1/providers/Microsoft.Storage/storageAccounts/storageAccount1/inventoryPolicies/inventoryPolicy1";

    #[test]
    fn parses_valid_id() {
        let id = BlobInventoryPolicyId::parse(VALID).unwrap();
        assert_eq!(id.subscription_id, "12345678-1234-9876-4563-123456789012");
        assert_eq!(id.resource_group, "resGroup1");
        assert_eq!(id.storage_account_name, "storageAccount1");
        assert_eq!(id.inventory_policy_name, "inventoryPolicy1");
        assert_eq!(id.id(), VALID);
    }

    #[test]
    fn rejects_incomplete_ids() {
        for input in [
            "/subscriptions/12345678-1234-9876-4563-123456789012/resourceGroups/resGroup1/providers/Microsoft.Storage/storageAccounts/storageAccount1/",
            "/subscriptions/12345678-1234-9876-4563-123456789012/resourceGroups/resGroup1/providers/Microsoft.Storage/storageAccounts/storageAccount1/inventoryPolicies/",
        ] {
            assert!(BlobInventoryPolicyId::parse(input).is_err(), "{}", input);
        }
        assert!(BlobInventoryPolicyId::parse(&VALID.to_uppercase()).is_err());
    }

    #[test]
    fn shared_checks() {
        check_resource_id::<BlobInventoryPolicyId>();
    }
}
