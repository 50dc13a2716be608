use azurerm_core::resource::Value;
use azurerm_resourceids::validate_resource_id;

use super::parse::ClusterId;

/// Validate that the attribute `key` holds a cluster ID
pub fn cluster_id(input: &Value, key: &str) -> Result<(), String> {
    let Some(v) = input.as_str() else {
        return Err(format!("expected {:?} to be a string", key));
    };
    validate_resource_id::<ClusterId>(v, key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_cluster_ids() {
        let id = Value::string(
            "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.AVS/privateClouds/cloud1/clusters/cluster1",
        );
        assert!(cluster_id(&id, "vmware_cluster_id").is_ok());
    }

    #[test]
    fn rejects_other_values() {
        assert_eq!(
            cluster_id(&Value::Int(1), "vmware_cluster_id").unwrap_err(),
            "expected \"vmware_cluster_id\" to be a string"
        );
        let err = cluster_id(
            &Value::string("/subscriptions/sub/resourceGroups/rg/providers/Microsoft.AVS/privateClouds/cloud1"),
            "vmware_cluster_id",
        )
        .unwrap_err();
        assert!(err.starts_with("expected vmware_cluster_id to be a Cluster ID"), "{}", err);
    }
}
