use azurerm_resourceids::define_resource_id;

define_resource_id!(
    VirtualMachineScaleSetId,
    "Virtual Machine Scale Set",
    "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Compute/virtualMachineScaleSets/{virtualMachineScaleSetName}",
    { subscription_id, resource_group_name, virtual_machine_scale_set_name }
);
