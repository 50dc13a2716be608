use azurerm_resourceids::define_resource_id;

define_resource_id!(
    ExpressRoutePortId,
    "Express Route Port",
    "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Network/expressRoutePorts/{expressRoutePortName}",
    { subscription_id, resource_group, name }
);

define_resource_id!(
    NetworkSecurityGroupId,
    "Network Security Group",
    "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Network/networkSecurityGroups/{networkSecurityGroupName}",
    { subscription_id, resource_group, name }
);

define_resource_id!(
    PublicIpPrefixId,
    "Public IP Prefix",
    "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Network/publicIPPrefixes/{publicIPPrefixName}",
    { subscription_id, resource_group, name }
);

define_resource_id!(
    ApplicationSecurityGroupId,
    "Application Security Group",
    "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Network/applicationSecurityGroups/{applicationSecurityGroupName}",
    { subscription_id, resource_group, name }
);
