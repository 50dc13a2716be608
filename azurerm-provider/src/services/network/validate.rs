use azurerm_core::schema::AttributeType;
use azurerm_core::validation::resource_id;
use azurerm_resourceids::SubnetId;

use super::parse::{ApplicationSecurityGroupId, ExpressRoutePortId, NetworkSecurityGroupId, PublicIpPrefixId};

pub fn express_route_port_id() -> AttributeType {
    resource_id::<ExpressRoutePortId>()
}

pub fn network_security_group_id() -> AttributeType {
    resource_id::<NetworkSecurityGroupId>()
}

pub fn public_ip_prefix_id() -> AttributeType {
    resource_id::<PublicIpPrefixId>()
}

pub fn application_security_group_id() -> AttributeType {
    resource_id::<ApplicationSecurityGroupId>()
}

pub fn subnet_id() -> AttributeType {
    resource_id::<SubnetId>()
}
