use azurerm_resourceids::define_resource_id;

define_resource_id!(
    DataFactoryId,
    "Data Factory",
    "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.DataFactory/factories/{factoryName}",
    { subscription_id, resource_group, factory_name }
);

#[cfg(test)]
mod tests {
    use super::*;
    use azurerm_resourceids::ResourceId;
    use azurerm_resourceids::testing::check_resource_id;

    #[test]
    fn formatter() {
        let actual = DataFactoryId::new("12345678-1234-9876-4563-123456789012", "resGroup1", "facName1").id();
        assert_eq!(
            actual,
            "/subscriptions/12345678-1234-9876-4563-123456789012/resourceGroups/resGroup1/providers/Microsoft.DataFactory/factories/facName1"
        );
    }

    #[test]
    fn parse() {
        let cases: &[(&str, Option<DataFactoryId>)] = &[
            ("", None),
            ("/", None),
            ("/subscriptions/", None),
            ("/subscriptions/12345678-1234-9876-4563-123456789012/", None),
            ("/subscriptions/12345678-1234-9876-4563-123456789012/resourceGroups/", None),
            (
                "/subscriptions/12345678-1234-9876-4563-123456789012/resourceGroups/resGroup1/providers/Microsoft.DataFactory/",
                None,
            ),
            (
                "/subscriptions/12345678-1234-9876-4563-123456789012/resourceGroups/resGroup1/providers/Microsoft.DataFactory/factories/",
                None,
            ),
            (
                "/subscriptions/12345678-1234-9876-4563-123456789012/resourceGroups/resGroup1/providers/Microsoft.DataFactory/factories/facName1",
                Some(DataFactoryId::new("12345678-1234-9876-4563-123456789012", "resGroup1", "facName1")),
            ),
            (
                "/SUBSCRIPTIONS/12345678-1234-9876-4563-123456789012/RESOURCEGROUPS/RESGROUP1/PROVIDERS/MICROSOFT.DATAFACTORY/FACTORIES/FACNAME1",
                None,
            ),
        ];

        for (input, expected) in cases {
            match (DataFactoryId::parse(input), expected) {
                (Ok(actual), Some(expected)) => assert_eq!(&actual, expected, "{}", input),
                (Err(_), None) => {}
                (actual, expected) => panic!("{}: expected {:?}, got {:?}", input, expected, actual),
            }
        }
    }

    #[test]
    fn shared_checks() {
        check_resource_id::<DataFactoryId>();
    }
}
