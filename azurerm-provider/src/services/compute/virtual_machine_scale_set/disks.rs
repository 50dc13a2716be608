use azurerm_core::resource::{AttributesExt, Value};
use azurerm_core::schema::{AttributeSchema, AttributeType, BlockSchema};
use azurerm_core::validation::{int_at_least, int_between, string_in_slice, string_is_not_empty};
use azurerm_sdk::services::compute::virtual_machine_scale_sets::{
    CachingTypes, DiffDiskOptions, DiffDiskPlacement, DiffDiskSettings, DiskCreateOptionTypes, OperatingSystemTypes,
    SecurityEncryptionTypes, StorageAccountTypes, SubResource, VirtualMachineScaleSetDataDisk,
    VirtualMachineScaleSetManagedDiskParameters, VirtualMachineScaleSetOsDisk, VirtualMachineScaleSetUpdateOsDisk,
    VmDiskSecurityProfile,
};

use super::{block, blocks, first_block, non_empty};
use crate::error::{ExpandError, ExpandResult};
use crate::services::compute::validate::disk_encryption_set_id;

fn caching_type() -> AttributeType {
    string_in_slice(CachingTypes::possible_values(), false)
}

fn caching(value: &str) -> Option<CachingTypes> {
    non_empty(value).map(|v| CachingTypes::parse(&v))
}

fn storage_account_type(value: &str) -> Option<StorageAccountTypes> {
    non_empty(value).map(|v| StorageAccountTypes::parse(&v))
}

fn sub_resource_id(input: Option<&SubResource>) -> String {
    input.and_then(|s| s.id.clone()).unwrap_or_default()
}

pub fn data_disk_schema() -> AttributeSchema {
    AttributeSchema::new(
        "data_disk",
        AttributeType::block_list(
            BlockSchema::new()
                .attribute(AttributeSchema::new("name", string_is_not_empty()))
                .attribute(AttributeSchema::new("caching", caching_type()).required())
                .attribute(
                    AttributeSchema::new(
                        "create_option",
                        string_in_slice(
                            &[
                                DiskCreateOptionTypes::Empty.as_str(),
                                DiskCreateOptionTypes::FromImage.as_str(),
                            ],
                            false,
                        ),
                    )
                    .with_default(DiskCreateOptionTypes::Empty.as_str()),
                )
                // the API accepts changes but never applies them
                .attribute(AttributeSchema::new("disk_encryption_set_id", disk_encryption_set_id()).force_new())
                .attribute(AttributeSchema::new("disk_size_gb", int_between(1, 32767)).required())
                .attribute(AttributeSchema::new("lun", int_between(0, 2000)).required())
                .attribute(
                    AttributeSchema::new(
                        "storage_account_type",
                        string_in_slice(StorageAccountTypes::possible_values(), false),
                    )
                    .required(),
                )
                .attribute(AttributeSchema::new("write_accelerator_enabled", AttributeType::Bool).with_default(false))
                // TODO: rename to disk_iops_read_write and disk_mbps_read_write in 4.0
                .attribute(AttributeSchema::new("ultra_ssd_disk_iops_read_write", int_at_least(1)).computed())
                .attribute(AttributeSchema::new("ultra_ssd_disk_mbps_read_write", int_at_least(1)).computed()),
        ),
    )
}

/// `ultra_ssd_enabled` comes from the scale set's additional capabilities
pub fn expand_data_disk(input: &[Value], ultra_ssd_enabled: bool) -> ExpandResult<Vec<VirtualMachineScaleSetDataDisk>> {
    blocks(input)
        .map(|raw| {
            let storage_account_type = storage_account_type(raw.str_or_empty("storage_account_type"));
            let premium_v2 = storage_account_type == Some(StorageAccountTypes::PremiumV2Lrs);

            let iops = raw.int_or("ultra_ssd_disk_iops_read_write", 0);
            if iops > 0 && !ultra_ssd_enabled && !premium_v2 {
                return Err(ExpandError::conflict(
                    "`ultra_ssd_disk_iops_read_write` can only be set when `storage_account_type` is set to `PremiumV2_LRS` or `UltraSSD_LRS`",
                ));
            }

            let mbps = raw.int_or("ultra_ssd_disk_mbps_read_write", 0);
            if mbps > 0 && !ultra_ssd_enabled && !premium_v2 {
                return Err(ExpandError::conflict(
                    "`ultra_ssd_disk_mbps_read_write` can only be set when `storage_account_type` is set to `PremiumV2_LRS` or `UltraSSD_LRS`",
                ));
            }

            let create_option = match raw.str_or_empty("create_option") {
                "" => DiskCreateOptionTypes::Empty,
                option => DiskCreateOptionTypes::parse(option),
            };

            Ok(VirtualMachineScaleSetDataDisk {
                caching: caching(raw.str_or_empty("caching")),
                create_option,
                // zero means unset to the service
                disk_iops_read_write: Some(iops).filter(|v| *v > 0),
                disk_mbps_read_write: Some(mbps).filter(|v| *v > 0),
                disk_size_gb: Some(raw.int_or("disk_size_gb", 0)),
                lun: raw.int_or("lun", 0),
                managed_disk: Some(VirtualMachineScaleSetManagedDiskParameters {
                    disk_encryption_set: non_empty(raw.str_or_empty("disk_encryption_set_id")).map(SubResource::new),
                    security_profile: None,
                    storage_account_type,
                }),
                name: non_empty(raw.str_or_empty("name")),
                write_accelerator_enabled: Some(raw.bool_or("write_accelerator_enabled", false)),
            })
        })
        .collect()
}

pub fn flatten_data_disk(input: Option<&Vec<VirtualMachineScaleSetDataDisk>>) -> Vec<Value> {
    input
        .into_iter()
        .flatten()
        .map(|disk| {
            let managed = disk.managed_disk.as_ref();
            block([
                ("name", Value::string(disk.name.clone().unwrap_or_default())),
                (
                    "caching",
                    Value::string(disk.caching.as_ref().map(|c| c.as_str()).unwrap_or_default()),
                ),
                ("create_option", Value::string(disk.create_option.as_str())),
                ("lun", Value::Int(disk.lun)),
                (
                    "disk_encryption_set_id",
                    Value::String(sub_resource_id(managed.and_then(|m| m.disk_encryption_set.as_ref()))),
                ),
                ("disk_size_gb", Value::Int(disk.disk_size_gb.unwrap_or(0))),
                (
                    "storage_account_type",
                    Value::string(
                        managed
                            .and_then(|m| m.storage_account_type.as_ref())
                            .map(|t| t.as_str())
                            .unwrap_or_default(),
                    ),
                ),
                ("ultra_ssd_disk_iops_read_write", Value::Int(disk.disk_iops_read_write.unwrap_or(0))),
                ("ultra_ssd_disk_mbps_read_write", Value::Int(disk.disk_mbps_read_write.unwrap_or(0))),
                (
                    "write_accelerator_enabled",
                    Value::Bool(disk.write_accelerator_enabled.unwrap_or(false)),
                ),
            ])
        })
        .collect()
}

pub fn os_disk_schema() -> AttributeSchema {
    AttributeSchema::new(
        "os_disk",
        AttributeType::block_list(
            BlockSchema::new()
                .attribute(AttributeSchema::new("caching", caching_type()).required())
                // OS disks support neither Ultra SSD nor PremiumV2; the service rejects changes
                .attribute(
                    AttributeSchema::new(
                        "storage_account_type",
                        string_in_slice(
                            &[
                                StorageAccountTypes::PremiumLrs.as_str(),
                                StorageAccountTypes::PremiumZrs.as_str(),
                                StorageAccountTypes::StandardLrs.as_str(),
                                StorageAccountTypes::StandardSsdLrs.as_str(),
                                StorageAccountTypes::StandardSsdZrs.as_str(),
                            ],
                            false,
                        ),
                    )
                    .required()
                    .force_new(),
                )
                .attribute(
                    AttributeSchema::new(
                        "diff_disk_settings",
                        AttributeType::block_list(
                            BlockSchema::new()
                                .attribute(
                                    AttributeSchema::new(
                                        "option",
                                        string_in_slice(DiffDiskOptions::possible_values(), false),
                                    )
                                    .required()
                                    .force_new(),
                                )
                                .attribute(
                                    AttributeSchema::new(
                                        "placement",
                                        string_in_slice(DiffDiskPlacement::possible_values(), false),
                                    )
                                    .with_default(DiffDiskPlacement::CacheDisk.as_str())
                                    .force_new(),
                                ),
                        ),
                    )
                    .force_new()
                    .max_items(1),
                )
                .attribute(
                    AttributeSchema::new("disk_encryption_set_id", disk_encryption_set_id())
                        .force_new()
                        .conflicts_with(&["secure_vm_disk_encryption_set_id"]),
                )
                .attribute(AttributeSchema::new("disk_size_gb", int_between(0, 4095)).computed())
                .attribute(
                    AttributeSchema::new("secure_vm_disk_encryption_set_id", disk_encryption_set_id())
                        .force_new()
                        .conflicts_with(&["disk_encryption_set_id"]),
                )
                .attribute(
                    AttributeSchema::new(
                        "security_encryption_type",
                        string_in_slice(SecurityEncryptionTypes::possible_values(), false),
                    )
                    .force_new(),
                )
                .attribute(AttributeSchema::new("write_accelerator_enabled", AttributeType::Bool).with_default(false)),
        ),
    )
    .required()
    .max_items(1)
}

pub fn expand_os_disk(input: &[Value], os_type: OperatingSystemTypes) -> ExpandResult<VirtualMachineScaleSetOsDisk> {
    let raw = first_block(input).ok_or(ExpandError::Missing("os_disk"))?;
    let caching_value = raw.str_or_empty("caching");

    let security_encryption_type = non_empty(raw.str_or_empty("security_encryption_type"))
        .map(|t| SecurityEncryptionTypes::parse(&t));
    let mut security_profile = security_encryption_type.clone().map(|t| VmDiskSecurityProfile {
        disk_encryption_set: None,
        security_encryption_type: Some(t),
    });

    if let Some(id) = non_empty(raw.str_or_empty("secure_vm_disk_encryption_set_id")) {
        match security_profile.as_mut() {
            Some(profile) if security_encryption_type == Some(SecurityEncryptionTypes::DiskWithVmGuestState) => {
                profile.disk_encryption_set = Some(SubResource::new(id));
            }
            _ => {
                return Err(ExpandError::conflict(
                    "`secure_vm_disk_encryption_set_id` can only be specified when `security_encryption_type` is set to `DiskWithVMGuestState`",
                ));
            }
        }
    }

    let diff_disk_settings = match first_block(raw.list("diff_disk_settings")) {
        Some(diff) => {
            // ephemeral OS disks only work with read-only caching
            if caching_value != CachingTypes::ReadOnly.as_str() {
                return Err(ExpandError::conflict(
                    "`diff_disk_settings` can only be set when `caching` is set to `ReadOnly`",
                ));
            }
            let placement = match diff.str_or_empty("placement") {
                "" => DiffDiskPlacement::CacheDisk,
                placement => DiffDiskPlacement::parse(placement),
            };
            Some(DiffDiskSettings {
                option: Some(DiffDiskOptions::parse(diff.str_or_empty("option"))),
                placement: Some(placement),
            })
        }
        None => None,
    };

    Ok(VirtualMachineScaleSetOsDisk {
        caching: caching(caching_value),
        // fixed for scale sets built from an image
        create_option: DiskCreateOptionTypes::FromImage,
        diff_disk_settings,
        disk_size_gb: Some(raw.int_or("disk_size_gb", 0)).filter(|v| *v > 0),
        managed_disk: Some(VirtualMachineScaleSetManagedDiskParameters {
            disk_encryption_set: non_empty(raw.str_or_empty("disk_encryption_set_id")).map(SubResource::new),
            security_profile,
            storage_account_type: storage_account_type(raw.str_or_empty("storage_account_type")),
        }),
        os_type: Some(os_type),
        write_accelerator_enabled: Some(raw.bool_or("write_accelerator_enabled", false)),
    })
}

pub fn expand_os_disk_update(input: &[Value]) -> Option<VirtualMachineScaleSetUpdateOsDisk> {
    let raw = first_block(input)?;
    Some(VirtualMachineScaleSetUpdateOsDisk {
        caching: caching(raw.str_or_empty("caching")),
        disk_size_gb: Some(raw.int_or("disk_size_gb", 0)).filter(|v| *v > 0),
        managed_disk: Some(VirtualMachineScaleSetManagedDiskParameters {
            disk_encryption_set: non_empty(raw.str_or_empty("disk_encryption_set_id")).map(SubResource::new),
            security_profile: None,
            storage_account_type: storage_account_type(raw.str_or_empty("storage_account_type")),
        }),
        write_accelerator_enabled: Some(raw.bool_or("write_accelerator_enabled", false)),
    })
}

pub fn flatten_os_disk(input: Option<&VirtualMachineScaleSetOsDisk>) -> Vec<Value> {
    let Some(input) = input else {
        return Vec::new();
    };

    let diff_disk_settings: Vec<Value> = input
        .diff_disk_settings
        .iter()
        .map(|diff| {
            block([
                (
                    "option",
                    Value::string(diff.option.as_ref().map(|o| o.as_str()).unwrap_or_default()),
                ),
                (
                    "placement",
                    Value::string(diff.placement.as_ref().map(|p| p.as_str()).unwrap_or_default()),
                ),
            ])
        })
        .collect();

    let managed = input.managed_disk.as_ref();
    let security = managed.and_then(|m| m.security_profile.as_ref());

    vec![block([
        (
            "caching",
            Value::string(input.caching.as_ref().map(|c| c.as_str()).unwrap_or_default()),
        ),
        ("disk_size_gb", Value::Int(input.disk_size_gb.unwrap_or(0))),
        ("diff_disk_settings", Value::List(diff_disk_settings)),
        (
            "storage_account_type",
            Value::string(
                managed
                    .and_then(|m| m.storage_account_type.as_ref())
                    .map(|t| t.as_str())
                    .unwrap_or_default(),
            ),
        ),
        (
            "write_accelerator_enabled",
            Value::Bool(input.write_accelerator_enabled.unwrap_or(false)),
        ),
        (
            "disk_encryption_set_id",
            Value::String(sub_resource_id(managed.and_then(|m| m.disk_encryption_set.as_ref()))),
        ),
        (
            "secure_vm_disk_encryption_set_id",
            Value::String(sub_resource_id(security.and_then(|s| s.disk_encryption_set.as_ref()))),
        ),
        (
            "security_encryption_type",
            Value::string(
                security
                    .and_then(|s| s.security_encryption_type.as_ref())
                    .map(|t| t.as_str())
                    .unwrap_or_default(),
            ),
        ),
    ])]
}

#[cfg(test)]
mod tests {
    use super::*;
    use azurerm_core::resource::Attributes;

    const DES: &str = "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Compute/diskEncryptionSets/des";

    fn data_disk(storage_account_type: &str, iops: i64) -> Vec<Value> {
        vec![block([
            ("caching", Value::string("ReadWrite")),
            ("disk_size_gb", Value::Int(64)),
            ("lun", Value::Int(1)),
            ("storage_account_type", Value::string(storage_account_type)),
            ("ultra_ssd_disk_iops_read_write", Value::Int(iops)),
        ])]
    }

    fn os_disk(pairs: Vec<(&str, Value)>) -> Vec<Value> {
        let mut attrs = Attributes::new();
        attrs.insert("caching".to_string(), Value::string("ReadWrite"));
        attrs.insert("storage_account_type".to_string(), Value::string("Standard_LRS"));
        for (k, v) in pairs {
            attrs.insert(k.to_string(), v);
        }
        vec![Value::Map(attrs)]
    }

    #[test]
    fn data_disk_defaults() {
        let disks = expand_data_disk(&data_disk("Standard_LRS", 0), false).unwrap();
        let disk = &disks[0];
        assert_eq!(disk.create_option, DiskCreateOptionTypes::Empty);
        assert_eq!(disk.disk_iops_read_write, None);
        assert_eq!(disk.name, None);
        assert_eq!(disk.lun, 1);
        assert_eq!(
            disk.managed_disk.as_ref().unwrap().storage_account_type,
            Some(StorageAccountTypes::StandardLrs)
        );
    }

    #[test]
    fn disk_iops_needs_ultra_or_premium_v2() {
        let err = expand_data_disk(&data_disk("Standard_LRS", 100), false).unwrap_err();
        assert_eq!(
            err.to_string(),
            "`ultra_ssd_disk_iops_read_write` can only be set when `storage_account_type` is set to `PremiumV2_LRS` or `UltraSSD_LRS`"
        );

        let disks = expand_data_disk(&data_disk("PremiumV2_LRS", 100), false).unwrap();
        assert_eq!(disks[0].disk_iops_read_write, Some(100));

        let disks = expand_data_disk(&data_disk("UltraSSD_LRS", 100), true).unwrap();
        assert_eq!(disks[0].disk_iops_read_write, Some(100));
    }

    #[test]
    fn data_disk_flatten() {
        let disks = expand_data_disk(&data_disk("PremiumV2_LRS", 300), false).unwrap();
        let flattened = flatten_data_disk(Some(&disks));
        let raw = flattened[0].as_map().unwrap();
        assert_eq!(raw.str_or_empty("create_option"), "Empty");
        assert_eq!(raw.int_or("ultra_ssd_disk_iops_read_write", 0), 300);
        assert_eq!(raw.int_or("ultra_ssd_disk_mbps_read_write", -1), 0);
        assert_eq!(raw.str_or_empty("name"), "");
        assert!(flatten_data_disk(None).is_empty());
    }

    #[test]
    fn os_disk_is_created_from_image() {
        let disk = expand_os_disk(&os_disk(vec![("disk_size_gb", Value::Int(0))]), OperatingSystemTypes::Linux).unwrap();
        assert_eq!(disk.create_option, DiskCreateOptionTypes::FromImage);
        assert_eq!(disk.os_type, Some(OperatingSystemTypes::Linux));
        assert_eq!(disk.disk_size_gb, None);
        assert!(disk.managed_disk.unwrap().security_profile.is_none());

        assert!(matches!(
            expand_os_disk(&[], OperatingSystemTypes::Linux),
            Err(ExpandError::Missing("os_disk"))
        ));
    }

    #[test]
    fn diff_disk_requires_read_only_caching() {
        let diff = Value::List(vec![block([("option", Value::string("Local"))])]);
        let err = expand_os_disk(&os_disk(vec![("diff_disk_settings", diff.clone())]), OperatingSystemTypes::Linux)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "`diff_disk_settings` can only be set when `caching` is set to `ReadOnly`"
        );

        let disk = expand_os_disk(
            &os_disk(vec![("diff_disk_settings", diff), ("caching", Value::string("ReadOnly"))]),
            OperatingSystemTypes::Linux,
        )
        .unwrap();
        let settings = disk.diff_disk_settings.unwrap();
        assert_eq!(settings.placement, Some(DiffDiskPlacement::CacheDisk));
    }

    #[test]
    fn secure_vm_encryption_set_needs_disk_with_guest_state() {
        let err = expand_os_disk(
            &os_disk(vec![
                ("secure_vm_disk_encryption_set_id", Value::string(DES)),
                ("security_encryption_type", Value::string("VMGuestStateOnly")),
            ]),
            OperatingSystemTypes::Linux,
        )
        .unwrap_err();
        assert!(err.to_string().contains("`DiskWithVMGuestState`"));

        assert!(expand_os_disk(
            &os_disk(vec![("secure_vm_disk_encryption_set_id", Value::string(DES))]),
            OperatingSystemTypes::Linux,
        )
        .is_err());

        let disk = expand_os_disk(
            &os_disk(vec![
                ("secure_vm_disk_encryption_set_id", Value::string(DES)),
                ("security_encryption_type", Value::string("DiskWithVMGuestState")),
            ]),
            OperatingSystemTypes::Linux,
        )
        .unwrap();

        let flattened = flatten_os_disk(Some(&disk));
        let raw = flattened[0].as_map().unwrap();
        assert_eq!(raw.str_or_empty("secure_vm_disk_encryption_set_id"), DES);
        assert_eq!(raw.str_or_empty("security_encryption_type"), "DiskWithVMGuestState");
        assert_eq!(raw.str_or_empty("disk_encryption_set_id"), "");
    }

    #[test]
    fn os_disk_update() {
        let update = expand_os_disk_update(&os_disk(vec![
            ("disk_size_gb", Value::Int(128)),
            ("disk_encryption_set_id", Value::string(DES)),
        ]))
        .unwrap();
        assert_eq!(update.disk_size_gb, Some(128));
        assert_eq!(update.caching, Some(CachingTypes::ReadWrite));
        assert_eq!(
            update.managed_disk.unwrap().disk_encryption_set,
            Some(SubResource::new(DES))
        );
        assert!(expand_os_disk_update(&[]).is_none());
    }

    #[test]
    fn os_disk_encryption_sets_conflict() {
        let schema = os_disk_schema();
        let AttributeType::List(inner) = &schema.attr_type else {
            panic!("expected a block list");
        };
        let errors = inner
            .validate(&os_disk(vec![
                ("disk_encryption_set_id", Value::string(DES)),
                ("secure_vm_disk_encryption_set_id", Value::string(DES)),
            ])[0])
            .unwrap_err();
        assert!(errors.to_string().contains("conflicts with"));
    }
}
