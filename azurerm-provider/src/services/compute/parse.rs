use azurerm_resourceids::define_resource_id;

define_resource_id!(
    DiskEncryptionSetId,
    "Disk Encryption Set",
    "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Compute/diskEncryptionSets/{diskEncryptionSetName}",
    { subscription_id, resource_group, name }
);

define_resource_id!(
    GalleryApplicationVersionId,
    "Gallery Application Version",
    "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Compute/galleries/{galleryName}/applications/{applicationName}/versions/{versionName}",
    { subscription_id, resource_group, gallery_name, application_name, version_name }
);
