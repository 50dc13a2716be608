use crate::string_enum;

string_enum! {
    CachingTypes {
        None => "None",
        ReadOnly => "ReadOnly",
        ReadWrite => "ReadWrite",
    }
}

string_enum! {
    DiskCreateOptionTypes {
        Attach => "Attach",
        Empty => "Empty",
        FromImage => "FromImage",
    }
}

string_enum! {
    StorageAccountTypes {
        PremiumLrs => "Premium_LRS",
        PremiumV2Lrs => "PremiumV2_LRS",
        PremiumZrs => "Premium_ZRS",
        StandardLrs => "Standard_LRS",
        StandardSsdLrs => "StandardSSD_LRS",
        StandardSsdZrs => "StandardSSD_ZRS",
        UltraSsdLrs => "UltraSSD_LRS",
    }
}

string_enum! {
    DiffDiskOptions {
        Local => "Local",
    }
}

string_enum! {
    DiffDiskPlacement {
        CacheDisk => "CacheDisk",
        ResourceDisk => "ResourceDisk",
    }
}

string_enum! {
    SecurityEncryptionTypes {
        DiskWithVmGuestState => "DiskWithVMGuestState",
        VmGuestStateOnly => "VMGuestStateOnly",
    }
}

string_enum! {
    IpVersion {
        IPv4 => "IPv4",
        IPv6 => "IPv6",
    }
}

string_enum! {
    OperatingSystemTypes {
        Linux => "Linux",
        Windows => "Windows",
    }
}

string_enum! {
    VirtualMachineScaleSetScaleInRules {
        Default => "Default",
        NewestVm => "NewestVM",
        OldestVm => "OldestVM",
    }
}

string_enum! {
    UpgradeMode {
        Automatic => "Automatic",
        Manual => "Manual",
        Rolling => "Rolling",
    }
}

string_enum! {
    VirtualMachinePriorityTypes {
        Low => "Low",
        Regular => "Regular",
        Spot => "Spot",
    }
}

string_enum! {
    VirtualMachineEvictionPolicyTypes {
        Deallocate => "Deallocate",
        Delete => "Delete",
    }
}
