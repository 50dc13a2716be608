pub mod client;
pub mod linux_virtual_machine_scale_set;
pub mod parse;
pub mod validate;
pub mod virtual_machine_scale_set;
