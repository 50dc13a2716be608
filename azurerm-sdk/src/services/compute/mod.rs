pub mod virtual_machine_scale_sets;
