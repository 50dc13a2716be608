pub mod rule_sets;
