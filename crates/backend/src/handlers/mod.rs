pub mod a005_bag_type;
pub mod column_config;
pub mod dynamic_fields;
