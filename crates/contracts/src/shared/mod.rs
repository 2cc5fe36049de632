pub mod api_error;
pub mod column_settings;
pub mod dynamic_fields;
pub mod fields;
