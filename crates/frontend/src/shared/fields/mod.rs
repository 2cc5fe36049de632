//! Column settings panel and dynamic field manager

pub mod api;
pub mod column_settings;
pub mod field_manager;

pub use column_settings::ColumnSettingsPanel;
pub use field_manager::FieldManagerPage;
