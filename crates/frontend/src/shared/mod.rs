pub mod api_utils;
pub mod auth;
pub mod entity_list;
pub mod fields;
