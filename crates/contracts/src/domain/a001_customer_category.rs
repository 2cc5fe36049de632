//! Категории клиентов

use super::category;
use crate::shared::fields::{FieldDescriptor, FieldGroup};

pub const ENTITY: &str = "a001_customer_category";

pub fn page_title() -> &'static str {
    "Категории клиентов"
}

pub fn static_fields() -> Vec<FieldDescriptor> {
    category::category_fields()
}

pub fn static_groups() -> Vec<FieldGroup> {
    category::category_groups()
}
