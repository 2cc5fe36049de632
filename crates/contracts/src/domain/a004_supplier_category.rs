//! Категории поставщиков

use super::category;
use crate::shared::fields::{FieldDescriptor, FieldGroup};

pub const ENTITY: &str = "a004_supplier_category";

pub fn page_title() -> &'static str {
    "Категории поставщиков"
}

pub fn static_fields() -> Vec<FieldDescriptor> {
    category::category_fields()
}

pub fn static_groups() -> Vec<FieldGroup> {
    category::category_groups()
}
