//! Shared template for the four category reference books
//!
//! Customer/material/process/supplier categories carry the same columns,
//! so they share one table builder instead of four drifting copies.

use crate::shared::fields::{FieldDescriptor, FieldGroup, FieldKind, ACTIONS_FIELD};

pub(crate) fn category_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new("code", "Код", FieldKind::Text)
            .required()
            .width(90)
            .group("basic")
            .order(10),
        FieldDescriptor::new("description", "Наименование", FieldKind::Text)
            .required()
            .width(240)
            .group("basic")
            .order(20),
        FieldDescriptor::new("sort_order", "Порядок", FieldKind::Integer)
            .width(80)
            .group("basic")
            .order(30),
        FieldDescriptor::new("is_active", "Действует", FieldKind::Boolean)
            .width(80)
            .group("basic")
            .order(40),
        FieldDescriptor::new("comment", "Комментарий", FieldKind::Textarea)
            .group("extra")
            .order(50),
        FieldDescriptor::new("created_at", "Создана", FieldKind::DateTime)
            .readonly()
            .width(140)
            .group("extra")
            .order(60),
        FieldDescriptor::new(ACTIONS_FIELD, "", FieldKind::Text)
            .group("extra")
            .order(999),
    ]
}

pub(crate) fn category_groups() -> Vec<FieldGroup> {
    vec![
        FieldGroup::new("basic", "Основные").icon("list"),
        FieldGroup::new("extra", "Прочее"),
    ]
}
