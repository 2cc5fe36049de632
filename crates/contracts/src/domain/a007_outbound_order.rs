//! Отгрузка готовой продукции со склада

use crate::shared::fields::{FieldDescriptor, FieldGroup, FieldKind, SelectOption, ACTIONS_FIELD};

pub const ENTITY: &str = "a007_outbound_order";

pub fn page_title() -> &'static str {
    "Отгрузки"
}

pub fn static_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new("outbound_no", "Номер", FieldKind::Text)
            .required()
            .width(110)
            .group("basic")
            .order(10),
        FieldDescriptor::new("ship_date", "Дата отгрузки", FieldKind::Date)
            .required()
            .width(110)
            .group("basic")
            .order(20),
        FieldDescriptor::new("sales_order", "Заказ", FieldKind::ManyToOne)
            .required()
            .width(150)
            .group("basic")
            .order(30),
        FieldDescriptor::new("warehouse", "Склад", FieldKind::SingleSelect)
            .width(120)
            .group("basic")
            .order(40)
            .options(vec![
                SelectOption::new("Основной", "main"),
                SelectOption::new("Цех", "workshop"),
            ]),
        FieldDescriptor::new("quantity", "Кол-во, шт", FieldKind::Integer)
            .required()
            .width(100)
            .group("basic")
            .order(50),
        FieldDescriptor::new("status", "Статус", FieldKind::SingleSelect)
            .width(110)
            .group("extra")
            .order(60)
            .options(vec![
                SelectOption::new("Черновик", "draft"),
                SelectOption::new("Проведена", "posted"),
            ]),
        FieldDescriptor::new("handled_by", "Кладовщик", FieldKind::Text)
            .width(140)
            .group("extra")
            .order(70),
        FieldDescriptor::new("comment", "Комментарий", FieldKind::Textarea)
            .group("extra")
            .order(80),
        FieldDescriptor::new(ACTIONS_FIELD, "", FieldKind::Text)
            .group("extra")
            .order(999),
    ]
}

pub fn static_groups() -> Vec<FieldGroup> {
    vec![
        FieldGroup::new("basic", "Основные").icon("truck"),
        FieldGroup::new("extra", "Прочее"),
    ]
}
