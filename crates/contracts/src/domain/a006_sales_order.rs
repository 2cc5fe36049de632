//! Заказы клиентов

use crate::shared::fields::{FieldDescriptor, FieldGroup, FieldKind, SelectOption, ACTIONS_FIELD};

pub const ENTITY: &str = "a006_sales_order";

pub fn page_title() -> &'static str {
    "Заказы клиентов"
}

pub fn static_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new("order_no", "Номер", FieldKind::Text)
            .required()
            .width(110)
            .group("basic")
            .order(10),
        FieldDescriptor::new("order_date", "Дата", FieldKind::Date)
            .required()
            .width(100)
            .group("basic")
            .order(20),
        FieldDescriptor::new("customer", "Клиент", FieldKind::ManyToOne)
            .required()
            .width(200)
            .group("basic")
            .order(30),
        FieldDescriptor::new("bag_type", "Тип пакета", FieldKind::ManyToOne)
            .required()
            .width(180)
            .group("basic")
            .order(40),
        FieldDescriptor::new("status", "Статус", FieldKind::SingleSelect)
            .width(120)
            .group("basic")
            .order(50)
            .options(vec![
                SelectOption::new("Новый", "new"),
                SelectOption::new("В производстве", "in_production"),
                SelectOption::new("Готов", "ready"),
                SelectOption::new("Отгружен", "shipped"),
            ]),
        FieldDescriptor::new("quantity", "Кол-во, шт", FieldKind::Integer)
            .required()
            .width(100)
            .group("money")
            .order(60),
        FieldDescriptor::new("unit_price", "Цена, руб", FieldKind::Float)
            .required()
            .width(100)
            .group("money")
            .order(70),
        FieldDescriptor::new("amount", "Сумма, руб", FieldKind::Calculated)
            .width(110)
            .group("money")
            .order(80)
            .formula("round(quantity * unit_price, 2)"),
        FieldDescriptor::new("due_date", "Срок", FieldKind::Date)
            .width(100)
            .group("extra")
            .order(90),
        FieldDescriptor::new("comment", "Комментарий", FieldKind::Textarea)
            .group("extra")
            .order(100),
        FieldDescriptor::new(ACTIONS_FIELD, "", FieldKind::Text)
            .group("extra")
            .order(999),
    ]
}

pub fn static_groups() -> Vec<FieldGroup> {
    vec![
        FieldGroup::new("basic", "Основные").icon("file-text"),
        FieldGroup::new("money", "Количество и сумма"),
        FieldGroup::new("extra", "Прочее"),
    ]
}
