//! Архив типов пакетов (карточки изделий)

use crate::shared::fields::{FieldDescriptor, FieldGroup, FieldKind, SelectOption, ACTIONS_FIELD};

pub const ENTITY: &str = "a005_bag_type";

pub fn page_title() -> &'static str {
    "Типы пакетов"
}

pub fn static_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new("code", "Артикул", FieldKind::Text)
            .required()
            .width(100)
            .group("basic")
            .order(10),
        FieldDescriptor::new("description", "Наименование", FieldKind::Text)
            .required()
            .width(220)
            .group("basic")
            .order(20),
        FieldDescriptor::new("bag_kind", "Вид пакета", FieldKind::SingleSelect)
            .width(130)
            .group("basic")
            .order(30)
            .options(vec![
                SelectOption::new("Майка", "vest"),
                SelectOption::new("С вырубной ручкой", "die_cut"),
                SelectOption::new("С петлевой ручкой", "loop_handle"),
                SelectOption::new("Фасовочный", "flat"),
            ]),
        FieldDescriptor::new("material_category", "Материал", FieldKind::ManyToOne)
            .width(140)
            .group("basic")
            .order(40),
        FieldDescriptor::new("width_mm", "Ширина, мм", FieldKind::Integer)
            .required()
            .width(90)
            .group("sizes")
            .order(50),
        FieldDescriptor::new("height_mm", "Высота, мм", FieldKind::Integer)
            .required()
            .width(90)
            .group("sizes")
            .order(60),
        FieldDescriptor::new("gusset_mm", "Фальцы, мм", FieldKind::Integer)
            .width(90)
            .group("sizes")
            .order(70),
        FieldDescriptor::new("film_thickness_um", "Толщина, мкм", FieldKind::Float)
            .required()
            .width(100)
            .group("sizes")
            .order(80),
        // вес одного пакета: ширина * высота * 2 слоя * толщина * плотность ПЭ
        FieldDescriptor::new("unit_weight_g", "Вес, г", FieldKind::Calculated)
            .width(80)
            .group("sizes")
            .order(90)
            .formula("round(width_mm * height_mm * 2 * film_thickness_um * 0.000000925, 2)"),
        FieldDescriptor::new("print_colors", "Цветность", FieldKind::Integer)
            .width(80)
            .group("print")
            .order(100),
        FieldDescriptor::new("is_active", "Действует", FieldKind::Boolean)
            .width(80)
            .group("extra")
            .order(110),
        FieldDescriptor::new("comment", "Комментарий", FieldKind::Textarea)
            .group("extra")
            .order(120),
        FieldDescriptor::new("created_at", "Создан", FieldKind::DateTime)
            .readonly()
            .width(140)
            .group("extra")
            .order(130),
        FieldDescriptor::new(ACTIONS_FIELD, "", FieldKind::Text)
            .group("extra")
            .order(999),
    ]
}

pub fn static_groups() -> Vec<FieldGroup> {
    vec![
        FieldGroup::new("basic", "Основные").icon("package"),
        FieldGroup::new("sizes", "Размеры"),
        FieldGroup::new("print", "Печать"),
        FieldGroup::new("extra", "Прочее"),
    ]
}
