//! Универсальный список записей сущности
//!
//! One component renders every entity's list page: columns come from the
//! shared field registry, visibility/order from saved column config, cell
//! values from the record JSON. Calculated columns are evaluated on the
//! client against the merged record.

use contracts::domain;
use contracts::shared::column_settings::{parse_column_config, parse_column_order, ConfigType};
use contracts::shared::fields::{
    build_field_set, formula, resolve_visible_ordered, ColumnConfig, ColumnOrder, FieldDescriptor,
    FieldKind, ResolveTarget, ACTIONS_FIELD,
};
use leptos::prelude::*;
use leptos::task::spawn_local;
use serde_json::{Map, Value};

use crate::shared::auth::use_auth;
use crate::shared::fields::{api, ColumnSettingsPanel};

fn format_value(field: &FieldDescriptor, value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => if *b { "✓" } else { "—" }.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => match field.kind {
            // select показываем по названию варианта
            FieldKind::SingleSelect => field
                .options
                .iter()
                .find(|o| o.value == *s)
                .map(|o| o.label.clone())
                .unwrap_or_else(|| s.clone()),
            _ => s.clone(),
        },
        other => other.to_string(),
    }
}

/// Input text of a stored dynamic value
fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Cell text for one record; calculated fields run their formula, a broken
/// formula renders as an empty cell
fn cell_text(field: &FieldDescriptor, record: &Map<String, Value>) -> String {
    if field.kind == FieldKind::Calculated {
        let Some(text) = field.calculation_formula.as_deref() else {
            return String::new();
        };
        return formula::evaluate(text, record)
            .map(|v| format_value(field, &v))
            .unwrap_or_default();
    }
    record
        .get(&field.name)
        .map(|v| format_value(field, v))
        .unwrap_or_default()
}

#[component]
pub fn EntityListPage(entity: String) -> impl IntoView {
    let auth = use_auth();

    let entity_key = StoredValue::new(entity);
    // ключ страницы списка совпадает с ключом сущности
    let page_name = StoredValue::new(entity_key.get_value());

    let (fields, set_fields) = create_signal(Vec::<FieldDescriptor>::new());
    let (records, set_records) = create_signal(Vec::<Map<String, Value>>::new());
    let (config, set_config) = create_signal(ColumnConfig::new());
    let (order, set_order) = create_signal(ColumnOrder::new());
    let (show_settings, set_show_settings) = create_signal(false);
    let (is_loading, set_is_loading) = create_signal(true);
    let (error_message, set_error_message) = create_signal(Option::<String>::None);

    // редактор значений динамических полей одной записи
    let (editing_record, set_editing_record) = create_signal(Option::<String>::None);
    let (record_values, set_record_values) = create_signal(Map::<String, Value>::new());

    let reload = move || {
        let entity = entity_key.get_value();
        let page = page_name.get_value();
        set_is_loading.set(true);
        set_error_message.set(None);
        spawn_local(async move {
            let static_fields = domain::static_fields(&entity).unwrap_or_default();

            let dynamic: Vec<_> = match api::list_dynamic_fields(&entity, None).await {
                Ok(list) => list.iter().filter_map(|f| f.descriptor()).collect(),
                Err(e) => {
                    set_error_message.set(Some(e.message));
                    Vec::new()
                }
            };
            set_fields.set(build_field_set(&static_fields, &dynamic));

            let mut loaded_config = ColumnConfig::new();
            let mut loaded_order = ColumnOrder::new();
            match api::get_column_config(&page, ConfigType::ColumnConfig).await {
                Ok(Some(entry)) => loaded_config = parse_column_config(&entry.payload),
                Ok(None) => {}
                Err(e) => set_error_message.set(Some(e.message)),
            }
            match api::get_column_config(&page, ConfigType::ColumnOrder).await {
                Ok(Some(entry)) => loaded_order = parse_column_order(&entry.payload),
                Ok(None) => {}
                Err(e) => set_error_message.set(Some(e.message)),
            }
            set_config.set(loaded_config);
            set_order.set(loaded_order);

            match api::list_records(&entity).await {
                Ok(list) => set_records.set(list),
                Err(e) => set_error_message.set(Some(e.message)),
            }
            set_is_loading.set(false);
        });
    };
    reload();

    let visible_fields = Memo::new(move |_| {
        let fields = fields.get();
        let names = resolve_visible_ordered(&fields, &config.get(), &order.get(), ResolveTarget::Table);
        names
            .into_iter()
            .filter_map(|name| fields.iter().find(|f| f.name == name).cloned())
            .collect::<Vec<_>>()
    });

    // динамические поля, в которые можно вводить значения вручную
    let editable_dynamic = Memo::new(move |_| {
        fields
            .get()
            .into_iter()
            .filter(|f| f.page_name.is_some() && f.is_editable())
            .collect::<Vec<_>>()
    });

    let open_values_editor = move |id: String| {
        let entity = entity_key.get_value();
        let page = page_name.get_value();
        set_record_values.set(Map::new());
        set_editing_record.set(Some(id.clone()));
        spawn_local(async move {
            match api::get_field_values(&entity, &page, &id).await {
                Ok(loaded) => set_record_values.set(loaded.values),
                Err(e) => set_error_message.set(Some(e.message)),
            }
        });
    };

    let on_save_values = move |_| {
        let Some(id) = editing_record.get() else {
            return;
        };
        let entity = entity_key.get_value();
        let page = page_name.get_value();
        let values = record_values.get();
        spawn_local(async move {
            match api::save_field_values(&entity, &page, &id, values).await {
                Ok(_) => {
                    set_editing_record.set(None);
                    reload();
                }
                Err(e) => set_error_message.set(Some(e.message)),
            }
        });
    };

    let on_delete = move |id: String| {
        let entity = entity_key.get_value();
        spawn_local(async move {
            let result = match entity.as_str() {
                "a005_bag_type" => {
                    crate::shared::api_utils::delete_json::<Value>(&format!("/api/bag_type/{}", id))
                        .await
                        .map(|_| ())
                }
                _ => Ok(()),
            };
            match result {
                Ok(()) => reload(),
                Err(e) => set_error_message.set(Some(e.message)),
            }
        });
    };

    view! {
        <div class="entity-list-page">
            <div class="page-header">
                <h2>
                    {move || {
                        domain::page_title(&entity_key.get_value())
                            .unwrap_or("Список")
                            .to_string()
                    }}
                </h2>
                <button
                    class="btn-secondary"
                    title="Настройка колонок"
                    on:click=move |_| set_show_settings.update(|v| *v = !*v)
                >
                    "⚙"
                </button>
            </div>

            <Show when=move || error_message.get().is_some()>
                <div class="error-message">
                    {move || error_message.get().unwrap_or_default()}
                </div>
            </Show>

            <Show when=move || show_settings.get()>
                <ColumnSettingsPanel
                    page_name=page_name.get_value()
                    fields=fields.get_untracked()
                    on_applied=Callback::new(move |_| reload())
                    on_close=Callback::new(move |_| set_show_settings.set(false))
                />
            </Show>

            <Show when=move || is_loading.get()>
                <div class="loading">"Загрузка..."</div>
            </Show>

            <table class="data-table">
                <thead>
                    <tr>
                        <For
                            each=move || visible_fields.get()
                            key=|f| f.name.clone()
                            children=move |field| {
                                let width = field
                                    .width
                                    .map(|w| format!("width: {}px", w))
                                    .unwrap_or_default();
                                let title = if field.name == ACTIONS_FIELD {
                                    String::new()
                                } else {
                                    field.label.clone()
                                };
                                view! { <th style=width>{title}</th> }
                            }
                        />
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || records.get()
                        key=|r| {
                            r.get("id")
                                .and_then(|v| v.as_str())
                                .unwrap_or_default()
                                .to_string()
                        }
                        children=move |record| {
                            let record_id = record
                                .get("id")
                                .and_then(|v| v.as_str())
                                .unwrap_or_default()
                                .to_string();
                            view! {
                                <tr>
                                    <For
                                        each=move || visible_fields.get()
                                        key=|f| f.name.clone()
                                        children={
                                            let record = record.clone();
                                            let record_id = record_id.clone();
                                            move |field| {
                                                if field.name == ACTIONS_FIELD {
                                                    let id = record_id.clone();
                                                    let edit_id = record_id.clone();
                                                    view! {
                                                        <td class="actions">
                                                            <button
                                                                class="btn-small"
                                                                title="Дополнительные поля"
                                                                on:click=move |_| {
                                                                    open_values_editor(
                                                                        edit_id.clone(),
                                                                    )
                                                                }
                                                            >
                                                                "✏"
                                                            </button>
                                                            <button
                                                                class="btn-small btn-danger"
                                                                disabled=move || {
                                                                    !auth.can_manage_fields()
                                                                }
                                                                on:click=move |_| {
                                                                    on_delete(id.clone())
                                                                }
                                                            >
                                                                "🗑"
                                                            </button>
                                                        </td>
                                                    }
                                                    .into_any()
                                                } else {
                                                    view! {
                                                        <td>{cell_text(&field, &record)}</td>
                                                    }
                                                    .into_any()
                                                }
                                            }
                                        }
                                    />
                                </tr>
                            }
                        }
                    />
                </tbody>
            </table>

            <Show when=move || !is_loading.get() && records.get().is_empty()>
                <div class="empty-state">"Записей нет"</div>
            </Show>

            <Show when=move || editing_record.get().is_some()>
                <div class="values-editor">
                    <h3>"Дополнительные поля записи"</h3>
                    <For
                        each=move || editable_dynamic.get()
                        key=|f| f.name.clone()
                        children=move |field| {
                            let name = field.name.clone();
                            let input_name = field.name.clone();
                            view! {
                                <div class="form-group">
                                    <label>{field.label.clone()}</label>
                                    <input
                                        type="text"
                                        prop:value=move || {
                                            record_values
                                                .get()
                                                .get(&name)
                                                .map(value_text)
                                                .unwrap_or_default()
                                        }
                                        on:input=move |ev| {
                                            let value = event_target_value(&ev);
                                            set_record_values.update(|values| {
                                                values.insert(
                                                    input_name.clone(),
                                                    Value::String(value),
                                                );
                                            });
                                        }
                                    />
                                </div>
                            }
                        }
                    />
                    <Show when=move || editable_dynamic.get().is_empty()>
                        <div class="empty-state">
                            "Для этой сущности нет динамических полей ручного ввода"
                        </div>
                    </Show>
                    <div class="form-actions">
                        <button class="btn-primary" on:click=on_save_values>
                            "Сохранить"
                        </button>
                        <button
                            class="btn-secondary"
                            on:click=move |_| set_editing_record.set(None)
                        >
                            "Отмена"
                        </button>
                    </div>
                </div>
            </Show>
        </div>
    }
}
