//! Управление динамическими полями
//!
//! Admin CRUD over field definitions. Client-side validation mirrors the
//! server rules (name pattern, formula parse) so the admin gets feedback
//! before the round trip; the server stays authoritative.

use contracts::domain;
use contracts::shared::dynamic_fields::{is_valid_field_name, DynamicField};
use contracts::shared::fields::{
    build_field_set, build_groups, formula, FieldKind, SelectOption, ACTIONS_FIELD,
};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::shared::auth::use_auth;
use crate::shared::fields::api;

const FIELD_KINDS: &[FieldKind] = &[
    FieldKind::Text,
    FieldKind::Textarea,
    FieldKind::Integer,
    FieldKind::Float,
    FieldKind::Boolean,
    FieldKind::Date,
    FieldKind::DateTime,
    FieldKind::SingleSelect,
    FieldKind::Calculated,
];

fn kind_label(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Text => "Текст",
        FieldKind::Textarea => "Многострочный текст",
        FieldKind::Integer => "Целое число",
        FieldKind::Float => "Число",
        FieldKind::Boolean => "Да/Нет",
        FieldKind::Date => "Дата",
        FieldKind::DateTime => "Дата и время",
        FieldKind::SingleSelect => "Выбор из списка",
        FieldKind::ManyToOne => "Ссылка",
        FieldKind::Calculated => "Вычисляемое",
    }
}

/// Options textarea format: one `value=label` line per option
fn parse_options(text: &str) -> Vec<SelectOption> {
    text.lines()
        .filter_map(|line| {
            let line = line.trim();
            if line.is_empty() {
                return None;
            }
            let (value, label) = match line.split_once('=') {
                Some((v, l)) => (v.trim(), l.trim()),
                None => (line, line),
            };
            Some(SelectOption {
                value: value.to_string(),
                label: label.to_string(),
            })
        })
        .collect()
}

fn options_text(options: &[SelectOption]) -> String {
    options
        .iter()
        .map(|o| format!("{}={}", o.value, o.label))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Те же проверки, что и на сервере
fn validate(field: &DynamicField) -> Option<String> {
    if !is_valid_field_name(&field.name) {
        return Some("Имя поля: строчные латинские буквы, цифры и _, начинается с буквы".into());
    }
    if field.label.trim().is_empty() {
        return Some("Заголовок не заполнен".into());
    }
    if field.kind == FieldKind::SingleSelect && field.options.is_empty() {
        return Some("Для выбора из списка нужен хотя бы один вариант".into());
    }
    if field.kind == FieldKind::Calculated {
        match field.calculation_formula.as_deref() {
            None | Some("") => return Some("Для вычисляемого поля нужна формула".into()),
            Some(text) => {
                if let Err(e) = formula::parse(text) {
                    return Some(format!("Формула: {}", e));
                }
            }
        }
    }
    None
}

#[component]
pub fn FieldManagerPage() -> impl IntoView {
    let auth = use_auth();

    let (entity, set_entity) = create_signal(domain::ENTITIES[0].to_string());
    let (fields, set_fields) = create_signal(Vec::<DynamicField>::new());
    let (is_loading, set_is_loading) = create_signal(false);
    let (error_message, set_error_message) = create_signal(Option::<String>::None);

    // None — форма скрыта, Some(field) — создание/редактирование
    let (editing, set_editing) = create_signal(Option::<DynamicField>::None);
    let (options_input, set_options_input) = create_signal(String::new());

    let reload = move || {
        let entity = entity.get();
        set_is_loading.set(true);
        set_error_message.set(None);
        spawn_local(async move {
            match api::list_dynamic_fields(&entity, None).await {
                Ok(list) => set_fields.set(list),
                Err(e) => set_error_message.set(Some(e.message)),
            }
            set_is_loading.set(false);
        });
    };
    reload();

    let new_field = move || DynamicField {
        id: None,
        entity: entity.get(),
        page_name: String::new(),
        name: String::new(),
        label: String::new(),
        kind: FieldKind::Text,
        required: false,
        readonly: false,
        width: None,
        display_order: 0,
        options: Vec::new(),
        calculation_formula: None,
    };

    let update_editing = move |f: fn(&mut DynamicField, String), value: String| {
        set_editing.update(|e| {
            if let Some(field) = e.as_mut() {
                f(field, value);
            }
        });
    };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let Some(mut field) = editing.get() else {
            return;
        };
        field.options = if field.kind == FieldKind::SingleSelect {
            parse_options(&options_input.get())
        } else {
            Vec::new()
        };
        if field.kind != FieldKind::Calculated {
            field.calculation_formula = None;
        }
        if let Some(message) = validate(&field) {
            set_error_message.set(Some(message));
            return;
        }
        set_error_message.set(None);
        spawn_local(async move {
            let result = match field.id.clone() {
                Some(id) => api::update_dynamic_field(&id, &field).await,
                None => api::create_dynamic_field(&field.entity, &field).await,
            };
            match result {
                Ok(_) => {
                    set_editing.set(None);
                    reload();
                }
                Err(e) => set_error_message.set(Some(e.message)),
            }
        });
    };

    let on_delete = move |id: String| {
        spawn_local(async move {
            match api::delete_dynamic_field(&id).await {
                Ok(()) => reload(),
                Err(e) => set_error_message.set(Some(e.message)),
            }
        });
    };

    let can_manage = move || auth.can_manage_fields();

    // как поля лягут по вкладкам формы с учётом page_name
    let groups = Memo::new(move |_| {
        let entity = entity.get();
        let static_fields = domain::static_fields(&entity).unwrap_or_default();
        let dynamic: Vec<_> = fields.get().iter().filter_map(|f| f.descriptor()).collect();
        let merged = build_field_set(&static_fields, &dynamic);
        let merged: Vec<_> = merged
            .into_iter()
            .filter(|f| f.name != ACTIONS_FIELD)
            .collect();
        build_groups(&merged, &domain::static_groups(&entity).unwrap_or_default())
    });

    view! {
        <div class="field-manager-page">
            <div class="page-header">
                <h2>"Динамические поля"</h2>
                <select
                    on:change=move |ev| {
                        set_entity.set(event_target_value(&ev));
                        set_editing.set(None);
                        reload();
                    }
                >
                    {domain::ENTITIES
                        .iter()
                        .map(|e| {
                            view! {
                                <option value=*e selected=move || entity.get() == *e>
                                    {domain::page_title(e).unwrap_or(*e)}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>
                <button
                    class="btn-primary"
                    disabled=move || !can_manage()
                    on:click=move |_| {
                        set_options_input.set(String::new());
                        set_editing.set(Some(new_field()));
                    }
                >
                    "+ Добавить поле"
                </button>
            </div>

            <Show when=move || error_message.get().is_some()>
                <div class="error-message">
                    {move || error_message.get().unwrap_or_default()}
                </div>
            </Show>

            <Show when=move || is_loading.get()>
                <div class="loading">"Загрузка..."</div>
            </Show>

            <table class="data-table">
                <thead>
                    <tr>
                        <th>"Имя"</th>
                        <th>"Заголовок"</th>
                        <th>"Тип"</th>
                        <th>"Страница"</th>
                        <th>"Порядок"</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || fields.get()
                        key=|f| f.id.clone().unwrap_or_default()
                        children=move |field| {
                            let edit_field = field.clone();
                            let delete_id = field.id.clone().unwrap_or_default();
                            view! {
                                <tr>
                                    <td><code>{field.name.clone()}</code></td>
                                    <td>{field.label.clone()}</td>
                                    <td>{kind_label(field.kind)}</td>
                                    <td>{field.page_name.clone()}</td>
                                    <td>{field.display_order}</td>
                                    <td class="actions">
                                        <button
                                            class="btn-small"
                                            disabled=move || !can_manage()
                                            on:click=move |_| {
                                                set_options_input
                                                    .set(options_text(&edit_field.options));
                                                set_editing.set(Some(edit_field.clone()));
                                            }
                                        >
                                            "✏"
                                        </button>
                                        <button
                                            class="btn-small btn-danger"
                                            disabled=move || !can_manage()
                                            on:click=move |_| on_delete(delete_id.clone())
                                        >
                                            "🗑"
                                        </button>
                                    </td>
                                </tr>
                            }
                        }
                    />
                </tbody>
            </table>

            <div class="group-preview">
                <h3>"Вкладки формы"</h3>
                <For
                    each=move || groups.get()
                    key=|g| g.key.clone()
                    children=move |group| {
                        view! {
                            <div class="group-row">
                                <span class="group-title">{group.title.clone()}</span>
                                <span class="group-fields">
                                    {group.field_names.join(", ")}
                                </span>
                            </div>
                        }
                    }
                />
            </div>

            <Show when=move || editing.get().is_some()>
                <form class="field-form" on:submit=on_submit>
                    <h3>
                        {move || {
                            if editing.get().and_then(|f| f.id).is_some() {
                                "Редактирование поля"
                            } else {
                                "Новое поле"
                            }
                        }}
                    </h3>

                    <div class="form-group">
                        <label>"Имя (латиницей)"</label>
                        <input
                            type="text"
                            placeholder="pallet_qty"
                            prop:value=move || {
                                editing.get().map(|f| f.name).unwrap_or_default()
                            }
                            on:input=move |ev| {
                                update_editing(|f, v| f.name = v, event_target_value(&ev))
                            }
                        />
                    </div>

                    <div class="form-group">
                        <label>"Заголовок"</label>
                        <input
                            type="text"
                            prop:value=move || {
                                editing.get().map(|f| f.label).unwrap_or_default()
                            }
                            on:input=move |ev| {
                                update_editing(|f, v| f.label = v, event_target_value(&ev))
                            }
                        />
                    </div>

                    <div class="form-group">
                        <label>"Тип"</label>
                        <select on:change=move |ev| {
                            let value = event_target_value(&ev);
                            set_editing.update(|e| {
                                if let Some(field) = e.as_mut() {
                                    if let Some(kind) = FieldKind::from_str(&value) {
                                        field.kind = kind;
                                    }
                                }
                            });
                        }>
                            {FIELD_KINDS
                                .iter()
                                .map(|kind| {
                                    let kind = *kind;
                                    view! {
                                        <option
                                            value=kind.as_str()
                                            selected=move || {
                                                editing.get().map(|f| f.kind) == Some(kind)
                                            }
                                        >
                                            {kind_label(kind)}
                                        </option>
                                    }
                                })
                                .collect_view()}
                        </select>
                    </div>

                    <Show when=move || {
                        editing.get().map(|f| f.kind) == Some(FieldKind::SingleSelect)
                    }>
                        <div class="form-group">
                            <label>"Варианты (value=название, по строке)"</label>
                            <textarea
                                prop:value=move || options_input.get()
                                on:input=move |ev| {
                                    set_options_input.set(event_target_value(&ev))
                                }
                            ></textarea>
                        </div>
                    </Show>

                    <Show when=move || {
                        editing.get().map(|f| f.kind) == Some(FieldKind::Calculated)
                    }>
                        <div class="form-group">
                            <label>"Формула"</label>
                            <input
                                type="text"
                                placeholder="round(quantity * unit_price, 2)"
                                prop:value=move || {
                                    editing
                                        .get()
                                        .and_then(|f| f.calculation_formula)
                                        .unwrap_or_default()
                                }
                                on:input=move |ev| {
                                    update_editing(
                                        |f, v| {
                                            f.calculation_formula =
                                                if v.is_empty() { None } else { Some(v) };
                                        },
                                        event_target_value(&ev),
                                    )
                                }
                            />
                        </div>
                    </Show>

                    <div class="form-group">
                        <label>"Страница (группа)"</label>
                        <input
                            type="text"
                            placeholder="Логистика"
                            prop:value=move || {
                                editing.get().map(|f| f.page_name).unwrap_or_default()
                            }
                            on:input=move |ev| {
                                update_editing(|f, v| f.page_name = v, event_target_value(&ev))
                            }
                        />
                    </div>

                    <div class="form-group">
                        <label>"Порядок"</label>
                        <input
                            type="number"
                            prop:value=move || {
                                editing.get().map(|f| f.display_order).unwrap_or_default()
                            }
                            on:input=move |ev| {
                                update_editing(
                                    |f, v| f.display_order = v.parse().unwrap_or(0),
                                    event_target_value(&ev),
                                )
                            }
                        />
                    </div>

                    <div class="form-group-inline">
                        <label>
                            <input
                                type="checkbox"
                                prop:checked=move || {
                                    editing.get().map(|f| f.required).unwrap_or(false)
                                }
                                on:change=move |_| {
                                    set_editing.update(|e| {
                                        if let Some(field) = e.as_mut() {
                                            field.required = !field.required;
                                        }
                                    })
                                }
                            />
                            "Обязательное"
                        </label>
                        <label>
                            <input
                                type="checkbox"
                                prop:checked=move || {
                                    editing.get().map(|f| f.readonly).unwrap_or(false)
                                }
                                on:change=move |_| {
                                    set_editing.update(|e| {
                                        if let Some(field) = e.as_mut() {
                                            field.readonly = !field.readonly;
                                        }
                                    })
                                }
                            />
                            "Только чтение"
                        </label>
                    </div>

                    <div class="form-actions">
                        <button type="submit" class="btn-primary" disabled=move || !can_manage()>
                            "Сохранить"
                        </button>
                        <button
                            type="button"
                            class="btn-secondary"
                            on:click=move |_| set_editing.set(None)
                        >
                            "Отмена"
                        </button>
                    </div>
                </form>
            </Show>
        </div>
    }
}
