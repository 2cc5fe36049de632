//! Настройка колонок: видимость и порядок полей списка
//!
//! The panel edits a working copy of the visibility map and order list
//! and persists both blobs on save. Reordering uses native HTML5 drag
//! events on the rows; the highlighted drop edge comes from an explicit
//! [`HoverState`] instead of being re-derived from CSS classes.

use contracts::shared::column_settings::{
    column_config_payload, column_order_payload, parse_column_config, parse_column_order,
    ConfigType,
};
use contracts::shared::fields::{
    move_field, prune_config, prune_order, resolve_visible_ordered, ColumnConfig, ColumnOrder,
    FieldDescriptor, ResolveTarget,
};
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;

use crate::shared::auth::use_auth;
use crate::shared::fields::api;

/// Максимальный шаг автопрокрутки за одно drag-событие, px
const MAX_SCROLL_STEP: f64 = 24.0;
/// Доля высоты контейнера сверху и снизу, в которой работает автопрокрутка
const SCROLL_BAND: f64 = 0.3;

/// Which edge of a row the dragged item would land on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropEdge {
    Before,
    After,
}

/// Current drop target while a row is being dragged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverState {
    pub target_index: usize,
    pub edge: DropEdge,
}

impl HoverState {
    /// Insertion position in pre-removal coordinates
    pub fn insert_position(&self) -> usize {
        match self.edge {
            DropEdge::Before => self.target_index,
            DropEdge::After => self.target_index + 1,
        }
    }
}

fn hover_from_event(ev: &web_sys::DragEvent, index: usize) -> Option<HoverState> {
    let element = ev
        .current_target()?
        .dyn_into::<web_sys::Element>()
        .ok()?;
    let rect = element.get_bounding_client_rect();
    let midpoint = rect.top() + rect.height() / 2.0;
    let edge = if (ev.client_y() as f64) < midpoint {
        DropEdge::Before
    } else {
        DropEdge::After
    };
    Some(HoverState {
        target_index: index,
        edge,
    })
}

/// Пропорциональная автопрокрутка у верхнего/нижнего края контейнера
fn auto_scroll(container: &web_sys::HtmlElement, client_y: f64) {
    let rect = container.get_bounding_client_rect();
    let band = rect.height() * SCROLL_BAND;
    if band <= 0.0 {
        return;
    }
    let delta = if client_y < rect.top() + band {
        -((rect.top() + band - client_y) / band * MAX_SCROLL_STEP)
    } else if client_y > rect.bottom() - band {
        (client_y - (rect.bottom() - band)) / band * MAX_SCROLL_STEP
    } else {
        return;
    };
    let step = delta.clamp(-MAX_SCROLL_STEP, MAX_SCROLL_STEP);
    container.set_scroll_top(container.scroll_top() + step as i32);
}

#[component]
pub fn ColumnSettingsPanel(
    page_name: String,
    fields: Vec<FieldDescriptor>,
    #[prop(into)] on_applied: Callback<()>,
    #[prop(into)] on_close: Callback<()>,
) -> impl IntoView {
    let auth = use_auth();

    let (config, set_config) = create_signal(ColumnConfig::new());
    let (order, set_order) = create_signal(ColumnOrder::new());
    let (is_loading, set_is_loading) = create_signal(true);
    let (is_saving, set_is_saving) = create_signal(false);
    let (error_message, set_error_message) = create_signal(Option::<String>::None);

    let (dragged, set_dragged) = create_signal(Option::<String>::None);
    let (hover, set_hover) = create_signal(Option::<HoverState>::None);

    let list_ref = NodeRef::<leptos::html::Div>::new();

    let registry = StoredValue::new(fields);
    let page = StoredValue::new(page_name);

    // Начальная загрузка обоих блобов
    {
        let page_name = page.get_value();
        spawn_local(async move {
            let mut loaded_config = ColumnConfig::new();
            let mut loaded_order = ColumnOrder::new();
            match api::get_column_config(&page_name, ConfigType::ColumnConfig).await {
                Ok(Some(entry)) => loaded_config = parse_column_config(&entry.payload),
                Ok(None) => {}
                Err(e) => set_error_message.set(Some(e.message)),
            }
            match api::get_column_config(&page_name, ConfigType::ColumnOrder).await {
                Ok(Some(entry)) => loaded_order = parse_column_order(&entry.payload),
                Ok(None) => {}
                Err(e) => set_error_message.set(Some(e.message)),
            }
            // рабочий порядок: все поля реестра, сохранённый порядок впереди
            let panel_order = resolve_visible_ordered(
                &registry.get_value(),
                &ColumnConfig::new(),
                &loaded_order,
                ResolveTarget::Form,
            );
            set_config.set(loaded_config);
            set_order.set(panel_order);
            set_is_loading.set(false);
        });
    }

    let is_required = move |name: &str| {
        registry
            .get_value()
            .iter()
            .any(|f| f.name == name && f.required)
    };

    let is_visible = move |name: &str| {
        if is_required(name) {
            return true;
        }
        config.get().get(name).copied().unwrap_or(true)
    };

    let toggle_visible = move |name: String| {
        set_config.update(|c| {
            let current = c.get(&name).copied().unwrap_or(true);
            c.insert(name, !current);
        });
    };

    let on_drop_at = move |position: usize| {
        if let Some(name) = dragged.get() {
            set_order.update(|o| *o = move_field(o, &name, position));
        }
        set_dragged.set(None);
        set_hover.set(None);
    };

    let on_save = move |_| {
        if !auth.can_edit_columns() || is_saving.get() {
            return;
        }
        set_is_saving.set(true);
        set_error_message.set(None);
        let page_name = page.get_value();
        let fields = registry.get_value();
        let mut pruned_config = config.get();
        prune_config(&mut pruned_config, &fields);
        let mut pruned_order = order.get();
        prune_order(&mut pruned_order, &fields);
        let config_payload = column_config_payload(&pruned_config);
        let order_payload = column_order_payload(&pruned_order);
        spawn_local(async move {
            let result = async {
                api::save_column_config(&page_name, ConfigType::ColumnConfig, config_payload)
                    .await?;
                api::save_column_config(&page_name, ConfigType::ColumnOrder, order_payload).await
            }
            .await;
            match result {
                Ok(_) => {
                    on_applied.run(());
                }
                Err(e) => set_error_message.set(Some(e.message)),
            }
            set_is_saving.set(false);
        });
    };

    let on_reset = move |_| {
        if !auth.can_edit_columns() || is_saving.get() {
            return;
        }
        set_is_saving.set(true);
        set_error_message.set(None);
        let page_name = page.get_value();
        let fields = registry.get_value();
        spawn_local(async move {
            // 404 — конфига и не было, это тоже успешный сброс
            for config_type in [ConfigType::ColumnConfig, ConfigType::ColumnOrder] {
                match api::delete_column_config(&page_name, config_type).await {
                    Ok(()) => {}
                    Err(e) if e.kind == contracts::shared::api_error::ErrorKind::NotFound => {}
                    Err(e) => {
                        set_error_message.set(Some(e.message));
                        set_is_saving.set(false);
                        return;
                    }
                }
            }
            let panel_order = resolve_visible_ordered(
                &fields,
                &ColumnConfig::new(),
                &ColumnOrder::new(),
                ResolveTarget::Form,
            );
            set_config.set(ColumnConfig::new());
            set_order.set(panel_order);
            set_is_saving.set(false);
            on_applied.run(());
        });
    };

    let can_edit = move || auth.can_edit_columns() && !is_loading.get() && !is_saving.get();

    view! {
        <div class="column-settings-panel">
            <div class="panel-header">
                <h3>"Настройка колонок"</h3>
                <button class="btn-close" on:click=move |_| on_close.run(())>
                    "✕"
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

            <div
                class="column-settings-list"
                node_ref=list_ref
                on:wheel=move |ev: web_sys::WheelEvent| {
                    if let Some(container) = list_ref.get() {
                        ev.prevent_default();
                        let el: &web_sys::HtmlElement = &container;
                        el.set_scroll_top(el.scroll_top() + ev.delta_y() as i32);
                    }
                }
            >
                <For
                    each={move || order.get().into_iter().enumerate().collect::<Vec<_>>()}
                    // индекс в ключе: после переноса строка пересоздаётся
                    // со свежей позицией
                    key=|(index, name)| (*index, name.clone())
                    children=move |(index, name)| {
                        let label = registry
                            .get_value()
                            .iter()
                            .find(|f| f.name == name)
                            .map(|f| f.label.clone())
                            .unwrap_or_else(|| name.clone());
                        let required = is_required(&name);
                        let drag_name = name.clone();
                        let toggle_name = name.clone();
                        let class_name = name.clone();
                        let row_class = move || {
                            let mut class = "column-settings-row".to_string();
                            if dragged.get().as_deref() == Some(class_name.as_str()) {
                                class.push_str(" dragging");
                            }
                            if let Some(h) = hover.get() {
                                if h.target_index == index {
                                    match h.edge {
                                        DropEdge::Before => class.push_str(" drop-before"),
                                        DropEdge::After => class.push_str(" drop-after"),
                                    }
                                }
                            }
                            class
                        };
                        view! {
                            <div
                                class=row_class
                                draggable="true"
                                on:dragstart=move |ev: web_sys::DragEvent| {
                                    if let Some(dt) = ev.data_transfer() {
                                        let _ = dt.set_data("text/plain", &drag_name);
                                        dt.set_effect_allowed("move");
                                    }
                                    set_dragged.set(Some(drag_name.clone()));
                                }
                                on:dragover=move |ev: web_sys::DragEvent| {
                                    ev.prevent_default();
                                    set_hover.set(hover_from_event(&ev, index));
                                    if let Some(container) = list_ref.get() {
                                        auto_scroll(&container, ev.client_y() as f64);
                                    }
                                }
                                on:drop=move |ev: web_sys::DragEvent| {
                                    ev.prevent_default();
                                    let position = hover
                                        .get()
                                        .map(|h| h.insert_position())
                                        .unwrap_or(index);
                                    on_drop_at(position);
                                }
                                on:dragend=move |_| {
                                    // drop мимо списка отменяет перенос
                                    set_dragged.set(None);
                                    set_hover.set(None);
                                }
                            >
                                <span class="drag-handle">"⋮⋮"</span>
                                <input
                                    type="checkbox"
                                    prop:checked=move || is_visible(&toggle_name)
                                    disabled=move || required || !can_edit()
                                    on:change={
                                        let name = name.clone();
                                        move |_| toggle_visible(name.clone())
                                    }
                                />
                                <span class="field-label">{label}</span>
                                <Show when=move || required>
                                    <span class="required-badge">"обязательное"</span>
                                </Show>
                            </div>
                        }
                    }
                />
            </div>

            <div class="panel-footer">
                <button class="btn-primary" disabled=move || !can_edit() on:click=on_save>
                    {move || if is_saving.get() { "Сохранение..." } else { "Сохранить" }}
                </button>
                <button class="btn-secondary" disabled=move || !can_edit() on:click=on_reset>
                    "Сбросить"
                </button>
            </div>
        </div>
    }
}
