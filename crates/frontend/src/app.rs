use contracts::domain;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::shared::auth::{self, AuthContext};
use crate::shared::entity_list::EntityListPage;
use crate::shared::fields::FieldManagerPage;
use crate::system::pages::LoginPage;

/// Текущая страница; роутер не используется, переключение через enum
#[derive(Debug, Clone, PartialEq, Eq)]
enum Page {
    Entity(String),
    FieldManager,
}

#[component]
pub fn App() -> impl IntoView {
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);

    let (page, set_page) = create_signal(Page::Entity(domain::ENTITIES[0].to_string()));
    let (session_checked, set_session_checked) = create_signal(false);

    // восстановление сессии по сохранённому токену
    spawn_local(async move {
        if let Ok(Some(user)) = auth::fetch_current_user().await {
            auth_ctx.user.set(Some(user));
            if let Ok(permission) = auth::fetch_permission().await {
                auth_ctx.permission.set(Some(permission));
            }
        }
        set_session_checked.set(true);
    });

    view! {
        <Show when=move || session_checked.get()>
            <Show
                when=move || auth_ctx.user.get().is_some()
                fallback=|| view! { <LoginPage /> }
            >
                <div class="app-layout">
                    <nav class="sidebar">
                        <div class="sidebar-title">"Упаковка"</div>
                        {domain::ENTITIES
                            .iter()
                            .map(|entity| {
                                let entity_key = entity.to_string();
                                let is_current = {
                                    let entity_key = entity_key.clone();
                                    move || page.get() == Page::Entity(entity_key.clone())
                                };
                                view! {
                                    <button
                                        class="nav-item"
                                        class:active=is_current
                                        on:click=move |_| {
                                            set_page.set(Page::Entity(entity_key.clone()))
                                        }
                                    >
                                        {domain::page_title(entity).unwrap_or(*entity)}
                                    </button>
                                }
                            })
                            .collect_view()}
                        <div class="sidebar-separator"></div>
                        <button
                            class="nav-item"
                            class:active=move || page.get() == Page::FieldManager
                            on:click=move |_| set_page.set(Page::FieldManager)
                        >
                            "Динамические поля"
                        </button>
                        <div class="sidebar-footer">
                            <span class="user-name">
                                {move || {
                                    auth_ctx
                                        .user
                                        .get()
                                        .map(|u| u.username)
                                        .unwrap_or_default()
                                }}
                            </span>
                            <button
                                class="btn-small"
                                on:click=move |_| auth_ctx.logout()
                            >
                                "Выйти"
                            </button>
                        </div>
                    </nav>
                    <main class="content">
                        {move || match page.get() {
                            Page::Entity(entity) => {
                                view! { <EntityListPage entity=entity /> }.into_any()
                            }
                            Page::FieldManager => view! { <FieldManagerPage /> }.into_any(),
                        }}
                    </main>
                </div>
            </Show>
        </Show>
    }
}
