use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::shared::auth::{self, use_auth};

#[component]
pub fn LoginPage() -> impl IntoView {
    let (username, set_username) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (error_message, set_error_message) = create_signal(Option::<String>::None);
    let (is_loading, set_is_loading) = create_signal(false);

    let auth_ctx = use_auth();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();

        let username_val = username.get();
        let password_val = password.get();

        set_is_loading.set(true);
        set_error_message.set(None);

        spawn_local(async move {
            match auth::login(username_val, password_val).await {
                Ok(user) => {
                    auth_ctx.user.set(Some(user));
                    match auth::fetch_permission().await {
                        Ok(permission) => auth_ctx.permission.set(Some(permission)),
                        Err(_) => auth_ctx.permission.set(None),
                    }
                    set_is_loading.set(false);
                }
                Err(e) => {
                    set_error_message.set(Some(format!("Вход не выполнен: {}", e.message)));
                    set_is_loading.set(false);
                }
            }
        });
    };

    view! {
        <div class="login-container">
            <div class="login-box">
                <h1>"Упаковка: справочники"</h1>
                <h2>"Вход в систему"</h2>

                <Show when=move || error_message.get().is_some()>
                    <div class="error-message">
                        {move || error_message.get().unwrap_or_default()}
                    </div>
                </Show>

                <form on:submit=on_submit>
                    <div class="form-group">
                        <label for="username">"Логин"</label>
                        <input
                            type="text"
                            id="username"
                            placeholder="admin"
                            value=move || username.get()
                            on:input=move |ev| set_username.set(event_target_value(&ev))
                            required
                            disabled=move || is_loading.get()
                        />
                    </div>

                    <div class="form-group">
                        <label for="password">"Пароль"</label>
                        <input
                            type="password"
                            id="password"
                            placeholder="admin"
                            value=move || password.get()
                            on:input=move |ev| set_password.set(event_target_value(&ev))
                            required
                            disabled=move || is_loading.get()
                        />
                    </div>

                    <button
                        type="submit"
                        class="btn-primary"
                        disabled=move || is_loading.get()
                    >
                        {move || if is_loading.get() { "Вход..." } else { "Войти" }}
                    </button>
                </form>

                <div class="login-info">
                    <p>"По умолчанию:"</p>
                    <p>"Логин: " <strong>"admin"</strong></p>
                    <p>"Пароль: " <strong>"admin"</strong></p>
                </div>
            </div>
        </div>
    }
}
