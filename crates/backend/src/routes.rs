use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::{handlers, system};

/// Конфигурация всех роутов приложения
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // SYSTEM AUTH
        // ========================================
        .route(
            "/api/system/auth/login",
            post(system::handlers::auth::login),
        )
        .route(
            "/api/system/auth/me",
            get(system::handlers::auth::current_user)
                .layer(middleware::from_fn(system::auth::middleware::require_auth)),
        )
        .route(
            "/api/system/auth/permission",
            get(system::handlers::auth::permission)
                .layer(middleware::from_fn(system::auth::middleware::require_auth)),
        )
        // ========================================
        // COLUMN CONFIG (чтение всем, запись админу)
        // ========================================
        .route(
            "/api/system/column-config/get",
            get(handlers::column_config::get_config),
        )
        .route(
            "/api/system/column-config/list",
            get(handlers::column_config::list_configs),
        )
        .route(
            "/api/system/column-config/save",
            post(handlers::column_config::save_config)
                .layer(middleware::from_fn(system::auth::middleware::require_admin)),
        )
        .route(
            "/api/system/column-config/delete",
            delete(handlers::column_config::delete_config)
                .layer(middleware::from_fn(system::auth::middleware::require_admin)),
        )
        // ========================================
        // DYNAMIC FIELDS
        // ========================================
        .route(
            "/api/system/dynamic-fields/:entity/fields",
            get(handlers::dynamic_fields::list_fields),
        )
        .route(
            "/api/system/dynamic-fields/:entity/fields",
            post(handlers::dynamic_fields::create_field)
                .layer(middleware::from_fn(system::auth::middleware::require_admin)),
        )
        .route(
            "/api/system/dynamic-fields/fields/:id",
            put(handlers::dynamic_fields::update_field)
                .delete(handlers::dynamic_fields::delete_field)
                .layer(middleware::from_fn(system::auth::middleware::require_admin)),
        )
        .route(
            "/api/system/dynamic-fields/:entity/page/:page_name/:record_id/values",
            get(handlers::dynamic_fields::get_values)
                .post(handlers::dynamic_fields::save_values)
                .delete(handlers::dynamic_fields::delete_values),
        )
        // ========================================
        // БИЗНЕС-МОДУЛИ
        // ========================================
        .route(
            "/api/bag_type",
            get(handlers::a005_bag_type::list_all).post(handlers::a005_bag_type::upsert),
        )
        .route(
            "/api/bag_type/:id",
            delete(handlers::a005_bag_type::delete),
        )
}
