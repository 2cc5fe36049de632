use argon2::password_hash::PasswordHash;
use argon2::{Argon2, PasswordVerifier};
use axum::{Extension, Json};
use contracts::system::auth::{
    CurrentUser, LoginRequest, LoginResponse, PermissionResponse, TokenClaims,
};
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

use crate::error::{AppError, AppResult};
use crate::shared::data::db::get_connection;
use crate::system::auth::jwt;

/// POST /api/system/auth/login
pub async fn login(Json(request): Json<LoginRequest>) -> AppResult<Json<LoginResponse>> {
    let conn = get_connection();

    let row = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT id, username, password_hash, is_admin FROM sys_users WHERE username = ?",
            [request.username.clone().into()],
        ))
        .await?
        .ok_or_else(|| AppError::Forbidden("неверный логин или пароль".into()))?;

    let password_hash: String = row
        .try_get("", "password_hash")
        .map_err(|e| AppError::Other(e.into()))?;
    let parsed = PasswordHash::new(&password_hash)
        .map_err(|e| AppError::Other(anyhow::anyhow!("stored hash invalid: {}", e)))?;
    if Argon2::default()
        .verify_password(request.password.as_bytes(), &parsed)
        .is_err()
    {
        return Err(AppError::Forbidden("неверный логин или пароль".into()));
    }

    let id: String = row.try_get("", "id").map_err(|e| AppError::Other(e.into()))?;
    let is_admin: bool = row
        .try_get::<i32>("", "is_admin")
        .map(|v| v != 0)
        .unwrap_or(false);

    let token = jwt::generate_access_token(&id, &request.username, is_admin)
        .await
        .map_err(AppError::Other)?;

    tracing::info!("user {} logged in", request.username);
    Ok(Json(LoginResponse {
        access_token: token,
        user: CurrentUser {
            id,
            username: request.username,
            is_admin,
        },
    }))
}

/// GET /api/system/auth/me (behind require_auth)
pub async fn current_user(Extension(claims): Extension<TokenClaims>) -> Json<CurrentUser> {
    Json(CurrentUser {
        id: claims.sub,
        username: claims.username,
        is_admin: claims.is_admin,
    })
}

/// GET /api/system/auth/permission (behind require_auth)
///
/// Lets the client disable save/reset buttons before any mutation call;
/// the mutations themselves still run behind require_admin.
pub async fn permission(Extension(claims): Extension<TokenClaims>) -> Json<PermissionResponse> {
    Json(PermissionResponse {
        can_edit_columns: claims.is_admin,
        can_manage_fields: claims.is_admin,
    })
}
