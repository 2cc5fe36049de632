//! Auth state shared through leptos context

use contracts::shared::api_error::ApiError;
use contracts::system::auth::{CurrentUser, LoginRequest, LoginResponse, PermissionResponse};
use leptos::prelude::*;

use crate::shared::api_utils::{get_json, post_json, store_token, stored_token};

#[derive(Clone, Copy)]
pub struct AuthContext {
    pub user: RwSignal<Option<CurrentUser>>,
    pub permission: RwSignal<Option<PermissionResponse>>,
}

impl AuthContext {
    pub fn new() -> Self {
        Self {
            user: RwSignal::new(None),
            permission: RwSignal::new(None),
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.get().is_some()
    }

    /// Client-side capability check for save/reset buttons; the server
    /// enforces the same rule on every mutation anyway
    pub fn can_edit_columns(&self) -> bool {
        self.permission
            .get()
            .map(|p| p.can_edit_columns)
            .unwrap_or(false)
    }

    pub fn can_manage_fields(&self) -> bool {
        self.permission
            .get()
            .map(|p| p.can_manage_fields)
            .unwrap_or(false)
    }

    pub fn logout(&self) {
        store_token(None);
        self.user.set(None);
        self.permission.set(None);
    }
}

pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext not found in context")
}

pub async fn login(username: String, password: String) -> Result<CurrentUser, ApiError> {
    let response: LoginResponse = post_json(
        "/api/system/auth/login",
        &LoginRequest { username, password },
    )
    .await?;
    store_token(Some(&response.access_token));
    Ok(response.user)
}

/// Restore the session from a stored token on startup
pub async fn fetch_current_user() -> Result<Option<CurrentUser>, ApiError> {
    if stored_token().is_none() {
        return Ok(None);
    }
    match get_json::<CurrentUser>("/api/system/auth/me").await {
        Ok(user) => Ok(Some(user)),
        Err(err) if err.kind == contracts::shared::api_error::ErrorKind::Forbidden => {
            // токен протух
            store_token(None);
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

pub async fn fetch_permission() -> Result<PermissionResponse, ApiError> {
    get_json("/api/system/auth/permission").await
}
