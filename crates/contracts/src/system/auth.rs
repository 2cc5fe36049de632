//! Auth DTOs shared by backend middleware and the frontend login flow

use serde::{Deserialize, Serialize};

/// JWT claims of an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// user id
    pub sub: String,
    pub username: String,
    pub is_admin: bool,
    pub exp: usize,
    pub iat: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    pub username: String,
    pub is_admin: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: CurrentUser,
}

/// Capability check used to gate the column-settings save/reset buttons
/// before any network call; the server enforces the same rule with
/// `require_admin`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionResponse {
    pub can_edit_columns: bool,
    pub can_manage_fields: bool,
}
