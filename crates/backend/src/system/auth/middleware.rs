use axum::{body::Body, extract::Request, middleware::Next, response::Response};
use contracts::system::auth::TokenClaims;

use crate::error::AppError;

async fn claims_from_request(headers: &axum::http::HeaderMap) -> Result<TokenClaims, AppError> {
    let auth_header = headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Forbidden("требуется авторизация".into()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Forbidden("требуется авторизация".into()))?;

    super::jwt::validate_token(token)
        .await
        .map_err(|_| AppError::Forbidden("токен недействителен".into()))
}

/// Requires a valid access token; claims land in request extensions
pub async fn require_auth(mut req: Request<Body>, next: Next) -> Result<Response, AppError> {
    let claims = claims_from_request(req.headers()).await?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Requires a valid access token with the admin flag. Column-config and
/// dynamic-field mutations go through this.
pub async fn require_admin(mut req: Request<Body>, next: Next) -> Result<Response, AppError> {
    let claims = claims_from_request(req.headers()).await?;
    if !claims.is_admin {
        return Err(AppError::Forbidden(
            "операция доступна только администратору".into(),
        ));
    }
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
