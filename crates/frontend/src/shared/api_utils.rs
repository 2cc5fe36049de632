//! API utilities for frontend-backend communication
//!
//! URL construction plus typed request helpers: every non-success
//! response is decoded into the shared [`ApiError`] contract, so callers
//! branch on `ErrorKind` instead of matching message text.

use contracts::shared::api_error::{ApiError, ErrorKind};
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Backend base URL derived from the current window location, backend
/// listens on port 3000
pub fn api_base() -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}:3000", protocol, hostname)
}

pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}

/// Bearer token persisted by the login page
pub fn stored_token() -> Option<String> {
    web_sys::window()?
        .local_storage()
        .ok()??
        .get_item("access_token")
        .ok()?
}

pub fn store_token(token: Option<&str>) {
    let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) else {
        return;
    };
    match token {
        Some(token) => {
            let _ = storage.set_item("access_token", token);
        }
        None => {
            let _ = storage.remove_item("access_token");
        }
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    if response.ok() {
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::transport(format!("ответ не разбирается: {}", e)))
    } else {
        // typed body first, HTTP status as the fallback
        let status = response.status();
        match response.json::<ApiError>().await {
            Ok(err) => Err(err),
            Err(_) => {
                let kind = match status {
                    401 | 403 => ErrorKind::Forbidden,
                    404 => ErrorKind::NotFound,
                    400 | 422 => ErrorKind::Validation,
                    _ => ErrorKind::Transport,
                };
                Err(ApiError::new(kind, format!("HTTP {}", status)))
            }
        }
    }
}

fn with_auth(request: gloo_net::http::RequestBuilder) -> gloo_net::http::RequestBuilder {
    match stored_token() {
        Some(token) => request.header("Authorization", &format!("Bearer {}", token)),
        None => request,
    }
}

pub async fn get_json<T: DeserializeOwned>(path: &str) -> Result<T, ApiError> {
    let response = with_auth(Request::get(&api_url(path)))
        .send()
        .await
        .map_err(|e| ApiError::transport(e.to_string()))?;
    decode(response).await
}

pub async fn post_json<T: DeserializeOwned, B: Serialize>(
    path: &str,
    body: &B,
) -> Result<T, ApiError> {
    let response = with_auth(Request::post(&api_url(path)))
        .json(body)
        .map_err(|e| ApiError::transport(e.to_string()))?
        .send()
        .await
        .map_err(|e| ApiError::transport(e.to_string()))?;
    decode(response).await
}

pub async fn put_json<T: DeserializeOwned, B: Serialize>(
    path: &str,
    body: &B,
) -> Result<T, ApiError> {
    let response = with_auth(Request::put(&api_url(path)))
        .json(body)
        .map_err(|e| ApiError::transport(e.to_string()))?
        .send()
        .await
        .map_err(|e| ApiError::transport(e.to_string()))?;
    decode(response).await
}

pub async fn delete_json<T: DeserializeOwned>(path: &str) -> Result<T, ApiError> {
    let response = with_auth(Request::delete(&api_url(path)))
        .send()
        .await
        .map_err(|e| ApiError::transport(e.to_string()))?;
    decode(response).await
}
