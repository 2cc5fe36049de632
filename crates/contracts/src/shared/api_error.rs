//! Typed API error contract shared between backend and frontend
//!
//! The backend serializes every failed response as `{"error": kind,
//! "message": "..."}` so the client never has to string-match
//! human-readable text to find out what went wrong.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a failed API operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Authenticated, but not allowed (e.g. non-admin saving column config)
    Forbidden,
    /// Target entity / config record does not exist
    NotFound,
    /// Request payload rejected before touching storage
    Validation,
    /// Transport failure or unexpected server-side error
    Transport,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::Validation => "validation",
            Self::Transport => "transport",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(rename = "error")]
    pub kind: ErrorKind,
    pub message: String,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.as_str(), self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_shape() {
        let err = ApiError::forbidden("нет прав на сохранение настроек");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["error"], "forbidden");
        assert_eq!(json["message"], "нет прав на сохранение настроек");

        let back: ApiError = serde_json::from_value(json).unwrap();
        assert_eq!(back.kind, ErrorKind::Forbidden);
    }

    #[test]
    fn test_kind_round_trip() {
        for kind in [
            ErrorKind::Forbidden,
            ErrorKind::NotFound,
            ErrorKind::Validation,
            ErrorKind::Transport,
        ] {
            let s = serde_json::to_string(&kind).unwrap();
            assert_eq!(s, format!("\"{}\"", kind.as_str()));
        }
    }
}
