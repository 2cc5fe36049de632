//! Column configuration persisted per `(page_name, config_type)`
//!
//! The server stores one JSON blob per key: a `{field_name: bool}`
//! visibility map for `column_config`, a `[field_name, ...]` list for
//! `column_order`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::fields::{ColumnConfig, ColumnOrder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigType {
    ColumnConfig,
    ColumnOrder,
}

impl ConfigType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ColumnConfig => "column_config",
            Self::ColumnOrder => "column_order",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "column_config" => Some(Self::ColumnConfig),
            "column_order" => Some(Self::ColumnOrder),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetConfigQuery {
    pub page_name: String,
    pub config_type: ConfigType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveConfigRequest {
    pub page_name: String,
    pub config_type: ConfigType,
    pub payload: Value,
}

/// The save response echoes the stored blob so the client can confirm
/// what the server actually persisted (last write wins, no version token)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveConfigResponse {
    pub success: bool,
    pub stored: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub page_name: String,
    pub config_type: ConfigType,
    pub payload: Value,
    pub updated_at: String,
}

/// Decode a stored visibility blob; anything malformed reads as "no
/// overrides" rather than breaking the page
pub fn parse_column_config(payload: &Value) -> ColumnConfig {
    match payload {
        Value::Object(map) => map
            .iter()
            .filter_map(|(k, v)| v.as_bool().map(|b| (k.clone(), b)))
            .collect(),
        _ => ColumnConfig::new(),
    }
}

/// Decode a stored order blob, non-string entries skipped
pub fn parse_column_order(payload: &Value) -> ColumnOrder {
    match payload {
        Value::Array(items) => items
            .iter()
            .filter_map(|v| v.as_str().map(|s| s.to_string()))
            .collect(),
        _ => ColumnOrder::new(),
    }
}

pub fn column_config_payload(config: &ColumnConfig) -> Value {
    Value::Object(
        config
            .iter()
            .map(|(k, v)| (k.clone(), Value::Bool(*v)))
            .collect(),
    )
}

pub fn column_order_payload(order: &ColumnOrder) -> Value {
    Value::Array(order.iter().map(|n| Value::String(n.clone())).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_config_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&ConfigType::ColumnOrder).unwrap(),
            "\"column_order\""
        );
        assert_eq!(ConfigType::from_str("column_config"), Some(ConfigType::ColumnConfig));
        assert_eq!(ConfigType::from_str("что-то"), None);
    }

    #[test]
    fn test_visibility_round_trip() {
        let mut config = ColumnConfig::new();
        config.insert("a".to_string(), false);
        config.insert("b".to_string(), true);
        let payload = column_config_payload(&config);
        assert_eq!(parse_column_config(&payload), config);
    }

    #[test]
    fn test_order_round_trip() {
        let order = vec!["c".to_string(), "a".to_string()];
        let payload = column_order_payload(&order);
        assert_eq!(parse_column_order(&payload), order);
    }

    #[test]
    fn test_malformed_payload_reads_empty() {
        assert!(parse_column_config(&json!([1, 2])).is_empty());
        assert!(parse_column_order(&json!({"a": true})).is_empty());
        assert_eq!(parse_column_order(&json!(["a", 5, "b"])), vec!["a", "b"]);
    }
}
