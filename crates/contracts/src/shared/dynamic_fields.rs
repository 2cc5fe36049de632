//! Admin-defined dynamic fields and their per-record values

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::fields::{FieldDescriptor, FieldKind, SelectOption};

/// One dynamic field definition as stored by the server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DynamicField {
    /// Empty before the first save
    #[serde(default)]
    pub id: Option<String>,
    /// Business entity key, e.g. `a005_bag_type`
    pub entity: String,
    /// Page/tab the admin attached the field to; drives group synthesis
    #[serde(default)]
    pub page_name: String,
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub readonly: bool,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default)]
    pub options: Vec<SelectOption>,
    #[serde(default)]
    pub calculation_formula: Option<String>,
}

impl DynamicField {
    /// Convert to a registry descriptor. `None` for a definition without
    /// a usable name (malformed rows must not break the page).
    pub fn descriptor(&self) -> Option<FieldDescriptor> {
        if self.name.trim().is_empty() {
            return None;
        }
        let mut descriptor = FieldDescriptor::new(self.name.clone(), self.label.clone(), self.kind);
        descriptor.required = self.required;
        descriptor.readonly = self.readonly;
        descriptor.width = self.width;
        descriptor.display_order = self.display_order;
        descriptor.options = self.options.clone();
        descriptor.calculation_formula = self.calculation_formula.clone();
        descriptor.page_name = Some(self.page_name.clone());
        Some(descriptor)
    }
}

/// `[a-z][a-z0-9_]*` — the only names accepted for dynamic fields, so a
/// field name is always a valid record key and formula identifier
pub fn is_valid_field_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// Dynamic values of one record on one page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DynamicValues {
    pub record_id: String,
    pub values: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveValuesRequest {
    pub values: serde_json::Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_name_pattern() {
        assert!(is_valid_field_name("weight_g"));
        assert!(is_valid_field_name("a1"));
        assert!(!is_valid_field_name(""));
        assert!(!is_valid_field_name("1abc"));
        assert!(!is_valid_field_name("Weight"));
        assert!(!is_valid_field_name("вес"));
        assert!(!is_valid_field_name("a-b"));
    }

    #[test]
    fn test_descriptor_carries_page_name() {
        let field = DynamicField {
            id: Some("x".into()),
            entity: "a005_bag_type".into(),
            page_name: "Логистика".into(),
            name: "pallet_qty".into(),
            label: "Кол-во на паллете".into(),
            kind: FieldKind::Integer,
            required: false,
            readonly: false,
            width: Some(90),
            display_order: 5,
            options: Vec::new(),
            calculation_formula: None,
        };
        let descriptor = field.descriptor().unwrap();
        assert_eq!(descriptor.page_name.as_deref(), Some("Логистика"));
        assert_eq!(descriptor.display_order, 5);
    }

    #[test]
    fn test_nameless_definition_yields_no_descriptor() {
        let field = DynamicField {
            id: None,
            entity: "a005_bag_type".into(),
            page_name: String::new(),
            name: "   ".into(),
            label: "x".into(),
            kind: FieldKind::Text,
            required: false,
            readonly: false,
            width: None,
            display_order: 0,
            options: Vec::new(),
            calculation_formula: None,
        };
        assert!(field.descriptor().is_none());
    }
}
