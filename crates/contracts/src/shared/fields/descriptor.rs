//! Field descriptors: one column/input definition per field

use serde::{Deserialize, Serialize};

/// Kind of a field, drives both the form input widget and table cell rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    #[default]
    Text,
    Textarea,
    Integer,
    Float,
    Boolean,
    Date,
    #[serde(rename = "datetime")]
    DateTime,
    SingleSelect,
    ManyToOne,
    Calculated,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::SingleSelect => "single_select",
            Self::ManyToOne => "many_to_one",
            Self::Calculated => "calculated",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Some(match s {
            "text" => Self::Text,
            "textarea" => Self::Textarea,
            "integer" => Self::Integer,
            "float" => Self::Float,
            "boolean" => Self::Boolean,
            "date" => Self::Date,
            "datetime" => Self::DateTime,
            "single_select" => Self::SingleSelect,
            "many_to_one" => Self::ManyToOne,
            "calculated" => Self::Calculated,
            _ => return None,
        })
    }
}

/// Option of a select-like field, order matters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// One column/input definition
///
/// Static descriptors are built in the `domain` tables; dynamic ones come
/// from the dynamic-fields CRUD API. `name` is the stable identifier and
/// matches a record attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub readonly: bool,
    #[serde(default)]
    pub width: Option<u32>,
    /// Static group assignment; dynamic fields leave this empty and are
    /// grouped via `page_name` instead
    #[serde(default)]
    pub group_key: Option<String>,
    /// Admin-declared page of a dynamic field, used for group synthesis
    #[serde(default)]
    pub page_name: Option<String>,
    /// Tie-break when no persisted order exists
    #[serde(default)]
    pub display_order: i32,
    #[serde(default)]
    pub options: Vec<SelectOption>,
    /// Only meaningful for `FieldKind::Calculated`
    #[serde(default)]
    pub calculation_formula: Option<String>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            required: false,
            readonly: false,
            width: None,
            group_key: None,
            page_name: None,
            display_order: 0,
            options: Vec::new(),
            calculation_formula: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }

    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn group(mut self, key: impl Into<String>) -> Self {
        self.group_key = Some(key.into());
        self
    }

    pub fn order(mut self, order: i32) -> Self {
        self.display_order = order;
        self
    }

    pub fn options(mut self, options: Vec<SelectOption>) -> Self {
        self.options = options;
        self
    }

    pub fn formula(mut self, formula: impl Into<String>) -> Self {
        self.calculation_formula = Some(formula.into());
        self
    }

    /// Calculated fields are derived, never editable
    pub fn is_editable(&self) -> bool {
        !self.readonly && self.kind != FieldKind::Calculated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editability() {
        let plain = FieldDescriptor::new("qty", "Кол-во", FieldKind::Integer);
        assert!(plain.is_editable());

        let locked = FieldDescriptor::new("created_at", "Создан", FieldKind::DateTime).readonly();
        assert!(!locked.is_editable());

        let derived = FieldDescriptor::new("amount", "Сумма", FieldKind::Calculated)
            .formula("quantity * unit_price");
        assert!(!derived.is_editable());
    }

    #[test]
    fn test_kind_wire_names_round_trip() {
        for kind in [
            FieldKind::Text,
            FieldKind::Textarea,
            FieldKind::Integer,
            FieldKind::Float,
            FieldKind::Boolean,
            FieldKind::Date,
            FieldKind::DateTime,
            FieldKind::SingleSelect,
            FieldKind::ManyToOne,
            FieldKind::Calculated,
        ] {
            assert_eq!(FieldKind::from_str(kind.as_str()), Some(kind));
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }
}
