//! Group synthesis: partition the field set into named tabs/sections

use serde::{Deserialize, Serialize};

use super::descriptor::FieldDescriptor;

/// Named bucket of field names rendered as a form tab
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldGroup {
    pub key: String,
    pub title: String,
    #[serde(default)]
    pub icon: Option<String>,
    pub field_names: Vec<String>,
}

impl FieldGroup {
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            icon: None,
            field_names: Vec::new(),
        }
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    fn push_unique(&mut self, name: &str) {
        if !self.field_names.iter().any(|n| n == name) {
            self.field_names.push(name.to_string());
        }
    }
}

/// Assign every field to exactly one group.
///
/// Static fields go by `group_key`; dynamic fields are matched by their
/// `page_name` (trimmed, `"default"` when empty) against existing group
/// titles, and an unmatched page name creates a `dynamic_<page>` group.
/// Appends are idempotent, so re-running after a dynamic-field refresh
/// does not duplicate entries. In-memory only, nothing is persisted here.
pub fn build_groups(fields: &[FieldDescriptor], static_groups: &[FieldGroup]) -> Vec<FieldGroup> {
    let mut groups: Vec<FieldGroup> = static_groups.to_vec();

    for field in fields {
        if field.name.trim().is_empty() {
            continue;
        }

        if let Some(key) = &field.group_key {
            if let Some(group) = groups.iter_mut().find(|g| &g.key == key) {
                group.push_unique(&field.name);
                continue;
            }
        }

        let page = match &field.page_name {
            Some(p) if !p.trim().is_empty() => p.trim().to_string(),
            _ => "default".to_string(),
        };

        if let Some(group) = groups.iter_mut().find(|g| g.title == page) {
            group.push_unique(&field.name);
            continue;
        }

        let dynamic_key = format!("dynamic_{}", page);
        if let Some(group) = groups.iter_mut().find(|g| g.key == dynamic_key) {
            group.push_unique(&field.name);
        } else {
            let mut group = FieldGroup::new(dynamic_key, page);
            group.push_unique(&field.name);
            groups.push(group);
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::fields::FieldKind;

    fn static_field(name: &str, group: &str) -> FieldDescriptor {
        FieldDescriptor::new(name, name, FieldKind::Text).group(group)
    }

    fn dynamic_field(name: &str, page: &str) -> FieldDescriptor {
        let mut f = FieldDescriptor::new(name, name, FieldKind::Text);
        f.page_name = Some(page.to_string());
        f
    }

    #[test]
    fn test_every_field_lands_in_exactly_one_group() {
        let fields = vec![
            static_field("code", "basic"),
            static_field("comment", "extra"),
            dynamic_field("custom_a", "Спецификация"),
            dynamic_field("custom_b", ""),
        ];
        let statics = vec![FieldGroup::new("basic", "Основные"), FieldGroup::new("extra", "Прочее")];

        let groups = build_groups(&fields, &statics);

        let total: usize = groups.iter().map(|g| g.field_names.len()).sum();
        assert_eq!(total, fields.len());
        for f in &fields {
            let hits = groups
                .iter()
                .filter(|g| g.field_names.contains(&f.name))
                .count();
            assert_eq!(hits, 1, "field {} must be in exactly one group", f.name);
        }
    }

    #[test]
    fn test_page_name_matching_group_title() {
        let fields = vec![dynamic_field("custom_a", " Прочее ")];
        let statics = vec![FieldGroup::new("extra", "Прочее")];

        let groups = build_groups(&fields, &statics);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].field_names, vec!["custom_a"]);
    }

    #[test]
    fn test_unmatched_page_creates_dynamic_group() {
        let fields = vec![
            dynamic_field("custom_a", "Логистика"),
            dynamic_field("custom_b", "Логистика"),
        ];
        let groups = build_groups(&fields, &[]);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key, "dynamic_Логистика");
        assert_eq!(groups[0].title, "Логистика");
        assert_eq!(groups[0].field_names, vec!["custom_a", "custom_b"]);
    }

    #[test]
    fn test_empty_page_falls_back_to_default_group() {
        let groups = build_groups(&[dynamic_field("custom_a", "  ")], &[]);
        assert_eq!(groups[0].key, "dynamic_default");
        assert_eq!(groups[0].title, "default");
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let fields = vec![dynamic_field("custom_a", "Логистика")];
        let first = build_groups(&fields, &[]);
        let second = build_groups(&fields, &first);
        assert_eq!(first, second);
    }
}
