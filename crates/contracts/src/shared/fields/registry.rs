//! Field registry: merge of the static descriptor table with the
//! admin-defined dynamic fields fetched for the page

use super::descriptor::FieldDescriptor;

/// Merge static and dynamic descriptors into the full field set.
///
/// A dynamic descriptor whose `name` collides with a static one replaces
/// it in place (last write wins, registry position kept stable).
/// Descriptors with an empty `name` are dropped silently: a malformed
/// dynamic field must never break the page.
pub fn build_field_set(
    static_fields: &[FieldDescriptor],
    dynamic_fields: &[FieldDescriptor],
) -> Vec<FieldDescriptor> {
    let mut result: Vec<FieldDescriptor> = static_fields
        .iter()
        .filter(|f| !f.name.trim().is_empty())
        .cloned()
        .collect();

    for dynamic in dynamic_fields {
        if dynamic.name.trim().is_empty() {
            continue;
        }
        match result.iter().position(|f| f.name == dynamic.name) {
            Some(idx) => result[idx] = dynamic.clone(),
            None => result.push(dynamic.clone()),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::fields::FieldKind;

    fn field(name: &str) -> FieldDescriptor {
        FieldDescriptor::new(name, name.to_uppercase(), FieldKind::Text)
    }

    #[test]
    fn test_merge_appends_dynamic_after_static() {
        let merged = build_field_set(&[field("a"), field("b")], &[field("x"), field("y")]);
        let names: Vec<&str> = merged.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "x", "y"]);
    }

    #[test]
    fn test_collision_last_write_wins_in_place() {
        let mut dynamic = field("b");
        dynamic.label = "переопределено".to_string();
        let merged = build_field_set(&[field("a"), field("b"), field("c")], &[dynamic]);
        let names: Vec<&str> = merged.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(merged[1].label, "переопределено");
    }

    #[test]
    fn test_nameless_descriptors_filtered_silently() {
        let merged = build_field_set(&[field("a"), field("  ")], &[field(""), field("z")]);
        let names: Vec<&str> = merged.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a", "z"]);
    }
}
