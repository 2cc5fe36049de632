//! Visibility/order resolution
//!
//! Computes the final ordered list of visible field names for tables and
//! forms from the registry, the persisted visibility map and the
//! persisted order list. The resolver is total: the output contains
//! every visible field exactly once and never mentions a name missing
//! from the registry.

use std::collections::BTreeMap;

use super::descriptor::FieldDescriptor;

/// Persisted visibility map. Absent key means visible.
pub type ColumnConfig = BTreeMap<String, bool>;

/// Persisted order list. Not necessarily exhaustive; deduplicated on
/// every recomputation.
pub type ColumnOrder = Vec<String>;

/// Pseudo-field for the row actions column of a table
pub const ACTIONS_FIELD: &str = "__actions";

/// Who consumes the resolved list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveTarget {
    /// Table columns: the actions pseudo-field is forced to the end
    Table,
    /// Form inputs: the actions pseudo-field is excluded entirely
    Form,
}

/// Resolve the ordered list of visible field names.
///
/// 1. A field is visible when it is required or its config entry is not
///    `false` (empty config means "all visible").
/// 2. The persisted order, filtered to visible registry members, forms
///    the prefix. Visible fields missing from it are appended: in
///    `display_order` ascending (registry position as tie-break) when no
///    order was persisted, otherwise in registry iteration order.
/// 3. For tables the actions pseudo-field always ends up last; forms
///    drop it.
pub fn resolve_visible_ordered(
    fields: &[FieldDescriptor],
    config: &ColumnConfig,
    order: &[String],
    target: ResolveTarget,
) -> Vec<String> {
    let visible: Vec<&FieldDescriptor> = fields
        .iter()
        .filter(|f| !f.name.trim().is_empty())
        .filter(|f| f.required || config.get(&f.name).copied() != Some(false))
        .filter(|f| !(target == ResolveTarget::Form && f.name == ACTIONS_FIELD))
        .collect();

    let mut result: Vec<String> = Vec::with_capacity(visible.len());
    let push_unique = |name: &str, result: &mut Vec<String>| {
        if !result.iter().any(|n| n == name) {
            result.push(name.to_string());
        }
    };

    for name in order {
        if visible.iter().any(|f| &f.name == name) {
            push_unique(name, &mut result);
        }
    }

    let mut remaining: Vec<(usize, &FieldDescriptor)> = visible
        .iter()
        .enumerate()
        .filter(|(_, f)| !result.iter().any(|n| n == &f.name))
        .map(|(idx, f)| (idx, *f))
        .collect();
    if order.is_empty() {
        remaining.sort_by_key(|(idx, f)| (f.display_order, *idx));
    }
    for (_, f) in remaining {
        push_unique(&f.name, &mut result);
    }

    if target == ResolveTarget::Table {
        if let Some(pos) = result.iter().position(|n| n == ACTIONS_FIELD) {
            let actions = result.remove(pos);
            result.push(actions);
        }
    }

    result
}

/// Drop config entries for fields no longer present in the registry.
/// Called before every save so that deleted dynamic fields do not linger
/// in the persisted blob.
pub fn prune_config(config: &mut ColumnConfig, fields: &[FieldDescriptor]) {
    config.retain(|name, _| fields.iter().any(|f| &f.name == name));
}

/// Drop stale names from the order list and deduplicate it.
pub fn prune_order(order: &mut ColumnOrder, fields: &[FieldDescriptor]) {
    let mut seen: Vec<String> = Vec::with_capacity(order.len());
    order.retain(|name| {
        let keep = fields.iter().any(|f| &f.name == name) && !seen.contains(name);
        if keep {
            seen.push(name.clone());
        }
        keep
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::fields::FieldKind;

    fn field(name: &str) -> FieldDescriptor {
        FieldDescriptor::new(name, name, FieldKind::Text)
    }

    fn names(fields: &[&str]) -> Vec<FieldDescriptor> {
        fields.iter().map(|n| field(n)).collect()
    }

    #[test]
    fn test_empty_config_empty_order_returns_registry_order() {
        let fields = names(&["a", "b", "c"]);
        let resolved =
            resolve_visible_ordered(&fields, &ColumnConfig::new(), &[], ResolveTarget::Table);
        assert_eq!(resolved, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_hidden_field_excluded() {
        let fields = names(&["a", "b", "c"]);
        let mut config = ColumnConfig::new();
        config.insert("b".to_string(), false);
        let resolved = resolve_visible_ordered(&fields, &config, &[], ResolveTarget::Table);
        assert_eq!(resolved, vec!["a", "c"]);
    }

    #[test]
    fn test_required_field_ignores_hidden_config() {
        let mut fields = names(&["a", "b", "c"]);
        fields[1] = field("b").required();
        let mut config = ColumnConfig::new();
        config.insert("b".to_string(), false);
        let resolved = resolve_visible_ordered(&fields, &config, &[], ResolveTarget::Table);
        assert!(resolved.contains(&"b".to_string()));
    }

    #[test]
    fn test_order_prefix_preserved_and_missing_appended() {
        let fields = names(&["a", "b", "c", "d"]);
        let order = vec!["c".to_string(), "a".to_string()];
        let resolved =
            resolve_visible_ordered(&fields, &ColumnConfig::new(), &order, ResolveTarget::Table);
        assert_eq!(resolved, vec!["c", "a", "b", "d"]);
    }

    #[test]
    fn test_stale_order_entries_ignored() {
        let fields = names(&["a", "b"]);
        let order = vec!["deleted".to_string(), "b".to_string(), "b".to_string()];
        let resolved =
            resolve_visible_ordered(&fields, &ColumnConfig::new(), &order, ResolveTarget::Table);
        assert_eq!(resolved, vec!["b", "a"]);
    }

    #[test]
    fn test_display_order_used_when_no_persisted_order() {
        let mut fields = names(&["a", "b", "c"]);
        fields[0] = field("a").order(30);
        fields[1] = field("b").order(10);
        fields[2] = field("c").order(20);
        let resolved =
            resolve_visible_ordered(&fields, &ColumnConfig::new(), &[], ResolveTarget::Table);
        assert_eq!(resolved, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_registry_order_for_remainder_when_order_persisted() {
        let mut fields = names(&["a", "b", "c"]);
        fields[0] = field("a").order(99);
        let order = vec!["c".to_string()];
        let resolved =
            resolve_visible_ordered(&fields, &ColumnConfig::new(), &order, ResolveTarget::Table);
        // display_order is ignored once a persisted order exists
        assert_eq!(resolved, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_actions_forced_last_for_table_and_dropped_for_form() {
        let fields = names(&["a", ACTIONS_FIELD, "b"]);
        let order = vec![ACTIONS_FIELD.to_string(), "b".to_string()];

        let table =
            resolve_visible_ordered(&fields, &ColumnConfig::new(), &order, ResolveTarget::Table);
        assert_eq!(table, vec!["b", "a", ACTIONS_FIELD]);

        let form =
            resolve_visible_ordered(&fields, &ColumnConfig::new(), &order, ResolveTarget::Form);
        assert_eq!(form, vec!["b", "a"]);
    }

    #[test]
    fn test_totality_no_duplicates() {
        let fields = names(&["a", "b", "c", "d", "e"]);
        let mut config = ColumnConfig::new();
        config.insert("d".to_string(), false);
        config.insert("a".to_string(), true);
        let order = vec![
            "e".to_string(),
            "a".to_string(),
            "e".to_string(),
            "ghost".to_string(),
        ];
        let resolved = resolve_visible_ordered(&fields, &config, &order, ResolveTarget::Table);

        let mut sorted = resolved.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), resolved.len(), "no duplicates");
        assert_eq!(resolved.len(), 4, "exactly the visible fields");
        assert_eq!(&resolved[..2], &["e".to_string(), "a".to_string()][..]);
    }

    #[test]
    fn test_prune_removes_deleted_dynamic_field() {
        let fields = names(&["a", "b"]);
        let mut config = ColumnConfig::new();
        config.insert("a".to_string(), false);
        config.insert("deleted".to_string(), false);
        prune_config(&mut config, &fields);
        assert_eq!(config.len(), 1);
        assert!(config.contains_key("a"));

        let mut order = vec![
            "deleted".to_string(),
            "b".to_string(),
            "a".to_string(),
            "b".to_string(),
        ];
        prune_order(&mut order, &fields);
        assert_eq!(order, vec!["b", "a"]);
    }
}
