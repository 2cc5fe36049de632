//! Static field/group tables per business entity
//!
//! One module per entity, `aNNN_` keys matching the backend tables. The
//! tables feed the shared registry; nothing here talks to the network.

pub mod a001_customer_category;
pub mod a002_material_category;
pub mod a003_process_category;
pub mod a004_supplier_category;
pub mod a005_bag_type;
pub mod a006_sales_order;
pub mod a007_outbound_order;

mod category;

use crate::shared::fields::{FieldDescriptor, FieldGroup};

pub const ENTITIES: [&str; 7] = [
    a001_customer_category::ENTITY,
    a002_material_category::ENTITY,
    a003_process_category::ENTITY,
    a004_supplier_category::ENTITY,
    a005_bag_type::ENTITY,
    a006_sales_order::ENTITY,
    a007_outbound_order::ENTITY,
];

pub fn is_known_entity(entity: &str) -> bool {
    ENTITIES.contains(&entity)
}

pub fn page_title(entity: &str) -> Option<&'static str> {
    Some(match entity {
        a001_customer_category::ENTITY => a001_customer_category::page_title(),
        a002_material_category::ENTITY => a002_material_category::page_title(),
        a003_process_category::ENTITY => a003_process_category::page_title(),
        a004_supplier_category::ENTITY => a004_supplier_category::page_title(),
        a005_bag_type::ENTITY => a005_bag_type::page_title(),
        a006_sales_order::ENTITY => a006_sales_order::page_title(),
        a007_outbound_order::ENTITY => a007_outbound_order::page_title(),
        _ => return None,
    })
}

pub fn static_fields(entity: &str) -> Option<Vec<FieldDescriptor>> {
    Some(match entity {
        a001_customer_category::ENTITY => a001_customer_category::static_fields(),
        a002_material_category::ENTITY => a002_material_category::static_fields(),
        a003_process_category::ENTITY => a003_process_category::static_fields(),
        a004_supplier_category::ENTITY => a004_supplier_category::static_fields(),
        a005_bag_type::ENTITY => a005_bag_type::static_fields(),
        a006_sales_order::ENTITY => a006_sales_order::static_fields(),
        a007_outbound_order::ENTITY => a007_outbound_order::static_fields(),
        _ => return None,
    })
}

pub fn static_groups(entity: &str) -> Option<Vec<FieldGroup>> {
    Some(match entity {
        a001_customer_category::ENTITY => a001_customer_category::static_groups(),
        a002_material_category::ENTITY => a002_material_category::static_groups(),
        a003_process_category::ENTITY => a003_process_category::static_groups(),
        a004_supplier_category::ENTITY => a004_supplier_category::static_groups(),
        a005_bag_type::ENTITY => a005_bag_type::static_groups(),
        a006_sales_order::ENTITY => a006_sales_order::static_groups(),
        a007_outbound_order::ENTITY => a007_outbound_order::static_groups(),
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::fields::{build_groups, ACTIONS_FIELD};

    #[test]
    fn test_every_entity_has_fields_and_groups() {
        for entity in ENTITIES {
            let fields = static_fields(entity).expect(entity);
            assert!(!fields.is_empty(), "{} has no fields", entity);
            assert!(page_title(entity).is_some());
            assert!(static_groups(entity).is_some());
            // tables end with the actions pseudo-field
            assert_eq!(fields.last().unwrap().name, ACTIONS_FIELD);
        }
        assert!(!is_known_entity("a999_unknown"));
    }

    #[test]
    fn test_static_tables_have_unique_names() {
        for entity in ENTITIES {
            let fields = static_fields(entity).unwrap();
            let mut names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
            names.sort();
            let before = names.len();
            names.dedup();
            assert_eq!(before, names.len(), "duplicate field name in {}", entity);
        }
    }

    #[test]
    fn test_static_fields_cover_static_groups() {
        // every name a static group mentions must exist in the table,
        // and grouping must assign each non-action field somewhere
        for entity in ENTITIES {
            let fields = static_fields(entity).unwrap();
            let groups = build_groups(&fields, &static_groups(entity).unwrap());
            for f in fields.iter().filter(|f| f.name != ACTIONS_FIELD) {
                assert!(
                    groups.iter().any(|g| g.field_names.contains(&f.name)),
                    "{}.{} not grouped",
                    entity,
                    f.name
                );
            }
        }
    }
}
