//! Dynamic field & column configuration engine
//!
//! One shared implementation of the field registry, group synthesis,
//! visibility/order resolution, drag reordering and the formula
//! evaluator. Every list/details screen is parameterized by its entity
//! key and static descriptor table instead of carrying its own copy of
//! this logic.

pub mod descriptor;
pub mod formula;
pub mod groups;
pub mod registry;
pub mod reorder;
pub mod resolver;

pub use descriptor::{FieldDescriptor, FieldKind, SelectOption};
pub use groups::{build_groups, FieldGroup};
pub use registry::build_field_set;
pub use reorder::move_field;
pub use resolver::{
    prune_config, prune_order, resolve_visible_ordered, ColumnConfig, ColumnOrder, ResolveTarget,
    ACTIONS_FIELD,
};
