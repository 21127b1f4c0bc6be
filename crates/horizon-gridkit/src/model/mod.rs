//! Collection model: keys, nodes, records and selection.
//!
//! # Core Types
//!
//! - [`Key`]: Opaque, value-compared record identifier
//! - [`Node`]: One entry of a collection (item, section or header)
//! - [`Collection`]: Immutable ordered key sequence with node lookup
//! - [`Record`]: Field access used by sort rules
//! - [`Selection`]: Immutable selected-key set with range endpoints
//! - [`SelectionManager`]: Applies click/keyboard selection operations

mod collection;
mod key;
mod node;
mod record;
mod selection;
mod selection_manager;

pub use collection::{Collection, CollectionBuilder};
pub use key::Key;
pub use node::{Node, NodeType, RecordEntry};
pub use record::{FieldPath, FieldValue, Record};
pub use selection::Selection;
pub use selection_manager::{
    ChildFocusStrategy, DisabledBehavior, SelectedKeys, SelectionBehavior, SelectionManager,
    SelectionMode, SelectionModifiers, SelectionState,
};
