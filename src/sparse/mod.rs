//! Sparse object builder
//!
//! Builds nested request objects from a flat set of optionally-present fields.
//!
//! # Overview
//!
//! Callers declare every field a request can carry as a [`FieldSlot`] placed in
//! a tree of [`SparseNode`]s. Building the tree evaluates it bottom-up: present
//! leaves keep their value, branches become objects only if at least one
//! descendant is present. Empty branches are omitted from their parent, so the
//! wire request never contains `{}` placeholders for unset substructures.
//!
//! ```rust
//! use connectkit::sparse::{build_object, FieldSlot, SparseNode};
//! use serde_json::json;
//!
//! let root = SparseNode::root()
//!     .with_leaf("A", FieldSlot::present("x"))
//!     .with_child(
//!         SparseNode::branch("B")
//!             .with_leaf("C", FieldSlot::Absent)
//!             .with_leaf("D", FieldSlot::Absent),
//!     );
//!
//! assert_eq!(serde_json::Value::Object(build_object(&root)), json!({"A": "x"}));
//! ```

mod builder;
mod types;

pub use builder::{build, build_object, build_typed};
pub use types::{FieldSlot, SparseNode};
