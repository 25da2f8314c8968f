//! Sparse tree types
//!
//! Field slots and the tree that holds them.

use crate::error::{Error, Result};
use serde_json::Value;

/// A named optional value supplied by the caller.
///
/// Presence is explicit: a `Present` slot holding `""` or `false` is still
/// present and will be attached to the built object.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldSlot {
    /// The caller did not set this field
    #[default]
    Absent,
    /// The caller set this field to a value
    Present(Value),
}

impl FieldSlot {
    /// Create a present slot
    pub fn present(value: impl Into<Value>) -> Self {
        Self::Present(value.into())
    }

    /// Create a slot from an optional value
    pub fn from_option<T: Into<Value>>(value: Option<T>) -> Self {
        match value {
            Some(v) => Self::Present(v.into()),
            None => Self::Absent,
        }
    }

    /// Check if the slot holds a value
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    /// Borrow the value, if present
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Present(v) => Some(v),
            Self::Absent => None,
        }
    }

    /// Take the value, if present
    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::Present(v) => Some(v),
            Self::Absent => None,
        }
    }
}

/// A node in a sparse request tree
#[derive(Debug, Clone, PartialEq)]
pub enum SparseNode {
    /// A single field
    Leaf {
        /// Field name in the parent object
        name: String,
        /// The field's value slot
        slot: FieldSlot,
    },
    /// A nested structure
    Branch {
        /// Field name in the parent object (empty for the root)
        name: String,
        /// Child fields and structures
        children: Vec<SparseNode>,
    },
}

impl SparseNode {
    /// Create a leaf node
    pub fn leaf(name: impl Into<String>, slot: FieldSlot) -> Self {
        Self::Leaf {
            name: name.into(),
            slot,
        }
    }

    /// Create an empty branch node
    pub fn branch(name: impl Into<String>) -> Self {
        Self::Branch {
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Create an unnamed root branch
    pub fn root() -> Self {
        Self::branch("")
    }

    /// Add a leaf child. No effect on a leaf node.
    #[must_use]
    pub fn with_leaf(self, name: impl Into<String>, slot: FieldSlot) -> Self {
        self.with_child(Self::leaf(name, slot))
    }

    /// Add a child node. No effect on a leaf node.
    #[must_use]
    pub fn with_child(mut self, child: SparseNode) -> Self {
        if let Self::Branch { children, .. } = &mut self {
            children.push(child);
        }
        self
    }

    /// Field name of this node
    pub fn name(&self) -> &str {
        match self {
            Self::Leaf { name, .. } | Self::Branch { name, .. } => name,
        }
    }

    /// Check if this is a leaf
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }

    /// Children of a branch (empty for a leaf)
    pub fn children(&self) -> &[SparseNode] {
        match self {
            Self::Branch { children, .. } => children,
            Self::Leaf { .. } => &[],
        }
    }

    /// Find a direct child by name
    pub fn child(&self, name: &str) -> Option<&SparseNode> {
        self.children().iter().find(|c| c.name() == name)
    }

    /// Check if any descendant leaf is present
    pub fn has_present(&self) -> bool {
        match self {
            Self::Leaf { slot, .. } => slot.is_present(),
            Self::Branch { children, .. } => children.iter().any(SparseNode::has_present),
        }
    }

    /// Insert a slot at a dotted path (e.g. `SearchFilter.TagFilter.OrConditions`),
    /// creating intermediate branches as needed.
    ///
    /// Assigning the same leaf path twice keeps the last slot.
    pub fn insert(&mut self, path: &str, slot: FieldSlot) -> Result<()> {
        let segments: Vec<&str> = path.split('.').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(Error::field_path(path, "empty path segment"));
        }

        let Some((last, parents)) = segments.split_last() else {
            return Err(Error::field_path(path, "empty path"));
        };

        let mut current = self;
        for (depth, segment) in parents.iter().enumerate() {
            let Self::Branch { children, .. } = current else {
                return Err(Error::field_path(
                    path,
                    format!("'{}' is a field, not a structure", segments[..depth].join(".")),
                ));
            };

            let idx = match children.iter().position(|c| c.name() == *segment) {
                Some(idx) => idx,
                None => {
                    children.push(Self::branch(*segment));
                    children.len() - 1
                }
            };
            current = &mut children[idx];
        }

        let Self::Branch { children, .. } = current else {
            return Err(Error::field_path(
                path,
                format!("'{}' is a field, not a structure", parents.join(".")),
            ));
        };

        match children.iter_mut().find(|c| c.name() == *last) {
            Some(Self::Leaf { slot: existing, .. }) => *existing = slot,
            Some(Self::Branch { .. }) => {
                return Err(Error::field_path(
                    path,
                    "already used as a structure, cannot assign a value",
                ));
            }
            None => children.push(Self::leaf(*last, slot)),
        }

        Ok(())
    }

    /// Build a root tree from `(dotted path, slot)` assignments
    pub fn from_assignments<I, S>(assignments: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, FieldSlot)>,
        S: AsRef<str>,
    {
        let mut root = Self::root();
        for (path, slot) in assignments {
            root.insert(path.as_ref(), slot)?;
        }
        Ok(root)
    }
}
