//! Bottom-up construction of sparse objects

use super::types::SparseNode;
use crate::error::Result;
use crate::types::JsonObject;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Resolve a node to its value.
///
/// A leaf resolves to its value when present. A branch resolves to an object
/// holding every child that resolved, or to `None` when no child did.
pub fn build(node: &SparseNode) -> Option<Value> {
    match node {
        SparseNode::Leaf { slot, .. } => slot.value().cloned(),
        SparseNode::Branch { children, .. } => build_children(children).map(Value::Object),
    }
}

/// Build the top-level request object.
///
/// Unlike [`build`], this always yields an object: a request with no fields
/// set is still sent, just empty.
pub fn build_object(root: &SparseNode) -> JsonObject {
    match root {
        SparseNode::Branch { children, .. } => build_children(children).unwrap_or_default(),
        SparseNode::Leaf { name, slot } => {
            let mut obj = JsonObject::new();
            if let Some(value) = slot.value() {
                obj.insert(name.clone(), value.clone());
            }
            obj
        }
    }
}

/// Build the request object and deserialize it into a typed request
pub fn build_typed<T: DeserializeOwned>(root: &SparseNode) -> Result<T> {
    let value = Value::Object(build_object(root));
    Ok(serde_json::from_value(value)?)
}

fn build_children(children: &[SparseNode]) -> Option<JsonObject> {
    let mut obj = JsonObject::new();
    for child in children {
        if let Some(value) = build(child) {
            obj.insert(child.name().to_string(), value);
        }
    }

    if obj.is_empty() {
        None
    } else {
        Some(obj)
    }
}
