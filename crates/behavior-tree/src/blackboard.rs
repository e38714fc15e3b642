//! Hierarchical key→value storage scoped to a node and its ancestors.
//!
//! Writes always land in the node's own local map. Reads and clears check
//! the local map first and then delegate up the parent chain; a key no
//! ancestor holds is a `Missing` signal, not a panic. Values are type-erased
//! (`Box<dyn Any>`) with typed accessors that fail loudly when the stored
//! value is not the requested type.

use std::any::Any;

use thiserror::Error;

use crate::node::{NodeId, Slot};

/// Errors from typed blackboard reads.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BlackboardError {
    /// Neither the node nor any ancestor holds the key.
    #[error("no blackboard entry for key `{key}` on this node or its ancestors")]
    Missing { key: String },

    /// The nearest entry for the key holds a different type.
    #[error("blackboard entry `{key}` does not hold a `{expected}`")]
    TypeMismatch { key: String, expected: &'static str },
}

/// View of the blackboard as seen from one node, handed to
/// [`Leaf::evaluate`](crate::Leaf::evaluate).
pub struct Blackboard<'a> {
    slots: &'a mut [Slot],
    node: NodeId,
}

impl<'a> Blackboard<'a> {
    pub(crate) fn new(slots: &'a mut [Slot], node: NodeId) -> Self {
        Self { slots, node }
    }

    /// Writes to this node's local map, shadowing any ancestor entry.
    pub fn set_data(&mut self, key: impl Into<String>, value: impl Any) {
        set_in(self.slots, self.node, key.into(), Box::new(value));
    }

    /// Reads the nearest entry for `key`, starting here and walking up.
    pub fn get_data<T: Any>(&self, key: &str) -> Result<&T, BlackboardError> {
        get_in(self.slots, self.node, key)
    }

    /// Removes the nearest entry for `key`; `false` if no ancestor holds it.
    pub fn clear_data(&mut self, key: &str) -> bool {
        clear_in(self.slots, self.node, key)
    }
}

pub(crate) fn set_in(slots: &mut [Slot], node: NodeId, key: String, value: Box<dyn Any>) {
    slots[node.index()].data.insert(key, value);
}

/// Walks from `node` to the root and resolves the nearest entry for `key`.
///
/// The nearest entry decides the outcome: if it holds a value of another
/// type, the read fails there rather than continuing the walk to a
/// farther-away entry that happens to match.
pub(crate) fn get_in<'s, T: Any>(
    slots: &'s [Slot],
    node: NodeId,
    key: &str,
) -> Result<&'s T, BlackboardError> {
    let mut current = Some(node);
    while let Some(id) = current {
        let slot = &slots[id.index()];
        if let Some(value) = slot.data.get(key) {
            return value.downcast_ref::<T>().ok_or_else(|| {
                let expected = std::any::type_name::<T>();
                tracing::error!(
                    target: "behavior_tree",
                    key,
                    expected,
                    "blackboard read with mismatched type"
                );
                BlackboardError::TypeMismatch {
                    key: key.to_string(),
                    expected,
                }
            });
        }
        current = slot.parent;
    }
    Err(BlackboardError::Missing {
        key: key.to_string(),
    })
}

pub(crate) fn clear_in(slots: &mut [Slot], node: NodeId, key: &str) -> bool {
    let mut current = Some(node);
    while let Some(id) = current {
        let slot = &mut slots[id.index()];
        if slot.data.remove(key).is_some() {
            return true;
        }
        current = slot.parent;
    }
    false
}
