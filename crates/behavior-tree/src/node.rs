//! Node identifiers, kinds, and the arena slot layout.
//!
//! Nodes live in an arena owned by the [`Tree`](crate::Tree) and refer to
//! each other by [`NodeId`]. The parent link is the non-owning back-reference
//! of the original design: it is set exactly once, when a child is attached
//! to a combinator, and never reassigned.

use std::any::Any;
use std::collections::HashMap;

use crate::blackboard::Blackboard;
use crate::state::NodeState;

/// Handle to a node within its tree's arena.
///
/// Ids are only meaningful for the tree whose builder produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0
    }
}

/// A user-defined leaf behavior.
///
/// Unlike plain [`action`](crate::TreeBuilder::action) and
/// [`condition`](crate::TreeBuilder::condition) closures, a `Leaf` is handed
/// a [`Blackboard`] view scoped to its own node, so it can read keys set by
/// ancestors and stash intermediate results locally.
pub trait Leaf {
    /// Evaluates the leaf for this tick.
    fn evaluate(&mut self, blackboard: Blackboard<'_>) -> NodeState;
}

/// What a node does when evaluated.
pub(crate) enum NodeKind {
    /// Logical OR: first Success or Running child wins.
    Selector,
    /// Logical AND: first Failure aborts; Running children do not.
    Sequence,
    /// Terminal effectful behavior returning its own state.
    Action(Box<dyn FnMut() -> NodeState>),
    /// Guard predicate: `true` → Success, `false` → Failure.
    Condition(Box<dyn FnMut() -> bool>),
    /// User-defined leaf with blackboard access.
    Custom(Box<dyn Leaf>),
}

/// Per-node bookkeeping: tree links, last state, local blackboard.
pub(crate) struct Slot {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) state: Option<NodeState>,
    pub(crate) data: HashMap<String, Box<dyn Any>>,
}

impl Slot {
    pub(crate) fn new() -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            state: None,
            data: HashMap::new(),
        }
    }
}
