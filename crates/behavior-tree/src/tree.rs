//! The tree component: arena ownership and per-tick evaluation.

use std::any::Any;

use crate::blackboard::{self, Blackboard, BlackboardError};
use crate::node::{NodeId, NodeKind, Slot};
use crate::state::NodeState;

/// A behavior tree: an arena of nodes evaluated from the root once per tick.
///
/// The tree exclusively owns its nodes and their local blackboards. Built
/// once via [`TreeBuilder`](crate::TreeBuilder) (or
/// [`Tree::from_setup`]); the host then calls [`tick`](Tree::tick) every
/// frame.
pub struct Tree {
    kinds: Vec<NodeKind>,
    slots: Vec<Slot>,
    root: NodeId,
}

enum Tag {
    Selector,
    Sequence,
    Leaf,
}

impl Tree {
    pub(crate) fn from_arena(kinds: Vec<NodeKind>, slots: Vec<Slot>, root: NodeId) -> Self {
        Self { kinds, slots, root }
    }

    /// Evaluates the root once, discarding the result.
    ///
    /// The tree's effects come from its action leaves, not the returned
    /// state; hosts that want the state call [`evaluate`](Tree::evaluate).
    pub fn tick(&mut self) {
        let _ = self.evaluate();
    }

    /// Evaluates the root once and returns its state.
    pub fn evaluate(&mut self) -> NodeState {
        self.evaluate_node(self.root)
    }

    /// The root node's id.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The state recorded at a node's last evaluation, or `None` if it has
    /// never been evaluated.
    pub fn state(&self, id: NodeId) -> Option<NodeState> {
        self.slots[id.index()].state
    }

    /// The node's parent, or `None` for the root.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slots[id.index()].parent
    }

    /// The node's children, in evaluation order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.slots[id.index()].children
    }

    /// Writes to the node's own local blackboard map.
    pub fn set_data(&mut self, id: NodeId, key: impl Into<String>, value: impl Any) {
        blackboard::set_in(&mut self.slots, id, key.into(), Box::new(value));
    }

    /// Reads the nearest entry for `key`, starting at `id` and walking up
    /// the parent chain.
    pub fn get_data<T: Any>(&self, id: NodeId, key: &str) -> Result<&T, BlackboardError> {
        blackboard::get_in(&self.slots, id, key)
    }

    /// Removes the nearest entry for `key`; `false` if no ancestor holds it.
    pub fn clear_data(&mut self, id: NodeId, key: &str) -> bool {
        blackboard::clear_in(&mut self.slots, id, key)
    }

    fn evaluate_node(&mut self, id: NodeId) -> NodeState {
        let tag = match self.kinds[id.index()] {
            NodeKind::Selector => Tag::Selector,
            NodeKind::Sequence => Tag::Sequence,
            NodeKind::Action(_) | NodeKind::Condition(_) | NodeKind::Custom(_) => Tag::Leaf,
        };
        let state = match tag {
            Tag::Selector => self.evaluate_selector(id),
            Tag::Sequence => self.evaluate_sequence(id),
            Tag::Leaf => self.evaluate_leaf(id),
        };
        self.slots[id.index()].state = Some(state);
        state
    }

    /// Logical OR: the first Success or Running child short-circuits; later
    /// siblings are not evaluated this tick. All-Failure (or no children)
    /// is Failure.
    fn evaluate_selector(&mut self, id: NodeId) -> NodeState {
        let children = self.slots[id.index()].children.clone();
        for child in children {
            match self.evaluate_node(child) {
                NodeState::Failure => continue,
                state => return state,
            }
        }
        NodeState::Failure
    }

    /// Logical AND: the first Failure short-circuits. A Running child does
    /// not — later siblings still evaluate this tick, and the sequence
    /// reports Running if any child did.
    fn evaluate_sequence(&mut self, id: NodeId) -> NodeState {
        let children = self.slots[id.index()].children.clone();
        let mut any_running = false;
        for child in children {
            match self.evaluate_node(child) {
                NodeState::Failure => return NodeState::Failure,
                NodeState::Success => {}
                NodeState::Running => any_running = true,
            }
        }
        if any_running {
            NodeState::Running
        } else {
            NodeState::Success
        }
    }

    fn evaluate_leaf(&mut self, id: NodeId) -> NodeState {
        let Self { kinds, slots, .. } = self;
        match &mut kinds[id.index()] {
            NodeKind::Action(action) => action(),
            NodeKind::Condition(condition) => {
                if condition() {
                    NodeState::Success
                } else {
                    NodeState::Failure
                }
            }
            NodeKind::Custom(leaf) => leaf.evaluate(Blackboard::new(slots, id)),
            NodeKind::Selector | NodeKind::Sequence => unreachable!("combinators are not leaves"),
        }
    }
}
