//! Tree construction.
//!
//! A [`TreeBuilder`] allocates leaves first, combinators over them, and
//! finally seals the arena with [`build`](TreeBuilder::build). Attachment
//! sets each child's parent link; attaching a node twice is a programming
//! error and panics.

use crate::node::{Leaf, NodeId, NodeKind, Slot};
use crate::state::NodeState;
use crate::tree::Tree;

/// Factory trait for types that describe a tree shape.
///
/// The host constructs the tree once at start-up:
///
/// ```
/// use behavior_tree::{NodeId, NodeState, Tree, TreeBuilder, TreeSetup};
///
/// struct IdlePlan;
///
/// impl TreeSetup for IdlePlan {
///     fn setup(&mut self, builder: &mut TreeBuilder) -> NodeId {
///         let idle = builder.action(|| NodeState::Success);
///         builder.selector(vec![idle])
///     }
/// }
///
/// let mut tree = Tree::from_setup(&mut IdlePlan);
/// assert_eq!(tree.evaluate(), NodeState::Success);
/// ```
pub trait TreeSetup {
    /// Builds the node graph and returns its root.
    fn setup(&mut self, builder: &mut TreeBuilder) -> NodeId;
}

/// Incrementally constructs a [`Tree`]'s node arena.
#[derive(Default)]
pub struct TreeBuilder {
    kinds: Vec<NodeKind>,
    slots: Vec<Slot>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a terminal effectful behavior; its state is stored verbatim.
    pub fn action(&mut self, action: impl FnMut() -> NodeState + 'static) -> NodeId {
        self.push(NodeKind::Action(Box::new(action)))
    }

    /// Adds a guard predicate: `true` → Success, `false` → Failure.
    pub fn condition(&mut self, condition: impl FnMut() -> bool + 'static) -> NodeId {
        self.push(NodeKind::Condition(Box::new(condition)))
    }

    /// Adds a user-defined leaf with blackboard access.
    pub fn leaf(&mut self, leaf: impl Leaf + 'static) -> NodeId {
        self.push(NodeKind::Custom(Box::new(leaf)))
    }

    /// Adds a selector (logical OR) over `children`, attaching them.
    ///
    /// # Panics
    ///
    /// Panics if any child already has a parent.
    pub fn selector(&mut self, children: Vec<NodeId>) -> NodeId {
        let id = self.push(NodeKind::Selector);
        self.attach(id, children);
        id
    }

    /// Adds a sequence (logical AND) over `children`, attaching them.
    ///
    /// # Panics
    ///
    /// Panics if any child already has a parent.
    pub fn sequence(&mut self, children: Vec<NodeId>) -> NodeId {
        let id = self.push(NodeKind::Sequence);
        self.attach(id, children);
        id
    }

    /// Seals the arena into a tree rooted at `root`.
    ///
    /// # Panics
    ///
    /// Panics if `root` is attached to a parent (it would not be a root).
    pub fn build(self, root: NodeId) -> Tree {
        assert!(
            self.slots[root.index()].parent.is_none(),
            "tree root must not have a parent"
        );
        Tree::from_arena(self.kinds, self.slots, root)
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.kinds.len());
        self.kinds.push(kind);
        self.slots.push(Slot::new());
        id
    }

    fn attach(&mut self, parent: NodeId, children: Vec<NodeId>) {
        for child in children {
            let slot = &mut self.slots[child.index()];
            assert!(
                slot.parent.is_none(),
                "node is already attached to a parent"
            );
            slot.parent = Some(parent);
            self.slots[parent.index()].children.push(child);
        }
    }
}

impl Tree {
    /// Builds a tree from a setup factory, the one-shot construction the
    /// host performs at start-up.
    pub fn from_setup(setup: &mut impl TreeSetup) -> Self {
        let mut builder = TreeBuilder::new();
        let root = setup.setup(&mut builder);
        builder.build(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "already attached")]
    fn reattaching_a_child_panics() {
        let mut builder = TreeBuilder::new();
        let leaf = builder.action(|| NodeState::Success);
        builder.selector(vec![leaf]);
        builder.sequence(vec![leaf]);
    }

    #[test]
    #[should_panic(expected = "root must not have a parent")]
    fn building_on_an_attached_root_panics() {
        let mut builder = TreeBuilder::new();
        let leaf = builder.action(|| NodeState::Success);
        builder.selector(vec![leaf]);
        builder.build(leaf);
    }

    #[test]
    fn attachment_sets_parent_links_once() {
        let mut builder = TreeBuilder::new();
        let a = builder.action(|| NodeState::Success);
        let b = builder.action(|| NodeState::Success);
        let root = builder.sequence(vec![a, b]);
        let tree = builder.build(root);

        assert_eq!(tree.parent(a), Some(root));
        assert_eq!(tree.parent(b), Some(root));
        assert_eq!(tree.parent(root), None);
        assert_eq!(tree.children(root), [a, b]);
    }
}
