//! Outcome of evaluating a node.

/// The result of one evaluation pass over a node.
///
/// No state is terminal: a node may report any variant on any tick. A node
/// that has never been evaluated has no state yet (the tree's
/// [`state`](crate::Tree::state) accessor returns `None`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeState {
    /// Still in progress; re-evaluate next tick.
    Running,

    /// The behavior completed this tick.
    ///
    /// For conditions: the predicate held.
    /// For actions: the effect was applied.
    Success,

    /// The behavior failed this tick.
    ///
    /// For conditions: the predicate did not hold.
    /// For actions: the effect could not be applied.
    Failure,
}

impl NodeState {
    /// Returns `true` if this state is `Running`.
    #[inline]
    pub fn is_running(self) -> bool {
        matches!(self, NodeState::Running)
    }

    /// Returns `true` if this state is `Success`.
    #[inline]
    pub fn is_success(self) -> bool {
        matches!(self, NodeState::Success)
    }

    /// Returns `true` if this state is `Failure`.
    #[inline]
    pub fn is_failure(self) -> bool {
        matches!(self, NodeState::Failure)
    }
}
