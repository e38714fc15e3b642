//! Tick-driven behavior tree with a hierarchical blackboard.
//!
//! A [`Tree`] owns an arena of nodes and re-evaluates its root once per host
//! tick. Internal nodes are the classic combinators — [`selector`] (logical
//! OR) and [`sequence`] (logical AND) — and leaves are closures
//! ([`TreeBuilder::action`], [`TreeBuilder::condition`]) or user types
//! implementing [`Leaf`]. Every node carries a local key→value blackboard;
//! lookups that miss locally walk up the parent chain, so cooperating nodes
//! share data without global state.
//!
//! Evaluation returns a [`NodeState`]:
//!
//! - `Success` / `Failure` — the behavior finished this tick
//! - `Running` — still in progress, re-evaluate next tick
//!
//! # Sequence semantics
//!
//! A `Running` child does not stop a sequence: later siblings are still
//! evaluated this tick, and the sequence reports `Running` if any child did.
//! This differs from the textbook halt-at-first-Running sequence and is kept
//! deliberately, so a long-running action (walking to a target) does not
//! starve the bookkeeping actions sequenced after it.
//!
//! # Example
//!
//! ```
//! use behavior_tree::{NodeState, Tree, TreeBuilder};
//!
//! let mut builder = TreeBuilder::new();
//! let guard = builder.condition(|| true);
//! let act = builder.action(|| NodeState::Running);
//! let root = builder.sequence(vec![guard, act]);
//! let mut tree = builder.build(root);
//!
//! assert_eq!(tree.evaluate(), NodeState::Running);
//! ```
//!
//! [`selector`]: TreeBuilder::selector
//! [`sequence`]: TreeBuilder::sequence

pub mod blackboard;
pub mod builder;
pub mod node;
pub mod state;
pub mod tree;

// Re-export core types for ergonomic API
pub use blackboard::{Blackboard, BlackboardError};
pub use builder::{TreeBuilder, TreeSetup};
pub use node::{Leaf, NodeId};
pub use state::NodeState;
pub use tree::Tree;
