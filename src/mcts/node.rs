//! Search tree node representation.
//!
//! Each node owns the game snapshot reached by taking `action` from its
//! parent, plus the visit statistics used by UCB1 selection.

use crate::types::Action;

/// Index into the node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A node in the search tree.
#[derive(Debug, Clone)]
pub struct SearchNode<S> {
    /// Independent snapshot of the game at this node
    pub state: S,

    /// Parent node (None for root)
    pub parent: Option<NodeId>,

    /// Action that led here from the parent (None for root)
    pub action: Option<Action>,

    /// Children in expansion order, at most one per action
    pub children: Vec<NodeId>,

    /// Sum of rollout rewards backpropagated through this node
    pub reward_sum: f64,

    /// Number of times this node has been visited
    pub visits: u32,
}

impl<S> SearchNode<S> {
    /// Create a new root node.
    pub fn new_root(state: S) -> Self {
        Self {
            state,
            parent: None,
            action: None,
            children: Vec::new(),
            reward_sum: 0.0,
            visits: 0,
        }
    }

    /// Create a new child node.
    pub fn new_child(parent: NodeId, action: Action, state: S) -> Self {
        Self {
            parent: Some(parent),
            action: Some(action),
            ..Self::new_root(state)
        }
    }

    /// Average reward, 0.0 if never visited.
    #[inline]
    pub fn mean_reward(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.reward_sum / f64::from(self.visits)
        }
    }

    /// UCB1 score of this node given its parent's visit count.
    ///
    /// Unvisited nodes score +∞ so every child is tried once before any is
    /// revisited.
    #[inline]
    pub fn ucb_score(&self, parent_visits: u32, exploration: f64) -> f64 {
        if self.visits == 0 {
            return f64::INFINITY;
        }
        let visits = f64::from(self.visits);
        let exploitation = self.reward_sum / visits;
        let exploration_term = exploration * (f64::from(parent_visits).ln() / visits).sqrt();
        exploitation + exploration_term
    }
}
