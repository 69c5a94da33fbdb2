//! Search tree with arena allocation.
//!
//! Nodes live in a contiguous `Vec` and refer to each other by [`NodeId`].
//! A tree is built fresh for every decision and dropped afterwards.

use crate::{
    mcts::node::{NodeId, SearchNode},
    ports::GameState,
    types::Action,
};

/// UCT search tree rooted at a snapshot of the live game.
#[derive(Debug)]
pub struct SearchTree<S> {
    nodes: Vec<SearchNode<S>>,
}

impl<S: GameState> SearchTree<S> {
    /// Create a tree holding only the root snapshot.
    pub fn new(root_state: S) -> Self {
        Self {
            nodes: vec![SearchNode::new_root(root_state)],
        }
    }

    /// Root node ID.
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &SearchNode<S> {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut SearchNode<S> {
        &mut self.nodes[id.index()]
    }

    /// Total number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false after construction.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `action` already has a child under `id`.
    pub fn has_child_for(&self, id: NodeId, action: Action) -> bool {
        self.get(id)
            .children
            .iter()
            .any(|&child| self.get(child).action == Some(action))
    }

    /// First action, in index order, that has no child yet and is legal from
    /// the node's state.
    pub fn untried_action(&self, id: NodeId) -> Option<Action> {
        let state = &self.get(id).state;
        Action::ALL
            .into_iter()
            .find(|&action| !self.has_child_for(id, action) && state.is_legal(action))
    }

    /// A node is fully expanded once it has a child per action, or when no
    /// untried action is legal.
    pub fn is_fully_expanded(&self, id: NodeId) -> bool {
        self.get(id).children.len() >= Action::COUNT || self.untried_action(id).is_none()
    }

    /// Add a child reached by applying `action` to a copy of the parent's
    /// snapshot. Returns the new child's ID.
    pub fn expand(&mut self, parent: NodeId, action: Action) -> NodeId {
        let mut state = self.get(parent).state.clone();
        state.apply_action(action);

        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(SearchNode::new_child(parent, action, state));
        self.get_mut(parent).children.push(id);
        id
    }

    /// Child with the highest UCB1 score. Ties keep the earliest child.
    pub fn select_child(&self, id: NodeId, exploration: f64) -> Option<NodeId> {
        let node = self.get(id);
        let mut best: Option<(NodeId, f64)> = None;

        for &child in &node.children {
            let score = self.get(child).ucb_score(node.visits, exploration);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((child, score)),
            }
        }

        best.map(|(child, _)| child)
    }

    /// Add `reward` and one visit to every node from `leaf` up to the root.
    pub fn backpropagate(&mut self, leaf: NodeId, reward: f64) {
        let mut current = Some(leaf);
        while let Some(id) = current {
            let node = self.get_mut(id);
            node.visits += 1;
            node.reward_sum += reward;
            current = node.parent;
        }
    }

    /// Root child with the highest average reward; the first one on ties.
    /// `None` when the root was never expanded.
    pub fn best_action(&self) -> Option<Action> {
        let mut best: Option<(Action, f64)> = None;

        for &child in &self.get(self.root()).children {
            let node = self.get(child);
            let Some(action) = node.action else {
                continue;
            };
            let mean = node.mean_reward();
            match best {
                Some((_, best_mean)) if mean <= best_mean => {}
                _ => best = Some((action, mean)),
            }
        }

        best.map(|(action, _)| action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::GridDungeon;

    fn corridor() -> GridDungeon {
        GridDungeon::from_ascii("#####\n#E.X#\n#####").unwrap()
    }

    fn open_room() -> GridDungeon {
        GridDungeon::from_ascii("#####\n#...#\n#.E.#\n#..X#\n#####").unwrap()
    }

    #[test]
    fn test_untried_action_in_index_order() {
        let mut tree = SearchTree::new(open_room());
        let root = tree.root();

        assert_eq!(tree.untried_action(root), Some(Action::Up));
        tree.expand(root, Action::Up);
        assert_eq!(tree.untried_action(root), Some(Action::Right));
        tree.expand(root, Action::Right);
        tree.expand(root, Action::Down);
        assert_eq!(tree.untried_action(root), Some(Action::Left));
        tree.expand(root, Action::Left);

        assert_eq!(tree.untried_action(root), None);
        assert!(tree.is_fully_expanded(root));
    }

    #[test]
    fn test_fully_expanded_when_only_illegal_actions_remain() {
        let mut tree = SearchTree::new(corridor());
        let root = tree.root();

        assert_eq!(tree.untried_action(root), Some(Action::Right));
        assert!(!tree.is_fully_expanded(root));

        tree.expand(root, Action::Right);
        assert_eq!(tree.get(root).children.len(), 1);
        assert!(tree.is_fully_expanded(root));
    }

    #[test]
    fn test_expand_copies_state() {
        let mut tree = SearchTree::new(corridor());
        let child = tree.expand(tree.root(), Action::Right);

        assert_ne!(
            tree.get(child).state.hero_position(),
            tree.get(tree.root()).state.hero_position()
        );
        assert_eq!(tree.get(child).parent, Some(tree.root()));
        assert_eq!(tree.get(child).action, Some(Action::Right));
    }

    #[test]
    fn test_backpropagate_updates_path() {
        let mut tree = SearchTree::new(open_room());
        let child = tree.expand(tree.root(), Action::Up);
        let grandchild = tree.expand(child, Action::Left);
        let sibling = tree.expand(tree.root(), Action::Down);

        tree.backpropagate(grandchild, 4.0);

        assert_eq!(tree.get(grandchild).visits, 1);
        assert_eq!(tree.get(child).visits, 1);
        assert_eq!(tree.get(tree.root()).visits, 1);
        assert_eq!(tree.get(tree.root()).reward_sum, 4.0);
        assert_eq!(tree.get(sibling).visits, 0);
    }

    #[test]
    fn test_select_child_prefers_unvisited() {
        let mut tree = SearchTree::new(open_room());
        let up = tree.expand(tree.root(), Action::Up);
        let right = tree.expand(tree.root(), Action::Right);
        tree.backpropagate(up, 1000.0);

        assert_eq!(tree.select_child(tree.root(), 1.4), Some(right));
    }

    #[test]
    fn test_select_child_first_on_ties() {
        let mut tree = SearchTree::new(open_room());
        let up = tree.expand(tree.root(), Action::Up);
        tree.expand(tree.root(), Action::Right);

        assert_eq!(tree.select_child(tree.root(), 1.4), Some(up));
    }

    #[test]
    fn test_best_action_uses_average_reward() {
        let mut tree = SearchTree::new(open_room());
        let up = tree.expand(tree.root(), Action::Up);
        let right = tree.expand(tree.root(), Action::Right);
        let down = tree.expand(tree.root(), Action::Down);

        tree.backpropagate(up, 10.0);
        tree.backpropagate(up, 0.0);
        tree.backpropagate(right, 6.0);
        tree.backpropagate(down, 6.0);

        // up: 5.0 average despite more visits; right and down tie at 6.0
        assert_eq!(tree.best_action(), Some(Action::Right));
    }

    #[test]
    fn test_best_action_without_children() {
        let tree = SearchTree::new(corridor());
        assert_eq!(tree.best_action(), None);
    }
}
