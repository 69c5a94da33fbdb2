//! Q-table implementation for one-step tabular Q-learning

use std::collections::{HashMap, hash_map::Entry};

use serde::{Deserialize, Serialize};

use crate::{identifiers::StateKey, types::Action};

/// Learning rate α.
pub const LEARNING_RATE: f64 = 0.5;
/// Discount factor γ.
pub const DISCOUNT_FACTOR: f64 = 0.9;

/// Action values of one state, indexed by [`Action::index`].
pub type ActionValues = [f64; Action::COUNT];

/// Q-table mapping abstracted states to their four action values
///
/// Entries are created lazily and start at zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QTable {
    q_values: HashMap<StateKey, ActionValues>,
}

impl QTable {
    /// Create an empty Q-table
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the action values of a state, if it has been visited
    pub fn get(&self, state: &StateKey) -> Option<&ActionValues> {
        self.q_values.get(state)
    }

    /// Get Q-value for a state-action pair (0 for unseen states)
    pub fn value(&self, state: &StateKey, action: Action) -> f64 {
        self.get(state).map_or(0.0, |values| values[action.index()])
    }

    /// Whether the state has an entry
    pub fn contains(&self, state: &StateKey) -> bool {
        self.q_values.contains_key(state)
    }

    /// Get the entry for a state, inserting zeros when it is missing
    ///
    /// Returns `true` alongside the entry when it was newly created.
    pub fn entry(&mut self, state: StateKey) -> (&mut ActionValues, bool) {
        match self.q_values.entry(state) {
            Entry::Occupied(entry) => (entry.into_mut(), false),
            Entry::Vacant(entry) => (entry.insert([0.0; Action::COUNT]), true),
        }
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, state: StateKey, action: Action, value: f64) {
        self.entry(state).0[action.index()] = value;
    }

    /// Maximum action value of a visited state
    pub fn max_q(&self, state: &StateKey) -> Option<f64> {
        self.get(state)
            .map(|values| values.iter().copied().fold(f64::NEG_INFINITY, f64::max))
    }

    /// All actions whose value equals the state's maximum exactly
    ///
    /// Returns an empty vector for unseen states.
    pub fn best_actions(&self, state: &StateKey) -> Vec<Action> {
        let Some(values) = self.get(state) else {
            return Vec::new();
        };
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Action::ALL
            .into_iter()
            .filter(|action| values[action.index()] == max)
            .collect()
    }

    /// Q-learning update: off-policy TD control
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
    ///
    /// The max over an unseen next state is 0. The next-state value is read
    /// before the entry for `state` is created, so a self-transition from an
    /// unseen state also bootstraps from 0.
    pub fn q_learning_update(
        &mut self,
        state: StateKey,
        action: Action,
        reward: f64,
        next_state: &StateKey,
    ) -> f64 {
        let max_next_q = self.max_q(next_state).unwrap_or(0.0);
        let (values, _) = self.entry(state);
        let current_q = values[action.index()];
        let td_target = reward + DISCOUNT_FACTOR * max_next_q;
        let td_error = td_target - current_q;
        let new_q = current_q + LEARNING_RATE * td_error;
        values[action.index()] = new_q;
        new_q
    }

    /// Iterate over all entries
    pub fn iter(&self) -> impl Iterator<Item = (&StateKey, &ActionValues)> {
        self.q_values.iter()
    }

    /// Remove all entries
    pub fn reset(&mut self) {
        self.q_values.clear();
    }

    /// Number of states stored
    pub fn len(&self) -> usize {
        self.q_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.q_values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> StateKey {
        StateKey::new(s)
    }

    #[test]
    fn test_qtable_initialization() {
        let qtable = QTable::new();
        assert!(qtable.is_empty());
        assert_eq!(qtable.value(&key("#@.HP:2"), Action::Up), 0.0);
        assert_eq!(qtable.max_q(&key("#@.HP:2")), None);
    }

    #[test]
    fn test_qtable_set_get() {
        let mut qtable = QTable::new();
        let state = key("#@.HP:2");
        qtable.set(state.clone(), Action::Down, 1.5);
        assert_eq!(qtable.value(&state, Action::Down), 1.5);
        assert_eq!(qtable.get(&state), Some(&[0.0, 0.0, 1.5, 0.0]));
    }

    #[test]
    fn test_entry_reports_insertion() {
        let mut qtable = QTable::new();
        assert!(qtable.entry(key("a")).1);
        assert!(!qtable.entry(key("a")).1);
        assert_eq!(qtable.len(), 1);
    }

    #[test]
    fn test_reset_clears_all_entries() {
        let mut qtable = QTable::new();
        qtable.set(key("a"), Action::Left, 0.5);
        qtable.set(key("b"), Action::Up, -1.0);
        assert_eq!(qtable.len(), 2);

        qtable.reset();
        assert!(qtable.is_empty());
        assert_eq!(qtable.value(&key("a"), Action::Left), 0.0);
    }

    #[test]
    fn test_best_actions_collects_exact_ties() {
        let mut qtable = QTable::new();
        let state = key("s");
        *qtable.entry(state.clone()).0 = [2.0, 2.0, 1.0, 0.0];
        assert_eq!(qtable.best_actions(&state), vec![Action::Up, Action::Right]);
        assert_eq!(qtable.max_q(&state), Some(2.0));
    }

    #[test]
    fn test_best_actions_with_negative_values() {
        let mut qtable = QTable::new();
        let state = key("s");
        *qtable.entry(state.clone()).0 = [-0.3, -0.1, -0.2, -0.1];
        assert_eq!(qtable.best_actions(&state), vec![Action::Right, Action::Left]);
    }

    #[test]
    fn test_q_learning_update_from_zero() {
        let mut qtable = QTable::new();
        let state = key("s");
        let updated = qtable.q_learning_update(state.clone(), Action::Right, 1.0, &key("unseen"));

        // Q = 0 + 0.5 * (1.0 + 0.9 * 0 - 0) = 0.5
        assert_eq!(updated, 0.5);
        assert_eq!(qtable.value(&state, Action::Right), 0.5);
        assert!(!qtable.contains(&key("unseen")));
    }

    #[test]
    fn test_q_learning_update_bootstraps_from_next_state() {
        let mut qtable = QTable::new();
        let state = key("s");
        let next_state = key("t");
        *qtable.entry(next_state.clone()).0 = [1.0, 2.0, -1.0, 0.0];
        qtable.set(state.clone(), Action::Left, 1.0);

        qtable.q_learning_update(state.clone(), Action::Left, 0.0, &next_state);

        // Q = 1.0 + 0.5 * (0.0 + 0.9 * 2.0 - 1.0) = 1.4
        assert!((qtable.value(&state, Action::Left) - 1.4).abs() < 1e-12);
    }

    #[test]
    fn test_self_transition_from_unseen_state() {
        let mut qtable = QTable::new();
        let state = key("loop");
        qtable.q_learning_update(state.clone(), Action::Up, -0.01, &state);
        assert_eq!(qtable.value(&state, Action::Up), -0.005);
    }
}
