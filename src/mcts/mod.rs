//! Monte Carlo Tree Search with UCB1 selection (UCT)
//!
//! The tree is arena-allocated and rebuilt from a snapshot of the live game
//! for every decision. Each node holds its own independent copy of the game,
//! so expanding or simulating never touches the caller's state.

pub mod agent;
pub mod config;
pub mod node;
pub mod rollout;
pub mod search;
pub mod tree;

pub use agent::{UCT_LABEL, UctAgent};
pub use config::{MctsConfig, RolloutWeights};
pub use node::{NodeId, SearchNode};
pub use search::{SearchResult, UctSearch, search};
pub use tree::SearchTree;
