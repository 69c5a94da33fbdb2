//! Decision agents for turn-based dungeon games
//!
//! This crate provides:
//! - Tabular Q-learning with persona-conditioned reward shaping
//! - Monte Carlo Tree Search with UCB1 selection (UCT)
//! - Compact state abstraction shared by the learning agent
//! - Resumable training with MessagePack checkpoints
//! - A reference grid dungeon to drive the agents end-to-end

pub mod adapters;
pub mod cli;
pub mod dungeon;
pub mod encoding;
pub mod error;
pub mod identifiers;
pub mod mcts;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod reward;
pub mod types;

pub use error::{Error, Result};
pub use identifiers::StateKey;
pub use types::{Action, Position};
