//! Tabular Q-learning with persona-conditioned rewards
//!
//! States are abstracted through [`crate::encoding`] into string keys; each
//! key maps to four action values. The agent explores ε-greedily, breaks
//! ties between equally valued actions uniformly at random, and learns with
//! the one-step Bellman update
//!
//! Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
//!
//! using the fixed constants α = 0.5 and γ = 0.9.
//!
//! ## Usage Example
//!
//! ```no_run
//! use dungeon_agents::{
//!     adapters::MsgPackRepository,
//!     q_learning::QLearningAgent,
//!     reward::Persona,
//! };
//! use std::path::Path;
//!
//! let mut agent = QLearningAgent::new(Persona::TreasureCollector);
//! agent.set_epsilon(0.2);
//! // ... drive episodes, calling `agent.update(...)` after each step ...
//! agent.save_policy(&MsgPackRepository::new(), Path::new("TREASURE_COLLECTOR_map0.msgpack"))?;
//! # Ok::<(), dungeon_agents::Error>(())
//! ```

pub mod agent;
pub mod q_table;
pub mod serialization;

// Public re-exports
pub use agent::QLearningAgent;
pub use q_table::{ActionValues, DISCOUNT_FACTOR, LEARNING_RATE, QTable};
pub use serialization::{Checkpoint, SavedPolicy};
