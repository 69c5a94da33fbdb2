//! Ports (trait boundaries) for external dependencies.
//!
//! This module defines the interfaces between the decision agents and their
//! collaborators. Following hexagonal architecture, these traits are owned by
//! the domain and implemented by adapters (storage) or by the host game.

pub mod controller;
pub mod game_state;
pub mod observer;
pub mod repository;

pub use controller::Controller;
pub use game_state::GameState;
pub use observer::Observer;
pub use repository::PolicyRepository;
