//! CLI infrastructure for the dungeon agents toolkit
//!
//! This module provides the command-line interface for training Q-learning
//! policies and playing episodes with either agent.

pub mod commands;
pub mod config;
pub mod output;
