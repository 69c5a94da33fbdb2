//! Repository port for policy and checkpoint persistence.
//!
//! This module defines the trait boundary between the learning agents and
//! the storage that keeps their Q-tables between runs.

use std::path::Path;

use crate::{
    Result,
    q_learning::{Checkpoint, SavedPolicy},
};

/// Port for persisting and loading learned policies.
///
/// Every save writes one self-contained unit and every load reads one back;
/// a reader never observes a half-written policy. Implementations report
/// missing or corrupt data as errors rather than returning partial values.
///
/// # Examples
///
/// ```no_run
/// use dungeon_agents::ports::PolicyRepository;
/// use dungeon_agents::q_learning::SavedPolicy;
/// use std::path::Path;
///
/// fn backup<R: PolicyRepository>(repo: &R, policy: &SavedPolicy) -> dungeon_agents::Result<()> {
///     repo.save_policy(policy, Path::new("backup.msgpack"))
/// }
/// ```
pub trait PolicyRepository {
    /// Save a complete policy.
    ///
    /// # Errors
    ///
    /// Returns an error if the location cannot be written or serialization
    /// fails.
    fn save_policy(&self, policy: &SavedPolicy, path: &Path) -> Result<()>;

    /// Load a complete policy.
    ///
    /// # Errors
    ///
    /// Returns an error if the data does not exist, cannot be read, or is
    /// not a valid policy.
    fn load_policy(&self, path: &Path) -> Result<SavedPolicy>;

    /// Save a training checkpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the location cannot be written or serialization
    /// fails.
    fn save_checkpoint(&self, checkpoint: &Checkpoint, path: &Path) -> Result<()>;

    /// Load a training checkpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the data does not exist, cannot be read, or is
    /// not a valid checkpoint.
    fn load_checkpoint(&self, path: &Path) -> Result<Checkpoint>;

    /// Whether something is stored at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Remove whatever is stored at `path`.
    ///
    /// Removing a missing entry is not an error.
    fn remove(&self, path: &Path) -> Result<()>;
}
