//! Serialization envelopes for learned policies and training checkpoints.

use serde::{Deserialize, Serialize};

use crate::{Error, Result, q_learning::q_table::QTable, reward::Persona};

/// A complete learned policy, as written by `save_policy`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedPolicy {
    pub version: u32,
    pub label: String,
    pub persona: Persona,
    pub q_table: QTable,
}

impl SavedPolicy {
    pub const VERSION: u32 = 1;

    pub fn new(label: impl Into<String>, persona: Persona, q_table: QTable) -> Self {
        Self {
            version: Self::VERSION,
            label: label.into(),
            persona,
            q_table,
        }
    }

    /// Reject envelopes written by an incompatible format version.
    pub fn validate(&self) -> Result<()> {
        check_version("policy", self.version, Self::VERSION)
    }
}

/// A resumable training snapshot.
///
/// `next_episode` is the index of the first episode that has not been
/// trained yet; resuming starts exactly there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub version: u32,
    pub persona: Persona,
    pub next_episode: usize,
    pub q_table: QTable,
}

impl Checkpoint {
    pub const VERSION: u32 = 1;

    pub fn new(persona: Persona, next_episode: usize, q_table: QTable) -> Self {
        Self {
            version: Self::VERSION,
            persona,
            next_episode,
            q_table,
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_version("checkpoint", self.version, Self::VERSION)
    }
}

fn check_version(kind: &str, found: u32, expected: u32) -> Result<()> {
    if found == expected {
        Ok(())
    } else {
        Err(Error::UnsupportedVersion {
            kind: kind.to_string(),
            found,
            expected,
        })
    }
}
