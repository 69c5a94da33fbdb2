//! MessagePack implementation of the policy repository.
//!
//! This adapter implements the PolicyRepository port using rmp_serde for
//! compact binary serialization. Writes go to a sibling `.tmp` file that is
//! renamed over the target once complete, so a reader sees either the old
//! file or the new one.

use std::{
    ffi::OsString,
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use serde::{Serialize, de::DeserializeOwned};

use crate::{
    Result,
    error::Error,
    ports::PolicyRepository,
    q_learning::{Checkpoint, SavedPolicy},
};

/// MessagePack-based policy repository.
///
/// # Examples
///
/// ```no_run
/// use dungeon_agents::adapters::MsgPackRepository;
/// use dungeon_agents::ports::PolicyRepository;
/// use std::path::Path;
///
/// let repo = MsgPackRepository;
/// let policy = repo.load_policy(Path::new("trained_agents/RUNNER_map0.msgpack"))?;
/// println!("{} states", policy.q_table.len());
/// # Ok::<(), dungeon_agents::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackRepository;

impl MsgPackRepository {
    /// Create a new MessagePack repository.
    pub fn new() -> Self {
        Self
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut staged = OsString::from(path.as_os_str());
    staged.push(".tmp");
    PathBuf::from(staged)
}

fn write_msgpack<T: Serialize>(value: &T, path: &Path, what: &str) -> Result<()> {
    let staged = staging_path(path);
    let file = File::create(&staged).map_err(|source| Error::Io {
        operation: format!("create file {staged:?}"),
        source,
    })?;

    let result = write_staged(value, file, &staged, what).and_then(|()| {
        fs::rename(&staged, path).map_err(|source| Error::Io {
            operation: format!("move {staged:?} to {path:?}"),
            source,
        })
    });
    if result.is_err() {
        // Leave no partial staging file behind.
        let _ = fs::remove_file(&staged);
    }
    result
}

fn write_staged<T: Serialize>(value: &T, file: File, staged: &Path, what: &str) -> Result<()> {
    let mut writer = BufWriter::new(file);

    rmp_serde::encode::write(&mut writer, value).map_err(|e| Error::SerializationContext {
        operation: format!("serialize {what} to MessagePack"),
        message: e.to_string(),
    })?;

    writer.flush().map_err(|source| Error::Io {
        operation: format!("flush {staged:?}"),
        source,
    })
}

fn read_msgpack<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let file = File::open(path).map_err(|source| Error::Io {
        operation: format!("open file {path:?}"),
        source,
    })?;

    rmp_serde::decode::from_read(BufReader::new(file)).map_err(|e| Error::SerializationContext {
        operation: format!("deserialize {what} from MessagePack"),
        message: e.to_string(),
    })
}

impl PolicyRepository for MsgPackRepository {
    fn save_policy(&self, policy: &SavedPolicy, path: &Path) -> Result<()> {
        write_msgpack(policy, path, "policy")
    }

    fn load_policy(&self, path: &Path) -> Result<SavedPolicy> {
        read_msgpack(path, "policy")
    }

    fn save_checkpoint(&self, checkpoint: &Checkpoint, path: &Path) -> Result<()> {
        write_msgpack(checkpoint, path, "checkpoint")
    }

    fn load_checkpoint(&self, path: &Path) -> Result<Checkpoint> {
        read_msgpack(path, "checkpoint")
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn remove(&self, path: &Path) -> Result<()> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(Error::Io {
                operation: format!("remove file {path:?}"),
                source,
            }),
        }
    }
}
