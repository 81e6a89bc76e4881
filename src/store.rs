//! Key-value string store holding the persisted records.
//!
//! The engine only needs `get(key)` and `set(key, value)`. On disk every key
//! is one plain-text file inside the data directory:
//!
//! ```text
//! <data dir>/
//!   levelup.toml     # Optional configuration
//!   stats            # Level + one line per stat
//!   tasks            # One line per task
//!   rewards          # Points + one line per reward
//!   tutorial         # Four boolean lines
//! ```

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{Error, Result};

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "LEVELUP_DIR";

/// Fallback data directory when no platform directory is available
pub const FALLBACK_DIR: &str = ".levelup";

/// Minimal string store contract.
pub trait Store {
    /// Read the value under `key`, `None` when it was never written.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value under `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

impl<S: Store + ?Sized> Store for &mut S {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

/// Store backed by one file per key in a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path to the data directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path to the file holding `key`
    pub fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl Store for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.key_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(Error::Io(err)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key);
        tracing::debug!(path = %path.display(), bytes = value.len(), "writing record");
        write_atomic(&path, value.as_bytes())
    }
}

/// Atomically write data to a file
///
/// Writes a temporary file in the same directory, then renames it over the
/// target, so the record is either fully replaced or left untouched.
pub fn write_atomic(path: impl AsRef<Path>, data: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(data)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|err| Error::Io(err.error))?;

    Ok(())
}

/// In-memory store, mostly for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    unavailable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with the given records.
    pub fn with_records<'a>(records: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            values: records
                .into_iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
            unavailable: false,
        }
    }

    /// Make every subsequent `set` fail, as a full or detached medium would.
    pub fn set_unavailable(&mut self, unavailable: bool) {
        self.unavailable = unavailable;
    }

    /// Raw record under `key`.
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if self.unavailable {
            return Err(Error::StoreUnavailable(format!("cannot write '{key}'")));
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Resolve the data directory.
///
/// Resolution order:
/// 1) Explicit path (`--data-dir` or `LEVELUP_DIR`, both handled by clap)
/// 2) Platform data directory (e.g. `~/.local/share/levelup`)
/// 3) `./.levelup`
pub fn resolve_data_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }

    directories::ProjectDirs::from("", "", "levelup")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(FALLBACK_DIR))
}
