//! Settings key-value stores
//!
//! The mixer persists one opaque string under a fixed key. Any backend that
//! can get and put strings by key can hold it.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{MixerError, Result};

/// External key-value settings collaborator
pub trait SettingsStore: Send {
    /// Read the value stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn put(&mut self, key: &str, value: String) -> Result<()>;
}

// ============================================================================
// In-memory store
// ============================================================================

/// Settings held in a process-local map
#[derive(Debug, Clone, Default)]
pub struct MemorySettingsStore {
    entries: HashMap<String, String>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: String) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

// ============================================================================
// File-backed store
// ============================================================================

/// A stored value with its last write time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsEntry {
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

/// On-disk layout of a settings file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsFile {
    /// Map of key to entry
    pub entries: BTreeMap<String, SettingsEntry>,
}

/// Settings persisted as a single JSON file
///
/// The file is read on every `get` and rewritten on every `put`, so several
/// processes sharing a path see each other's last completed write.
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the whole settings file. A missing file reads as empty.
    pub fn load_file(&self) -> Result<SettingsFile> {
        if !self.path.exists() {
            return Ok(SettingsFile::default());
        }
        if self.path.is_dir() {
            return Err(MixerError::SettingsUnavailable {
                reason: format!("{} is a directory", self.path.display()),
            });
        }

        let content = fs::read_to_string(&self.path).map_err(|e| MixerError::FileReadError {
            path: self.path.clone(),
            source: e,
        })?;

        let file: SettingsFile = serde_json::from_str(&content)?;
        Ok(file)
    }

    fn save_file(&self, file: &SettingsFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| MixerError::DirectoryCreateError {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let content = serde_json::to_string_pretty(file)?;
        fs::write(&self.path, content).map_err(|e| MixerError::FileWriteError {
            path: self.path.clone(),
            source: e,
        })?;

        Ok(())
    }
}

impl SettingsStore for FileSettingsStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let file = self.load_file()?;
        Ok(file.entries.get(key).map(|entry| entry.value.clone()))
    }

    fn put(&mut self, key: &str, value: String) -> Result<()> {
        let mut file = self.load_file()?;
        file.entries.insert(
            key.to_string(),
            SettingsEntry {
                value,
                updated_at: Utc::now(),
            },
        );
        self.save_file(&file)
    }
}
