//! Non-blocking settings persistence
//!
//! File I/O for the settings file runs on the tokio runtime, so the control
//! thread keeps issuing mixer commands while a save or load is in flight.
//! The on-disk layout is the same as [`FileSettingsStore`]'s, and either
//! store can read what the other wrote.
//!
//! [`FileSettingsStore`]: crate::state::FileSettingsStore

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use log::debug;
use tokio::fs;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::error::{MixerError, Result};
use crate::state::settings::{SettingsEntry, SettingsFile};

/// Settings file accessed through async I/O
///
/// Clones share one write lock, so concurrent `put`s never lose each
/// other's keys.
#[derive(Debug, Clone)]
pub struct AsyncFileSettingsStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl AsyncFileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the whole settings file. A missing file reads as empty.
    pub async fn load_file(&self) -> Result<SettingsFile> {
        match fs::metadata(&self.path).await {
            Ok(meta) if meta.is_dir() => {
                return Err(MixerError::SettingsUnavailable {
                    reason: format!("{} is a directory", self.path.display()),
                })
            }
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(SettingsFile::default()),
            Err(e) => {
                return Err(MixerError::FileReadError {
                    path: self.path.clone(),
                    source: e,
                })
            }
        }

        let content = fs::read_to_string(&self.path)
            .await
            .map_err(|e| MixerError::FileReadError {
                path: self.path.clone(),
                source: e,
            })?;

        Ok(serde_json::from_str(&content)?)
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let file = self.load_file().await?;
        Ok(file.entries.get(key).map(|entry| entry.value.clone()))
    }

    pub async fn put(&self, key: &str, value: String) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut file = self.load_file().await?;
        file.entries.insert(
            key.to_string(),
            SettingsEntry {
                value,
                updated_at: Utc::now(),
            },
        );

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| MixerError::DirectoryCreateError {
                        path: parent.to_path_buf(),
                        source: e,
                    })?;
            }
        }

        let content = serde_json::to_string_pretty(&file)?;
        fs::write(&self.path, content)
            .await
            .map_err(|e| MixerError::FileWriteError {
                path: self.path.clone(),
                source: e,
            })?;

        debug!("[SETTINGS] Wrote '{}' to {}", key, self.path.display());
        Ok(())
    }

    /// Run [`put`] on the runtime and return immediately.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// [`put`]: AsyncFileSettingsStore::put
    pub fn spawn_put(&self, key: &str, value: String) -> JoinHandle<Result<()>> {
        let store = self.clone();
        let key = key.to_string();
        tokio::spawn(async move { store.put(&key, value).await })
    }
}
