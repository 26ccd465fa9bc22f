//! Mixer state store
//!
//! Owns the in-memory [`MixerState`] and saves, loads and resets it against a
//! [`SettingsStore`]. The store never touches the audio graph; callers push
//! the resulting state onto a live graph themselves.

use log::{debug, info};

use crate::error::{MixerError, Result};
use crate::state::mixer_state::{MixerSnapshot, MixerState, ParamChange};
use crate::state::settings::SettingsStore;

/// Key under which the serialized mix is persisted
pub const MIX_SNAPSHOT_KEY: &str = "mix";

/// In-memory mixer parameters backed by a persisted snapshot
pub struct MixerStateStore {
    state: MixerState,
    settings: Box<dyn SettingsStore>,
}

impl MixerStateStore {
    /// Create a store at the default state
    pub fn new(settings: Box<dyn SettingsStore>) -> Self {
        Self {
            state: MixerState::default(),
            settings,
        }
    }

    pub fn state(&self) -> &MixerState {
        &self.state
    }

    pub fn settings(&self) -> &dyn SettingsStore {
        self.settings.as_ref()
    }

    pub fn settings_mut(&mut self) -> &mut dyn SettingsStore {
        self.settings.as_mut()
    }

    /// Apply one clamped parameter change and return the new state
    pub fn apply(&mut self, change: ParamChange) -> &MixerState {
        self.state = self.state.apply(change);
        debug!("[STATE] {:?}", change);
        &self.state
    }

    /// Serialized form of the full current state
    pub fn snapshot(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.state)?)
    }

    /// Serialize the full current state under [`MIX_SNAPSHOT_KEY`]
    pub fn save(&mut self) -> Result<()> {
        let snapshot = self.snapshot()?;
        self.settings.put(MIX_SNAPSHOT_KEY, snapshot)?;
        info!("Saved mix snapshot");
        Ok(())
    }

    /// Merge the persisted snapshot into the current state.
    ///
    /// Returns `Ok(false)` without changes when nothing has been saved. A
    /// snapshot that does not parse leaves the state untouched and returns
    /// [`MixerError::CorruptSnapshot`].
    pub fn load(&mut self) -> Result<bool> {
        let raw = self.settings.get(MIX_SNAPSHOT_KEY)?;
        self.load_snapshot(raw)
    }

    /// Merge an already fetched snapshot, with the same rules as [`load`].
    ///
    /// [`load`]: MixerStateStore::load
    pub fn load_snapshot(&mut self, raw: Option<String>) -> Result<bool> {
        let Some(raw) = raw else {
            debug!("No mix snapshot stored");
            return Ok(false);
        };

        let snapshot: MixerSnapshot =
            serde_json::from_str(&raw).map_err(|e| MixerError::CorruptSnapshot {
                key: MIX_SNAPSHOT_KEY.to_string(),
                source: e,
            })?;

        self.state = self.state.merge(snapshot);
        info!("Loaded mix snapshot");
        Ok(true)
    }

    /// Restore defaults in memory. The persisted snapshot is left as is.
    pub fn reset(&mut self) -> &MixerState {
        self.state = MixerState::default();
        info!("Reset mix to defaults");
        &self.state
    }
}
