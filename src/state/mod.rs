//! State Management Module
//!
//! Mixer parameter state, the settings stores it persists through, and the
//! store that ties them together.

#[cfg(feature = "async-settings")]
pub mod async_settings;
pub mod mixer_state;
pub mod settings;
pub mod store;

pub use mixer_state::{
    ChannelDefinition, ChannelId, ChannelState, MixerSnapshot, MixerState, ParamChange,
    CHANNEL_DEFINITIONS,
};
pub use settings::{FileSettingsStore, MemorySettingsStore, SettingsStore};
pub use store::{MixerStateStore, MIX_SNAPSHOT_KEY};

#[cfg(feature = "async-settings")]
pub use async_settings::AsyncFileSettingsStore;
