//! Mixer facade
//!
//! Binds the control surface to the core: each UI control maps onto one
//! method here. State changes always land in the [`MixerStateStore`] first
//! and are then pushed onto the live graph if it has been built.

use log::info;

use crate::config::EngineConfig;
use crate::dsp::NoiseSynthesizer;
use crate::engine::{AudioBackend, AudioBuffer, MixerGraph, PlaybackController, PlaybackStatus};
use crate::error::Result;
use crate::state::{ChannelId, MixerState, MixerStateStore, ParamChange, SettingsStore};

/// One ambient mixer instance
pub struct Mixer {
    store: MixerStateStore,
    graph: MixerGraph,
    playback: PlaybackController,
}

impl Mixer {
    /// Create a mixer at default state with an unbuilt graph
    pub fn new(
        config: EngineConfig,
        backend: Box<dyn AudioBackend>,
        settings: Box<dyn SettingsStore>,
    ) -> Self {
        Self::with_synthesizer(config, backend, settings, NoiseSynthesizer::new())
    }

    /// Like [`Mixer::new`] with an explicit noise source
    pub fn with_synthesizer(
        config: EngineConfig,
        backend: Box<dyn AudioBackend>,
        settings: Box<dyn SettingsStore>,
        synth: NoiseSynthesizer,
    ) -> Self {
        Self {
            store: MixerStateStore::new(settings),
            graph: MixerGraph::with_synthesizer(config, backend, synth),
            playback: PlaybackController::new(),
        }
    }

    pub fn state(&self) -> &MixerState {
        self.store.state()
    }

    pub fn status(&self) -> PlaybackStatus {
        self.playback.status()
    }

    pub fn graph(&self) -> &MixerGraph {
        &self.graph
    }

    pub fn store(&self) -> &MixerStateStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut MixerStateStore {
        &mut self.store
    }

    // ========================================================================
    // Parameter controls
    // ========================================================================

    /// Apply one control change to state and, if built, to the live graph
    pub fn apply(&mut self, change: ParamChange) {
        let state = self.store.apply(change);
        match change {
            ParamChange::Master(_) => {
                let v = state.master();
                self.graph.set_master_gain(v);
            }
            ParamChange::Gain(id, _) => {
                let v = state.channel(id).gain;
                if let Some(node) = self.graph.channel_mut(id) {
                    node.set_gain(v);
                }
            }
            ParamChange::Pan(id, _) => {
                let v = state.channel(id).pan;
                if let Some(node) = self.graph.channel_mut(id) {
                    node.set_pan(v);
                }
            }
            ParamChange::Filter(id, _) => {
                let v = state.channel(id).filter_cutoff_hz;
                if let Some(node) = self.graph.channel_mut(id) {
                    node.set_filter(v);
                }
            }
        }
    }

    pub fn set_master_gain(&mut self, value: f32) {
        self.apply(ParamChange::Master(value));
    }

    pub fn set_gain(&mut self, id: ChannelId, value: f32) {
        self.apply(ParamChange::Gain(id, value));
    }

    pub fn set_pan(&mut self, id: ChannelId, value: f32) {
        self.apply(ParamChange::Pan(id, value));
    }

    pub fn set_filter(&mut self, id: ChannelId, value: f32) {
        self.apply(ParamChange::Filter(id, value));
    }

    // ========================================================================
    // Playback
    // ========================================================================

    /// Play/pause the whole mixer. Must be called from a user action.
    pub fn toggle(&mut self) -> Result<PlaybackStatus> {
        let status = self.playback.toggle(&mut self.graph, self.store.state())?;
        info!("Playback {}", status);
        Ok(status)
    }

    /// Render `frames` of the master bus (silence unless running)
    pub fn render(&mut self, frames: usize) -> AudioBuffer {
        self.graph.render(frames)
    }

    // ========================================================================
    // Snapshots
    // ========================================================================

    pub fn save(&mut self) -> Result<()> {
        self.store.save()
    }

    /// Restore the saved snapshot and push it onto the live graph.
    ///
    /// Returns whether a snapshot existed.
    pub fn load(&mut self) -> Result<bool> {
        let loaded = self.store.load()?;
        if loaded {
            self.graph.apply_state(self.store.state());
        }
        Ok(loaded)
    }

    /// Serialized current state, for persisting outside the mixer
    pub fn snapshot(&self) -> Result<String> {
        self.store.snapshot()
    }

    /// Restore a snapshot fetched outside the mixer and push it onto the
    /// live graph. `None` means nothing was saved.
    pub fn load_snapshot(&mut self, raw: Option<String>) -> Result<bool> {
        let loaded = self.store.load_snapshot(raw)?;
        if loaded {
            self.graph.apply_state(self.store.state());
        }
        Ok(loaded)
    }

    /// Restore defaults in memory and on the live graph
    pub fn reset(&mut self) {
        self.store.reset();
        self.graph.apply_state(self.store.state());
    }
}
