//! Mixer Graph
//!
//! The master gain stage plus the five channel nodes. Nothing exists until
//! [`MixerGraph::build`] runs, which must happen in response to a user action
//! since it creates the platform audio context. Once built the graph lives
//! until the process exits.

use log::debug;

use crate::config::EngineConfig;
use crate::dsp::{NoiseSynthesizer, SmoothedParam};
use crate::engine::buffer::{AudioBuffer, ChannelLayout};
use crate::engine::channel::ChannelNode;
use crate::engine::context::{AudioBackend, AudioContext, ContextState};
use crate::error::{MixerError, Result};
use crate::state::mixer_state::{clamp_gain, ChannelId, MixerState};

/// Everything that exists once the graph has been built
struct LiveGraph {
    context: Box<dyn AudioContext>,
    master: SmoothedParam,
    /// In [`ChannelId::ALL`] order
    channels: Vec<ChannelNode>,
}

/// Lazily built audio graph
pub struct MixerGraph {
    config: EngineConfig,
    backend: Box<dyn AudioBackend>,
    synth: NoiseSynthesizer,
    live: Option<LiveGraph>,
}

impl MixerGraph {
    /// Create an unbuilt graph
    pub fn new(config: EngineConfig, backend: Box<dyn AudioBackend>) -> Self {
        Self::with_synthesizer(config, backend, NoiseSynthesizer::new())
    }

    /// Create an unbuilt graph with a specific noise source
    pub fn with_synthesizer(
        config: EngineConfig,
        backend: Box<dyn AudioBackend>,
        synth: NoiseSynthesizer,
    ) -> Self {
        Self {
            config,
            backend,
            synth,
            live: None,
        }
    }

    pub fn is_built(&self) -> bool {
        self.live.is_some()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Create the audio context and all nodes, initialised from `state`.
    ///
    /// Only the first call does anything. Invalid configuration and context
    /// creation errors propagate and leave the graph unbuilt.
    pub fn build(&mut self, state: &MixerState) -> Result<()> {
        if self.live.is_some() {
            return Ok(());
        }

        self.config.validate()?;
        let context = self.backend.create_context()?;
        let sample_rate = context.sample_rate();
        if sample_rate == 0 {
            return Err(MixerError::AudioContextUnavailable {
                reason: "context reported a sample rate of 0 Hz".to_string(),
            });
        }
        let smoothing = self.config.smoothing_time_constant;

        let channels = state
            .channels()
            .map(|(id, ch)| ChannelNode::new(id, ch, sample_rate, smoothing))
            .collect();

        self.live = Some(LiveGraph {
            context,
            master: SmoothedParam::new(clamp_gain(state.master()), smoothing, sample_rate),
            channels,
        });

        debug!("[GRAPH] Built at {} Hz", sample_rate);
        Ok(())
    }

    /// Platform context state, `None` before build
    pub fn context_state(&self) -> Option<ContextState> {
        self.live.as_ref().map(|live| live.context.state())
    }

    /// Sample rate of the built context
    pub fn sample_rate(&self) -> Option<u32> {
        self.live.as_ref().map(|live| live.context.sample_rate())
    }

    /// Resume the platform context if it is suspended
    pub fn resume_if_suspended(&mut self) -> Result<()> {
        if let Some(live) = self.live.as_mut() {
            if live.context.state() == ContextState::Suspended {
                debug!("[GRAPH] Resuming suspended audio context");
                live.context.resume()?;
            }
        }
        Ok(())
    }

    /// Ramp the master gain toward `value` (clamped to [0, 1])
    pub fn set_master_gain(&mut self, value: f32) {
        if let Some(live) = self.live.as_mut() {
            live.master.set_target(clamp_gain(value));
        }
    }

    /// Gain the master bus is ramping toward, `None` before build
    pub fn master_gain_target(&self) -> Option<f32> {
        self.live.as_ref().map(|live| live.master.target())
    }

    pub fn channel(&self, id: ChannelId) -> Option<&ChannelNode> {
        self.live.as_ref().map(|live| &live.channels[id.index()])
    }

    pub fn channel_mut(&mut self, id: ChannelId) -> Option<&mut ChannelNode> {
        self.live.as_mut().map(|live| &mut live.channels[id.index()])
    }

    /// Push every parameter in `state` onto the live nodes
    pub fn apply_state(&mut self, state: &MixerState) {
        let Some(live) = self.live.as_mut() else {
            return;
        };
        live.master.set_target(clamp_gain(state.master()));
        for (node, (_, ch)) in live.channels.iter_mut().zip(state.channels()) {
            node.apply_state(ch);
        }
    }

    /// Start a fresh source on every channel
    pub fn start_all(&mut self) {
        let loop_seconds = self.config.loop_seconds;
        if let Some(live) = self.live.as_mut() {
            for node in &mut live.channels {
                node.start(&mut self.synth, loop_seconds);
            }
        }
    }

    /// Stop every channel's source
    pub fn stop_all(&mut self) {
        if let Some(live) = self.live.as_mut() {
            for node in &mut live.channels {
                node.stop();
            }
        }
    }

    /// Number of channels with an active source
    pub fn active_channels(&self) -> usize {
        self.live
            .as_ref()
            .map(|live| live.channels.iter().filter(|n| n.is_active()).count())
            .unwrap_or(0)
    }

    /// Render `frames` stereo samples of the master bus.
    ///
    /// Returns silence at the configured rate if the graph is not built, or
    /// at the context rate while the context is suspended.
    pub fn render(&mut self, frames: usize) -> AudioBuffer {
        let Some(live) = self.live.as_mut() else {
            return AudioBuffer::new(frames, ChannelLayout::Stereo, self.config.sample_rate);
        };

        let mut out = AudioBuffer::new(frames, ChannelLayout::Stereo, live.context.sample_rate());
        if live.context.state() != ContextState::Running {
            return out;
        }

        let (left, right) = out.stereo_mut();
        for node in &mut live.channels {
            node.render_into(left, right);
        }
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let gain = live.master.next();
            *l *= gain;
            *r *= gain;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::context::OfflineBackend;
    use crate::state::mixer_state::ParamChange;

    struct FailingBackend;

    impl AudioBackend for FailingBackend {
        fn create_context(&mut self) -> Result<Box<dyn AudioContext>> {
            Err(MixerError::AudioContextUnavailable {
                reason: "no device".to_string(),
            })
        }
    }

    fn create_graph() -> MixerGraph {
        MixerGraph::with_synthesizer(
            EngineConfig {
                loop_seconds: 0.25,
                ..EngineConfig::default()
            },
            Box::new(OfflineBackend::new(44100)),
            NoiseSynthesizer::seeded(12),
        )
    }

    #[test]
    fn test_unbuilt_graph() {
        let mut graph = create_graph();
        assert!(!graph.is_built());
        assert!(graph.channel(ChannelId::Rain).is_none());
        assert_eq!(graph.context_state(), None);

        // setters and transport calls are harmless before build
        graph.set_master_gain(0.1);
        graph.start_all();
        graph.stop_all();
        assert_eq!(graph.active_channels(), 0);
        assert!(graph.render(64).is_silent());
    }

    #[test]
    fn test_build_creates_five_channels() {
        let mut graph = create_graph();
        graph.build(&MixerState::default()).unwrap();

        assert!(graph.is_built());
        for id in ChannelId::ALL {
            assert_eq!(graph.channel(id).unwrap().id(), id);
        }
        assert_eq!(graph.master_gain_target(), Some(0.7));
        assert_eq!(graph.context_state(), Some(ContextState::Suspended));
    }

    #[test]
    fn test_build_is_idempotent() {
        let mut graph = create_graph();
        let state = MixerState::default().apply(ParamChange::Master(0.2));
        graph.build(&state).unwrap();
        graph.resume_if_suspended().unwrap();

        graph.build(&MixerState::default()).unwrap();
        // second build did not replace the context or nodes
        assert_eq!(graph.context_state(), Some(ContextState::Running));
        assert_eq!(graph.master_gain_target(), Some(0.2));
    }

    #[test]
    fn test_build_failure_propagates() {
        let mut graph = MixerGraph::new(EngineConfig::default(), Box::new(FailingBackend));
        let err = graph.build(&MixerState::default()).unwrap_err();
        assert_eq!(err.error_code(), "AUDIO_CONTEXT_UNAVAILABLE");
        assert!(!graph.is_built());
    }

    #[test]
    fn test_build_rejects_invalid_config() {
        let mut graph = MixerGraph::new(
            EngineConfig {
                loop_seconds: f32::INFINITY,
                ..EngineConfig::default()
            },
            Box::new(OfflineBackend::new(44100)),
        );
        let err = graph.build(&MixerState::default()).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
        assert!(!graph.is_built());
    }

    #[test]
    fn test_build_rejects_zero_rate_context() {
        let mut graph = MixerGraph::new(EngineConfig::default(), Box::new(OfflineBackend::new(0)));
        let err = graph.build(&MixerState::default()).unwrap_err();
        assert_eq!(err.error_code(), "AUDIO_CONTEXT_UNAVAILABLE");
        assert!(!graph.is_built());
    }

    #[test]
    fn test_build_uses_state() {
        let state = MixerState::default()
            .apply(ParamChange::Gain(ChannelId::Fire, 0.1))
            .apply(ParamChange::Filter(ChannelId::Fire, 1200.0));
        let mut graph = create_graph();
        graph.build(&state).unwrap();

        let fire = graph.channel(ChannelId::Fire).unwrap();
        assert_eq!(fire.gain_target(), 0.1);
        assert_eq!(fire.filter_cutoff_hz(), 1200.0);
    }

    #[test]
    fn test_set_master_gain_clamps() {
        let mut graph = create_graph();
        graph.build(&MixerState::default()).unwrap();
        graph.set_master_gain(4.0);
        assert_eq!(graph.master_gain_target(), Some(1.0));
        graph.set_master_gain(-1.0);
        assert_eq!(graph.master_gain_target(), Some(0.0));
    }

    #[test]
    fn test_suspended_context_renders_silence() {
        let mut graph = create_graph();
        graph.build(&MixerState::default()).unwrap();
        graph.start_all();
        assert!(graph.render(256).is_silent());

        graph.resume_if_suspended().unwrap();
        assert!(!graph.render(256).is_silent());
    }

    #[test]
    fn test_start_stop_all() {
        let mut graph = create_graph();
        graph.build(&MixerState::default()).unwrap();
        graph.resume_if_suspended().unwrap();

        graph.start_all();
        assert_eq!(graph.active_channels(), 5);

        graph.stop_all();
        assert_eq!(graph.active_channels(), 0);
        assert!(graph.render(256).is_silent());
    }

    #[test]
    fn test_apply_state() {
        let mut graph = create_graph();
        graph.build(&MixerState::default()).unwrap();

        let state = MixerState::default()
            .apply(ParamChange::Master(0.42))
            .apply(ParamChange::Pan(ChannelId::Waves, 0.75));
        graph.apply_state(&state);

        assert_eq!(graph.master_gain_target(), Some(0.42));
        assert_eq!(graph.channel(ChannelId::Waves).unwrap().pan(), 0.75);
    }

    #[test]
    fn test_master_gain_zero_silences_output() {
        let mut graph = create_graph();
        graph.build(&MixerState::default().apply(ParamChange::Master(0.0))).unwrap();
        graph.resume_if_suspended().unwrap();
        graph.start_all();

        let out = graph.render(1024);
        assert!(out.is_silent());
    }

    #[test]
    fn test_render_stays_bounded() {
        let state = ChannelId::ALL.into_iter().fold(
            MixerState::default().apply(ParamChange::Master(1.0)),
            |s, id| s.apply(ParamChange::Gain(id, 1.0)),
        );
        let mut graph = create_graph();
        graph.build(&state).unwrap();
        graph.resume_if_suspended().unwrap();
        graph.start_all();

        let out = graph.render(44100);
        assert!(out.samples.iter().flatten().all(|s| s.is_finite()));
        assert!(out.peak(0) < 5.0);
        assert!(out.peak(1) < 5.0);
    }
}
