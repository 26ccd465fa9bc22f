//! Channel Node
//!
//! One channel's persistent signal chain:
//! looping noise source → low-pass → stereo pan → smoothed gain → master bus.
//!
//! The filter, panner and gain stages live as long as the graph. The source is
//! created on every `start()` and dropped on `stop()`.

use log::debug;

use crate::dsp::{NoiseSynthesizer, OnePoleLowPass, SmoothedParam, StereoPanner};
use crate::state::mixer_state::{clamp_filter, clamp_gain, clamp_pan, ChannelId, ChannelState};

/// A mono noise buffer played back in a loop
#[derive(Debug, Clone)]
pub struct LoopingSource {
    buffer: Vec<f32>,
    position: usize,
}

impl LoopingSource {
    pub fn new(buffer: Vec<f32>) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Next sample, wrapping to the start at the end of the buffer
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        if self.buffer.is_empty() {
            return 0.0;
        }
        let sample = self.buffer[self.position];
        self.position += 1;
        if self.position == self.buffer.len() {
            self.position = 0;
        }
        sample
    }
}

/// Live processing chain for one channel
#[derive(Debug)]
pub struct ChannelNode {
    id: ChannelId,
    sample_rate: u32,
    filter: OnePoleLowPass,
    panner: StereoPanner,
    gain: SmoothedParam,
    source: Option<LoopingSource>,
}

impl ChannelNode {
    /// Build the persistent stages from `state`. No source is playing yet.
    pub fn new(id: ChannelId, state: &ChannelState, sample_rate: u32, smoothing: f32) -> Self {
        Self {
            id,
            sample_rate,
            filter: OnePoleLowPass::new(state.filter_cutoff_hz, sample_rate),
            panner: StereoPanner::new(state.pan),
            gain: SmoothedParam::new(clamp_gain(state.gain), smoothing, sample_rate),
            source: None,
        }
    }

    pub fn id(&self) -> ChannelId {
        self.id
    }

    /// Whether a source is currently attached
    pub fn is_active(&self) -> bool {
        self.source.is_some()
    }

    /// Generate a fresh loop for this channel's noise type and start it.
    ///
    /// Any source already playing is replaced.
    pub fn start(&mut self, synth: &mut NoiseSynthesizer, loop_seconds: f32) {
        let color = self.id.definition().noise;
        let buffer = synth.generate_buffer(color, loop_seconds, self.sample_rate);
        if self.source.is_some() {
            debug!("[CHANNEL] {} restarting with a new {} loop", self.id, color);
        }
        self.source = Some(LoopingSource::new(buffer));
        debug!("[CHANNEL] {} started ({} noise)", self.id, color);
    }

    /// Stop and discard the active source. No-op when nothing is playing.
    pub fn stop(&mut self) {
        if self.source.take().is_some() {
            debug!("[CHANNEL] {} stopped", self.id);
        }
    }

    /// Ramp the channel gain toward `value` (clamped to [0, 1])
    pub fn set_gain(&mut self, value: f32) {
        self.gain.set_target(clamp_gain(value));
    }

    /// Set pan immediately (clamped to [-1, 1])
    pub fn set_pan(&mut self, value: f32) {
        self.panner.set_pan(clamp_pan(value));
    }

    /// Set the filter cutoff immediately (clamped to [200, 12000] Hz)
    pub fn set_filter(&mut self, value: f32) {
        self.filter.set_cutoff(clamp_filter(value));
    }

    /// Push a whole channel state onto the live stages
    pub fn apply_state(&mut self, state: &ChannelState) {
        self.set_gain(state.gain);
        self.set_pan(state.pan);
        self.set_filter(state.filter_cutoff_hz);
    }

    /// Gain the channel is ramping toward
    pub fn gain_target(&self) -> f32 {
        self.gain.target()
    }

    pub fn pan(&self) -> f32 {
        self.panner.pan()
    }

    pub fn filter_cutoff_hz(&self) -> f32 {
        self.filter.cutoff_hz()
    }

    /// Mix this channel into the master bus inputs.
    ///
    /// Adds to `left`/`right` rather than overwriting. Without a source
    /// nothing is added, but the gain ramp still advances so parameter moves
    /// made while stopped have settled by the next start.
    pub fn render_into(&mut self, left: &mut [f32], right: &mut [f32]) {
        let Some(source) = self.source.as_mut() else {
            for _ in 0..left.len().min(right.len()) {
                self.gain.next();
            }
            return;
        };

        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let filtered = self.filter.process(source.next_sample());
            let (pl, pr) = self.panner.process(filtered);
            let gain = self.gain.next();
            *l += pl * gain;
            *r += pr * gain;
        }
    }
}
