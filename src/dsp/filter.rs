//! Single-pole low-pass filter
//!
//! `y[n] = (1 - a)·x[n] + a·y[n-1]` with `a = exp(-2π·fc/sr)`.

use std::f32::consts::PI;

/// Lowest accepted cutoff in Hz
pub const MIN_CUTOFF_HZ: f32 = 200.0;

/// Highest accepted cutoff in Hz
pub const MAX_CUTOFF_HZ: f32 = 12000.0;

/// One-pole low-pass with a live-adjustable cutoff
#[derive(Debug, Clone)]
pub struct OnePoleLowPass {
    cutoff_hz: f32,
    sample_rate: u32,
    coeff: f32,
    state: f32,
}

impl OnePoleLowPass {
    /// Create a filter; the cutoff is clamped to the accepted range.
    pub fn new(cutoff_hz: f32, sample_rate: u32) -> Self {
        let mut filter = Self {
            cutoff_hz: MIN_CUTOFF_HZ,
            sample_rate,
            coeff: 0.0,
            state: 0.0,
        };
        filter.set_cutoff(cutoff_hz);
        filter
    }

    /// Set the cutoff immediately. Takes effect on the next sample.
    pub fn set_cutoff(&mut self, cutoff_hz: f32) {
        self.cutoff_hz = cutoff_hz.clamp(MIN_CUTOFF_HZ, MAX_CUTOFF_HZ);
        // Keep below Nyquist for low sample rates
        let nyquist = self.sample_rate as f32 / 2.0;
        let effective = self.cutoff_hz.min(nyquist * 0.99);
        self.coeff = (-2.0 * PI * effective / self.sample_rate as f32).exp();
    }

    pub fn cutoff_hz(&self) -> f32 {
        self.cutoff_hz
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        self.state = (1.0 - self.coeff) * input + self.coeff * self.state;
        self.state
    }

    /// Clear filter history
    pub fn reset(&mut self) {
        self.state = 0.0;
    }
}
