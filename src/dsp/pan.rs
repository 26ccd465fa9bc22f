//! Equal-power stereo panner for mono input

use std::f32::consts::FRAC_PI_2;

/// Mono-to-stereo panner
///
/// `pan` runs from -1 (hard left) to 1 (hard right). The left/right gains
/// follow `cos`/`sin` of `(pan + 1)/2 · π/2`, so perceived loudness stays
/// constant across the sweep.
#[derive(Debug, Clone)]
pub struct StereoPanner {
    pan: f32,
    left_gain: f32,
    right_gain: f32,
}

impl StereoPanner {
    pub fn new(pan: f32) -> Self {
        let mut panner = Self {
            pan: 0.0,
            left_gain: 0.0,
            right_gain: 0.0,
        };
        panner.set_pan(pan);
        panner
    }

    /// Set the pan position immediately, clamped to [-1, 1]
    pub fn set_pan(&mut self, pan: f32) {
        self.pan = pan.clamp(-1.0, 1.0);
        let x = (self.pan + 1.0) / 2.0;
        self.left_gain = (x * FRAC_PI_2).cos();
        self.right_gain = (x * FRAC_PI_2).sin();
    }

    pub fn pan(&self) -> f32 {
        self.pan
    }

    /// Split a mono sample into (left, right)
    #[inline]
    pub fn process(&self, input: f32) -> (f32, f32) {
        (input * self.left_gain, input * self.right_gain)
    }
}

impl Default for StereoPanner {
    fn default() -> Self {
        Self::new(0.0)
    }
}
