//! Smoothed parameter transitions
//!
//! Parameters ramp toward a target exponentially with a fixed time constant
//! instead of jumping, so gain moves do not click.

/// Below this distance the ramp snaps onto the target
const SNAP_THRESHOLD: f32 = 1e-6;

/// A per-sample exponentially smoothed value
///
/// After one time constant the value has covered ~63% of the distance to the
/// target, after five it is within 1%.
#[derive(Debug, Clone)]
pub struct SmoothedParam {
    current: f32,
    target: f32,
    coeff: f32,
}

impl SmoothedParam {
    /// Create a parameter resting at `value`
    ///
    /// # Arguments
    /// * `value` - Initial value (no ramp)
    /// * `time_constant` - Ramp time constant in seconds
    /// * `sample_rate` - Rate at which [`SmoothedParam::next`] is called
    pub fn new(value: f32, time_constant: f32, sample_rate: u32) -> Self {
        let samples = time_constant * sample_rate as f32;
        let coeff = if samples > 0.0 {
            (-1.0 / samples).exp()
        } else {
            0.0
        };
        Self {
            current: value,
            target: value,
            coeff,
        }
    }

    /// Start a ramp toward `target`
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Jump to `value` with no ramp
    pub fn set_immediate(&mut self, value: f32) {
        self.current = value;
        self.target = value;
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn is_settled(&self) -> bool {
        self.current == self.target
    }

    /// Advance one sample and return the new value
    #[inline]
    pub fn next(&mut self) -> f32 {
        if self.current != self.target {
            self.current = self.target + (self.current - self.target) * self.coeff;
            if (self.current - self.target).abs() < SNAP_THRESHOLD {
                self.current = self.target;
            }
        }
        self.current
    }
}
