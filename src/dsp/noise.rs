//! Noise Synthesis
//!
//! Generates fixed-length mono buffers of white, pink or brown noise that the
//! channel sources loop. Pink and brown are recursive approximations, not
//! spectrally exact.

use rand::rngs::{SmallRng, StdRng};
use rand::{Rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Constants
// ============================================================================

/// Feedback coefficient of the pink one-pole smoother
const PINK_FEEDBACK: f32 = 0.997;

/// Input weight of the pink one-pole smoother
const PINK_INPUT: f32 = 0.05;

/// Input weight of the brown leaky integrator
const BROWN_INPUT: f32 = 0.02;

/// Leak divisor of the brown integrator (bounds DC drift)
const BROWN_LEAK: f32 = 1.02;

/// Output scale restoring audible amplitude for brown noise
const BROWN_SCALE: f32 = 3.5;

// ============================================================================
// Noise Color
// ============================================================================

/// Spectral type of a noise buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoiseColor {
    /// Flat spectrum
    White,
    /// Roughly 1/f
    Pink,
    /// Roughly 1/f²
    Brown,
}

impl fmt::Display for NoiseColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoiseColor::White => write!(f, "white"),
            NoiseColor::Pink => write!(f, "pink"),
            NoiseColor::Brown => write!(f, "brown"),
        }
    }
}

// ============================================================================
// Generation
// ============================================================================

/// Fill a new buffer with `duration_secs` of noise at `sample_rate`.
///
/// Each sample draws a fresh uniform value in [-1, 1) from `rng`:
/// - white: the draw itself
/// - pink: `y = 0.997·y + 0.05·x`
/// - brown: `y = (y + 0.02·x) / 1.02`, emitted as `3.5·y`
pub fn generate_buffer<R: Rng + ?Sized>(
    color: NoiseColor,
    duration_secs: f32,
    sample_rate: u32,
    rng: &mut R,
) -> Vec<f32> {
    let length = (duration_secs.max(0.0) * sample_rate as f32) as usize;
    let mut data = Vec::with_capacity(length);
    let mut last_out = 0.0_f32;

    for _ in 0..length {
        let white = rng.gen::<f32>() * 2.0 - 1.0;
        let sample = match color {
            NoiseColor::White => white,
            NoiseColor::Pink => {
                last_out = PINK_FEEDBACK * last_out + PINK_INPUT * white;
                last_out
            }
            NoiseColor::Brown => {
                last_out = (last_out + BROWN_INPUT * white) / BROWN_LEAK;
                last_out * BROWN_SCALE
            }
        };
        data.push(sample);
    }

    data
}

/// Noise buffer factory with an owned random source
///
/// Production code uses [`NoiseSynthesizer::new`], backed by a fast
/// non-cryptographic generator seeded from the OS. Tests use
/// [`NoiseSynthesizer::seeded`] for reproducible statistics.
pub struct NoiseSynthesizer {
    rng: Box<dyn RngCore + Send>,
}

impl NoiseSynthesizer {
    /// Create a synthesizer seeded from system entropy
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_entropy())
    }

    /// Create a synthesizer with a deterministic seed
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Create a synthesizer around any random source
    pub fn with_rng<R: RngCore + Send + 'static>(rng: R) -> Self {
        Self { rng: Box::new(rng) }
    }

    /// Generate a buffer of the requested color
    pub fn generate_buffer(
        &mut self,
        color: NoiseColor,
        duration_secs: f32,
        sample_rate: u32,
    ) -> Vec<f32> {
        generate_buffer(color, duration_secs, sample_rate, self.rng.as_mut())
    }
}

impl Default for NoiseSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NoiseSynthesizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoiseSynthesizer").finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: u32 = 44100;

    fn peak(data: &[f32]) -> f32 {
        data.iter().map(|s| s.abs()).fold(0.0, f32::max)
    }

    fn rms(data: &[f32]) -> f32 {
        let sum: f64 = data.iter().map(|&s| (s as f64) * (s as f64)).sum();
        (sum / data.len() as f64).sqrt() as f32
    }

    /// RMS of the first difference relative to signal RMS. High-frequency
    /// content pushes this up, so white noise scores far above pink/brown.
    fn roughness(data: &[f32]) -> f32 {
        let diffs: Vec<f32> = data.windows(2).map(|w| w[1] - w[0]).collect();
        rms(&diffs) / rms(data)
    }

    #[test]
    fn test_buffer_length() {
        let mut synth = NoiseSynthesizer::seeded(1);
        let data = synth.generate_buffer(NoiseColor::White, 2.0, SAMPLE_RATE);
        assert_eq!(data.len(), 88200);

        let data = synth.generate_buffer(NoiseColor::Pink, 0.5, 48000);
        assert_eq!(data.len(), 24000);
    }

    #[test]
    fn test_zero_duration_is_empty() {
        let mut synth = NoiseSynthesizer::seeded(1);
        assert!(synth
            .generate_buffer(NoiseColor::Brown, 0.0, SAMPLE_RATE)
            .is_empty());
    }

    #[test]
    fn test_white_within_unit_range() {
        let mut synth = NoiseSynthesizer::seeded(7);
        let data = synth.generate_buffer(NoiseColor::White, 2.0, SAMPLE_RATE);
        assert!(data.iter().all(|s| (-1.0..=1.0).contains(s)));
        // A uniform draw reaches close to both bounds over 88k samples
        assert!(peak(&data) > 0.99);
    }

    #[test]
    fn test_pink_is_bounded() {
        let mut synth = NoiseSynthesizer::seeded(11);
        let data = synth.generate_buffer(NoiseColor::Pink, 2.0, SAMPLE_RATE);
        assert!(data.iter().all(|s| s.is_finite()));
        assert!(peak(&data) < 2.5, "pink peak {}", peak(&data));
        assert!(rms(&data) > 0.05);
    }

    #[test]
    fn test_brown_is_bounded() {
        let mut synth = NoiseSynthesizer::seeded(23);
        let data = synth.generate_buffer(NoiseColor::Brown, 2.0, SAMPLE_RATE);
        assert!(data.iter().all(|s| s.is_finite()));
        assert!(peak(&data) <= 1.05, "brown peak {}", peak(&data));
        assert!(rms(&data) > 0.05);
    }

    #[test]
    fn test_colored_noise_has_less_high_frequency_energy() {
        let mut synth = NoiseSynthesizer::seeded(5);
        let white = synth.generate_buffer(NoiseColor::White, 1.0, SAMPLE_RATE);
        let pink = synth.generate_buffer(NoiseColor::Pink, 1.0, SAMPLE_RATE);
        let brown = synth.generate_buffer(NoiseColor::Brown, 1.0, SAMPLE_RATE);

        let white_r = roughness(&white);
        assert!(white_r > 5.0 * roughness(&pink));
        assert!(white_r > 5.0 * roughness(&brown));
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let a = NoiseSynthesizer::seeded(42).generate_buffer(NoiseColor::Pink, 0.1, SAMPLE_RATE);
        let b = NoiseSynthesizer::seeded(42).generate_buffer(NoiseColor::Pink, 0.1, SAMPLE_RATE);
        assert_eq!(a, b);
    }

    #[test]
    fn test_entropy_synth_produces_noise() {
        let mut synth = NoiseSynthesizer::new();
        let data = synth.generate_buffer(NoiseColor::White, 0.1, SAMPLE_RATE);
        assert!(rms(&data) > 0.1);
    }

    #[test]
    fn test_noise_color_display() {
        assert_eq!(NoiseColor::White.to_string(), "white");
        assert_eq!(NoiseColor::Brown.to_string(), "brown");
    }
}
