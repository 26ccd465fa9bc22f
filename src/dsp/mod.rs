//! DSP Building Blocks
//!
//! Noise synthesis and the per-channel processing stages used by the mixer
//! graph: low-pass filter, stereo panner and smoothed gain.

mod filter;
mod noise;
mod pan;
mod smoothing;

pub use filter::{OnePoleLowPass, MAX_CUTOFF_HZ, MIN_CUTOFF_HZ};
pub use noise::{generate_buffer, NoiseColor, NoiseSynthesizer};
pub use pan::StereoPanner;
pub use smoothing::SmoothedParam;
