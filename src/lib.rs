//! Ambient Mixer - procedural soundscape mixing
//!
//! Five fixed noise-based channels (rain, wind, fire, waves, cafe) are
//! synthesized, shaped and summed onto a master bus. Parameters are
//! live-adjustable and can be saved to and restored from a settings store.
//!
//! # Architecture
//!
//! - `dsp`: noise synthesis, low-pass filter, panner, smoothed parameters
//! - `engine`: channel nodes, the lazily built mixer graph, playback state
//! - `state`: mixer parameters, snapshot merge, settings persistence
//! - `mixer`: the facade the control surface talks to

pub mod cli;
pub mod config;
pub mod dsp;
pub mod engine;
pub mod error;
pub mod mixer;
pub mod state;

pub use config::EngineConfig;
pub use error::{MixerError, Result};
pub use mixer::Mixer;
