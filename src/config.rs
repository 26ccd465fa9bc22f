//! Engine configuration
//!
//! Tunables for the live graph. Every field has a default so a partial JSON
//! file only overrides what it names.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MixerError, Result};

/// Default sample rate used for the offline context (44.1kHz)
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Default length of each looping noise buffer in seconds
pub const DEFAULT_LOOP_SECONDS: f32 = 2.0;

/// Default time constant for smoothed gain transitions (10ms)
pub const DEFAULT_SMOOTHING_TIME_CONSTANT: f32 = 0.01;

/// Longest noise loop a config may request
pub const MAX_LOOP_SECONDS: f32 = 60.0;

/// Highest sample rate a config may request
pub const MAX_SAMPLE_RATE: u32 = 384_000;

/// Longest time constant a config may request
pub const MAX_SMOOTHING_TIME_CONSTANT: f32 = 10.0;

/// Configuration for the mixer engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Sample rate requested from the audio backend
    pub sample_rate: u32,
    /// Length of each generated noise loop
    pub loop_seconds: f32,
    /// Time constant of the exponential gain ramp, in seconds
    pub smoothing_time_constant: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            loop_seconds: DEFAULT_LOOP_SECONDS,
            smoothing_time_constant: DEFAULT_SMOOTHING_TIME_CONSTANT,
        }
    }
}

impl EngineConfig {
    /// Load a configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| MixerError::FileReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: EngineConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field is usable by the graph.
    ///
    /// - `sample_rate` in 1..=384000
    /// - `loop_seconds` finite, > 0 and at most 60
    /// - `smoothing_time_constant` finite, in [0, 10]
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 || self.sample_rate > MAX_SAMPLE_RATE {
            return Err(invalid(
                "sample_rate",
                format!("must be between 1 and {} Hz, got {}", MAX_SAMPLE_RATE, self.sample_rate),
            ));
        }
        if !self.loop_seconds.is_finite()
            || self.loop_seconds <= 0.0
            || self.loop_seconds > MAX_LOOP_SECONDS
        {
            return Err(invalid(
                "loop_seconds",
                format!("must be in (0, {}] seconds, got {}", MAX_LOOP_SECONDS, self.loop_seconds),
            ));
        }
        if !self.smoothing_time_constant.is_finite()
            || self.smoothing_time_constant < 0.0
            || self.smoothing_time_constant > MAX_SMOOTHING_TIME_CONSTANT
        {
            return Err(invalid(
                "smoothing_time_constant",
                format!(
                    "must be in [0, {}] seconds, got {}",
                    MAX_SMOOTHING_TIME_CONSTANT, self.smoothing_time_constant
                ),
            ));
        }
        Ok(())
    }
}

fn invalid(name: &str, reason: String) -> MixerError {
    MixerError::InvalidConfig {
        name: name.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.sample_rate, 44100);
        assert_eq!(config.loop_seconds, 2.0);
        assert_eq!(config.smoothing_time_constant, 0.01);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"loop_seconds": 4.5}"#).unwrap();
        assert_eq!(config.loop_seconds, 4.5);
        assert_eq!(config.sample_rate, DEFAULT_SAMPLE_RATE);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.json");
        fs::write(&path, r#"{"sample_rate": 48000}"#).unwrap();

        let config = EngineConfig::load(&path).unwrap();
        assert_eq!(config.sample_rate, 48000);
        assert_eq!(config.loop_seconds, DEFAULT_LOOP_SECONDS);
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test_case(f32::INFINITY ; "infinite")]
    #[test_case(f32::NAN ; "nan")]
    #[test_case(0.0 ; "zero")]
    #[test_case(-1.0 ; "negative")]
    #[test_case(1e12 ; "huge")]
    fn test_rejects_bad_loop_seconds(loop_seconds: f32) {
        let config = EngineConfig {
            loop_seconds,
            ..EngineConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
        assert!(err.to_string().contains("loop_seconds"));
    }

    #[test_case(0 ; "zero")]
    #[test_case(10_000_000 ; "huge")]
    fn test_rejects_bad_sample_rate(sample_rate: u32) {
        let config = EngineConfig {
            sample_rate,
            ..EngineConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("sample_rate"));
    }

    #[test_case(f32::INFINITY ; "infinite")]
    #[test_case(f32::NAN ; "nan")]
    #[test_case(-0.01 ; "negative")]
    fn test_rejects_bad_smoothing(smoothing_time_constant: f32) {
        let config = EngineConfig {
            smoothing_time_constant,
            ..EngineConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("smoothing_time_constant"));
    }

    #[test]
    fn test_zero_smoothing_is_valid() {
        let config = EngineConfig {
            smoothing_time_constant: 0.0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_rejects_overflowing_loop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.json");
        // 1e39 does not fit in f32 and parses as infinity
        fs::write(&path, r#"{"loop_seconds": 1e39}"#).unwrap();

        let err = EngineConfig::load(&path).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = EngineConfig::load(&dir.path().join("absent.json")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_READ_ERROR");
    }
}
