//! Mixer parameter state
//!
//! The five channels are fixed for the life of the process. `MixerState`
//! stores them in an array indexed by [`ChannelId`], so the key set can never
//! grow or shrink. All transitions clamp into range and return a new state.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::dsp::{NoiseColor, MAX_CUTOFF_HZ, MIN_CUTOFF_HZ};
use crate::error::MixerError;

// ============================================================================
// Defaults
// ============================================================================

/// Master gain after startup or reset
pub const DEFAULT_MASTER: f32 = 0.7;

/// Channel gain after startup or reset
pub const DEFAULT_GAIN: f32 = 0.6;

/// Channel pan after startup or reset
pub const DEFAULT_PAN: f32 = 0.0;

/// Channel filter cutoff after startup or reset
pub const DEFAULT_FILTER_HZ: f32 = 8000.0;

// ============================================================================
// Channel Identity
// ============================================================================

/// One of the five fixed ambient channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelId {
    Rain,
    Wind,
    Fire,
    Waves,
    Cafe,
}

impl ChannelId {
    /// Every channel, in display order
    pub const ALL: [ChannelId; 5] = [
        ChannelId::Rain,
        ChannelId::Wind,
        ChannelId::Fire,
        ChannelId::Waves,
        ChannelId::Cafe,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelId::Rain => "rain",
            ChannelId::Wind => "wind",
            ChannelId::Fire => "fire",
            ChannelId::Waves => "waves",
            ChannelId::Cafe => "cafe",
        }
    }

    /// Position of this channel in [`ChannelId::ALL`]
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Static definition (label, color, noise type) for this channel
    pub fn definition(&self) -> &'static ChannelDefinition {
        &CHANNEL_DEFINITIONS[self.index()]
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChannelId {
    type Err = MixerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChannelId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| MixerError::UnknownChannel {
                name: s.to_string(),
            })
    }
}

/// Immutable description of a channel
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelDefinition {
    pub id: ChannelId,
    pub label: &'static str,
    /// UI accent color
    pub color: &'static str,
    pub noise: NoiseColor,
}

/// Definitions in [`ChannelId::ALL`] order
pub static CHANNEL_DEFINITIONS: [ChannelDefinition; 5] = [
    ChannelDefinition {
        id: ChannelId::Rain,
        label: "Rain",
        color: "#0d6efd",
        noise: NoiseColor::White,
    },
    ChannelDefinition {
        id: ChannelId::Wind,
        label: "Wind",
        color: "#20c997",
        noise: NoiseColor::Pink,
    },
    ChannelDefinition {
        id: ChannelId::Fire,
        label: "Fire",
        color: "#dc3545",
        noise: NoiseColor::Brown,
    },
    ChannelDefinition {
        id: ChannelId::Waves,
        label: "Waves",
        color: "#0dcaf0",
        noise: NoiseColor::Pink,
    },
    ChannelDefinition {
        id: ChannelId::Cafe,
        label: "Cafe",
        color: "#6c757d",
        noise: NoiseColor::Brown,
    },
];

// ============================================================================
// Parameter Ranges
// ============================================================================

pub fn clamp_gain(value: f32) -> f32 {
    clamp_or(value, 0.0, 1.0, 0.0)
}

pub fn clamp_pan(value: f32) -> f32 {
    clamp_or(value, -1.0, 1.0, 0.0)
}

pub fn clamp_filter(value: f32) -> f32 {
    clamp_or(value, MIN_CUTOFF_HZ, MAX_CUTOFF_HZ, MIN_CUTOFF_HZ)
}

/// `f32::clamp` passes NaN through; map it to `fallback` instead
fn clamp_or(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(min, max)
    }
}

// ============================================================================
// Channel State
// ============================================================================

/// Live-adjustable parameters of one channel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelState {
    /// Linear gain in [0, 1]
    pub gain: f32,
    /// Stereo position in [-1, 1]
    pub pan: f32,
    /// Low-pass cutoff in [200, 12000] Hz
    #[serde(rename = "filter")]
    pub filter_cutoff_hz: f32,
}

impl ChannelState {
    /// Return a copy with every field clamped into range
    pub fn clamped(self) -> Self {
        Self {
            gain: clamp_gain(self.gain),
            pan: clamp_pan(self.pan),
            filter_cutoff_hz: clamp_filter(self.filter_cutoff_hz),
        }
    }
}

impl Default for ChannelState {
    fn default() -> Self {
        Self {
            gain: DEFAULT_GAIN,
            pan: DEFAULT_PAN,
            filter_cutoff_hz: DEFAULT_FILTER_HZ,
        }
    }
}

// ============================================================================
// Parameter Changes
// ============================================================================

/// A single command from the control surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamChange {
    Master(f32),
    Gain(ChannelId, f32),
    Pan(ChannelId, f32),
    Filter(ChannelId, f32),
}

impl ParamChange {
    /// Build a change from textual target/parameter names.
    ///
    /// `target` is `master` or a channel name. `master` only accepts `gain`.
    /// Non-finite values are rejected; finite ones are clamped when applied.
    pub fn parse(target: &str, param: &str, value: f32) -> crate::error::Result<Self> {
        if !value.is_finite() {
            return Err(MixerError::InvalidParameterValue {
                name: format!("{}.{}", target, param),
                value: value.to_string(),
            });
        }

        if target == "master" {
            return match param {
                "gain" => Ok(ParamChange::Master(value)),
                other => Err(MixerError::UnknownParameter {
                    name: format!("master.{}", other),
                }),
            };
        }

        let id: ChannelId = target.parse()?;
        match param {
            "gain" => Ok(ParamChange::Gain(id, value)),
            "pan" => Ok(ParamChange::Pan(id, value)),
            "filter" => Ok(ParamChange::Filter(id, value)),
            other => Err(MixerError::UnknownParameter {
                name: other.to_string(),
            }),
        }
    }
}

// ============================================================================
// Mixer State
// ============================================================================

/// Master gain plus the five channel states
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixerState {
    master: f32,
    channels: [ChannelState; 5],
}

impl Default for MixerState {
    fn default() -> Self {
        Self {
            master: DEFAULT_MASTER,
            channels: [ChannelState::default(); 5],
        }
    }
}

impl MixerState {
    pub fn master(&self) -> f32 {
        self.master
    }

    pub fn channel(&self, id: ChannelId) -> &ChannelState {
        &self.channels[id.index()]
    }

    /// Iterate channels in [`ChannelId::ALL`] order
    pub fn channels(&self) -> impl Iterator<Item = (ChannelId, &ChannelState)> {
        ChannelId::ALL.into_iter().zip(self.channels.iter())
    }

    /// Apply one clamped change, returning the new state
    pub fn apply(&self, change: ParamChange) -> MixerState {
        let mut next = *self;
        match change {
            ParamChange::Master(v) => next.master = clamp_gain(v),
            ParamChange::Gain(id, v) => next.channels[id.index()].gain = clamp_gain(v),
            ParamChange::Pan(id, v) => next.channels[id.index()].pan = clamp_pan(v),
            ParamChange::Filter(id, v) => {
                next.channels[id.index()].filter_cutoff_hz = clamp_filter(v)
            }
        }
        next
    }

    /// Shallow top-level merge of a parsed snapshot.
    ///
    /// `master` replaces if present. A present `channels` table replaces the
    /// whole table: named channels take the snapshot entry, the rest fall back
    /// to defaults. Unknown channel names are dropped.
    pub fn merge(&self, snapshot: MixerSnapshot) -> MixerState {
        let mut next = *self;
        if let Some(master) = snapshot.master {
            next.master = clamp_gain(master);
        }
        if let Some(channels) = snapshot.channels {
            let mut table = [ChannelState::default(); 5];
            for (name, state) in channels {
                match name.parse::<ChannelId>() {
                    Ok(id) => table[id.index()] = state.clamped(),
                    Err(_) => log::warn!("Ignoring unknown channel '{}' in snapshot", name),
                }
            }
            next.channels = table;
        }
        next
    }
}

impl Serialize for MixerState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct Channels<'a>(&'a MixerState);

        impl Serialize for Channels<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(ChannelId::ALL.len()))?;
                for (id, state) in self.0.channels() {
                    map.serialize_entry(id.as_str(), state)?;
                }
                map.end()
            }
        }

        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("master", &self.master)?;
        map.serialize_entry("channels", &Channels(self))?;
        map.end()
    }
}

/// Parsed form of a persisted snapshot
///
/// Either top-level field may be missing. Channel names are kept as strings
/// so unknown names can be skipped rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MixerSnapshot {
    #[serde(default)]
    pub master: Option<f32>,
    #[serde(default)]
    pub channels: Option<BTreeMap<String, ChannelState>>,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test]
    fn test_defaults() {
        let state = MixerState::default();
        assert_eq!(state.master(), 0.7);
        for (_, ch) in state.channels() {
            assert_eq!(
                *ch,
                ChannelState {
                    gain: 0.6,
                    pan: 0.0,
                    filter_cutoff_hz: 8000.0
                }
            );
        }
    }

    #[test]
    fn test_channel_ids_are_fixed() {
        let state = MixerState::default();
        let ids: Vec<&str> = state.channels().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["rain", "wind", "fire", "waves", "cafe"]);
    }

    #[test]
    fn test_channel_definitions_match_ids() {
        for id in ChannelId::ALL {
            assert_eq!(id.definition().id, id);
        }
        assert_eq!(ChannelId::Rain.definition().noise, NoiseColor::White);
        assert_eq!(ChannelId::Wind.definition().noise, NoiseColor::Pink);
        assert_eq!(ChannelId::Fire.definition().noise, NoiseColor::Brown);
        assert_eq!(ChannelId::Waves.definition().noise, NoiseColor::Pink);
        assert_eq!(ChannelId::Cafe.definition().noise, NoiseColor::Brown);
    }

    #[test]
    fn test_channel_id_parse() {
        assert_eq!("waves".parse::<ChannelId>().unwrap(), ChannelId::Waves);
        let err = "thunder".parse::<ChannelId>().unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_CHANNEL");
    }

    #[test_case(ParamChange::Gain(ChannelId::Rain, 1.5), 1.0 ; "gain above range")]
    #[test_case(ParamChange::Gain(ChannelId::Rain, -0.2), 0.0 ; "gain below range")]
    #[test_case(ParamChange::Pan(ChannelId::Rain, -2.0), -1.0 ; "pan below range")]
    #[test_case(ParamChange::Pan(ChannelId::Rain, 4.0), 1.0 ; "pan above range")]
    #[test_case(ParamChange::Filter(ChannelId::Rain, 50.0), 200.0 ; "filter below range")]
    #[test_case(ParamChange::Filter(ChannelId::Rain, 99999.0), 12000.0 ; "filter above range")]
    #[test_case(ParamChange::Filter(ChannelId::Rain, 3000.0), 3000.0 ; "filter in range")]
    fn test_apply_clamps(change: ParamChange, expected: f32) {
        let state = MixerState::default().apply(change);
        let rain = state.channel(ChannelId::Rain);
        let stored = match change {
            ParamChange::Gain(..) => rain.gain,
            ParamChange::Pan(..) => rain.pan,
            ParamChange::Filter(..) => rain.filter_cutoff_hz,
            ParamChange::Master(_) => state.master(),
        };
        assert_eq!(stored, expected);
    }

    #[test]
    fn test_apply_master_clamps() {
        assert_eq!(MixerState::default().apply(ParamChange::Master(2.0)).master(), 1.0);
        assert_eq!(MixerState::default().apply(ParamChange::Master(f32::NAN)).master(), 0.0);
    }

    #[test]
    fn test_apply_is_pure() {
        let before = MixerState::default();
        let after = before.apply(ParamChange::Gain(ChannelId::Fire, 0.1));
        assert_eq!(before.channel(ChannelId::Fire).gain, 0.6);
        assert_eq!(after.channel(ChannelId::Fire).gain, 0.1);
        assert_eq!(after.channel(ChannelId::Rain).gain, 0.6);
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(MixerState::default()).unwrap();
        assert_eq!(json["master"].as_f64().unwrap() as f32, 0.7);
        let channels = json["channels"].as_object().unwrap();
        assert_eq!(channels.len(), 5);
        assert_eq!(channels["cafe"]["filter"].as_f64().unwrap(), 8000.0);
    }

    #[test]
    fn test_merge_round_trip() {
        let state = MixerState::default()
            .apply(ParamChange::Master(0.42))
            .apply(ParamChange::Pan(ChannelId::Wind, 0.25));
        let text = serde_json::to_string(&state).unwrap();
        let snapshot: MixerSnapshot = serde_json::from_str(&text).unwrap();

        let restored = MixerState::default().merge(snapshot);
        assert_eq!(restored, state);
    }

    #[test]
    fn test_merge_missing_master_keeps_current() {
        let current = MixerState::default().apply(ParamChange::Master(0.9));
        let snapshot: MixerSnapshot = serde_json::from_str(r#"{"channels": {}}"#).unwrap();
        assert_eq!(current.merge(snapshot).master(), 0.9);
    }

    #[test]
    fn test_merge_missing_channels_keeps_current() {
        let current = MixerState::default().apply(ParamChange::Gain(ChannelId::Cafe, 0.2));
        let snapshot: MixerSnapshot = serde_json::from_str(r#"{"master": 0.3}"#).unwrap();
        let merged = current.merge(snapshot);
        assert_eq!(merged.master(), 0.3);
        assert_eq!(merged.channel(ChannelId::Cafe).gain, 0.2);
    }

    #[test]
    fn test_merge_replaces_whole_channel_table() {
        let current = MixerState::default().apply(ParamChange::Gain(ChannelId::Cafe, 0.2));
        let snapshot: MixerSnapshot = serde_json::from_str(
            r#"{"channels": {"rain": {"gain": 0.1, "pan": 0.5, "filter": 400}}}"#,
        )
        .unwrap();
        let merged = current.merge(snapshot);
        assert_eq!(
            *merged.channel(ChannelId::Rain),
            ChannelState {
                gain: 0.1,
                pan: 0.5,
                filter_cutoff_hz: 400.0
            }
        );
        // Not merged per channel: cafe is not carried over from `current`
        assert_eq!(*merged.channel(ChannelId::Cafe), ChannelState::default());
    }

    #[test]
    fn test_merge_ignores_unknown_channels() {
        let snapshot: MixerSnapshot = serde_json::from_str(
            r#"{"channels": {"thunder": {"gain": 1, "pan": 0, "filter": 500}}}"#,
        )
        .unwrap();
        let merged = MixerState::default().merge(snapshot);
        assert_eq!(merged.channels().count(), 5);
        assert!(merged.channels().all(|(id, _)| id.as_str() != "thunder"));
    }

    #[test]
    fn test_merge_clamps_out_of_range_values() {
        let snapshot: MixerSnapshot = serde_json::from_str(
            r#"{"master": 3, "channels": {"fire": {"gain": 2, "pan": -5, "filter": 10}}}"#,
        )
        .unwrap();
        let merged = MixerState::default().merge(snapshot);
        assert_eq!(merged.master(), 1.0);
        assert_eq!(
            *merged.channel(ChannelId::Fire),
            ChannelState {
                gain: 1.0,
                pan: -1.0,
                filter_cutoff_hz: 200.0
            }
        );
    }

    #[test]
    fn test_param_change_parse() {
        assert_eq!(
            ParamChange::parse("rain", "pan", -0.5).unwrap(),
            ParamChange::Pan(ChannelId::Rain, -0.5)
        );
        assert_eq!(
            ParamChange::parse("master", "gain", 0.5).unwrap(),
            ParamChange::Master(0.5)
        );
        assert!(ParamChange::parse("master", "pan", 0.5).is_err());
        assert!(ParamChange::parse("rain", "volume", 0.5).is_err());
        assert!(ParamChange::parse("thunder", "gain", 0.5).is_err());
    }

    #[test]
    fn test_param_change_rejects_non_finite() {
        let err = ParamChange::parse("wind", "gain", f32::NAN).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_PARAMETER_VALUE");
        assert!(ParamChange::parse("wind", "filter", f32::INFINITY).is_err());
    }
}
