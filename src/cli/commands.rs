//! CLI Command Implementations
//!
//! Each command opens a mixer over the settings file, loads the saved mix,
//! and acts on it.

use std::fmt::Write as _;
use std::path::Path;

use log::info;

use crate::config::EngineConfig;
use crate::engine::buffer::linear_to_db;
use crate::engine::{export_wav, AudioBuffer, ChannelLayout, OfflineBackend};
use crate::error::{MixerError, Result};
use crate::mixer::Mixer;
use crate::state::{FileSettingsStore, MixerState, ParamChange};

/// Frames rendered per block when exporting
const RENDER_BLOCK_FRAMES: usize = 1024;

/// Longest render the CLI will hold in memory
pub const MAX_RENDER_SECONDS: f32 = 3600.0;

/// Open a mixer over `settings` with the saved mix loaded
fn open_mixer(settings: &Path, config: EngineConfig) -> Result<Mixer> {
    let backend = Box::new(OfflineBackend::new(config.sample_rate));
    let store = Box::new(FileSettingsStore::new(settings));
    let mut mixer = Mixer::new(config, backend, store);
    if !mixer.load()? {
        info!("No saved mix in {}, using defaults", settings.display());
    }
    Ok(mixer)
}

/// Render the mixer state as a table
pub fn format_state(state: &MixerState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Master: {:.2}", state.master());
    let _ = writeln!(
        out,
        "{:<8} {:<6} {:>6} {:>6} {:>9}",
        "Channel", "Noise", "Gain", "Pan", "Filter"
    );
    for (id, ch) in state.channels() {
        let def = id.definition();
        let _ = writeln!(
            out,
            "{:<8} {:<6} {:>6.2} {:>6.2} {:>6.0} Hz",
            def.label, def.noise, ch.gain, ch.pan, ch.filter_cutoff_hz
        );
    }
    out
}

/// Print the saved mix.
pub fn show(settings: &Path, config: EngineConfig) -> Result<()> {
    let mixer = open_mixer(settings, config)?;
    print!("{}", format_state(mixer.state()));
    Ok(())
}

/// Change one parameter and save.
pub fn set(settings: &Path, config: EngineConfig, target: &str, param: &str, value: f32) -> Result<()> {
    let change = ParamChange::parse(target, param, value)?;
    info!("Setting {}.{} = {}", target, param, value);

    let mut mixer = open_mixer(settings, config)?;
    mixer.apply(change);
    mixer.save()?;

    print!("{}", format_state(mixer.state()));
    Ok(())
}

/// Reset the mix to defaults and save.
pub fn reset(settings: &Path, config: EngineConfig) -> Result<()> {
    let mut mixer = open_mixer(settings, config)?;
    mixer.reset();
    mixer.save()?;

    println!("Mix reset to defaults");
    Ok(())
}

/// Play the saved mix offline for `seconds` and write it to `out`.
pub fn render(settings: &Path, config: EngineConfig, out: &Path, seconds: f32) -> Result<()> {
    if !seconds.is_finite() || !(0.0..=MAX_RENDER_SECONDS).contains(&seconds) {
        return Err(MixerError::InvalidParameterValue {
            name: "seconds".to_string(),
            value: seconds.to_string(),
        });
    }

    let mut mixer = open_mixer(settings, config)?;
    mixer.toggle()?;

    let sample_rate = mixer
        .graph()
        .sample_rate()
        .unwrap_or(mixer.graph().config().sample_rate);
    let total_frames = (seconds * sample_rate as f32) as usize;

    let mut rendered = AudioBuffer::new(0, ChannelLayout::Stereo, sample_rate);
    let mut remaining = total_frames;
    while remaining > 0 {
        let frames = remaining.min(RENDER_BLOCK_FRAMES);
        rendered.append(&mixer.render(frames));
        remaining -= frames;
    }

    export_wav(&rendered, out)?;
    println!(
        "Rendered {:.1}s to {} (peak {:.1} dB, RMS L {:.1} dB, R {:.1} dB)",
        rendered.duration_secs(),
        out.display(),
        linear_to_db(rendered.peak(0).max(rendered.peak(1))),
        rendered.rms_db(0),
        rendered.rms_db(1),
    );
    Ok(())
}
