//! WAV export of rendered audio
//!
//! Writes rendered mixes as 32-bit float WAV files.

use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};
use log::info;

use crate::engine::buffer::AudioBuffer;
use crate::error::Result;

/// Write `buffer` to `path` as an interleaved 32-bit float WAV
pub fn export_wav(buffer: &AudioBuffer, path: &Path) -> Result<()> {
    let spec = WavSpec {
        channels: buffer.num_channels() as u16,
        sample_rate: buffer.sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };

    let mut writer = WavWriter::create(path, spec)?;
    for sample in buffer.to_interleaved() {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    info!(
        "Exported {:.2}s of audio to {}",
        buffer.duration_secs(),
        path.display()
    );
    Ok(())
}
