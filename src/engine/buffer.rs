//! Audio Buffer
//!
//! Non-interleaved `f32` buffers produced by the mixer graph, plus the level
//! measurements used to check rendered output.

// ============================================================================
// Helper Functions
// ============================================================================

/// Convert linear amplitude to decibels
///
/// # Returns
/// Value in decibels. Returns -f32::INFINITY for zero input.
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    if linear <= 0.0 {
        f32::NEG_INFINITY
    } else {
        20.0 * linear.log10()
    }
}

// ============================================================================
// Channel Layout
// ============================================================================

/// Audio channel configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChannelLayout {
    /// Single channel (mono)
    Mono,
    /// Two channels (stereo: left, right)
    #[default]
    Stereo,
}

impl ChannelLayout {
    /// Returns the number of channels for this layout
    pub fn num_channels(&self) -> usize {
        match self {
            ChannelLayout::Mono => 1,
            ChannelLayout::Stereo => 2,
        }
    }
}

// ============================================================================
// Audio Buffer
// ============================================================================

/// Block of rendered audio
///
/// Each channel is a separate `Vec<f32>`; channel 0 is left, 1 is right.
#[derive(Debug, Clone)]
pub struct AudioBuffer {
    /// Sample data: outer Vec is channels, inner Vec is samples
    pub samples: Vec<Vec<f32>>,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl AudioBuffer {
    /// Create a silent buffer
    ///
    /// # Arguments
    /// * `num_samples` - Number of samples per channel
    /// * `layout` - Channel configuration (Mono or Stereo)
    /// * `sample_rate` - Sample rate in Hz
    pub fn new(num_samples: usize, layout: ChannelLayout, sample_rate: u32) -> Self {
        Self {
            samples: vec![vec![0.0_f32; num_samples]; layout.num_channels()],
            sample_rate,
        }
    }

    /// Convert the buffer to interleaved format (L, R, L, R, ...)
    pub fn to_interleaved(&self) -> Vec<f32> {
        let num_channels = self.num_channels();
        let num_samples = self.num_samples();
        let mut interleaved = Vec::with_capacity(num_channels * num_samples);

        for sample_idx in 0..num_samples {
            for channel in &self.samples {
                interleaved.push(channel[sample_idx]);
            }
        }

        interleaved
    }

    #[inline]
    pub fn num_channels(&self) -> usize {
        self.samples.len()
    }

    /// Number of samples per channel
    #[inline]
    pub fn num_samples(&self) -> usize {
        self.samples.first().map(|ch| ch.len()).unwrap_or(0)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.num_samples() == 0
    }

    /// Duration in seconds
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.num_samples() as f64 / self.sample_rate as f64
    }

    /// # Panics
    /// Panics if the channel index is out of bounds
    #[inline]
    pub fn channel(&self, index: usize) -> &[f32] {
        &self.samples[index]
    }

    /// # Panics
    /// Panics if the channel index is out of bounds
    #[inline]
    pub fn channel_mut(&mut self, index: usize) -> &mut [f32] {
        &mut self.samples[index]
    }

    /// Mutable access to the left and right channels at once
    ///
    /// # Panics
    /// Panics if the buffer is not stereo
    pub fn stereo_mut(&mut self) -> (&mut [f32], &mut [f32]) {
        let (left, right) = self.samples.split_at_mut(1);
        (&mut left[0], &mut right[0])
    }

    /// Append another buffer with the same layout
    pub fn append(&mut self, other: &AudioBuffer) {
        for (dst, src) in self.samples.iter_mut().zip(other.samples.iter()) {
            dst.extend_from_slice(src);
        }
    }

    /// Peak absolute sample value of one channel
    pub fn peak(&self, channel: usize) -> f32 {
        self.samples[channel]
            .iter()
            .map(|s| s.abs())
            .fold(0.0_f32, f32::max)
    }

    /// Linear RMS of one channel. Zero for empty buffers.
    pub fn rms(&self, channel: usize) -> f32 {
        let data = &self.samples[channel];
        if data.is_empty() {
            return 0.0;
        }
        let sum_squares: f64 = data.iter().map(|&s| (s as f64) * (s as f64)).sum();
        (sum_squares / data.len() as f64).sqrt() as f32
    }

    /// RMS of one channel in dB
    pub fn rms_db(&self, channel: usize) -> f32 {
        linear_to_db(self.rms(channel))
    }

    /// True if every sample in every channel is exactly zero
    pub fn is_silent(&self) -> bool {
        self.samples.iter().flatten().all(|&s| s == 0.0)
    }
}
