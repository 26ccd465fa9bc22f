//! Platform audio context
//!
//! The platform decides when audio may play. A context is created on demand
//! and may start out suspended until a user action resumes it. This module
//! defines the seam and an in-process implementation used for offline
//! rendering and tests.

use std::fmt;

use log::debug;

use crate::error::Result;

/// Whether the platform is currently rendering audio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContextState {
    /// Created but not yet allowed to render
    #[default]
    Suspended,
    /// Rendering
    Running,
}

impl fmt::Display for ContextState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextState::Suspended => write!(f, "Suspended"),
            ContextState::Running => write!(f, "Running"),
        }
    }
}

/// A live platform audio context
pub trait AudioContext: Send {
    /// Output sample rate in Hz
    fn sample_rate(&self) -> u32;

    fn state(&self) -> ContextState;

    /// Ask the platform to start rendering. Must be called from a user action.
    fn resume(&mut self) -> Result<()>;
}

/// Factory for audio contexts
pub trait AudioBackend: Send {
    /// Create the context. Called once, on first graph build.
    fn create_context(&mut self) -> Result<Box<dyn AudioContext>>;
}

// ============================================================================
// Offline implementation
// ============================================================================

/// Context that renders in-process, driven by explicit `render` calls
///
/// Starts suspended, like a gesture-gated platform context.
#[derive(Debug, Clone)]
pub struct OfflineContext {
    sample_rate: u32,
    state: ContextState,
}

impl OfflineContext {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            state: ContextState::Suspended,
        }
    }
}

impl AudioContext for OfflineContext {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn state(&self) -> ContextState {
        self.state
    }

    fn resume(&mut self) -> Result<()> {
        debug!("[CONTEXT] Offline context resumed at {} Hz", self.sample_rate);
        self.state = ContextState::Running;
        Ok(())
    }
}

/// Backend producing [`OfflineContext`]s
#[derive(Debug, Clone)]
pub struct OfflineBackend {
    sample_rate: u32,
}

impl OfflineBackend {
    pub fn new(sample_rate: u32) -> Self {
        Self { sample_rate }
    }
}

impl AudioBackend for OfflineBackend {
    fn create_context(&mut self) -> Result<Box<dyn AudioContext>> {
        Ok(Box::new(OfflineContext::new(self.sample_rate)))
    }
}
