//! Playback State Machine
//!
//! Whole-mixer play/pause. Every channel starts and stops together; there is
//! no per-channel pause at this level.
//!
//! ```text
//!   Idle ──toggle──▶ Running ◀──toggle──▶ Stopped
//! ```
//!
//! `Idle` means the graph has not been built. Leaving it builds the graph,
//! which creates the platform audio context, so the first `toggle` must come
//! from a user action.

use std::fmt;

use log::debug;

use crate::engine::graph::MixerGraph;
use crate::error::Result;
use crate::state::mixer_state::MixerState;

/// Playback states of the whole mixer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackStatus {
    /// Graph not built yet (default state)
    #[default]
    Idle,
    /// Graph built, no channel playing
    Stopped,
    /// Every channel playing
    Running,
}

impl fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackStatus::Idle => write!(f, "Idle"),
            PlaybackStatus::Stopped => write!(f, "Stopped"),
            PlaybackStatus::Running => write!(f, "Running"),
        }
    }
}

/// Coordinates start/stop of the whole graph
#[derive(Debug, Clone, Default)]
pub struct PlaybackController {
    status: PlaybackStatus,
}

impl PlaybackController {
    /// Create a controller in the `Idle` state
    ///
    /// # Example
    /// ```
    /// use ambient_mixer::engine::{PlaybackController, PlaybackStatus};
    /// let controller = PlaybackController::new();
    /// assert_eq!(controller.status(), PlaybackStatus::Idle);
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip between playing and not playing.
    ///
    /// State transitions:
    /// - Idle -> Running: build graph, resume context, start every channel
    /// - Stopped -> Running: resume context if suspended, start every channel
    /// - Running -> Stopped: stop every channel
    ///
    /// Build and resume errors propagate. If the build succeeded but resume
    /// failed the controller is left in `Stopped`.
    pub fn toggle(&mut self, graph: &mut MixerGraph, state: &MixerState) -> Result<PlaybackStatus> {
        match self.status {
            PlaybackStatus::Idle | PlaybackStatus::Stopped => {
                graph.build(state)?;
                if self.status == PlaybackStatus::Idle {
                    self.status = PlaybackStatus::Stopped;
                    debug!("[TRANSPORT] Graph built");
                }

                graph.resume_if_suspended()?;
                graph.start_all();
                self.status = PlaybackStatus::Running;
                debug!("[TRANSPORT] Running");
            }
            PlaybackStatus::Running => {
                graph.stop_all();
                self.status = PlaybackStatus::Stopped;
                debug!("[TRANSPORT] Stopped");
            }
        }
        Ok(self.status)
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == PlaybackStatus::Running
    }

    pub fn is_idle(&self) -> bool {
        self.status == PlaybackStatus::Idle
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
