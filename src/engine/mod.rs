//! Audio Engine Module
//!
//! The live side of the mixer:
//! - Platform audio context seam
//! - Channel nodes and the lazily built mixer graph
//! - Playback state machine
//! - Rendered buffers and WAV export

pub mod buffer;
pub mod channel;
pub mod context;
pub mod graph;
pub mod io;
pub mod transport;

pub use buffer::{AudioBuffer, ChannelLayout};
pub use channel::{ChannelNode, LoopingSource};
pub use context::{AudioBackend, AudioContext, ContextState, OfflineBackend, OfflineContext};
pub use graph::MixerGraph;
pub use io::export_wav;
pub use transport::{PlaybackController, PlaybackStatus};
