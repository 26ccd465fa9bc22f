//! CLI Module
//!
//! Command-line control surface for the ambient mixer.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Ambient Mixer - procedural soundscape mixer
#[derive(Parser, Debug)]
#[command(name = "ambient-mixer")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Settings file holding the saved mix
    #[arg(short, long, global = true, default_value = "ambient-mixer.json")]
    pub settings: PathBuf,

    /// Engine configuration file (JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the saved mix
    #[command(name = "show")]
    Show,

    /// Change one parameter of the saved mix
    #[command(name = "set")]
    Set {
        /// Channel name (rain, wind, fire, waves, cafe) or "master"
        target: String,

        /// Parameter: gain, pan or filter
        param: String,

        /// New value (clamped to the parameter's range)
        #[arg(allow_hyphen_values = true)]
        value: f32,
    },

    /// Reset the saved mix to defaults
    #[command(name = "reset")]
    Reset,

    /// Render the saved mix to a WAV file
    #[command(name = "render")]
    Render {
        /// Output WAV path
        #[arg(short, long)]
        out: PathBuf,

        /// Duration in seconds
        #[arg(long, default_value_t = 10.0)]
        seconds: f32,

        /// Override the noise loop length in seconds
        #[arg(long)]
        loop_seconds: Option<f32>,

        /// Override the output sample rate
        #[arg(long)]
        sample_rate: Option<u32>,
    },
}
