//! Ambient Mixer CLI
//!
//! Command-line interface for inspecting, editing and rendering saved mixes.

use clap::Parser;
use env_logger::Env;
use log::info;

use ambient_mixer::cli::{commands, Cli, Commands};
use ambient_mixer::EngineConfig;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    info!("Ambient Mixer v{}", env!("CARGO_PKG_VERSION"));

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    match cli.command {
        Some(cmd) => handle_command(cmd, &cli.settings, config),
        None => {
            println!("Ambient Mixer v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}

fn handle_command(cmd: Commands, settings: &std::path::Path, config: EngineConfig) -> anyhow::Result<()> {
    let result = match cmd {
        Commands::Show => commands::show(settings, config),
        Commands::Set {
            target,
            param,
            value,
        } => commands::set(settings, config, &target, &param, value),
        Commands::Reset => commands::reset(settings, config),
        Commands::Render {
            out,
            seconds,
            loop_seconds,
            sample_rate,
        } => {
            let mut config = config;
            if let Some(loop_seconds) = loop_seconds {
                config.loop_seconds = loop_seconds;
            }
            if let Some(sample_rate) = sample_rate {
                config.sample_rate = sample_rate;
            }
            config
                .validate()
                .and_then(|_| commands::render(settings, config, &out, seconds))
        }
    };

    if let Err(err) = &result {
        if let Some(suggestion) = err.recovery_suggestion() {
            eprintln!("{}", suggestion);
        }
    }
    Ok(result?)
}
