use anyhow::Result;
use clap::{CommandFactory, Parser};
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use voxlate::app::{RunOptions, run_listen_command, run_pipe_command};
use voxlate::audio::capture::list_devices;
use voxlate::audio::playback::list_output_devices;
use voxlate::cli::{Cli, Commands, ConfigAction};
use voxlate::config::Config;
use voxlate::diagnostics::check_dependencies;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None => {
            let config = load_config(cli.config.as_deref())?;
            let opts = RunOptions {
                device: cli.device,
                playback_device: cli.playback_device,
                source_lang: cli.source_lang,
                target_lang: cli.target_lang,
                pause_ms: cli.pause,
                threshold: cli.threshold,
                once: cli.once,
                sequential: cli.sequential,
                save_audio: cli.save_audio,
                no_play: cli.no_play,
                quiet: cli.quiet,
                verbosity: cli.verbose,
            };

            let result = if std::io::stdin().is_terminal() {
                // Mic mode
                run_listen_command(config, opts).await
            } else {
                // Pipe mode: stdin has WAV data
                run_pipe_command(config, opts).await
            };

            if let Err(e) = result {
                eprintln!("{}", format!("Error: {}", e).red());
                std::process::exit(1);
            }
        }
        Some(Commands::Devices) => {
            list_audio_devices()?;
        }
        Some(Commands::Check) => {
            let config = load_config(cli.config.as_deref())?;
            check_dependencies(&config).await;
        }
        Some(Commands::Config { action }) => {
            handle_config_command(action, cli.config.as_deref())?;
        }
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "voxlate",
                &mut std::io::stdout(),
            );
        }
    }

    Ok(())
}

/// Load configuration from file or use defaults.
///
/// Priority order:
/// 1. Custom config path from CLI (--config)
/// 2. Default config path (~/.config/voxlate/config.toml)
/// 3. Built-in defaults with environment variable overrides
fn load_config(custom_path: Option<&std::path::Path>) -> Result<Config> {
    let config = if let Some(path) = custom_path {
        Config::load(path)?
    } else {
        let default_path = Config::default_path();
        Config::load_or_default(&default_path)
    };

    // Apply environment variable overrides
    Ok(config.with_env_overrides())
}

/// List available audio input and output devices.
fn list_audio_devices() -> Result<()> {
    let inputs = list_devices()?;

    if inputs.is_empty() {
        eprintln!("No audio input devices found");
        std::process::exit(1);
    }

    println!("Input devices:");
    for (idx, device) in inputs.iter().enumerate() {
        println!("  [{}] {}", idx, device);
    }

    let outputs = list_output_devices()?;
    if !outputs.is_empty() {
        println!();
        println!("Output devices:");
        for (idx, device) in outputs.iter().enumerate() {
            println!("  [{}] {}", idx, device);
        }
    }

    Ok(())
}

/// Handle configuration commands.
fn handle_config_command(
    action: ConfigAction,
    custom_path: Option<&std::path::Path>,
) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = load_config(custom_path)?;
            match config.to_display_toml() {
                Ok(toml) => print!("{}", toml),
                Err(e) => {
                    eprintln!("{}", format!("Error: {}", e).red());
                    std::process::exit(1);
                }
            }
        }
        ConfigAction::Dump => {
            print!("{}", Config::dump_template());
        }
    }
    Ok(())
}
