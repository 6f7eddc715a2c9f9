//! Command-line interface for voxlate
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Hands-free speech translator for the command line
#[derive(Parser, Debug)]
#[command(
    name = "voxlate",
    version,
    about = "Hands-free speech translator for the command line"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress output (quiet mode)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose output (-v: level meter + results, -vv: full diagnostics)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Audio input device (see `voxlate devices`)
    #[arg(long, value_name = "DEVICE")]
    pub device: Option<String>,

    /// Audio output device for playback
    #[arg(long, value_name = "DEVICE")]
    pub playback_device: Option<String>,

    /// Language spoken on the microphone (default: ru). Use "auto" to let the service detect it
    #[arg(short = 's', long, value_name = "LANG")]
    pub source_lang: Option<String>,

    /// Language to speak back (default: en)
    #[arg(short = 't', long, value_name = "LANG")]
    pub target_lang: Option<String>,

    /// Silence needed to end a capture (default: 2s). Examples: 2s, 1500ms
    #[arg(long, value_name = "DURATION", value_parser = parse_duration_ms)]
    pub pause: Option<u32>,

    /// RMS speech threshold override (0.0-1.0)
    #[arg(long, value_name = "LEVEL")]
    pub threshold: Option<f32>,

    /// Exit after the first utterance (default: keep listening)
    #[arg(long)]
    pub once: bool,

    /// Wait for each utterance to finish playing before listening again
    #[arg(long)]
    pub sequential: bool,

    /// Save the synthesized audio to this file
    #[arg(long, value_name = "PATH")]
    pub save_audio: Option<PathBuf>,

    /// Skip playback (pairs well with --save-audio)
    #[arg(long)]
    pub no_play: bool,
}

/// Parse a duration string into milliseconds.
///
/// Supports any format accepted by `humantime`: bare numbers (seconds),
/// single-unit (`2s`, `1500ms`), and compound (`1m30s`).
fn parse_duration_ms(s: &str) -> Result<u32, String> {
    let s = s.trim();
    // Bare number → seconds
    if let Ok(secs) = s.parse::<u32>() {
        return secs
            .checked_mul(1000)
            .ok_or_else(|| "duration too large".to_string());
    }
    humantime::parse_duration(s)
        .map_err(|e| e.to_string())
        .and_then(|d| {
            u32::try_from(d.as_millis()).map_err(|_| "duration too large".to_string())
        })
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List available audio input and output devices
    Devices,

    /// Check audio devices and cloud service reachability
    Check,

    /// View configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Configuration management actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration as TOML
    Show,
    /// Dump a commented configuration template
    Dump,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_command() {
        let cli = Cli::try_parse_from(["voxlate"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.device.is_none());
        assert!(cli.playback_device.is_none());
        assert!(cli.source_lang.is_none());
        assert!(cli.target_lang.is_none());
        assert!(cli.pause.is_none());
        assert!(cli.threshold.is_none());
        assert!(!cli.once);
        assert!(!cli.sequential);
        assert!(cli.save_audio.is_none());
        assert!(!cli.no_play);
        assert!(!cli.quiet);
        assert_eq!(cli.verbose, 0);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_parse_verbose_levels() {
        let cli = Cli::try_parse_from(["voxlate", "-v"]).unwrap();
        assert_eq!(cli.verbose, 1);

        let cli = Cli::try_parse_from(["voxlate", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);

        let cli = Cli::try_parse_from(["voxlate", "-v", "-v"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_parse_with_options() {
        let cli = Cli::try_parse_from([
            "voxlate",
            "--device",
            "pipewire",
            "--source-lang",
            "de",
            "--target-lang",
            "fr",
        ])
        .unwrap();

        assert_eq!(cli.device.as_deref(), Some("pipewire"));
        assert_eq!(cli.source_lang.as_deref(), Some("de"));
        assert_eq!(cli.target_lang.as_deref(), Some("fr"));
    }

    #[test]
    fn test_parse_language_short_flags() {
        let cli = Cli::try_parse_from(["voxlate", "-s", "ru", "-t", "en"]).unwrap();
        assert_eq!(cli.source_lang.as_deref(), Some("ru"));
        assert_eq!(cli.target_lang.as_deref(), Some("en"));
    }

    #[test]
    fn test_parse_devices() {
        let cli = Cli::try_parse_from(["voxlate", "devices"]).unwrap();
        match cli.command {
            Some(Commands::Devices) => {}
            _ => panic!("Expected Devices command"),
        }
    }

    #[test]
    fn test_parse_check() {
        let cli = Cli::try_parse_from(["voxlate", "check"]).unwrap();
        match cli.command {
            Some(Commands::Check) => {}
            _ => panic!("Expected Check command"),
        }
    }

    #[test]
    fn test_parse_global_config() {
        let cli = Cli::try_parse_from(["voxlate", "--config", "/path/to/config.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/path/to/config.toml")));
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_global_quiet() {
        let cli = Cli::try_parse_from(["voxlate", "--quiet", "devices"]).unwrap();
        assert!(cli.quiet);
        match cli.command {
            Some(Commands::Devices) => {}
            _ => panic!("Expected Devices command"),
        }
    }

    #[test]
    fn test_invalid_command_returns_error() {
        let result = Cli::try_parse_from(["voxlate", "invalid"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidSubcommand);
    }

    #[test]
    fn test_help_flag() {
        let result = Cli::try_parse_from(["voxlate", "--help"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_flag() {
        let result = Cli::try_parse_from(["voxlate", "--version"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_global_options_after_command() {
        let cli =
            Cli::try_parse_from(["voxlate", "devices", "--config", "/tmp/config.toml"]).unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("/tmp/config.toml")));
    }

    #[test]
    fn test_once_and_sequential() {
        let cli = Cli::try_parse_from(["voxlate", "--once", "--sequential"]).unwrap();
        assert!(cli.once);
        assert!(cli.sequential);
    }

    #[test]
    fn test_save_audio_and_no_play() {
        let cli =
            Cli::try_parse_from(["voxlate", "--save-audio", "out.mp3", "--no-play"]).unwrap();
        assert_eq!(cli.save_audio, Some(PathBuf::from("out.mp3")));
        assert!(cli.no_play);
    }

    #[test]
    fn test_threshold() {
        let cli = Cli::try_parse_from(["voxlate", "--threshold", "0.08"]).unwrap();
        assert_eq!(cli.threshold, Some(0.08));
    }

    #[test]
    fn test_parse_config_show() {
        let cli = Cli::try_parse_from(["voxlate", "config", "show"]).unwrap();
        match cli.command {
            Some(Commands::Config { action }) => match action {
                ConfigAction::Show => {}
                _ => panic!("Expected Show action"),
            },
            _ => panic!("Expected Config command"),
        }
    }

    #[test]
    fn test_parse_config_dump() {
        let cli = Cli::try_parse_from(["voxlate", "config", "dump"]).unwrap();
        match cli.command {
            Some(Commands::Config { action }) => match action {
                ConfigAction::Dump => {}
                _ => panic!("Expected Dump action"),
            },
            _ => panic!("Expected Config command"),
        }
    }

    #[test]
    fn test_config_requires_subcommand() {
        let result = Cli::try_parse_from(["voxlate", "config"]);
        let err = result.unwrap_err();
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
        );
    }

    // ── Pause parsing tests ──────────────────────────────────────────────

    #[test]
    fn test_parse_duration_ms_bare_number_is_seconds() {
        assert_eq!(parse_duration_ms("2").unwrap(), 2000);
        assert_eq!(parse_duration_ms("0").unwrap(), 0);
    }

    #[test]
    fn test_parse_duration_ms_with_units() {
        assert_eq!(parse_duration_ms("2s").unwrap(), 2000);
        assert_eq!(parse_duration_ms("1500ms").unwrap(), 1500);
        assert_eq!(parse_duration_ms("1m30s").unwrap(), 90_000);
    }

    #[test]
    fn test_parse_duration_ms_invalid() {
        assert!(parse_duration_ms("abc").is_err());
        assert!(parse_duration_ms("10x").is_err());
        assert!(parse_duration_ms("").is_err());
        assert!(parse_duration_ms("-5").is_err());
    }

    #[test]
    fn test_pause_cli_arg() {
        let cli = Cli::try_parse_from(["voxlate", "--pause", "3s"]).unwrap();
        assert_eq!(cli.pause, Some(3000));
    }
}
