//! CLI argument definitions for the `yazim` binary.
//!
//! Uses `clap` with derive macros. Priority resolution: CLI args > env vars >
//! config file > defaults.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use yazim_core::types::ModelTier;

/// Yazım Doktoru: Turkish writing practice with grammar feedback.
#[derive(Parser, Debug)]
#[command(name = "yazim", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the settings database.
    #[arg(short = 'd', long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log level or filter directive (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level", global = true)]
    pub log_level: Option<String>,

    /// Answer with the built-in offline assistant instead of the remote service.
    #[arg(long = "offline", global = true)]
    pub offline: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Interactive practice session (default).
    Practice,

    /// Analyse a text file, or standard input with `-`.
    Check { input: String },

    /// Translate between Turkish and English, detecting the source language.
    Translate {
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Rewrite a draft as a clearer prompt.
    Enhance {
        #[arg(required = true)]
        text: Vec<String>,
        /// Intensity from -20 (simplify) to 30 (elaborate); 0 is automatic.
        #[arg(long, allow_negative_numbers = true)]
        level: Option<i32>,
        /// Always open with a role and context.
        #[arg(long = "force-context")]
        force_context: bool,
    },

    /// Show or change saved settings.
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum SettingsAction {
    /// Print the saved settings.
    Show,

    /// Set the personal context; no text clears it.
    Context { text: Vec<String> },

    /// Add a plain-text grounding document (replaces one with the same name).
    AddDoc { path: PathBuf },

    /// Remove a grounding document by its number in `settings show`.
    RemoveDoc { number: usize },

    /// Choose the model tier (flash or pro).
    Model { tier: ModelTier },

    /// Dictation defaults.
    Dictation {
        /// Seconds of silence before dictation stops; 0 disables.
        #[arg(long)]
        timeout: Option<u32>,
        #[arg(long = "auto-correct")]
        auto_correct: Option<bool>,
        #[arg(long)]
        persistent: Option<bool>,
    },

    /// Prompt enhancement defaults.
    Prompt {
        #[arg(long, allow_negative_numbers = true)]
        level: Option<i32>,
        #[arg(long = "force-context")]
        force_context: Option<bool>,
    },
}

impl CliArgs {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Practice)
    }

    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > YAZIM_CONFIG env var > ~/.yazim/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("YAZIM_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the data directory.
    ///
    /// Priority: --data-dir flag > config file value (with `~` expanded).
    pub fn resolve_data_dir(&self, config_data_dir: &str) -> PathBuf {
        match self.data_dir {
            Some(ref p) => p.clone(),
            None => expand_home(config_data_dir),
        }
    }

    /// Resolve the log filter.
    ///
    /// Priority: --log-level flag > RUST_LOG > config file value > info.
    pub fn resolve_log_filter(&self, config_level: &str) -> String {
        if let Some(ref level) = self.log_level {
            return level.clone();
        }
        if let Ok(filter) = std::env::var("RUST_LOG") {
            if !filter.trim().is_empty() {
                return filter;
            }
        }
        if !config_level.trim().is_empty() {
            return config_level.to_string();
        }
        "info".to_string()
    }
}

fn home_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    let home = std::env::var("USERPROFILE");
    #[cfg(not(target_os = "windows"))]
    let home = std::env::var("HOME");
    home.ok().map(PathBuf::from)
}

/// Expand a leading `~/` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        if let Some(home) = home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    match home_dir() {
        Some(home) => home.join(".yazim").join("config.toml"),
        None => PathBuf::from("config.toml"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_practice_is_default() {
        let args = parse(&["yazim"]);
        assert_eq!(args.command(), Command::Practice);
        assert!(!args.offline);
    }

    #[test]
    fn test_config_flag_wins() {
        let args = parse(&["yazim", "--config", "/tmp/yazim.toml"]);
        assert_eq!(args.resolve_config_path(), PathBuf::from("/tmp/yazim.toml"));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = parse(&["yazim", "check", "metin.txt", "--offline", "-l", "debug"]);
        assert_eq!(
            args.command(),
            Command::Check {
                input: "metin.txt".to_string()
            }
        );
        assert!(args.offline);
        assert_eq!(args.resolve_log_filter("warn"), "debug");
    }

    #[test]
    fn test_enhance_accepts_negative_level() {
        let args = parse(&["yazim", "enhance", "kısa", "taslak", "--level", "-10"]);
        match args.command() {
            Command::Enhance {
                text,
                level,
                force_context,
            } => {
                assert_eq!(text, vec!["kısa", "taslak"]);
                assert_eq!(level, Some(-10));
                assert!(!force_context);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_settings_model_parses_tier() {
        let args = parse(&["yazim", "settings", "model", "pro"]);
        assert_eq!(
            args.command(),
            Command::Settings {
                action: SettingsAction::Model {
                    tier: ModelTier::Pro
                }
            }
        );
        assert!(CliArgs::try_parse_from(["yazim", "settings", "model", "ultra"]).is_err());
    }

    #[test]
    fn test_settings_dictation_flags() {
        let args = parse(&[
            "yazim",
            "settings",
            "dictation",
            "--timeout",
            "0",
            "--auto-correct",
            "true",
        ]);
        assert_eq!(
            args.command(),
            Command::Settings {
                action: SettingsAction::Dictation {
                    timeout: Some(0),
                    auto_correct: Some(true),
                    persistent: None,
                }
            }
        );
    }

    #[test]
    fn test_translate_requires_text() {
        assert!(CliArgs::try_parse_from(["yazim", "translate"]).is_err());
    }

    #[test]
    fn test_data_dir_flag_overrides_config() {
        let args = parse(&["yazim", "--data-dir", "/var/lib/yazim"]);
        assert_eq!(
            args.resolve_data_dir("~/.yazim/data"),
            PathBuf::from("/var/lib/yazim")
        );
    }

    #[test]
    fn test_expand_home_leaves_plain_paths() {
        assert_eq!(expand_home("/opt/yazim"), PathBuf::from("/opt/yazim"));
        assert_eq!(expand_home("veri"), PathBuf::from("veri"));
    }
}
