//! Yazım Doktoru binary - composition root.
//!
//! 1. Parse the CLI and load configuration from TOML
//! 2. Initialise tracing (stderr)
//! 3. Open the settings database
//! 4. Build the assistant (remote or offline)
//! 5. Run the interactive practice loop or a one-shot subcommand

mod cli;
mod commands;
mod practice;
mod render;

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use yazim_assistant::{GeminiClient, ScriptedAssistant, WritingAssistant};
use yazim_core::clock::SystemClock;
use yazim_core::config::YazimConfig;
use yazim_core::error::YazimError;
use yazim_dictation::ChannelRecognizer;
use yazim_storage::{Database, SettingsRepository, SqliteSettingsRepository};
use yazim_workbench::{Workbench, WorkbenchOptions};

use crate::cli::{CliArgs, Command};
use crate::practice::Practice;

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_assistant(
    args: &CliArgs,
    config: &YazimConfig,
) -> Result<Arc<dyn WritingAssistant>, YazimError> {
    if args.offline {
        tracing::info!("Using the offline assistant");
        return Ok(Arc::new(ScriptedAssistant::new()));
    }
    let client =
        GeminiClient::from_env(&config.assistant).map_err(|e| YazimError::Config(e.to_string()))?;
    tracing::debug!(client = ?client, "Assistant client ready");
    Ok(Arc::new(client))
}

fn open_settings(
    args: &CliArgs,
    config: &YazimConfig,
) -> Result<Arc<SqliteSettingsRepository>, YazimError> {
    let data_dir = args.resolve_data_dir(&config.general.data_dir);
    let db_path = data_dir.join("yazim.db");
    let db = Database::new(&db_path)?;
    tracing::info!(path = %db_path.display(), "Settings database opened");
    Ok(Arc::new(SqliteSettingsRepository::new(Arc::new(db))))
}

async fn run(args: CliArgs, config: YazimConfig) -> Result<(), YazimError> {
    let repository = open_settings(&args, &config)?;

    match args.command() {
        Command::Practice => {
            let assistant = build_assistant(&args, &config)?;
            let recognizer = Arc::new(ChannelRecognizer::new());
            let workbench = Workbench::new(
                assistant,
                repository,
                recognizer.clone(),
                Arc::new(SystemClock),
                WorkbenchOptions::from_config(&config.dictation),
            )?;
            Practice::new(workbench, recognizer).run().await
        }
        Command::Check { input } => {
            let assistant = build_assistant(&args, &config)?;
            let settings = repository.load()?;
            let text = commands::read_input(&input)?;
            let report = commands::check(assistant.as_ref(), &settings, &text).await?;
            print!("{}", report);
            Ok(())
        }
        Command::Translate { text } => {
            let assistant = build_assistant(&args, &config)?;
            let settings = repository.load()?;
            let out = commands::translate(assistant.as_ref(), &settings, &text.join(" ")).await?;
            println!("{}", out);
            Ok(())
        }
        Command::Enhance {
            text,
            level,
            force_context,
        } => {
            let assistant = build_assistant(&args, &config)?;
            let settings = repository.load()?;
            let out = commands::enhance(
                assistant.as_ref(),
                &settings,
                &text.join(" "),
                level,
                force_context,
            )
            .await?;
            println!("{}", out);
            Ok(())
        }
        Command::Settings { action } => {
            let mut settings = repository.load()?;
            let (message, changed) = commands::apply_settings_action(&mut settings, &action)?;
            if changed {
                repository.save(&settings)?;
            }
            print!("{}", message);
            if !message.ends_with('\n') {
                println!();
            }
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let args = CliArgs::parse();

    let config_file = args.resolve_config_path();
    let config = YazimConfig::load_or_default(&config_file);
    init_tracing(&args.resolve_log_filter(&config.general.log_level));

    tracing::info!("Starting Yazım Doktoru v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    match run(args, config).await {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("{}", e.user_message());
            std::process::ExitCode::FAILURE
        }
    }
}
