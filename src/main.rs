// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]
// Add other lints specific to this module that you want to allow but not auto-fix

use anyhow::{Result, anyhow, Context};
use log::{error, warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::app_config::Config;
use crate::errors::AppError;
use app_controller::{BatchOptions, Controller, RunOptions};

mod app_config;
mod merge;
mod subtitle_track;
mod transcript;
mod file_utils;
mod app_controller;
mod language_utils;
mod errors;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Merge one transcript pair into a bilingual SRT file (default command)
    Merge(MergeArgs),

    /// Merge every transcript pair found under one or more directories
    Batch(BatchArgs),

    /// Generate shell completions for submerge
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct MergeArgs {
    /// Primary-language transcript JSON file
    #[arg(value_name = "PRIMARY")]
    primary: PathBuf,

    /// Secondary-language transcript JSON file
    #[arg(value_name = "SECONDARY")]
    secondary: PathBuf,

    /// Output SRT file path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Title to derive the output filename from
    #[arg(long)]
    title: Option<String>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Primary language code (e.g., 'zh', 'zho')
    #[arg(short, long)]
    primary_language: Option<String>,

    /// Secondary language code (e.g., 'en', 'eng')
    #[arg(short, long)]
    secondary_language: Option<String>,

    /// Marker identifying credit cues to drop before merging
    #[arg(long)]
    credit_marker: Option<String>,

    /// Credit line written as the first subtitle block
    #[arg(long)]
    credit_line: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct BatchArgs {
    /// Directories to scan for transcript pairs
    #[arg(value_name = "INPUT_DIR", required = true, num_args = 1..)]
    input_dirs: Vec<PathBuf>,

    /// Directory collecting all merged outputs
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Title grouping outputs under a derived course folder
    #[arg(long)]
    title: Option<String>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Primary language code (e.g., 'zh', 'zho')
    #[arg(short, long)]
    primary_language: Option<String>,

    /// Secondary language code (e.g., 'en', 'eng')
    #[arg(short, long)]
    secondary_language: Option<String>,

    /// Maximum number of pairs merged concurrently
    #[arg(long)]
    concurrent_merges: Option<usize>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// submerge - bilingual subtitle merging for course transcripts
///
/// Pairs timed transcript JSON files in two languages and merges them
/// into a single bilingual SRT subtitle file.
#[derive(Parser, Debug)]
#[command(name = "submerge")]
#[command(version = "1.0.0")]
#[command(about = "Bilingual transcript pair merging tool")]
#[command(long_about = "submerge pairs timed transcript JSON files in two languages and merges them into one bilingual SRT subtitle file, primary line above secondary line.

EXAMPLES:
    submerge lecture.zh.json lecture.en.json       # Merge one pair using default config
    submerge -f lecture.zh.json lecture.en.json    # Force overwrite existing files
    submerge -o merged.srt lecture.zh.json lecture.en.json
    submerge /course/                              # Merge every pair under a directory
    submerge batch /course-a/ /course-b/           # Merge pairs from several directories
    submerge batch --title \"Intro to CS\" /course/  # Group outputs under a course folder
    submerge --log-level debug /course/            # Process a directory with debug logging
    submerge completions bash > submerge.bash      # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one will be created automatically.

LANGUAGES:
    Language codes accept ISO 639-1 and ISO 639-2 forms (zh, zho, en, eng).
    Transcript files are matched by their `{stem}.{lang}.json` name, so
    `lecture.zh.json` pairs with `lecture.en.json`.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Primary transcript file, or a directory to process in batch mode
    #[arg(value_name = "PRIMARY")]
    primary: Option<PathBuf>,

    /// Secondary transcript file (omit when PRIMARY is a directory)
    #[arg(value_name = "SECONDARY")]
    secondary: Option<PathBuf>,

    /// Output SRT file path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Title to derive the output filename from
    #[arg(long)]
    title: Option<String>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Primary language code (e.g., 'zh', 'zho')
    #[arg(short, long)]
    primary_language: Option<String>,

    /// Secondary language code (e.g., 'en', 'eng')
    #[arg(short, long)]
    secondary_language: Option<String>,

    /// Marker identifying credit cues to drop before merging
    #[arg(long)]
    credit_marker: Option<String>,

    /// Credit line written as the first subtitle block
    #[arg(long)]
    credit_line: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color prefix for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {}\x1B[0m", color, now, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    if let Err(e) = CustomLogger::init(LevelFilter::Info) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        std::process::exit(
            e.downcast_ref::<AppError>()
                .map(AppError::exit_code)
                .unwrap_or(1),
        );
    }
}

async fn run(cli: CommandLineOptions) -> Result<()> {
    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "submerge", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Merge(args)) => run_merge(args).await,
        Some(Commands::Batch(args)) => run_batch(args).await,
        None => {
            // Default behavior - a single directory argument runs batch mode,
            // a pair of transcript files runs a single merge
            let primary = cli.primary.ok_or_else(|| {
                anyhow!("PRIMARY is required when no subcommand is specified")
            })?;

            if primary.is_dir() && cli.secondary.is_none() {
                let batch_args = BatchArgs {
                    input_dirs: vec![primary],
                    output_dir: None,
                    title: cli.title,
                    force_overwrite: cli.force_overwrite,
                    primary_language: cli.primary_language,
                    secondary_language: cli.secondary_language,
                    concurrent_merges: None,
                    config_path: cli.config_path,
                    log_level: cli.log_level,
                };
                return run_batch(batch_args).await;
            }

            let secondary = cli.secondary.ok_or_else(|| {
                anyhow!("SECONDARY is required when PRIMARY is a transcript file")
            })?;

            let merge_args = MergeArgs {
                primary,
                secondary,
                output: cli.output,
                title: cli.title,
                force_overwrite: cli.force_overwrite,
                primary_language: cli.primary_language,
                secondary_language: cli.secondary_language,
                credit_marker: cli.credit_marker,
                credit_line: cli.credit_line,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_merge(merge_args).await
        }
    }
}

async fn run_merge(options: MergeArgs) -> Result<()> {
    let mut config = load_or_create_config(&options.config_path, &options.log_level)?;

    // Override config with CLI options if provided
    if let Some(primary_language) = &options.primary_language {
        config.primary_language = primary_language.clone();
    }

    if let Some(secondary_language) = &options.secondary_language {
        config.secondary_language = secondary_language.clone();
    }

    if let Some(credit_marker) = &options.credit_marker {
        config.merge.credit_marker = credit_marker.clone();
    }

    if let Some(credit_line) = &options.credit_line {
        config.merge.credit_line = credit_line.clone();
    }

    // Validate the configuration after loading and overriding
    config
        .validate()
        .map_err(|e| AppError::Config(format!("{:#}", e)))?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        let log_level = match config.log_level {
            app_config::LogLevel::Error => LevelFilter::Error,
            app_config::LogLevel::Warn => LevelFilter::Warn,
            app_config::LogLevel::Info => LevelFilter::Info,
            app_config::LogLevel::Debug => LevelFilter::Debug,
            app_config::LogLevel::Trace => LevelFilter::Trace,
        };

        // Just update the max level without reinitializing the logger
        log::set_max_level(log_level);
    }

    // Create controller and merge the pair
    let controller = Controller::with_config(config)?;
    let run_options = RunOptions {
        output: options.output,
        title: options.title,
        force_overwrite: options.force_overwrite,
    };
    controller
        .run_pair(&options.primary, &options.secondary, &run_options)
        .await?;

    Ok(())
}

async fn run_batch(options: BatchArgs) -> Result<()> {
    let mut config = load_or_create_config(&options.config_path, &options.log_level)?;

    // Override config with CLI options if provided
    if let Some(primary_language) = &options.primary_language {
        config.primary_language = primary_language.clone();
    }

    if let Some(secondary_language) = &options.secondary_language {
        config.secondary_language = secondary_language.clone();
    }

    if let Some(concurrent_merges) = options.concurrent_merges {
        config.concurrent_merges = concurrent_merges;
    }

    // Validate the configuration after loading and overriding
    config
        .validate()
        .map_err(|e| AppError::Config(format!("{:#}", e)))?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        let log_level = match config.log_level {
            app_config::LogLevel::Error => LevelFilter::Error,
            app_config::LogLevel::Warn => LevelFilter::Warn,
            app_config::LogLevel::Info => LevelFilter::Info,
            app_config::LogLevel::Debug => LevelFilter::Debug,
            app_config::LogLevel::Trace => LevelFilter::Trace,
        };

        // Just update the max level without reinitializing the logger
        log::set_max_level(log_level);
    }

    // Create controller and process the directories
    let controller = Controller::with_config(config)?;
    let batch_options = BatchOptions {
        output_dir: options.output_dir,
        title: options.title,
        force_overwrite: options.force_overwrite,
    };
    controller.run_batch(&options.input_dirs, &batch_options).await?;

    Ok(())
}

fn load_or_create_config(config_path: &str, cmd_log_level: &Option<CliLogLevel>) -> Result<Config> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = cmd_log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        let log_level = match config_log_level {
            app_config::LogLevel::Error => LevelFilter::Error,
            app_config::LogLevel::Warn => LevelFilter::Warn,
            app_config::LogLevel::Info => LevelFilter::Info,
            app_config::LogLevel::Debug => LevelFilter::Debug,
            app_config::LogLevel::Trace => LevelFilter::Trace,
        };
        log::set_max_level(log_level);
    }

    let config = if Path::new(config_path).exists() {
        // Load existing configuration
        let mut config = Config::from_file(config_path)
            .map_err(|e| AppError::Config(format!("{:#}", e)))?;

        // Update log level in config if specified via command line
        if let Some(log_level) = cmd_log_level {
            config.log_level = log_level.clone().into();
        }

        config
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path);

        let mut config = Config::default();

        // Apply command line log level to default config if specified
        if let Some(log_level) = cmd_log_level {
            config.log_level = log_level.clone().into();
        }

        // Save default config
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    Ok(config)
}
