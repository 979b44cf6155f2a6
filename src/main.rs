// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info};
use std::io::Write;
use std::path::PathBuf;

use aphorium::app_config::{Config, LogLevel};
use aphorium::app_controller::Controller;
use aphorium::language::LanguageFilter;

/// CLI wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

/// CLI wrapper for LanguageFilter to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLanguage {
    En,
    Ru,
    Both,
}

impl From<CliLanguage> for LanguageFilter {
    fn from(cli_language: CliLanguage) -> Self {
        match cli_language {
            CliLanguage::En => LanguageFilter::En,
            CliLanguage::Ru => LanguageFilter::Ru,
            CliLanguage::Both => LanguageFilter::Both,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ingest scraped fragments from a JSON file
    Ingest {
        /// JSON file with [{text, language, author, source?}] entries
        #[arg(value_name = "FRAGMENT_FILE")]
        file: PathBuf,
    },

    /// Discover and record cross-language quote links
    Link {
        /// Restrict linking to authors with this name
        #[arg(short, long)]
        author: Option<String>,
    },

    /// Search quotes, returning bilingual pairs as JSON
    Search {
        /// Query text, English or Russian
        #[arg(value_name = "QUERY")]
        query: String,

        /// Language filter
        #[arg(short, long, value_enum, default_value = "both")]
        language: CliLanguage,

        /// Do not rank bilingual pairs ahead of single-language hits
        #[arg(long)]
        no_pairs_first: bool,

        /// Maximum number of result pairs
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Re-classify stored quotes, deleting noise and stripping citations
    Cleanup {
        /// Actually apply the changes (default is a dry run)
        #[arg(long)]
        execute: bool,
    },

    /// Print store statistics
    Stats,
}

/// Aphorium - bilingual aphorism index
///
/// Indexes short attributed texts in English and Russian and lets you
/// search either language, pairing results with their known translation.
#[derive(Parser, Debug)]
#[command(name = "aphorium")]
#[command(version = "1.0.0")]
#[command(about = "Bilingual aphorism indexing and search")]
#[command(long_about = "Aphorium indexes short attributed texts (\"aphorisms\") in English and
Russian and lets you search either language, pairing results with their
cross-language equivalent when one is known.

EXAMPLES:
    aphorium ingest fragments.json          # Validate and store scraped fragments
    aphorium link                           # Link quotes across languages
    aphorium link -a \"Albert Einstein\"      # Link one author only
    aphorium search love                    # Bilingual search, pairs first
    aphorium search -l ru мудрость          # Russian-only search
    aphorium cleanup                        # Report noise rows (dry run)
    aphorium cleanup --execute              # Delete noise rows
    aphorium stats                          # Show corpus statistics

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a
    different file with --config; a default one is created when missing.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, env = "APHORIUM_CONFIG", default_value = "conf.json")]
    config_path: String,

    /// Database file path (overrides the configured one)
    #[arg(short, long)]
    database: Option<String>,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Stderr logger with timestamps and level colors
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

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
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
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let color = Self::color_for_level(record.level());
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:5} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default;
    // the level is updated after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    // Load or create configuration
    let mut config = Config::from_file(&cli.config_path)
        .with_context(|| format!("Failed to load config from {}", cli.config_path))?;

    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }
    if let Some(database) = &cli.database {
        config.database_path = Some(database.clone());
    }

    config.validate().context("Configuration validation failed")?;
    log::set_max_level(config.log_level.to_level_filter());

    let controller = Controller::with_config(config)?;

    match cli.command {
        Commands::Ingest { file } => {
            let report = controller.ingest_file(&file).await?;
            info!(
                "Ingested {}: {} accepted, {} duplicates, {} rejected",
                file.display(),
                report.accepted,
                report.duplicates,
                report.rejected
            );
            for (reason, count) in &report.rejected_reasons {
                info!("  rejected ({}): {}", reason, count);
            }
        }
        Commands::Link { author } => {
            let report = match author {
                Some(name) => controller.link_author_by_name(&name).await?,
                None => controller.link_all().await?,
            };
            info!(
                "Linked {} authors: {} links created, {} group ids assigned, {} skipped",
                report.authors_processed,
                report.links_created,
                report.groups_assigned,
                report.authors_skipped
            );
        }
        Commands::Search {
            query,
            language,
            no_pairs_first,
            limit,
        } => {
            let pairs = controller
                .search(&query, language.into(), !no_pairs_first, limit)
                .await;
            let json = serde_json::to_string_pretty(&pairs)
                .context("Failed to serialize search results")?;
            println!("{}", json);
        }
        Commands::Cleanup { execute } => {
            let report = controller.cleanup(!execute).await?;
            if report.dry_run {
                info!(
                    "Cleanup dry run: {} examined, {} would be deleted, {} would be rewritten (run with --execute to apply)",
                    report.examined, report.deleted, report.rewritten
                );
            } else {
                info!(
                    "Cleanup: {} examined, {} deleted, {} rewritten",
                    report.examined, report.deleted, report.rewritten
                );
            }
        }
        Commands::Stats => {
            let stats = controller.stats()?;
            println!("{}", stats);
        }
    }

    Ok(())
}
