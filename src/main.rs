// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use manmask::app_config::{Config, LogLevel};
use manmask::app_controller::Controller;

/// CLI Wrapper for LogLevel to implement ValueEnum
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

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract titled sections from manual pages into a document collection
    Extract {
        /// Directory of page sources (defaults to the configured man path and sections)
        #[arg(value_name = "INPUT_DIR")]
        input_dir: Option<PathBuf>,

        /// Output document collection
        #[arg(short, long, default_value = "man_pages.json")]
        output: PathBuf,
    },

    /// Generate masked input/output samples from a document collection
    Generate {
        /// Document collection written by `extract`
        #[arg(value_name = "DOCUMENTS", default_value = "man_pages.json")]
        documents: PathBuf,

        /// Output dataset (newline-delimited JSON)
        #[arg(short, long, default_value = "masked_man_pages.jsonl")]
        output: PathBuf,
    },

    /// Extract and generate in one pass
    Run {
        /// Directory of page sources (defaults to the configured man path and sections)
        #[arg(value_name = "INPUT_DIR")]
        input_dir: Option<PathBuf>,

        /// Output dataset (newline-delimited JSON)
        #[arg(short, long, default_value = "masked_man_pages.jsonl")]
        output: PathBuf,
    },

    /// Generate shell completions for manmask
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// manmask - masked section datasets from manual pages
#[derive(Parser, Debug)]
#[command(name = "manmask")]
#[command(version)]
#[command(about = "Build masked-section training datasets from manual pages")]
#[command(long_about = "manmask splits manual pages into titled sections and writes every input/output split of those sections as a dataset.

EXAMPLES:
    manmask extract                              # Scan the configured man path
    manmask extract ./pages -o docs.json         # Scan a local directory
    manmask generate docs.json -o samples.jsonl  # Write all section splits
    manmask run --max-sections 8                 # Both steps in one pass
    manmask completions bash > manmask.bash      # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Number of documents processed concurrently
    #[arg(short = 'j', long, global = true)]
    concurrency: Option<usize>,

    /// Minimum number of sections for a document to be split
    #[arg(long, global = true)]
    min_sections: Option<usize>,

    /// Maximum number of sections for a document to be split
    #[arg(long, global = true)]
    max_sections: Option<usize>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        // The logger itself passes everything; log::max_level does the filtering
        log::set_boxed_logger(Box::new(CustomLogger { level: LevelFilter::Trace }))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and tag for level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
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
            let (color, tag) = Self::style_for_level(record.level());
            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, tag, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "manmask", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli)?;
    log::set_max_level(config.log_level.to_level_filter());

    let controller = Controller::with_config(config)?;

    match cli.command {
        Commands::Extract { input_dir, output } => {
            controller.run_extract(input_dir, &output).await?;
        }
        Commands::Generate { documents, output } => {
            controller.run_generate(&documents, &output)?;
        }
        Commands::Run { input_dir, output } => {
            controller.run_all(input_dir, &output).await?;
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}

/// Load or create the configuration file and apply command line overrides
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let mut config = Config::load_or_create(&cli.config_path)?;

    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }

    if let Some(concurrency) = cli.concurrency {
        config.concurrent_documents = concurrency;
    }

    if let Some(min_sections) = cli.min_sections {
        config.sections.min_sections = min_sections;
    }

    if let Some(max_sections) = cli.max_sections {
        config.sections.max_sections = max_sections;
    }

    config.validate().context("Configuration validation failed")?;
    Ok(config)
}
