use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Markup conventions used by the parser and validity gate
    #[serde(default)]
    pub markup: MarkupConfig,

    /// Accepted section count range
    #[serde(default)]
    pub sections: SectionBounds,

    /// Tags wrapping section titles in generated samples
    #[serde(default)]
    pub tags: TagConfig,

    /// External renderer settings
    #[serde(default)]
    pub renderer: RendererConfig,

    /// Where source pages are discovered
    #[serde(default)]
    pub sources: SourceConfig,

    /// Number of documents processed concurrently
    #[serde(default = "default_concurrent_documents")]
    pub concurrent_documents: usize,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Markup conventions
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MarkupConfig {
    /// Macro that opens a top-level section
    #[serde(default = "default_section_marker")]
    pub section_marker: String,

    /// Section titles that must appear (case-insensitive) for a document to be accepted
    #[serde(default = "default_required_sections")]
    pub required_sections: Vec<String>,

    /// At least one of these must appear for the text to count as markup
    #[serde(default = "default_structural_markers")]
    pub structural_markers: Vec<String>,
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            section_marker: default_section_marker(),
            required_sections: default_required_sections(),
            structural_markers: default_structural_markers(),
        }
    }
}

/// Inclusive bounds on the number of aligned sections
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct SectionBounds {
    #[serde(default = "default_min_sections")]
    pub min_sections: usize,

    #[serde(default = "default_max_sections")]
    pub max_sections: usize,
}

impl Default for SectionBounds {
    fn default() -> Self {
        Self {
            min_sections: default_min_sections(),
            max_sections: default_max_sections(),
        }
    }
}

/// Section title tags
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TagConfig {
    #[serde(default = "default_open_tag")]
    pub open: String,

    #[serde(default = "default_close_tag")]
    pub close: String,
}

impl Default for TagConfig {
    fn default() -> Self {
        Self {
            open: default_open_tag(),
            close: default_close_tag(),
        }
    }
}

/// External renderer configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RendererConfig {
    /// Executable to invoke
    #[serde(default = "default_renderer_command")]
    pub command: String,

    /// Arguments passed to the executable; markup is fed on stdin
    #[serde(default = "default_renderer_args")]
    pub args: Vec<String>,

    /// Per-document timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retry count for transient failures
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Base backoff between retries in milliseconds, doubled on each retry
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Strip terminal escape sequences and overstrikes from the rendered text
    #[serde(default = "default_true")]
    pub strip_ansi: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            command: default_renderer_command(),
            args: default_renderer_args(),
            timeout_secs: default_timeout_secs(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            strip_ansi: true,
        }
    }
}

/// Source page discovery
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SourceConfig {
    /// Root of the manual page tree
    #[serde(default = "default_man_path")]
    pub man_path: String,

    /// Subdirectories of `man_path` to scan
    #[serde(default = "default_source_sections")]
    pub sections: Vec<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            man_path: default_man_path(),
            sections: default_source_sections(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Combination counts are computed as `2^n - 2` in a u64
pub const MAX_SUPPORTED_SECTIONS: usize = 63;

fn default_concurrent_documents() -> usize {
    4
}

fn default_section_marker() -> String {
    ".SH".to_string()
}

fn default_required_sections() -> Vec<String> {
    vec!["NAME".to_string()]
}

fn default_structural_markers() -> Vec<String> {
    [".SH", ".TH", ".PP", ".br"].iter().map(|m| m.to_string()).collect()
}

fn default_min_sections() -> usize {
    2
}

fn default_max_sections() -> usize {
    10
}

fn default_open_tag() -> String {
    "<SECTION>".to_string()
}

fn default_close_tag() -> String {
    "</SECTION>".to_string()
}

fn default_renderer_command() -> String {
    "groff".to_string()
}

fn default_renderer_args() -> Vec<String> {
    vec!["-Tutf8".to_string(), "-man".to_string()]
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_retry_count() -> u32 {
    2
}

fn default_retry_backoff_ms() -> u64 {
    500
}

fn default_true() -> bool {
    true
}

fn default_man_path() -> String {
    "/usr/share/man".to_string()
}

fn default_source_sections() -> Vec<String> {
    vec!["man1".to_string()]
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.markup.section_marker.trim().is_empty() {
            return Err(anyhow!("Section marker must not be empty"));
        }

        if self.sections.min_sections < 2 {
            return Err(anyhow!(
                "min_sections must be at least 2 to allow an input/output split (got {})",
                self.sections.min_sections
            ));
        }

        if self.sections.max_sections < self.sections.min_sections {
            return Err(anyhow!(
                "max_sections ({}) must not be below min_sections ({})",
                self.sections.max_sections,
                self.sections.min_sections
            ));
        }

        if self.sections.max_sections > MAX_SUPPORTED_SECTIONS {
            return Err(anyhow!(
                "max_sections ({}) exceeds the supported maximum of {}",
                self.sections.max_sections,
                MAX_SUPPORTED_SECTIONS
            ));
        }

        if self.tags.open.is_empty() || self.tags.close.is_empty() {
            return Err(anyhow!("Section tags must not be empty"));
        }

        if self.renderer.command.trim().is_empty() {
            return Err(anyhow!("Renderer command must not be empty"));
        }

        if self.concurrent_documents == 0 {
            return Err(anyhow!("concurrent_documents must be at least 1"));
        }

        Ok(())
    }

    /// Load configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load configuration from a JSON file, writing a default one if missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::load(path);
        }

        log::warn!("Config file not found at '{}', creating default config.", path.display());

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write default config to file: {}", path.display()))?;

        Ok(config)
    }
}
