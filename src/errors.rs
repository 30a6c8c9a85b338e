/*!
 * Error types for the manmask application.
 *
 * Per-document failures are modelled as a `RejectionReason`: the document is
 * skipped and the batch continues. `AppError` covers failures of the
 * surrounding workflow (files, configuration) that do abort a run.
 */

use std::fmt;
use thiserror::Error;

/// Errors reported by a renderer collaborator
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RendererError {
    /// The renderer process could not be started or fed its input
    #[error("Failed to start renderer: {0}")]
    Spawn(String),

    /// The renderer ran but reported failure
    #[error("Renderer exited with status {status:?}: {stderr}")]
    Failed {
        /// Exit code, if the process exited normally
        status: Option<i32>,
        /// Diagnostic output of the renderer
        stderr: String,
    },

    /// The renderer did not finish in time
    #[error("Renderer timed out after {secs} seconds")]
    Timeout {
        /// Timeout that was exceeded
        secs: u64,
    },

    /// The renderer produced output that cannot be used
    #[error("Renderer produced invalid output: {0}")]
    InvalidOutput(String),
}

impl RendererError {
    /// Whether another attempt may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Spawn(_) | Self::Timeout { .. })
    }
}

/// Structural reasons a document is not usable
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralRejection {
    /// A mandatory section title does not appear in the markup
    #[error("missing mandatory section '{0}'")]
    MissingSection(String),

    /// None of the minimal structural markers appear in the markup
    #[error("no structural markup markers found")]
    NoStructuralMarkers,

    /// Not enough sections to split into input and output
    #[error("not enough sections ({count} < {min})")]
    TooFewSections { count: usize, min: usize },

    /// Too many sections for exhaustive combination
    #[error("too many sections ({count} > {max})")]
    TooManySections { count: usize, max: usize },
}

/// Why a single document was skipped
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RejectionReason {
    /// Failed a structural gate
    #[error("Structural rejection: {0}")]
    Structural(#[from] StructuralRejection),

    /// No section header markers in the markup
    #[error("No section markers found")]
    ParseFailure,

    /// The renderer failed for this document
    #[error("Renderer failure: {0}")]
    Renderer(#[from] RendererError),
}

/// Summary bucket for a rejection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RejectionKind {
    NonStandard,
    SectionCount,
    Parse,
    Renderer,
}

impl RejectionReason {
    pub fn kind(&self) -> RejectionKind {
        match self {
            Self::Structural(StructuralRejection::MissingSection(_))
            | Self::Structural(StructuralRejection::NoStructuralMarkers) => RejectionKind::NonStandard,
            Self::Structural(_) => RejectionKind::SectionCount,
            Self::ParseFailure => RejectionKind::Parse,
            Self::Renderer(_) => RejectionKind::Renderer,
        }
    }
}

impl fmt::Display for RejectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NonStandard => "non-standard markup",
            Self::SectionCount => "section count",
            Self::Parse => "no section markers",
            Self::Renderer => "renderer failure",
        };
        write!(f, "{}", label)
    }
}

/// Workflow errors that abort a run
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
