/*!
 * # manmask - masked section datasets from manual pages
 *
 * A Rust library that turns manual pages written in man macros into titled
 * sections and emits every input/output masking split of those sections as a
 * supervised training dataset.
 *
 * ## Features
 *
 * - Section header parsing over raw markup
 * - Alignment of sections onto the rendered plain text of the page
 * - Structural validity and section-count gates
 * - Exhaustive enumeration of section splits (`2^n - 2` per document)
 * - Newline-delimited JSON dataset output
 * - Concurrent processing with per-document failure isolation
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `document`: Document, section and sample record types
 * - `markup`: Span parsing, alignment and gates:
 *   - `markup::spans`: Section header scanning
 *   - `markup::align`: Rendered-text alignment
 *   - `markup::gates`: Validity and section-count gates
 * - `dataset`: Split enumeration and serialization
 * - `renderer`: Markup renderers (external process, mock)
 * - `pipeline`: Per-document processing
 * - `batch`: Bounded concurrent processing of many documents
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod batch;
pub mod dataset;
pub mod document;
pub mod errors;
pub mod file_utils;
pub mod markup;
pub mod pipeline;
pub mod renderer;

// Re-export main types for easier usage
pub use app_config::Config;
pub use batch::{BatchProcessor, BatchSummary, SourceDocument};
pub use dataset::{Combination, CombinationGenerator, SampleSerializer};
pub use document::{Document, SampleRecord, Section};
pub use errors::{AppError, RejectionKind, RejectionReason, RendererError, StructuralRejection};
pub use markup::{DocumentValidityGate, RawSpan, RenderedTextAligner, SectionCountGate, SectionSpanParser};
pub use pipeline::{DocumentProcessor, ProcessedDocument};
pub use renderer::Renderer;
