/*!
 * Per-document processing pipeline.
 *
 * raw markup -> validity gate -> span parsing -> rendering -> alignment
 * -> section count gate -> combinations -> serialized samples
 *
 * A `DocumentProcessor` holds no per-document state, so one instance can be
 * shared by concurrent workers.
 */

use anyhow::Result;
use log::{debug, error, warn};
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::{Config, RendererConfig};
use crate::dataset::{CombinationGenerator, SampleSerializer};
use crate::document::{Document, SampleRecord};
use crate::errors::{RejectionReason, RendererError};
use crate::markup::{
    AlignmentGap, DocumentValidityGate, RenderedTextAligner, SectionCountGate, SectionSpanParser,
};
use crate::renderer::Renderer;

/// A document that passed extraction, with the titles alignment dropped
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pub document: Document,
    pub gaps: Vec<AlignmentGap>,
}

/// Samples produced for one document
#[derive(Debug, Clone)]
pub struct ProcessedDocument {
    pub name: String,
    pub samples: Vec<SampleRecord>,
    pub gaps: Vec<AlignmentGap>,
}

/// Runs the full pipeline for single documents
#[derive(Debug, Clone)]
pub struct DocumentProcessor {
    parser: SectionSpanParser,
    validity_gate: DocumentValidityGate,
    count_gate: SectionCountGate,
    serializer: SampleSerializer,
    renderer: Arc<dyn Renderer>,
    renderer_config: RendererConfig,
}

impl DocumentProcessor {
    /// Create a processor from configuration and a renderer
    pub fn new(config: &Config, renderer: Arc<dyn Renderer>) -> Result<Self> {
        Ok(Self {
            parser: SectionSpanParser::new(&config.markup)?,
            validity_gate: DocumentValidityGate::new(&config.markup),
            count_gate: SectionCountGate::new(config.sections),
            serializer: SampleSerializer::new(config.tags.clone()),
            renderer,
            renderer_config: config.renderer.clone(),
        })
    }

    /// Turn raw markup into a document of rendered sections.
    ///
    /// Titles missing from the rendered text are dropped and returned as gaps.
    pub async fn extract_document(
        &self,
        name: &str,
        markup: &str,
    ) -> Result<ExtractedDocument, RejectionReason> {
        self.validity_gate.check(markup)?;

        let spans = self.parser.parse(markup)?;
        debug!("{}: {} section markers", name, spans.len());

        let rendered = self.render_with_retry(name, markup).await.inspect_err(|e| {
            error!("Renderer failed for '{}': {}", name, e);
        })?;

        let alignment = RenderedTextAligner::align(&spans, &rendered);
        for gap in &alignment.gaps {
            warn!(
                "Title '{}' not found in rendered text of '{}' (from offset {})",
                gap.title, name, gap.cursor
            );
        }

        Ok(ExtractedDocument {
            document: alignment.to_document(name, &rendered),
            gaps: alignment.gaps,
        })
    }

    /// Every split of an accepted document as dataset records, in generation order
    pub fn samples_for_document(
        &self,
        document: &Document,
    ) -> Result<Vec<SampleRecord>, RejectionReason> {
        self.count_gate.check(document.len())?;

        let generator = CombinationGenerator::new(document.titles());
        let samples: Vec<SampleRecord> = generator
            .iter()
            .map(|combination| self.serializer.serialize(document, &combination))
            .collect();

        debug!("{}: {} samples from {} sections", document.name, samples.len(), document.len());
        Ok(samples)
    }

    /// Extraction and sample generation in one step
    pub async fn process_document(
        &self,
        name: &str,
        markup: &str,
    ) -> Result<ProcessedDocument, RejectionReason> {
        let extracted = self.extract_document(name, markup).await?;
        let samples = self.samples_for_document(&extracted.document)?;
        Ok(ProcessedDocument {
            name: name.to_string(),
            samples,
            gaps: extracted.gaps,
        })
    }

    /// Render with a per-attempt timeout, retrying transient failures
    async fn render_with_retry(&self, name: &str, markup: &str) -> Result<String, RendererError> {
        let max_retries = self.renderer_config.retry_count;
        let timeout_secs = self.renderer_config.timeout_secs;

        let mut attempt = 0;
        loop {
            let result = match tokio::time::timeout(
                Duration::from_secs(timeout_secs),
                self.renderer.render(markup),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => Err(RendererError::Timeout { secs: timeout_secs }),
            };

            let error = match result {
                Ok(text) => return Ok(text),
                Err(e) if e.is_transient() && attempt < max_retries => e,
                Err(e) => return Err(e),
            };

            attempt += 1;
            let backoff_ms = self
                .renderer_config
                .retry_backoff_ms
                .saturating_mul(1u64.checked_shl(attempt - 1).unwrap_or(u64::MAX));
            debug!(
                "{} renderer attempt {}/{} for '{}' failed: {}; retrying in {}ms",
                self.renderer.name(),
                attempt,
                max_retries + 1,
                name,
                error,
                backoff_ms
            );
            tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
        }
    }
}
