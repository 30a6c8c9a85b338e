/*!
 * Batch document processing.
 *
 * Runs the per-document pipeline over many documents with a bounded number
 * in flight. A failing document is counted and skipped; it never aborts the
 * batch. Results come back in input order regardless of completion order,
 * and one-pass sample generation streams them to a single writer.
 */

use anyhow::Result;
use futures::stream::{self, Stream, StreamExt};
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::future::Future;
use std::pin::pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::document::{Document, SampleRecord};
use crate::errors::{RejectionKind, RejectionReason};
use crate::pipeline::DocumentProcessor;

/// Raw markup of one source document
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub name: String,
    pub markup: String,
}

impl SourceDocument {
    pub fn new(name: impl Into<String>, markup: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            markup: markup.into(),
        }
    }
}

/// Aggregate outcome of a batch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    pub total: usize,
    pub accepted: usize,
    pub rejected: BTreeMap<RejectionKind, usize>,
    /// Sections dropped during alignment across accepted documents
    pub alignment_gaps: usize,
    pub samples: usize,
}

impl BatchSummary {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    pub fn rejected_total(&self) -> usize {
        self.rejected.values().sum()
    }

    pub fn rejected_for(&self, kind: RejectionKind) -> usize {
        self.rejected.get(&kind).copied().unwrap_or(0)
    }

    fn record_rejection(&mut self, name: &str, reason: &RejectionReason) {
        warn!("Skipping {}: {}", name, reason);
        *self.rejected.entry(reason.kind()).or_insert(0) += 1;
    }

    /// Log the summary at info level
    pub fn log(&self, label: &str) {
        info!(
            "{}: {} documents, {} accepted, {} rejected, {} samples",
            label,
            self.total,
            self.accepted,
            self.rejected_total(),
            self.samples
        );
        for (kind, count) in &self.rejected {
            info!("  rejected ({}): {}", kind, count);
        }
        if self.alignment_gaps > 0 {
            info!("  sections dropped during alignment: {}", self.alignment_gaps);
        }
    }
}

/// Batch processor for running documents through the pipeline
pub struct BatchProcessor {
    processor: DocumentProcessor,
    max_concurrent_documents: usize,
}

impl BatchProcessor {
    pub fn new(processor: DocumentProcessor, max_concurrent_documents: usize) -> Self {
        Self {
            processor,
            max_concurrent_documents: max_concurrent_documents.max(1),
        }
    }

    /// Extract documents, keeping the accepted ones in input order
    pub async fn extract_documents<P>(
        &self,
        sources: &[SourceDocument],
        progress_callback: P,
    ) -> (Vec<Document>, BatchSummary)
    where
        P: Fn(usize, usize, &str) + Sync,
    {
        let results: Vec<_> = self
            .ordered_results(sources, &progress_callback, |processor, source| {
                processor.extract_document(&source.name, &source.markup)
            })
            .collect()
            .await;

        let mut summary = BatchSummary::new(sources.len());
        let mut documents = Vec::with_capacity(results.len());
        for (name, result) in results {
            match result {
                Ok(extracted) => {
                    summary.accepted += 1;
                    summary.alignment_gaps += extracted.gaps.len();
                    documents.push(extracted.document);
                }
                Err(reason) => summary.record_rejection(name, &reason),
            }
        }

        (documents, summary)
    }

    /// Extract and generate samples for every document in one pass.
    ///
    /// Samples reach `sink` in document-then-combination order as soon as
    /// each document and all documents before it are done; only counters are
    /// kept. An error from `sink` stops the batch.
    pub async fn process_documents<P, F>(
        &self,
        sources: &[SourceDocument],
        progress_callback: P,
        mut sink: F,
    ) -> Result<BatchSummary>
    where
        P: Fn(usize, usize, &str) + Sync,
        F: FnMut(&SampleRecord) -> Result<()>,
    {
        let mut summary = BatchSummary::new(sources.len());
        let mut results = pin!(self.ordered_results(sources, &progress_callback, |processor, source| {
            processor.process_document(&source.name, &source.markup)
        }));

        while let Some((name, result)) = results.next().await {
            match result {
                Ok(document) => {
                    for sample in &document.samples {
                        sink(sample)?;
                    }
                    summary.accepted += 1;
                    summary.alignment_gaps += document.gaps.len();
                    summary.samples += document.samples.len();
                }
                Err(reason) => summary.record_rejection(name, &reason),
            }
        }

        Ok(summary)
    }

    /// Generate samples for already extracted documents, handing each record
    /// to `sink` in document-then-combination order.
    pub fn generate_samples<P, F>(
        &self,
        documents: &[Document],
        progress_callback: P,
        mut sink: F,
    ) -> Result<BatchSummary>
    where
        P: Fn(usize, usize, &str),
        F: FnMut(&SampleRecord) -> Result<()>,
    {
        let mut summary = BatchSummary::new(documents.len());

        for (idx, document) in documents.iter().enumerate() {
            match self.processor.samples_for_document(document) {
                Ok(samples) => {
                    for sample in &samples {
                        sink(sample)?;
                    }
                    summary.accepted += 1;
                    summary.samples += samples.len();
                }
                Err(reason) => summary.record_rejection(&document.name, &reason),
            }
            progress_callback(idx + 1, documents.len(), &document.name);
        }

        Ok(summary)
    }

    /// Run `work` over all sources with bounded concurrency, yielding results
    /// in input order
    fn ordered_results<'a, T, F, Fut, P>(
        &'a self,
        sources: &'a [SourceDocument],
        progress_callback: &'a P,
        work: F,
    ) -> impl Stream<Item = (&'a str, Result<T, RejectionReason>)> + 'a
    where
        T: 'a,
        F: Fn(&'a DocumentProcessor, &'a SourceDocument) -> Fut + 'a,
        Fut: Future<Output = Result<T, RejectionReason>> + 'a,
        P: Fn(usize, usize, &str) + Sync + 'a,
    {
        let total = sources.len();
        let processed = Arc::new(AtomicUsize::new(0));

        stream::iter(sources)
            .map(move |source| {
                let pending = work(&self.processor, source);
                let processed = Arc::clone(&processed);
                async move {
                    let start_time = Instant::now();
                    let result = pending.await;

                    let current = processed.fetch_add(1, Ordering::SeqCst) + 1;
                    progress_callback(current, total, &source.name);
                    debug!("{} finished in {:?}", source.name, start_time.elapsed());

                    (source.name.as_str(), result)
                }
            })
            // buffered keeps input order while up to N documents run
            .buffered(self.max_concurrent_documents)
    }
}
