/*!
 * Integration tests for batch processing and summaries
 */

use anyhow::Result;
use parking_lot::Mutex;
use std::sync::Arc;

use manmask::batch::{BatchProcessor, SourceDocument};
use manmask::document::{Document, SampleRecord};
use manmask::errors::RejectionKind;
use manmask::renderer::MockRenderer;
use crate::common;

fn mixed_sources() -> Vec<SourceDocument> {
    vec![
        SourceDocument::new("ls", common::LS_PAGE),
        SourceDocument::new("plain", common::PLAIN_TEXT),
        SourceDocument::new("cat", common::CAT_PAGE),
        SourceDocument::new("one", common::numbered_page("one", 1)),
        SourceDocument::new("big", common::numbered_page("big", 11)),
        SourceDocument::new("pair", common::numbered_page("pair", 2)),
    ]
}

/// First line of a sample's input, which names the document's first section content
fn first_input_line(sample: &SampleRecord) -> String {
    sample.input.lines().nth(1).unwrap_or_default().to_string()
}

#[tokio::test]
async fn test_process_documents_withMixedSources_shouldIsolateFailuresAndKeepOrder() -> Result<()> {
    common::init_logging();
    let batch = BatchProcessor::new(common::plain_processor()?, 3);
    let mut written = Vec::new();

    let summary = batch
        .process_documents(&mixed_sources(), |_, _, _| {}, |sample| {
            written.push(sample.clone());
            Ok(())
        })
        .await?;

    assert_eq!(summary.total, 6);
    assert_eq!(summary.accepted, 3);
    assert_eq!(summary.rejected_total(), 3);
    assert_eq!(summary.rejected_for(RejectionKind::NonStandard), 1);
    assert_eq!(summary.rejected_for(RejectionKind::SectionCount), 2);
    assert_eq!(summary.samples, 14 + 6 + 2);
    assert_eq!(written.len(), 22);
    assert_eq!(first_input_line(&written[0]), "ls - list directory contents");
    assert!(first_input_line(&written[14]).starts_with("cat - "));
    assert!(first_input_line(&written[20]).starts_with("pair - "));
    Ok(())
}

#[tokio::test]
async fn test_process_documents_withSlowFirstDocument_shouldStillStreamInInputOrder() -> Result<()> {
    let processor = common::processor_with(Arc::new(MockRenderer::slow_first(100)))?;
    let batch = BatchProcessor::new(processor, 4);
    let sources = vec![
        SourceDocument::new("ls", common::LS_PAGE),
        SourceDocument::new("cat", common::CAT_PAGE),
        SourceDocument::new("pair", common::numbered_page("pair", 2)),
    ];
    let finished = Mutex::new(Vec::new());
    let mut written = Vec::new();

    batch
        .process_documents(
            &sources,
            |_, _, name| finished.lock().push(name.to_string()),
            |sample| {
                written.push(first_input_line(sample));
                Ok(())
            },
        )
        .await?;

    // The slow first page completes last but is written first
    assert_eq!(finished.into_inner().last().map(String::as_str), Some("ls"));
    assert_eq!(written.len(), 14 + 6 + 2);
    assert_eq!(written[0], "ls - list directory contents");
    assert!(written[14].starts_with("cat - "));
    Ok(())
}

#[tokio::test]
async fn test_process_documents_withFailingSink_shouldStopBeforeLaterDocuments() -> Result<()> {
    let renderer = Arc::new(MockRenderer::plain());
    let batch = BatchProcessor::new(common::processor_with(renderer.clone())?, 1);
    let sources: Vec<SourceDocument> = (0..4)
        .map(|i| SourceDocument::new(format!("page{}", i), common::CAT_PAGE))
        .collect();

    let result = batch
        .process_documents(&sources, |_, _, _| {}, |_| Err(anyhow::anyhow!("disk full")))
        .await;

    assert!(result.is_err());
    assert!(renderer.call_count() < sources.len());
    Ok(())
}

#[tokio::test]
async fn test_extract_documents_withMixedSources_shouldKeepUngatedCounts() -> Result<()> {
    let batch = BatchProcessor::new(common::plain_processor()?, 2);

    let (documents, summary) = batch.extract_documents(&mixed_sources(), |_, _, _| {}).await;

    // Section counts are only gated when samples are generated
    let names: Vec<&str> = documents.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["ls", "cat", "one", "big", "pair"]);
    assert_eq!(summary.accepted, 5);
    assert_eq!(summary.rejected_for(RejectionKind::NonStandard), 1);
    assert_eq!(summary.samples, 0);
    Ok(())
}

#[tokio::test]
async fn test_extract_documents_withSlowFirstDocument_shouldKeepInputOrder() -> Result<()> {
    let processor = common::processor_with(Arc::new(MockRenderer::slow_first(100)))?;
    let batch = BatchProcessor::new(processor, 3);
    let sources = vec![
        SourceDocument::new("ls", common::LS_PAGE),
        SourceDocument::new("cat", common::CAT_PAGE),
    ];

    let (documents, _) = batch.extract_documents(&sources, |_, _, _| {}).await;

    let names: Vec<&str> = documents.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["ls", "cat"]);
    Ok(())
}

#[tokio::test]
async fn test_process_documents_withIntermittentRenderer_shouldCountRendererFailures() -> Result<()> {
    let processor = common::processor_with(Arc::new(MockRenderer::intermittent(2)))?;
    let batch = BatchProcessor::new(processor, 1);
    let sources: Vec<SourceDocument> = (0..4)
        .map(|i| SourceDocument::new(format!("page{}", i), common::CAT_PAGE))
        .collect();

    let summary = batch.process_documents(&sources, |_, _, _| {}, |_| Ok(())).await?;

    assert_eq!(summary.accepted, 2);
    assert_eq!(summary.rejected_for(RejectionKind::Renderer), 2);
    Ok(())
}

#[tokio::test]
async fn test_process_documents_shouldReportProgressForEveryDocument() -> Result<()> {
    let batch = BatchProcessor::new(common::plain_processor()?, 4);
    let seen = Mutex::new(Vec::new());

    batch
        .process_documents(
            &mixed_sources(),
            |current, total, name| {
                assert_eq!(total, 6);
                seen.lock().push((current, name.to_string()));
            },
            |_| Ok(()),
        )
        .await?;

    let mut seen = seen.into_inner();
    seen.sort();
    let counters: Vec<usize> = seen.iter().map(|(current, _)| *current).collect();
    assert_eq!(counters, vec![1, 2, 3, 4, 5, 6]);
    Ok(())
}

#[tokio::test]
async fn test_process_documents_runTwice_shouldProduceIdenticalSamples() -> Result<()> {
    let batch = BatchProcessor::new(common::plain_processor()?, 4);
    let sources = mixed_sources();
    let mut first = Vec::new();
    let mut second = Vec::new();

    let first_summary = batch
        .process_documents(&sources, |_, _, _| {}, |s| {
            first.push(s.clone());
            Ok(())
        })
        .await?;
    let second_summary = batch
        .process_documents(&sources, |_, _, _| {}, |s| {
            second.push(s.clone());
            Ok(())
        })
        .await?;

    assert_eq!(first, second);
    assert_eq!(first_summary, second_summary);
    Ok(())
}

#[test]
fn test_generate_samples_withCountRejections_shouldSkipAndStreamInOrder() -> Result<()> {
    let batch = BatchProcessor::new(common::plain_processor()?, 1);
    let documents = vec![
        Document::from_sections("a", [("NAME", "a"), ("BUGS", "b")]),
        Document::from_sections("single", [("NAME", "only")]),
        Document::from_sections("c", [("NAME", "c"), ("BUGS", "d"), ("NOTES", "e")]),
    ];

    let mut written = Vec::new();
    let summary = batch.generate_samples(&documents, |_, _, _| {}, |sample| {
        written.push(sample.clone());
        Ok(())
    })?;

    assert_eq!(written.len(), 2 + 6);
    assert_eq!(written[0].input, "<SECTION>NAME</SECTION>\na");
    assert_eq!(written[2].input, "<SECTION>NAME</SECTION>\nc");
    assert_eq!(summary.accepted, 2);
    assert_eq!(summary.samples, 8);
    assert_eq!(summary.rejected_for(RejectionKind::SectionCount), 1);
    Ok(())
}

#[test]
fn test_generate_samples_shouldReportProgressPerDocumentIncludingRejected() -> Result<()> {
    let batch = BatchProcessor::new(common::plain_processor()?, 1);
    let documents = vec![
        Document::from_sections("a", [("NAME", "a"), ("BUGS", "b")]),
        Document::from_sections("single", [("NAME", "only")]),
        Document::from_sections("c", [("NAME", "c"), ("BUGS", "d")]),
    ];
    let seen = Mutex::new(Vec::new());

    batch.generate_samples(
        &documents,
        |current, total, name| seen.lock().push((current, total, name.to_string())),
        |_| Ok(()),
    )?;

    assert_eq!(
        seen.into_inner(),
        vec![
            (1, 3, "a".to_string()),
            (2, 3, "single".to_string()),
            (3, 3, "c".to_string()),
        ]
    );
    Ok(())
}

#[test]
fn test_generate_samples_withFailingSink_shouldPropagateError() -> Result<()> {
    let batch = BatchProcessor::new(common::plain_processor()?, 1);
    let documents = vec![Document::from_sections("a", [("NAME", "a"), ("BUGS", "b")])];

    let result = batch.generate_samples(&documents, |_, _, _| {}, |_| Err(anyhow::anyhow!("disk full")));

    assert!(result.is_err());
    Ok(())
}
