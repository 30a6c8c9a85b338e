/*!
 * Tests for the error taxonomy
 */

use std::io;

use manmask::errors::{AppError, RejectionKind, RejectionReason, RendererError, StructuralRejection};

#[test]
fn test_is_transient_shouldOnlyCoverSpawnAndTimeout() {
    assert!(RendererError::Spawn("no such file".to_string()).is_transient());
    assert!(RendererError::Timeout { secs: 30 }.is_transient());
    assert!(!RendererError::Failed { status: Some(1), stderr: String::new() }.is_transient());
    assert!(!RendererError::InvalidOutput("empty output".to_string()).is_transient());
}

#[test]
fn test_kind_shouldBucketEveryReason() {
    let cases = [
        (StructuralRejection::MissingSection("NAME".to_string()).into(), RejectionKind::NonStandard),
        (StructuralRejection::NoStructuralMarkers.into(), RejectionKind::NonStandard),
        (StructuralRejection::TooFewSections { count: 1, min: 2 }.into(), RejectionKind::SectionCount),
        (StructuralRejection::TooManySections { count: 11, max: 10 }.into(), RejectionKind::SectionCount),
        (RejectionReason::ParseFailure, RejectionKind::Parse),
        (RendererError::Timeout { secs: 1 }.into(), RejectionKind::Renderer),
    ];

    for (reason, kind) in cases {
        let reason: RejectionReason = reason;
        assert_eq!(reason.kind(), kind, "wrong kind for {}", reason);
    }
}

#[test]
fn test_display_withRendererFailure_shouldIncludeDiagnostics() {
    let reason = RejectionReason::from(RendererError::Failed {
        status: Some(2),
        stderr: "troff: fatal error".to_string(),
    });
    let message = reason.to_string();
    assert!(message.contains("troff: fatal error"));
    assert!(message.contains("Some(2)"));
}

#[test]
fn test_display_withSectionCount_shouldIncludeCounts() {
    let reason = RejectionReason::from(StructuralRejection::TooManySections { count: 11, max: 10 });
    assert!(reason.to_string().contains("11 > 10"));
}

#[test]
fn test_app_error_fromIoError_shouldBeFileError() {
    let error: AppError = io::Error::new(io::ErrorKind::NotFound, "missing").into();
    assert!(matches!(error, AppError::File(_)));
}

#[test]
fn test_app_error_display_shouldNameTheFailingArea() {
    let error = AppError::Config("max_sections (1) must not be below min_sections (2)".to_string());
    assert_eq!(
        error.to_string(),
        "Configuration error: max_sections (1) must not be below min_sections (2)"
    );
}

#[test]
fn test_rejection_kind_ordering_shouldBeStable() {
    let mut kinds = vec![RejectionKind::Renderer, RejectionKind::NonStandard, RejectionKind::Parse];
    kinds.sort();
    assert_eq!(kinds, vec![RejectionKind::NonStandard, RejectionKind::Parse, RejectionKind::Renderer]);
}
