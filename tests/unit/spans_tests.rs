/*!
 * Tests for section header parsing
 */

use manmask::app_config::MarkupConfig;
use manmask::errors::RejectionReason;
use manmask::markup::SectionSpanParser;

use crate::common;

fn parser() -> SectionSpanParser {
    SectionSpanParser::new(&MarkupConfig::default()).unwrap()
}

fn titles(markup: &str) -> Vec<String> {
    parser()
        .parse(markup)
        .unwrap()
        .into_iter()
        .map(|span| span.title)
        .collect()
}

#[test]
fn test_parse_withLsPage_shouldFindTitlesInOrder() {
    assert_eq!(titles(common::LS_PAGE), vec!["NAME", "SYNOPSIS", "DESCRIPTION", "SEE ALSO"]);
}

#[test]
fn test_parse_withQuotedTitle_shouldStripQuotes() {
    let spans = parser().parse(".SH \"RETURN VALUE\"\nzero on success\n").unwrap();
    assert_eq!(spans[0].title, "RETURN VALUE");
}

#[test]
fn test_parse_withTitleOnNextLine_shouldUseNextLine() {
    assert_eq!(titles(".SH\nNAME\nfoo \\- bar\n.SH\nEXIT STATUS\n0\n"), vec!["NAME", "EXIT STATUS"]);
}

#[test]
fn test_parse_withSubsectionMarker_shouldIgnoreIt() {
    let markup = ".SH OPTIONS\n.SS General\n-a\n.SH BUGS\nnone\n";
    assert_eq!(titles(markup), vec!["OPTIONS", "BUGS"]);
}

#[test]
fn test_parse_withContentRanges_shouldCoverUpToNextHeader() {
    let markup = ".SH NAME\nfoo \\- bar\n.SH BUGS\nnone\n";
    let spans = parser().parse(markup).unwrap();

    assert_eq!(spans.len(), 2);
    assert_eq!(spans[0].content(markup), "\nfoo \\- bar\n");
    assert_eq!(spans[1].content(markup), "\nnone\n");
    assert!(spans[0].end <= spans[1].start);
}

#[test]
fn test_parse_withNoMarkers_shouldFailWithParseFailure() {
    let result = parser().parse(common::PLAIN_TEXT);
    assert_eq!(result, Err(RejectionReason::ParseFailure));
}

#[test]
fn test_parse_withAlternateMarker_shouldUseConfiguredMarker() {
    let config = MarkupConfig {
        section_marker: ".Sh".to_string(),
        ..MarkupConfig::default()
    };
    let parser = SectionSpanParser::new(&config).unwrap();
    let spans = parser.parse(".Dd today\n.Sh NAME\nfoo\n.Sh DESCRIPTION\nbar\n").unwrap();

    let titles: Vec<&str> = spans.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["NAME", "DESCRIPTION"]);
}
