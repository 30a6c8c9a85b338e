/*!
 * Section span parsing over raw markup.
 *
 * Finds top-level section header lines (`.SH TITLE`, `.SH "TITLE"`, or `.SH`
 * with the title on the following line) and records where each section's
 * content starts and ends in the raw text.
 */

use anyhow::{Context, Result};
use log::debug;
use regex::Regex;

use crate::app_config::MarkupConfig;
use crate::errors::RejectionReason;

/// A section located in the raw markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSpan {
    pub title: String,
    /// Byte offset just past the header line
    pub start: usize,
    /// Byte offset of the next header, or end of text
    pub end: usize,
}

impl RawSpan {
    /// Raw markup belonging to this section
    pub fn content<'a>(&self, markup: &'a str) -> &'a str {
        &markup[self.start..self.end]
    }
}

/// Scans raw markup for section header markers
#[derive(Debug, Clone)]
pub struct SectionSpanParser {
    header_regex: Regex,
}

impl SectionSpanParser {
    /// Create a parser recognizing the configured section marker
    pub fn new(config: &MarkupConfig) -> Result<Self> {
        let marker = regex::escape(config.section_marker.trim());
        // Title on the next line is tried first so `.SH  \nNAME` is not read as an empty title
        let pattern = format!(
            r"(?m)^[ \t]*{marker}(?:[ \t]*\r?\n([^\n]*)|[ \t]+([^\n]*))$"
        );
        let header_regex = Regex::new(&pattern)
            .with_context(|| format!("Invalid section marker: {}", config.section_marker))?;

        Ok(Self { header_regex })
    }

    /// Parse the ordered section spans of one document.
    ///
    /// Fails with `RejectionReason::ParseFailure` when no header is found.
    pub fn parse(&self, markup: &str) -> Result<Vec<RawSpan>, RejectionReason> {
        // (title, header start, content start)
        let headers: Vec<(String, usize, usize)> = self
            .header_regex
            .captures_iter(markup)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let raw_title = caps.get(1).or_else(|| caps.get(2))?.as_str();
                let title = clean_title(raw_title);
                if title.is_empty() {
                    debug!("Ignoring section marker without a title at offset {}", whole.start());
                    return None;
                }
                Some((title, whole.start(), whole.end()))
            })
            .collect();

        if headers.is_empty() {
            return Err(RejectionReason::ParseFailure);
        }

        let spans = headers
            .iter()
            .enumerate()
            .map(|(i, (title, _, content_start))| {
                let end = headers
                    .get(i + 1)
                    .map(|(_, next_start, _)| *next_start)
                    .unwrap_or(markup.len());
                RawSpan {
                    title: title.clone(),
                    start: *content_start,
                    end,
                }
            })
            .collect();

        Ok(spans)
    }
}

/// Strip surrounding whitespace and quotes from a header title
fn clean_title(raw: &str) -> String {
    raw.trim().trim_matches('"').trim().to_string()
}
