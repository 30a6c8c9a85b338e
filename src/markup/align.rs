/*!
 * Alignment of parsed sections onto rendered text.
 *
 * Raw markup offsets say nothing about where a section lands in the rendered
 * output, so sections are re-located by title. Titles are searched in document
 * order with a cursor that only moves forward: each title is matched at its
 * first occurrence at or after the end of the previous match. A title that a
 * plain independent search would find earlier in the text (a title repeated in
 * prose, or one title being a prefix of another) therefore cannot pull a
 * section out of order.
 *
 * Titles that cannot be found are reported as gaps and dropped; the previous
 * section then runs up to the next title that was found.
 */

use std::ops::Range;

use crate::document::Document;

use super::spans::RawSpan;

/// A section located in the rendered text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedSection {
    pub title: String,
    /// Byte offset of the title occurrence
    pub title_offset: usize,
    /// Content byte range, starting right after the title occurrence
    pub content: Range<usize>,
}

impl AlignedSection {
    pub fn text<'a>(&self, rendered: &'a str) -> &'a str {
        &rendered[self.content.clone()]
    }
}

/// A title that could not be located at or after the cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentGap {
    pub title: String,
    /// Cursor position when the search failed
    pub cursor: usize,
}

/// Result of aligning one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    pub sections: Vec<AlignedSection>,
    pub gaps: Vec<AlignmentGap>,
}

impl Alignment {
    /// Build the document mapping from the aligned sections, content trimmed
    pub fn to_document(&self, name: &str, rendered: &str) -> Document {
        Document::from_sections(
            name,
            self.sections
                .iter()
                .map(|section| (section.title.as_str(), section.text(rendered).trim())),
        )
    }
}

/// Forward-only search position in the rendered text
#[derive(Debug, Clone)]
pub struct AlignmentCursor<'a> {
    text: &'a str,
    position: usize,
}

impl<'a> AlignmentCursor<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, position: 0 }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Find `needle` at or after the cursor.
    ///
    /// On success the cursor moves past the match and the match range is
    /// returned; on failure the cursor does not move.
    pub fn seek(&mut self, needle: &str) -> Option<Range<usize>> {
        if needle.is_empty() {
            return None;
        }
        let found = self.text[self.position..].find(needle)?;
        let start = self.position + found;
        let end = start + needle.len();
        self.position = end;
        Some(start..end)
    }
}

/// Maps raw section spans onto rendered text
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderedTextAligner;

impl RenderedTextAligner {
    /// Align the titles of `spans` against `rendered`.
    ///
    /// A title repeated in the spans is aligned once, at its first position.
    pub fn align(spans: &[RawSpan], rendered: &str) -> Alignment {
        let mut titles: Vec<&str> = Vec::with_capacity(spans.len());
        for span in spans {
            if !titles.contains(&span.title.as_str()) {
                titles.push(&span.title);
            }
        }

        let mut cursor = AlignmentCursor::new(rendered);
        let mut located: Vec<(&str, Range<usize>)> = Vec::with_capacity(titles.len());
        let mut gaps = Vec::new();

        for title in titles {
            let at = cursor.position();
            match cursor.seek(title) {
                Some(found) => located.push((title, found)),
                None => gaps.push(AlignmentGap {
                    title: title.to_string(),
                    cursor: at,
                }),
            }
        }

        let sections = located
            .iter()
            .enumerate()
            .map(|(i, (title, found))| {
                let content_end = located
                    .get(i + 1)
                    .map(|(_, next)| next.start)
                    .unwrap_or(rendered.len());
                AlignedSection {
                    title: title.to_string(),
                    title_offset: found.start,
                    content: found.end..content_end,
                }
            })
            .collect();

        Alignment { sections, gaps }
    }
}
