/*!
 * Rendering of a split into one dataset record.
 */

use crate::app_config::TagConfig;
use crate::document::{Document, SampleRecord};

use super::combinations::Combination;

/// Turns (document, split) pairs into tagged input/output strings
#[derive(Debug, Clone)]
pub struct SampleSerializer {
    tags: TagConfig,
}

impl SampleSerializer {
    pub fn new(tags: TagConfig) -> Self {
        Self { tags }
    }

    /// Serialize one split.
    ///
    /// Each side lists its sections in document order regardless of the order
    /// of titles in the combination. Titles not in the document are skipped.
    pub fn serialize(&self, document: &Document, combination: &Combination) -> SampleRecord {
        SampleRecord {
            input: self.render_side(document, &combination.input_titles),
            output: self.render_side(document, &combination.output_titles),
        }
    }

    fn render_side(&self, document: &Document, titles: &[String]) -> String {
        document
            .sections()
            .iter()
            .filter(|section| titles.contains(&section.title))
            .map(|section| {
                format!(
                    "{}{}{}\n{}",
                    self.tags.open,
                    section.title,
                    self.tags.close,
                    section.content.trim()
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
