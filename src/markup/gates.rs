/*!
 * Cheap structural gates applied before and after alignment.
 */

use crate::app_config::{MarkupConfig, SectionBounds};
use crate::errors::StructuralRejection;

/// Pre-filter on raw markup, run before the renderer is invoked
#[derive(Debug, Clone)]
pub struct DocumentValidityGate {
    /// Upper-cased mandatory titles
    required_sections: Vec<String>,
    structural_markers: Vec<String>,
}

impl DocumentValidityGate {
    pub fn new(config: &MarkupConfig) -> Self {
        Self {
            required_sections: config
                .required_sections
                .iter()
                .map(|s| s.to_uppercase())
                .collect(),
            structural_markers: config.structural_markers.clone(),
        }
    }

    /// Accept when every mandatory title appears (case-insensitive) and at
    /// least one structural marker appears (case-sensitive).
    pub fn check(&self, markup: &str) -> Result<(), StructuralRejection> {
        let upper = markup.to_uppercase();
        if let Some(missing) = self
            .required_sections
            .iter()
            .find(|section| !upper.contains(section.as_str()))
        {
            return Err(StructuralRejection::MissingSection(missing.clone()));
        }

        if !self
            .structural_markers
            .iter()
            .any(|marker| markup.contains(marker.as_str()))
        {
            return Err(StructuralRejection::NoStructuralMarkers);
        }

        Ok(())
    }
}

/// Bounds the number of sections a document may have to be split
#[derive(Debug, Clone, Copy)]
pub struct SectionCountGate {
    bounds: SectionBounds,
}

impl SectionCountGate {
    pub fn new(bounds: SectionBounds) -> Self {
        Self { bounds }
    }

    pub fn check(&self, count: usize) -> Result<(), StructuralRejection> {
        if count < self.bounds.min_sections {
            return Err(StructuralRejection::TooFewSections {
                count,
                min: self.bounds.min_sections,
            });
        }
        if count > self.bounds.max_sections {
            return Err(StructuralRejection::TooManySections {
                count,
                max: self.bounds.max_sections,
            });
        }
        Ok(())
    }
}
