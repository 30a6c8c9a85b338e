/*!
 * Markup processing: section span parsing, alignment onto rendered text,
 * and the structural gates.
 *
 * - `spans`: Finds section headers in raw markup
 * - `align`: Relocates sections in the rendered text
 * - `gates`: Validity and section-count gates
 */

pub mod align;
pub mod gates;
pub mod spans;

pub use align::{AlignedSection, Alignment, AlignmentCursor, AlignmentGap, RenderedTextAligner};
pub use gates::{DocumentValidityGate, SectionCountGate};
pub use spans::{RawSpan, SectionSpanParser};
