/*!
 * Renderer implementations turning markup into plain text.
 *
 * - `groff`: Runs an external formatter process
 * - `mock`: Deterministic in-process renderer for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::RendererError;

/// Common trait for all renderers
///
/// A renderer must keep every section title verbatim and in document order in
/// its output; alignment relies on it.
#[async_trait]
pub trait Renderer: Send + Sync + Debug {
    /// Render one document's markup to plain text
    ///
    /// # Arguments
    /// * `markup` - Raw markup of a single document
    ///
    /// # Returns
    /// * `Result<String, RendererError>` - The rendered text or an error
    async fn render(&self, markup: &str) -> Result<String, RendererError>;

    /// Short name used in log messages
    fn name(&self) -> &str;
}

pub mod groff;
pub mod mock;

pub use groff::GroffRenderer;
pub use mock::MockRenderer;
