/*!
 * Mock renderer implementations for testing.
 *
 * - `MockRenderer::plain()` - Renders markup with a tiny built-in formatter
 * - `MockRenderer::fixed(text)` - Always returns the given text
 * - `MockRenderer::failing()` - Always fails with a non-transient error
 * - `MockRenderer::transient(n)` - Times out `n` times, then renders
 * - `MockRenderer::slow_first(ms)` - Delays only the first call, then renders
 */

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::errors::RendererError;

use super::Renderer;

/// Behavior mode for the mock renderer
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Strip macros and keep text
    Plain,
    /// Return the same text for every document
    Fixed(String),
    /// Always fail
    Failing,
    /// Fail with a transient error for the first `failures` calls
    Transient { failures: usize },
    /// Fail every Nth call
    Intermittent { fail_every: usize },
    /// Sleep before answering the first call only
    SlowFirst { millis: u64 },
}

/// Mock renderer for testing pipeline behavior
#[derive(Debug, Clone)]
pub struct MockRenderer {
    behavior: MockBehavior,
    call_count: Arc<AtomicUsize>,
}

impl MockRenderer {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn plain() -> Self {
        Self::new(MockBehavior::Plain)
    }

    pub fn fixed(text: impl Into<String>) -> Self {
        Self::new(MockBehavior::Fixed(text.into()))
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    pub fn transient(failures: usize) -> Self {
        Self::new(MockBehavior::Transient { failures })
    }

    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    pub fn slow_first(millis: u64) -> Self {
        Self::new(MockBehavior::SlowFirst { millis })
    }

    /// Number of render calls so far
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Minimal man-macro formatter.
    ///
    /// `.SH` lines become their title, other request lines keep only their
    /// arguments, comments are dropped and common font escapes removed.
    pub fn render_plain(markup: &str) -> String {
        let mut rendered = Vec::new();
        for line in markup.lines() {
            let trimmed = line.trim_start();
            if trimmed.starts_with(".\\\"") || trimmed.starts_with(".TH") {
                continue;
            }
            let text = match trimmed.strip_prefix('.') {
                Some(request) => match request.split_once(char::is_whitespace) {
                    Some((_, args)) => args.trim().trim_matches('"').to_string(),
                    None => continue,
                },
                None => line.to_string(),
            };
            rendered.push(
                text.replace("\\fB", "")
                    .replace("\\fI", "")
                    .replace("\\fR", "")
                    .replace("\\fP", "")
                    .replace("\\-", "-"),
            );
        }
        rendered.join("\n")
    }
}

#[async_trait]
impl Renderer for MockRenderer {
    async fn render(&self, markup: &str) -> Result<String, RendererError> {
        let call = self.call_count.fetch_add(1, Ordering::SeqCst) + 1;

        match &self.behavior {
            MockBehavior::Plain => Ok(Self::render_plain(markup)),
            MockBehavior::Fixed(text) => Ok(text.clone()),
            MockBehavior::Failing => Err(RendererError::Failed {
                status: Some(1),
                stderr: "mock renderer failure".to_string(),
            }),
            MockBehavior::Transient { failures } => {
                if call <= *failures {
                    Err(RendererError::Timeout { secs: 0 })
                } else {
                    Ok(Self::render_plain(markup))
                }
            }
            MockBehavior::Intermittent { fail_every } => {
                if *fail_every > 0 && call % fail_every == 0 {
                    Err(RendererError::Failed {
                        status: Some(1),
                        stderr: format!("mock failure on call {}", call),
                    })
                } else {
                    Ok(Self::render_plain(markup))
                }
            }
            MockBehavior::SlowFirst { millis } => {
                if call == 1 {
                    tokio::time::sleep(Duration::from_millis(*millis)).await;
                }
                Ok(Self::render_plain(markup))
            }
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
