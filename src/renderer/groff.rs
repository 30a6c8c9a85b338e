/*!
 * Process-backed renderer.
 *
 * Feeds markup to an external formatter (by default `groff -Tutf8 -man`) on
 * stdin and reads the rendered text from stdout. The child is killed if the
 * render future is dropped, so callers can bound it with a timeout.
 */

use async_trait::async_trait;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::app_config::RendererConfig;
use crate::errors::RendererError;

use super::Renderer;

// @const: Terminal escape sequences (CSI and two-byte forms)
static ANSI_ESCAPE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\x1B(?:[@-Z\\-_]|\[[0-?]*[ -/]*[@-~])").expect("Invalid ANSI escape regex")
});

// @const: Overstrike pairs used for bold and underline (`c\bc`, `_\bc`)
static OVERSTRIKE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^\x08\n]\x08").expect("Invalid overstrike regex")
});

/// Remove terminal formatting from rendered text
pub fn clean_terminal_output(text: &str) -> String {
    let without_escapes = ANSI_ESCAPE_REGEX.replace_all(text, "");
    OVERSTRIKE_REGEX.replace_all(&without_escapes, "").into_owned()
}

/// Renderer that shells out to a formatter
#[derive(Debug, Clone)]
pub struct GroffRenderer {
    command: String,
    args: Vec<String>,
    strip_ansi: bool,
}

impl GroffRenderer {
    pub fn new(config: &RendererConfig) -> Self {
        Self {
            command: config.command.clone(),
            args: config.args.clone(),
            strip_ansi: config.strip_ansi,
        }
    }
}

#[async_trait]
impl Renderer for GroffRenderer {
    async fn render(&self, markup: &str) -> Result<String, RendererError> {
        let mut child = Command::new(&self.command)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| RendererError::Spawn(format!("{}: {}", self.command, e)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| RendererError::Spawn("renderer stdin unavailable".to_string()))?;

        // stdin is written while stdout is drained so large pages cannot deadlock on the pipe
        let write_input = async move {
            stdin.write_all(markup.as_bytes()).await?;
            stdin.shutdown().await
        };
        let (write_result, output) = tokio::join!(write_input, child.wait_with_output());

        let output = output.map_err(|e| RendererError::Spawn(e.to_string()))?;

        if !output.status.success() {
            return Err(RendererError::Failed {
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        if let Err(e) = write_result {
            // The formatter may exit before reading all input; its exit status decides
            debug!("Renderer closed stdin early: {}", e);
        }

        let text = String::from_utf8_lossy(&output.stdout);
        if text.trim().is_empty() {
            return Err(RendererError::InvalidOutput("empty output".to_string()));
        }

        Ok(if self.strip_ansi {
            clean_terminal_output(&text)
        } else {
            text.into_owned()
        })
    }

    fn name(&self) -> &str {
        &self.command
    }
}
