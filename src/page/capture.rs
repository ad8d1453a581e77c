use std::process::Command;

use tracing::{debug, warn};

use crate::error::{LocatorError, Result};
use crate::page::document::Document;
use crate::page::snapshot::PageSnapshot;

/// How to run the snapshot capture script.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureCommand {
    /// Node.js binary
    pub node: String,
    /// Script that loads a URL and prints a `PageSnapshot` as JSON on stdout
    pub script: String,
}

impl Default for CaptureCommand {
    fn default() -> Self {
        Self {
            node: "node".to_string(),
            script: "capture/snapshot.js".to_string(),
        }
    }
}

/// Load `url` in a headless browser through the capture script and freeze the
/// rendered page into a `Document`.
pub fn capture_snapshot(command: &CaptureCommand, url: &str) -> Result<Document> {
    debug!(script = %command.script, url, "capturing page snapshot");

    let output = Command::new(&command.node)
        .arg(&command.script)
        .arg(url)
        .output()
        .map_err(|e| LocatorError::CaptureSpawn {
            script: command.script.clone(),
            source: e,
        })?;

    let stderr = String::from_utf8_lossy(&output.stderr);
    if !output.status.success() {
        return Err(LocatorError::CaptureFailed {
            script: command.script.clone(),
            status: output.status,
            stderr: stderr.trim().to_string(),
        });
    }
    if !stderr.trim().is_empty() {
        warn!(script = %command.script, "{}", stderr.trim());
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(PageSnapshot::from_json(stdout.trim())?.into_document())
}
