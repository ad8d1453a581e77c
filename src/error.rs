use thiserror::Error;

/// Errors raised while loading pages, resolving locators or running benchmarks.
///
/// Expected negative outcomes (an invalid root, an unresolvable locator, two
/// locators with no relation) are not errors: the public entry points turn
/// them into `None`, empty lists or `MatchDistance::Unrelated`.
#[derive(Debug, Error)]
pub enum LocatorError {
    /// CSS-like chain could not be parsed
    #[error("malformed selector '{selector}': {reason}")]
    MalformedSelector { selector: String, reason: String },

    /// Hierarchical path could not be parsed
    #[error("malformed path '{path}': {reason}")]
    MalformedPath { path: String, reason: String },

    /// Nothing is rendered under the given page coordinate
    #[error("no element at location ({x}, {y})")]
    NoElementAtPoint { x: f64, y: f64 },

    /// Snapshot JSON could not be parsed
    #[error("invalid page snapshot ({context}): {source}")]
    Snapshot {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// YAML schema or config could not be parsed
    #[error("invalid YAML ({context}): {source}")]
    Yaml {
        context: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Capture script could not be started
    #[error("failed to spawn {script} (is Node.js installed?): {source}")]
    CaptureSpawn {
        script: String,
        #[source]
        source: std::io::Error,
    },

    /// Capture script exited with a failure status
    #[error("{script} exited with {status}: {stderr}")]
    CaptureFailed {
        script: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    /// Two benchmark schemas do not describe the same page
    #[error("schema mismatch: expected url '{expected}', candidate url '{candidate}'")]
    SchemaMismatch { expected: String, candidate: String },
}

impl LocatorError {
    pub(crate) fn selector(selector: &str, reason: impl Into<String>) -> Self {
        LocatorError::MalformedSelector {
            selector: selector.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn path(path: &str, reason: impl Into<String>) -> Self {
        LocatorError::MalformedPath {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LocatorError>;
