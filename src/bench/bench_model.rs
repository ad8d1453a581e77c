use serde::{Deserialize, Serialize};

use crate::error::{LocatorError, Result};
use crate::matcher::locator_matcher::{MatchDistance, MatchOptions};

/// A recorded set of locators for a page, one entry per user request.
/// Either the expected (ground-truth) side or a candidate generator's output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvalSchema {
    /// Optional human-readable name
    #[serde(default)]
    pub name: Option<String>,

    /// Page the locators were produced for
    pub url: String,

    pub steps: Vec<EvalStep>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvalStep {
    /// Natural-language description of the element
    #[serde(alias = "userRequest")]
    pub user_request: String,

    /// Locators, most likely match first
    #[serde(default, alias = "locatrs")]
    pub locators: Vec<String>,
}

impl EvalSchema {
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| LocatorError::Yaml {
            context: "eval schema".into(),
            source: e,
        })
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.url)
    }
}

/// Load an eval schema from a YAML file.
pub fn load_schema(path: &str) -> Result<EvalSchema> {
    let content = std::fs::read_to_string(path).map_err(|e| LocatorError::Io {
        path: path.to_string(),
        source: e,
    })?;
    EvalSchema::from_yaml(&content)
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BenchOptions {
    pub matcher: MatchOptions,

    /// Largest pixel distance that still counts as a pass; `None` accepts
    /// any related pair
    pub max_distance: Option<f64>,
}

/// Comparison of one expected step with its candidate counterpart.
#[derive(Debug, Clone, Serialize)]
pub struct StepResult {
    /// Position of the step in both schemas (0-indexed)
    pub step_index: usize,

    pub user_request: String,

    pub distance: MatchDistance,

    pub passed: bool,
}

/// Result of comparing a candidate schema against the expected one.
#[derive(Debug, Clone, Serialize)]
pub struct BenchResult {
    pub name: String,

    pub url: String,

    /// Whether every compared step passed
    pub passed: bool,

    pub steps: Vec<StepResult>,

    /// Steps skipped because their user requests differ
    pub skipped: usize,
}
