use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::classify::visibility::VisibilityPolicy;
use crate::matcher::locator_matcher::MatchOptions;
use crate::page::capture::CaptureCommand;
use crate::selector::synthesizer::SelectorOrder;
use crate::tree::tree_model::ExtractOptions;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "element-identity",
    version,
    about = "Extract a page's interactive surface with stable element identities"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: element-identity.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

/// Where the page comes from.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct PageSource {
    /// Page snapshot JSON file
    #[arg(long, conflicts_with = "url")]
    pub snapshot: Option<String>,

    /// URL to capture through the Node.js capture script
    #[arg(long)]
    pub url: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the pruned element tree as JSON
    Tree {
        #[command(flatten)]
        source: PageSource,

        /// Visibility rule for style-hidden elements
        #[arg(long, value_enum)]
        visibility: Option<VisibilityArg>,

        /// Which selector feeds the identity hash
        #[arg(long, value_enum)]
        selector_order: Option<SelectorOrderArg>,
    },

    /// Print the identity-to-selectors map for every element
    Ids {
        #[command(flatten)]
        source: PageSource,

        #[arg(long, value_enum)]
        selector_order: Option<SelectorOrderArg>,
    },

    /// Compare two locator sets against the page
    Compare {
        #[command(flatten)]
        source: PageSource,

        /// First locator set (repeatable, most likely match first)
        #[arg(short = 'a', long = "locator-a", required = true)]
        locators_a: Vec<String>,

        /// Second locator set (repeatable, most likely match first)
        #[arg(short = 'b', long = "locator-b", required = true)]
        locators_b: Vec<String>,

        /// Ancestor steps allowed between related elements
        #[arg(long)]
        hop_budget: Option<usize>,
    },

    /// Print the absolute path of the element under a coordinate
    Locate {
        #[command(flatten)]
        source: PageSource,

        #[arg(long, allow_negative_numbers = true)]
        x: f64,

        #[arg(long, allow_negative_numbers = true)]
        y: f64,
    },

    /// Check whether a CSS selector resolves to at least one element
    Validate {
        #[command(flatten)]
        source: PageSource,

        /// Selector to check
        locator: String,
    },

    /// Benchmark candidate locators against expected ones
    Bench {
        /// Expected schema YAML file, or directory of YAML files
        #[arg(long)]
        expected: String,

        /// Candidate schema YAML file, or directory with same-named files
        #[arg(long)]
        candidate: String,

        /// Snapshot file, or directory of `<schema-name>.json` snapshots.
        /// Pages are captured from the schema URL when omitted.
        #[arg(long)]
        snapshot: Option<String>,

        /// Largest pixel distance counted as a pass
        #[arg(long)]
        max_distance: Option<f64>,

        /// Ancestor steps allowed between related elements
        #[arg(long)]
        hop_budget: Option<usize>,

        /// Output format: console, json
        #[arg(long, default_value = "console")]
        format: String,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityArg {
    StyleGated,
    ChildrenOverride,
}

impl From<VisibilityArg> for VisibilityPolicy {
    fn from(arg: VisibilityArg) -> Self {
        match arg {
            VisibilityArg::StyleGated => VisibilityPolicy::StyleGated,
            VisibilityArg::ChildrenOverride => VisibilityPolicy::ChildrenOverride,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorOrderArg {
    PositionFirst,
    IdFirst,
}

impl From<SelectorOrderArg> for SelectorOrder {
    fn from(arg: SelectorOrderArg) -> Self {
        match arg {
            SelectorOrderArg::PositionFirst => SelectorOrder::PositionFirst,
            SelectorOrderArg::IdFirst => SelectorOrder::IdFirst,
        }
    }
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `element-identity.yaml`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub extract: ExtractOptions,
    #[serde(default)]
    pub matcher: MatchOptions,
    #[serde(default)]
    pub capture: CaptureConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaptureConfig {
    #[serde(default = "default_node")]
    pub node: String,

    #[serde(default = "default_script")]
    pub script: String,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            node: default_node(),
            script: default_script(),
        }
    }
}

impl CaptureConfig {
    pub fn command(&self) -> CaptureCommand {
        CaptureCommand {
            node: self.node.clone(),
            script: self.script.clone(),
        }
    }
}

// Serde default helpers
fn default_node() -> String { CaptureCommand::default().node }
fn default_script() -> String { CaptureCommand::default().script }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("element-identity.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_else(|e| {
            warn!(path = config_path, error = %e, "ignoring malformed config file");
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Option Builders (merge CLI args with config file)
// ============================================================================

/// Extraction options: CLI flags override the config file.
pub fn build_extract_options(
    config: &AppConfig,
    visibility: Option<VisibilityArg>,
    selector_order: Option<SelectorOrderArg>,
) -> ExtractOptions {
    ExtractOptions {
        visibility: visibility.map(Into::into).unwrap_or(config.extract.visibility),
        selector_order: selector_order
            .map(Into::into)
            .unwrap_or(config.extract.selector_order),
    }
}

pub fn build_match_options(config: &AppConfig, hop_budget: Option<usize>) -> MatchOptions {
    MatchOptions {
        hop_budget: hop_budget.unwrap_or(config.matcher.hop_budget),
    }
}
