//! Configuration module for prlens
//!
//! Loads project configuration from a `prlens.toml` in the analysis root:
//! - tool name -> data directory map
//! - classifier rule overrides (versioned allowlist)
//! - output directory for CSV artifacts
//! - intervention detection window
//!
//! ```toml
//! # prlens.toml
//!
//! [tools]
//! claude_code = "claude_code"
//! copilot = "copilot"
//! cursor = "cursor"
//!
//! [classifier]
//! extend = true
//! bot_logins = ["acme-release-bot"]
//! body_markers = ["generated by acme assistant"]
//!
//! [output]
//! dir = "results"
//!
//! [intervention]
//! window_hours = 72
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = "prlens.toml";

/// Tool directories analyzed when no config file names any.
pub const DEFAULT_TOOLS: &[&str] = &["claude_code", "copilot", "cursor"];

/// Project configuration, all sections optional.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Tool name -> data directory (relative paths resolve against the
    /// analysis root). BTreeMap keeps report ordering deterministic.
    #[serde(default)]
    pub tools: BTreeMap<String, PathBuf>,

    #[serde(default)]
    pub classifier: ClassifierConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub intervention: InterventionConfig,
}

/// Classifier rule overrides; see `classifier::Classifier::from_config`.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierConfig {
    /// Extend the built-in rule set (true) or replace it (false).
    #[serde(default = "default_true")]
    pub extend: bool,

    /// Extra bot login substrings.
    #[serde(default)]
    pub bot_logins: Vec<String>,

    /// Extra login regex patterns.
    #[serde(default)]
    pub bot_patterns: Vec<String>,

    /// Extra PR-body generated-by markers.
    #[serde(default)]
    pub body_markers: Vec<String>,

    /// Override the reported rule-set version.
    #[serde(default)]
    pub ruleset_version: Option<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            extend: true,
            bot_logins: Vec::new(),
            bot_patterns: Vec::new(),
            body_markers: Vec::new(),
            ruleset_version: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory the CSV artifacts are written to.
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InterventionConfig {
    /// Maximum hours between an AI comment and the human commit that counts
    /// as reacting to it.
    #[serde(default = "default_window_hours")]
    pub window_hours: f64,
}

impl Default for InterventionConfig {
    fn default() -> Self {
        Self {
            window_hours: default_window_hours(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("results")
}

fn default_window_hours() -> f64 {
    72.0
}

impl Config {
    /// Load `prlens.toml` from the analysis root; defaults when absent.
    /// A present-but-invalid config is an error, not a silent fallback.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE_NAME);
        if !path.exists() {
            debug!("no {} found, using defaults", CONFIG_FILE_NAME);
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Config =
            toml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
        debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Tool name/directory pairs, resolved against the analysis root.
    pub fn tool_dirs(&self, root: &Path) -> Vec<(String, PathBuf)> {
        if self.tools.is_empty() {
            return DEFAULT_TOOLS
                .iter()
                .map(|name| ((*name).to_string(), root.join(name)))
                .collect();
        }
        self.tools
            .iter()
            .map(|(name, dir)| {
                let resolved = if dir.is_absolute() {
                    dir.clone()
                } else {
                    root.join(dir)
                };
                (name.clone(), resolved)
            })
            .collect()
    }
}

/// Commented example config written by `prlens init`.
pub const EXAMPLE_CONFIG: &str = r#"# prlens configuration
#
# Tool contexts to compare. Each entry maps a display name to the directory
# holding that tool's exported GitHub data (prs.json, pr_commits.json, ...).
[tools]
claude_code = "claude_code"
copilot = "copilot"
cursor = "cursor"

# AI/bot classification rules. The built-in, versioned rule set covers the
# common bot accounts; add dataset-specific ones here instead of editing it.
[classifier]
extend = true
bot_logins = []
bot_patterns = []
body_markers = []

[output]
dir = "results"

[intervention]
# An AI comment followed by a human commit within this window counts as an
# intervention.
window_hours = 72
"#;
