//! Configuration file loading for edi204.
//!
//! Discovers and loads `edi204.toml` from the working directory.
//! Merges config file settings with CLI arguments (CLI takes precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use edi204_domain::TriageConfig;
use fs_err as fs;
use serde::Deserialize;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "edi204.toml";

/// Top-level configuration from edi204.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Edi204Config {
    /// Verdict policy and input filtering.
    pub policy: PolicyConfig,

    /// Which artifacts to write.
    pub output: OutputConfig,
}

/// Policy section of the config.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Fail the run when any shipment classifies as UNKNOWN.
    pub fail_on_unknown: bool,

    /// Fail the run when any document cannot be loaded.
    pub fail_on_load_error: bool,

    /// Accepted transaction set identifiers. Empty accepts everything.
    pub transaction_sets: Vec<String>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        let triage = TriageConfig::default();
        Self {
            fail_on_unknown: triage.fail_on_unknown,
            fail_on_load_error: triage.fail_on_load_error,
            transaction_sets: triage.transaction_sets,
        }
    }
}

/// Output section of the config.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Write `report.md` next to `report.json`.
    pub markdown: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { markdown: true }
    }
}

/// Discover the edi204.toml config file in `dir`.
pub fn discover_config(dir: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse an edi204.toml config file.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<Edi204Config> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

pub fn parse_config(contents: &str) -> anyhow::Result<Edi204Config> {
    let config: Edi204Config = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load config from `dir`, or return default if not found.
pub fn load_or_default(dir: &Utf8Path) -> anyhow::Result<Edi204Config> {
    match discover_config(dir) {
        Some(path) => load_config(&path),
        None => Ok(Edi204Config::default()),
    }
}

/// Merged configuration combining config file and CLI arguments.
#[derive(Debug, Clone)]
pub struct MergedConfig {
    pub fail_on_unknown: bool,
    pub fail_on_load_error: bool,
    /// From the config file, extended by CLI.
    pub transaction_sets: Vec<String>,
    pub markdown: bool,
}

impl MergedConfig {
    pub fn triage_config(&self) -> TriageConfig {
        TriageConfig {
            fail_on_unknown: self.fail_on_unknown,
            fail_on_load_error: self.fail_on_load_error,
            transaction_sets: self.transaction_sets.clone(),
        }
    }
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: Edi204Config,
}

impl ConfigMerger {
    pub fn new(config: Edi204Config) -> Self {
        Self { config }
    }

    /// Merge with classify command CLI arguments.
    ///
    /// CLI boolean flags can only switch a setting on (or markdown off). CLI transaction sets
    /// extend the config file list.
    pub fn merge_classify_args(
        self,
        cli_fail_on_unknown: bool,
        cli_transaction_sets: &[String],
        cli_no_markdown: bool,
    ) -> MergedConfig {
        let mut transaction_sets = self.config.policy.transaction_sets.clone();
        for set in cli_transaction_sets {
            let set = set.trim();
            if !set.is_empty() && !transaction_sets.iter().any(|s| s == set) {
                transaction_sets.push(set.to_string());
            }
        }

        MergedConfig {
            fail_on_unknown: cli_fail_on_unknown || self.config.policy.fail_on_unknown,
            fail_on_load_error: self.config.policy.fail_on_load_error,
            transaction_sets,
            markdown: self.config.output.markdown && !cli_no_markdown,
        }
    }
}
