use crate::compare::Pairing;
use crate::eval::Metric;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ragdash: RagdashConfig,
    pub data: DataConfig,
    #[serde(default)]
    pub pairing: Pairing,
    #[serde(default)]
    pub finetuned: Option<FinetunedConfig>,
    #[serde(default)]
    pub quantized: Option<QuantizedConfig>,
}

/// ragdash-specific configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RagdashConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for RagdashConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Result table locations
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// Directory of base (no retrieval) result tables.
    pub base_dir: PathBuf,
    /// Directory of retrieval-augmented result tables.
    pub variant_dir: PathBuf,
}

/// Held-out fine-tuned result file compared against one base model
#[derive(Debug, Clone, Deserialize)]
pub struct FinetunedConfig {
    pub path: PathBuf,
    /// Base model the fine-tuned record is compared against.
    #[serde(default = "default_finetuned_baseline")]
    pub baseline: String,
    /// Row key of the fine-tuned entry in the delta table.
    #[serde(default = "default_finetuned_key")]
    pub key: String,
}

/// Quantized variants of one model, shown alongside its base/RAG comparison
#[derive(Debug, Clone, Deserialize)]
pub struct QuantizedConfig {
    #[serde(default = "default_finetuned_baseline")]
    pub model: String,
    /// Label (e.g. `4bit`) → result file.
    #[serde(default)]
    pub variants: BTreeMap<String, PathBuf>,
}

impl QuantizedConfig {
    pub fn applies_to(&self, model: &str) -> bool {
        self.model.eq_ignore_ascii_case(model)
    }

    /// Metrics the quantized builds of this model are not scored on.
    pub fn untracked_metrics(&self, model: &str) -> &'static [Metric] {
        if self.applies_to(model) {
            &[Metric::Hallucination]
        } else {
            &[]
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_finetuned_baseline() -> String {
    "falcon".to_string()
}

fn default_finetuned_key() -> String {
    "falcon_finetuned".to_string()
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in RAGDASH_CONFIG environment variable
    /// 2. ./config.toml in current directory
    pub fn load() -> Result<Self> {
        // .env is optional
        let _ = dotenv::dotenv();

        let config_path = std::env::var("RAGDASH_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.toml"));

        Self::from_path(&config_path)
    }

    /// Load and validate configuration from an explicit path
    pub fn from_path(config_path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        Self::from_toml(&config_str)
            .with_context(|| format!("Invalid config file: {}", config_path.display()))
    }

    /// Parse and validate configuration text
    pub fn from_toml(config_str: &str) -> Result<Self> {
        let config: Config = toml::from_str(config_str).context("Failed to parse config TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        for (key, dir) in [
            ("data.base_dir", &self.data.base_dir),
            ("data.variant_dir", &self.data.variant_dir),
        ] {
            if !dir.exists() {
                anyhow::bail!(
                    "{} path does not exist: {}. Point it at a directory of result CSV files.",
                    key,
                    dir.display()
                );
            }
            if !dir.is_dir() {
                anyhow::bail!("{} must be a directory, not a file: {}", key, dir.display());
            }
        }

        if let Some(finetuned) = &self.finetuned {
            if finetuned.key.trim().is_empty() {
                anyhow::bail!("finetuned.key must not be empty");
            }
            if finetuned.baseline.trim().is_empty() {
                anyhow::bail!("finetuned.baseline must not be empty");
            }
        }

        Ok(())
    }

    pub fn base_dir(&self) -> &Path {
        &self.data.base_dir
    }

    pub fn variant_dir(&self) -> &Path {
        &self.data.variant_dir
    }

    /// Metrics left out of the dumbbell chart for `model`.
    pub fn dumbbell_exclusions(&self, model: &str) -> &'static [Metric] {
        match &self.quantized {
            Some(q) => q.untracked_metrics(model),
            None => &[],
        }
    }
}
