//! Catalog configuration via `pipebench.toml`
//!
//! Every field has a default, so an empty file (or no file) yields the
//! stock catalog: 500 documents per collection, 12,000 character padding
//! and strict count checking.

use crate::context::SeedPolicy;
use crate::generators::DEFAULT_PADDING_LEN;
use crate::populator::{CountCheck, DEFAULT_N_DOCS};
use pipebench_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "pipebench.toml";

/// Prefix prepended to every test case name.
pub const DEFAULT_NAME_PREFIX: &str = "Aggregation.";

/// Tags every builder-made test case carries unless overridden.
pub const DEFAULT_TAGS: [&str; 3] = ["aggregation", "core", "regression"];

/// Catalog settings loaded from `pipebench.toml`.
///
/// # Example
///
/// ```toml
/// n_docs = 500
/// padding_len = 12000
/// name_prefix = "Aggregation."
/// default_tags = ["aggregation", "core", "regression"]
/// count_check = "strict"
/// # seed = 258
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Documents per populated collection.
    #[serde(default = "default_n_docs")]
    pub n_docs: usize,
    /// Length of the filler string in default documents.
    #[serde(default = "default_padding_len")]
    pub padding_len: usize,
    /// Prefix for test case names.
    #[serde(default = "default_name_prefix")]
    pub name_prefix: String,
    /// Tags applied when a case does not set its own.
    #[serde(default = "default_tags")]
    pub default_tags: Vec<String>,
    /// `"strict"` (fail on short bulk writes) or `"lenient"` (warn only).
    #[serde(default)]
    pub count_check: CountCheck,
    /// Seed for every populator that would otherwise use fresh entropy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_n_docs() -> usize {
    DEFAULT_N_DOCS
}

fn default_padding_len() -> usize {
    DEFAULT_PADDING_LEN
}

fn default_name_prefix() -> String {
    DEFAULT_NAME_PREFIX.to_string()
}

fn default_tags() -> Vec<String> {
    DEFAULT_TAGS.iter().map(|t| t.to_string()).collect()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            n_docs: default_n_docs(),
            padding_len: default_padding_len(),
            name_prefix: default_name_prefix(),
            default_tags: default_tags(),
            count_check: CountCheck::default(),
            seed: None,
        }
    }
}

impl Settings {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# pipebench catalog configuration

# Documents inserted into each populated collection (default: 500)
n_docs = 500

# Length of the filler string in padded documents (default: 12000)
padding_len = 12000

# Prefix for every test case name
name_prefix = "Aggregation."

# Tags for cases that do not declare their own
default_tags = ["aggregation", "core", "regression"]

# What to do when a bulk insert leaves fewer documents than requested:
#   "strict"  = fail the setup (default)
#   "lenient" = log a warning and continue
count_check = "strict"

# Fixed seed for populators that would otherwise seed from fresh entropy.
# Cases with their own fixed seed keep it.
# seed = 258
"#
    }

    /// Seed policy for a populator that declared `own`
    ///
    /// A configured `seed` replaces fresh seeding; fixed seeds are kept.
    pub fn seed_policy(&self, own: SeedPolicy) -> SeedPolicy {
        match (own, self.seed) {
            (SeedPolicy::Fresh, Some(seed)) => SeedPolicy::Fixed(seed),
            (own, _) => own,
        }
    }

    /// Parse settings from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse settings: {}", e)))
    }

    /// Read and parse settings from a file path.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the file cannot be read or parsed,
    /// including an unknown `count_check` value.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        toml::from_str(&content).map_err(|e| {
            Error::Config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                Error::Config(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Serialize these settings to TOML and write them to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize settings: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            Error::Config(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}
