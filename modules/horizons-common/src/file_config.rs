use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::HorizonsError;

/// Sentinel dump key for the root (all hosts) dashboard.
pub const ROOT_DUMP_KEY: &str = "ALL";

/// TOML-backed configuration loaded from disk.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub hosts: Vec<HostConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// A fiscal host dashboard: branding, currency and category settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HostConfig {
    pub name: String,
    /// Empty for the root dashboard.
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub root: bool,
    /// Hosts aggregated by the root dashboard.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub host_slugs: Vec<String>,
    pub currency: String,
    pub start_year: i32,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Color of the synthesized `ALL` category.
    #[serde(default = "default_all_color")]
    pub all_color: String,
    /// Colors handed out to auto-derived categories, in order.
    #[serde(default = "default_palette")]
    pub palette: Vec<String>,
    /// Group key -> tags counted as that group. The list includes the key itself.
    #[serde(default)]
    pub group_tags: BTreeMap<String, Vec<String>>,
    /// When non-empty, these tags are the categories and auto-derivation is skipped.
    #[serde(default)]
    pub include_category_tags: Vec<String>,
    /// Tags never picked as auto-derived categories.
    #[serde(default)]
    pub exclude_category_tags: Vec<String>,
    /// Conversion rates for collectives reporting in another currency.
    /// Without rates, a foreign-currency collective is a fatal mismatch.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rates: Vec<RateConfig>,
}

/// One `from -> to` conversion rate valid for a calendar year.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RateConfig {
    pub from: String,
    pub to: String,
    pub year: i32,
    pub rate: f64,
}

fn default_all_color() -> String {
    "#725fed".to_string()
}

fn default_palette() -> Vec<String> {
    [
        "#F94892", "#FF7F3F", "#FBDF07", "#89CFFD", "#A1E887", "#B689FF", "#FFB4B4",
    ]
    .iter()
    .map(|c| c.to_string())
    .collect()
}

impl HostConfig {
    /// File stem of this host's data dump.
    pub fn dump_key(&self) -> &str {
        if self.root || self.slug.is_empty() {
            ROOT_DUMP_KEY
        } else {
            &self.slug
        }
    }
}

impl FileConfig {
    /// Find a host by slug. `None` or an empty slug selects the root host.
    pub fn find_host(&self, slug: Option<&str>) -> Option<&HostConfig> {
        match slug.filter(|s| !s.is_empty()) {
            None => self.hosts.iter().find(|h| h.root || h.slug.is_empty()),
            Some(slug) => self.hosts.iter().find(|h| h.slug == slug),
        }
    }

    pub fn validate(&self) -> Result<(), HorizonsError> {
        if self.hosts.is_empty() {
            return Err(HorizonsError::Config("at least one host is required".into()));
        }
        let roots = self
            .hosts
            .iter()
            .filter(|h| h.root || h.slug.is_empty())
            .count();
        if roots > 1 {
            return Err(HorizonsError::Config(format!(
                "expected at most one root host, found {roots}"
            )));
        }
        let mut seen = HashSet::new();
        for host in &self.hosts {
            if !seen.insert(host.dump_key()) {
                return Err(HorizonsError::Config(format!(
                    "duplicate host slug '{}'",
                    host.slug
                )));
            }
            if host.currency.len() != 3 {
                return Err(HorizonsError::Config(format!(
                    "host '{}' has invalid currency '{}'",
                    host.name, host.currency
                )));
            }
            if let Some(bad) = host.rates.iter().find(|r| !(r.rate.is_finite() && r.rate > 0.0)) {
                return Err(HorizonsError::Config(format!(
                    "host '{}' has invalid rate {} -> {} ({}): {}",
                    host.name, bad.from, bad.to, bad.year, bad.rate
                )));
            }
            if host.palette.is_empty() {
                return Err(HorizonsError::Config(format!(
                    "host '{}' needs at least one palette color",
                    host.name
                )));
            }
        }
        Ok(())
    }
}

/// Parse a TOML config string.
pub fn parse_config(content: &str) -> Result<FileConfig> {
    let config: FileConfig = toml::from_str(content).context("Failed to parse config")?;
    config.validate()?;
    Ok(config)
}

/// Load and parse a TOML config file.
pub fn load_config(path: &Path) -> Result<FileConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: FileConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid config file: {}", path.display()))?;
    Ok(config)
}
