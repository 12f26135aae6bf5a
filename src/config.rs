use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level kdmatch configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct KdmatchConfig {
    /// I/O settings.
    #[serde(default)]
    pub io: IoToml,

    /// Matching settings.
    #[serde(default)]
    pub matching: MatchingToml,
}

impl KdmatchConfig {
    /// Reads the configuration file, or returns defaults without one.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let toml_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        toml::from_str(&toml_str).context("failed to parse TOML config")
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IoToml {
    #[serde(default)]
    pub group_columns: Vec<String>,
    #[serde(default)]
    pub scales: BTreeMap<String, f64>,
    #[serde(default = "default_compression")]
    pub compression: String,
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

impl Default for IoToml {
    fn default() -> Self {
        Self {
            group_columns: Vec::new(),
            scales: BTreeMap::new(),
            compression: default_compression(),
            prefix: default_prefix(),
        }
    }
}

fn default_compression() -> String {
    "none".to_string()
}
fn default_prefix() -> String {
    "kdmatch".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatchingToml {
    #[serde(default = "default_initial_k")]
    pub initial_k: usize,
    #[serde(default = "default_final_k")]
    pub final_k: usize,
    #[serde(default)]
    pub threads: Option<usize>,
}

impl Default for MatchingToml {
    fn default() -> Self {
        Self {
            initial_k: default_initial_k(),
            final_k: default_final_k(),
            threads: None,
        }
    }
}

fn default_initial_k() -> usize {
    5
}
fn default_final_k() -> usize {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg: KdmatchConfig = toml::from_str("").unwrap();
        assert!(cfg.io.group_columns.is_empty());
        assert_eq!(cfg.io.compression, "none");
        assert_eq!(cfg.io.prefix, "kdmatch");
        assert_eq!(cfg.matching.initial_k, 5);
        assert_eq!(cfg.matching.final_k, 1);
        assert_eq!(cfg.matching.threads, None);
    }

    #[test]
    fn full_file() {
        let cfg: KdmatchConfig = toml::from_str(
            r#"
            [io]
            group_columns = ["sex", "site"]
            compression = "gzip"
            prefix = "study"

            [io.scales]
            pc1 = 2.0
            pc2 = 0.5

            [matching]
            initial_k = 20
            final_k = 4
            threads = 6
            "#,
        )
        .unwrap();
        assert_eq!(cfg.io.group_columns, vec!["sex", "site"]);
        assert_eq!(cfg.io.scales["pc2"], 0.5);
        assert_eq!(cfg.io.prefix, "study");
        assert_eq!(cfg.matching.initial_k, 20);
        assert_eq!(cfg.matching.threads, Some(6));
    }

    #[test]
    fn unknown_field_is_rejected() {
        let err = toml::from_str::<KdmatchConfig>("[matching]\nk = 3\n").unwrap_err();
        assert!(err.to_string().contains("unknown field"));
    }

    #[test]
    fn load_without_path_is_default() {
        let cfg = KdmatchConfig::load(None).unwrap();
        assert_eq!(cfg.matching.final_k, 1);
    }

    #[test]
    fn load_missing_file_has_context() {
        let err = KdmatchConfig::load(Some(Path::new("/nonexistent/kdmatch.toml"))).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read config"));
    }
}
