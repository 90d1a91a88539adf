use std::path::{Path, PathBuf};
use std::time::Duration;

use chargematch_core::CombinationConfig;
use serde::Deserialize;

/// Server configuration, read from a TOML file when one exists; every
/// field has a default so a missing or partial file is fine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    /// Directory searched for order-history CSVs at startup and by
    /// import-by-filename requests.
    pub data_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub candidate_cap: usize,
    pub max_results: usize,
    pub early_stop_score: f64,
    /// Wall-clock cap for one combination search, in milliseconds.
    pub combo_time_budget_ms: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind: "0.0.0.0:4333".to_string(),
            data_dir: PathBuf::from("csv"),
            max_upload_bytes: 10 * 1024 * 1024,
            candidate_cap: 50,
            max_results: 10,
            early_stop_score: 70.0,
            combo_time_budget_ms: None,
        }
    }
}

impl ServerConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(ServerConfig::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn combination_config(&self) -> CombinationConfig {
        CombinationConfig {
            candidate_cap: self.candidate_cap,
            max_results: self.max_results,
            early_stop_score: self.early_stop_score,
            time_budget: self.combo_time_budget_ms.map(Duration::from_millis),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_engine_caps() {
        let config = ServerConfig::default();
        assert_eq!(config.bind, "0.0.0.0:4333");
        assert_eq!(config.candidate_cap, 50);
        assert_eq!(config.max_results, 10);
        assert_eq!(config.early_stop_score, 70.0);
        assert!(config.combo_time_budget_ms.is_none());
    }

    #[test]
    fn partial_toml_keeps_defaults_for_the_rest() {
        let config: ServerConfig =
            toml::from_str("bind = \"127.0.0.1:8080\"\ncandidate_cap = 25\n").unwrap();
        assert_eq!(config.bind, "127.0.0.1:8080");
        assert_eq!(config.candidate_cap, 25);
        assert_eq!(config.max_results, 10);
    }

    #[test]
    fn time_budget_maps_into_the_combination_config() {
        let config: ServerConfig = toml::from_str("combo_time_budget_ms = 250\n").unwrap();
        let combo = config.combination_config();
        assert_eq!(combo.time_budget, Some(Duration::from_millis(250)));
    }
}
