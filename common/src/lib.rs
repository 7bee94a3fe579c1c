/*!
common/src/lib.rs

Shared configuration types and URL helpers for TruthGuard.

This file provides:
- Config data structures (deserialized from TOML)
- An async loader that layers an override file on top of a default file
- The URL helpers shared by the scoring server and its client (see `urls`)
*/

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub mod urls;

pub use urls::{extract_domain, sanitize_url, validate_url};

/// HTTP server section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address Rocket binds to (e.g. "0.0.0.0")
    pub bind: String,
    pub port: u16,
    /// Attach permissive CORS headers so a browser front end on another origin can call the API
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 8000,
            cors: true,
        }
    }
}

/// Simulated latency / outage knobs for the scoring endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    /// Probability in [0, 1] that a request answers 503
    pub failure_rate: f64,
    /// Fixed seed for reproducible scores; entropy-seeded when absent
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: 1500,
            max_delay_ms: 2500,
            failure_rate: 0.05,
            seed: None,
        }
    }
}

/// Domain list overrides. An omitted list keeps the built-in one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DomainsConfig {
    pub reliable: Option<Vec<String>>,
    pub unreliable: Option<Vec<String>>,
}

/// Settings used by the `check` command when talking to a running server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub endpoint: String,
    pub timeout_seconds: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8000".to_string(),
            timeout_seconds: 30,
        }
    }
}

/// Top-level application configuration (deserialized from config.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub simulation: SimulationConfig,
    pub domains: DomainsConfig,
    pub client: ClientConfig,
}

impl Config {
    /// Load configuration with an optional default file and an optional override file.
    /// If both are present, they are merged (override takes precedence).
    pub async fn load_with_defaults(default_path: Option<&Path>, override_path: Option<&Path>) -> Result<Self> {
        let mut config_value = toml::Value::Table(toml::map::Map::new());

        for (label, path) in [("default", default_path), ("override", override_path)] {
            let Some(path) = path else { continue };
            if !path.exists() {
                continue;
            }
            let data = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read {} config: {}", label, path.display()))?;
            let val: toml::Value = toml::from_str(&data)
                .with_context(|| format!("Failed to parse {} configuration", label))?;
            merge_toml(&mut config_value, val);
        }

        let cfg: Config = config_value.try_into().context("Failed to parse merged configuration")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the server cannot run with.
    pub fn validate(&self) -> Result<()> {
        let sim = &self.simulation;
        if !(0.0..=1.0).contains(&sim.failure_rate) {
            anyhow::bail!(
                "simulation.failure_rate must be within [0, 1], got {}",
                sim.failure_rate
            );
        }
        if sim.max_delay_ms < sim.min_delay_ms {
            anyhow::bail!(
                "simulation.max_delay_ms ({}) is lower than simulation.min_delay_ms ({})",
                sim.max_delay_ms,
                sim.min_delay_ms
            );
        }
        Ok(())
    }
}

fn merge_toml(a: &mut toml::Value, b: toml::Value) {
    match (a, b) {
        (toml::Value::Table(a_map), toml::Value::Table(b_map)) => {
            for (k, v) in b_map {
                if let Some(a_val) = a_map.get_mut(&k) {
                    merge_toml(a_val, v);
                } else {
                    a_map.insert(k, v);
                }
            }
        }
        (a_val, b_val) => *a_val = b_val,
    }
}
