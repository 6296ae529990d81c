//! Configuration module

use serde::{Deserialize, Serialize};

/// Iteration count used when a caller does not pick one
pub const DEFAULT_ITERATIONS: u64 = 1000;

/// Main configuration struct
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Iterations per workload; unset lets the caller pick its own default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iterations: Option<u64>,

    /// Measurement options shared by every run
    pub run: RunConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Per-run measurement options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Sample live heap bytes around each call
    pub collect_memory: bool,
    /// Sample process CPU time around each call
    pub collect_cpu: bool,
    /// Invoke the workload once, unmeasured, before timing
    pub warm_up: bool,
    /// Ask the allocator to reclaim memory before the first measurement
    pub force_gc_before_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json_output: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            collect_memory: true,
            collect_cpu: true,
            warm_up: true,
            force_gc_before_run: true,
        }
    }
}

impl RunConfig {
    /// Timing only: no memory or CPU sampling, no reclamation
    pub fn timing_only() -> Self {
        Self {
            collect_memory: false,
            collect_cpu: false,
            warm_up: true,
            force_gc_before_run: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_output: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            iterations: None,
            run: RunConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load config from environment
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let config_path = std::env::var("QUICKBENCH_CONFIG")
            .unwrap_or_else(|_| "config/quickbench.json".to_string());

        let mut config = if std::path::Path::new(&config_path).exists() {
            Self::load(&config_path)?
        } else {
            Config::default()
        };

        if let Ok(raw) = std::env::var("QUICKBENCH_ITERATIONS") {
            let parsed = raw
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("QUICKBENCH_ITERATIONS={raw:?}: {e}"))?;
            config.iterations = Some(parsed);
        }

        Ok(config)
    }

    /// Configured iteration count, or `fallback` when none was set
    pub fn iterations_or(&self, fallback: u64) -> u64 {
        self.iterations.unwrap_or(fallback)
    }

    /// Load config from a JSON file
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
