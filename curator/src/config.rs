//! Curator configuration
//!
//! Values are loaded from:
//! 1. `.env` file in the current directory or parent directories (if present)
//! 2. System environment variables
//!
//! Environment variables take precedence over .env file values, and command
//! line flags take precedence over both.
//!
//! | Variable | Default |
//! |---|---|
//! | `OPENAI_API_KEY` | required for the HTTP oracle |
//! | `OPENAI_BASE_URL` | `https://api.openai.com/v1` |
//! | `CURATOR_MODEL` | `gpt-4o` |
//! | `CURATOR_DATA_DIR` | `./DashboardLib` |
//! | `CURATOR_MAX_ITERATIONS` | `5` |
//! | `CURATOR_ORACLE_TIMEOUT_SECS` | `60` |

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{CuratorError, CuratorResult};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_DATA_DIR: &str = "./DashboardLib";
pub const DEFAULT_MAX_ITERATIONS: u32 = 5;
pub const DEFAULT_ORACLE_TIMEOUT_SECS: u64 = 60;

/// Sampling parameters for one kind of oracle request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sampling {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Sampling {
    pub const OPTIMIZATION: Sampling = Sampling {
        temperature: 0.2,
        max_tokens: 2000,
    };

    pub const GENERATION: Sampling = Sampling {
        temperature: 0.3,
        max_tokens: 4000,
    };
}

#[derive(Debug, Clone, PartialEq)]
pub struct CuratorConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub data_dir: PathBuf,
    pub max_iterations: u32,
    pub oracle_timeout: Duration,
    pub optimization: Sampling,
    pub generation: Sampling,
}

impl Default for CuratorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            oracle_timeout: Duration::from_secs(DEFAULT_ORACLE_TIMEOUT_SECS),
            optimization: Sampling::OPTIMIZATION,
            generation: Sampling::GENERATION,
        }
    }
}

impl CuratorConfig {
    /// Load from `.env` and the process environment
    pub fn from_env() -> CuratorResult<Self> {
        // Missing .env is fine
        let _ = dotenv::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> CuratorResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let value = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Ok(Self {
            api_key: value("OPENAI_API_KEY"),
            base_url: value("OPENAI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            model: value("CURATOR_MODEL").unwrap_or(defaults.model),
            data_dir: value("CURATOR_DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
            max_iterations: parse_var("CURATOR_MAX_ITERATIONS", value("CURATOR_MAX_ITERATIONS"))?
                .unwrap_or(defaults.max_iterations),
            oracle_timeout: parse_var::<u64>("CURATOR_ORACLE_TIMEOUT_SECS", value("CURATOR_ORACLE_TIMEOUT_SECS"))?
                .map(Duration::from_secs)
                .unwrap_or(defaults.oracle_timeout),
            optimization: defaults.optimization,
            generation: defaults.generation,
        })
    }

    /// The API key, or a configuration error naming the missing variable
    pub fn require_api_key(&self) -> CuratorResult<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            CuratorError::config("Missing required API key: OPENAI_API_KEY must be set as an environment variable")
        })
    }
}

fn parse_var<T: FromStr>(name: &str, raw: Option<String>) -> CuratorResult<Option<T>> {
    raw.map(|raw| {
        raw.parse::<T>()
            .map_err(|_| CuratorError::config(format!("{name} must be a non-negative integer, got {raw:?}")))
    })
    .transpose()
}
