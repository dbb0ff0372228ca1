//! Layered configuration loading.
//!
//! Precedence, lowest first:
//! 1. `T::default()`
//! 2. YAML file passed with `--config` (if any)
//! 3. environment variables `<PREFIX>__<FIELD>[__<NESTED>]`
//!
//! CLI flags are applied by each binary on top of the extracted value.

use std::path::Path;

use anyhow::Context;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// `logging` section shared by both binaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset, e.g. `info` or `glossary=debug`.
    pub level: String,
    /// Emit one JSON object per log line.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            json: false,
        }
    }
}

/// Load `T` from defaults, an optional YAML file and `env_prefix`-prefixed variables.
///
/// # Errors
/// Returns an error if the file does not exist or any layer fails to deserialize into `T`.
pub fn load_layered<T>(path: Option<&Path>, env_prefix: &str) -> anyhow::Result<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    let mut figment = Figment::from(Serialized::defaults(T::default()));

    if let Some(path) = path {
        if !path.is_file() {
            anyhow::bail!("config file does not exist: {}", path.display());
        }
        figment = figment.merge(Yaml::file(path));
    }

    figment = figment.merge(Env::prefixed(&format!("{env_prefix}__")).split("__"));

    figment
        .extract()
        .with_context(|| format!("invalid configuration (env prefix {env_prefix}__)"))
}

/// Pretty JSON rendering of the effective configuration for `--print-config`.
///
/// # Errors
/// Returns an error if `cfg` cannot be serialized.
pub fn render_config<T: Serialize>(cfg: &T) -> anyhow::Result<String> {
    serde_json::to_string_pretty(cfg).context("failed to render configuration")
}
