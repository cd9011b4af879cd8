//! Service configuration, loaded once at startup from a YAML file.

use std::path::Path;

use anyhow::Result;
use serde::Deserialize;

/// Top-level config file format.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Listen address, `host:port` or `:port`.
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default)]
    pub resolver: ResolverSection,

    pub services: ServicesSection,
}

/// Thresholds and fusion weight. Zero means "use the built-in default".
#[derive(Debug, Default, Deserialize)]
pub struct ResolverSection {
    #[serde(default)]
    pub face_threshold: f32,

    #[serde(default)]
    pub reid_threshold: f32,

    #[serde(default)]
    pub ema_alpha: f32,

    #[serde(default)]
    pub dim: usize,
}

/// Network locations of the three external collaborators.
#[derive(Debug, Deserialize)]
pub struct ServicesSection {
    /// Embedding-extraction service base URL.
    pub embed_url: String,

    /// Similarity-index service base URL.
    pub index_url: String,

    /// Identity store base URL.
    pub store_url: String,

    /// Per-call timeout for all three services, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_listen() -> String {
    ":8080".to_string()
}

fn default_timeout_secs() -> u64 {
    3
}

/// Load and env-expand a config file.
pub fn load(path: &Path) -> Result<Config> {
    let data = std::fs::read_to_string(path)?;
    let mut cfg: Config = serde_yaml::from_str(&data)?;
    cfg.services.embed_url = expand_env(&cfg.services.embed_url);
    cfg.services.index_url = expand_env(&cfg.services.index_url);
    cfg.services.store_url = expand_env(&cfg.services.store_url);
    Ok(cfg)
}

/// Expand `$VAR` / `${VAR}` values so service locations and credentials
/// need not live in the file.
fn expand_env(s: &str) -> String {
    if s.is_empty() {
        return s.to_string();
    }

    if s.starts_with('$') {
        let var_name = if s.starts_with("${") && s.ends_with('}') {
            &s[2..s.len() - 1]
        } else {
            &s[1..]
        };
        std::env::var(var_name).unwrap_or_default()
    } else {
        s.to_string()
    }
}
