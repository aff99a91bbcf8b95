use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

use crate::catalog::types::CatalogKind;

/// Environment variable that overrides `base_url`.
pub const BASE_URL_ENV: &str = "TVBROWSE_BASE_URL";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_tick_rate")]
    pub tick_rate_fps: f64,
    #[serde(default = "default_section")]
    pub default_section: CatalogKind,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8080/api".to_string()
}

fn default_tick_rate() -> f64 {
    30.0
}

fn default_section() -> CatalogKind {
    CatalogKind::Home
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            tick_rate_fps: default_tick_rate(),
            default_section: default_section(),
        }
    }
}

fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config/tvbrowse/config.toml"))
}

pub fn load_config() -> AppConfig {
    let mut config = config_path()
        .and_then(|path| fs::read_to_string(path).ok())
        .map(|contents| parse_config(&contents))
        .unwrap_or_default();

    if let Some(url) = std::env::var(BASE_URL_ENV).ok().filter(|v| !v.is_empty()) {
        config.base_url = url;
    }
    config
}

fn parse_config(contents: &str) -> AppConfig {
    toml::from_str(contents).unwrap_or_else(|e| {
        tracing::warn!("ignoring malformed config: {e}");
        AppConfig::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = parse_config("");
        assert_eq!(config.base_url, default_base_url());
        assert_eq!(config.default_section, CatalogKind::Home);
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let config = parse_config(
            r#"
            base_url = "https://catalog.example/api"
            default_section = "music"
            "#,
        );
        assert_eq!(config.base_url, "https://catalog.example/api");
        assert_eq!(config.default_section, CatalogKind::Music);
        assert_eq!(config.tick_rate_fps, 30.0);
    }

    #[test]
    fn malformed_config_falls_back() {
        let config = parse_config("default_section = 3");
        assert_eq!(config.default_section, CatalogKind::Home);
    }
}
