//! Engine settings: built-in defaults overlaid with `DOSSIER_*` environment variables.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_FONT_PATH: &str = "assets/fonts/Inter-Variable.ttf";
pub const DEFAULT_FONT_FAMILY: &str = "Inter";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EngineConfig {
    /// Variable-weight TTF registered as the document typeface.
    pub font_path: PathBuf,
    pub font_family: String,
    /// Base directory for image references that are plain paths.
    pub asset_root: PathBuf,
    pub http_timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            font_path: PathBuf::from(DEFAULT_FONT_PATH),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            asset_root: PathBuf::from("."),
            http_timeout_secs: 10,
        }
    }
}

impl EngineConfig {
    /// Reads the process environment. Settings that fail to parse are
    /// reported and the defaults are used instead.
    pub fn from_env() -> Self {
        Self::load(None).unwrap_or_else(|e| {
            log::warn!("Ignoring invalid DOSSIER_* settings, using defaults: {}", e);
            Self::default()
        })
    }

    /// Defaults, then `DOSSIER_FONT_PATH`, `DOSSIER_FONT_FAMILY`,
    /// `DOSSIER_ASSET_ROOT` and `DOSSIER_HTTP_TIMEOUT_SECS`. Empty variables
    /// are ignored. `env` stands in for the process environment when given.
    pub fn load(env: Option<config::Map<String, String>>) -> Result<Self, config::ConfigError> {
        let defaults = Self::default();
        config::Config::builder()
            .set_default("font_path", defaults.font_path.to_string_lossy().into_owned())?
            .set_default("font_family", defaults.font_family)?
            .set_default("asset_root", defaults.asset_root.to_string_lossy().into_owned())?
            .set_default("http_timeout_secs", defaults.http_timeout_secs as i64)?
            .add_source(
                config::Environment::with_prefix("DOSSIER")
                    .ignore_empty(true)
                    .source(env),
            )
            .build()?
            .try_deserialize()
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> Option<config::Map<String, String>> {
        Some(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect())
    }

    #[test]
    fn defaults_apply_for_missing_and_empty_keys() {
        let config = EngineConfig::load(env(&[("DOSSIER_FONT_FAMILY", "")])).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = EngineConfig::load(env(&[
            ("DOSSIER_FONT_PATH", "/fonts/a.ttf"),
            ("DOSSIER_FONT_FAMILY", "Body"),
            ("DOSSIER_ASSET_ROOT", "/srv/assets"),
            ("DOSSIER_HTTP_TIMEOUT_SECS", "3"),
            ("DOSSIER_SERVER__PORT", "9000"),
        ]))
        .unwrap();
        assert_eq!(config.font_path, PathBuf::from("/fonts/a.ttf"));
        assert_eq!(config.font_family, "Body");
        assert_eq!(config.asset_root, PathBuf::from("/srv/assets"));
        assert_eq!(config.http_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn invalid_timeout_is_a_config_error() {
        let result = EngineConfig::load(env(&[("DOSSIER_HTTP_TIMEOUT_SECS", "soon")]));
        assert!(result.is_err());
    }
}
