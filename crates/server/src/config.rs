use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_bytes: usize,
    /// Timeout for fetching portrait, signature and thumbnail URLs.
    pub fetch_timeout_secs: u64,
    /// Renders allowed to run at once; further requests wait for a permit.
    pub max_concurrent_renders: usize,
}

impl ServerConfig {
    /// Built-in defaults, then `config/default.toml` and `config/local.toml`
    /// if present, then `DOSSIER_SERVER__*` environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let dir = std::env::var("DOSSIER_SERVER_CONFIG_DIR")
            .ok()
            .filter(|dir| !dir.is_empty())
            .unwrap_or_else(|| "config".to_string());

        Self::builder()?
            .add_source(config::File::with_name(&format!("{}/default", dir)).required(false))
            .add_source(config::File::with_name(&format!("{}/local", dir)).required(false))
            .add_source(
                config::Environment::with_prefix("DOSSIER_SERVER")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
        let defaults = Self::default();
        config::Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", defaults.port as i64)?
            .set_default("max_body_bytes", defaults.max_body_bytes as i64)?
            .set_default("fetch_timeout_secs", defaults.fetch_timeout_secs as i64)?
            .set_default("max_concurrent_renders", defaults.max_concurrent_renders as i64)
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_body_bytes: 10 * 1024 * 1024,
            fetch_timeout_secs: 10,
            max_concurrent_renders: 8,
        }
    }
}
