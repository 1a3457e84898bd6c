use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// CoinCap API access settings. The key is the one required secret; it is
/// read here and handed to the client explicitly, never through globals.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    /// How many top movers to project earnings for.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

fn default_base_url() -> String {
    "https://api.coincap.io/v2".to_string()
}

fn default_top_n() -> usize {
    3
}

impl AppConfig {
    /// Loads `projector.toml` (optional) and then `PROJECTOR_`-prefixed
    /// environment variables, e.g. `PROJECTOR_API__KEY` for the secret.
    pub fn load() -> Result<Self, ConfigError> {
        let cfg = Config::builder()
            .add_source(File::with_name("projector").required(false))
            .add_source(Environment::with_prefix("PROJECTOR").separator("__"))
            .build()?;

        cfg.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(toml: &str) -> AppConfig {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults_applied() {
        let config = from_toml("api.key = 'secret'");

        assert_eq!(config.api.key, "secret");
        assert_eq!(config.api.base_url, "https://api.coincap.io/v2");
        assert_eq!(config.top_n, 3);
    }

    #[test]
    fn test_overrides() {
        let config = from_toml(
            "top_n = 5\n[api]\nkey = 'k'\nbase_url = 'http://localhost:9000'",
        );

        assert_eq!(config.top_n, 5);
        assert_eq!(config.api.base_url, "http://localhost:9000");
    }

    #[test]
    fn test_missing_key_is_an_error() {
        let result: Result<AppConfig, _> = Config::builder()
            .add_source(File::from_str("top_n = 2", FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize();

        assert!(result.is_err());
    }
}
