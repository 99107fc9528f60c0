//! Runtime configuration, read from the environment (and `.env`, if present).

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Only consulted by the SQLite store.
    pub database_url: String,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        Self::from_env(config::Environment::default())
    }

    fn from_env(env: config::Environment) -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .set_default("host", "127.0.0.1")?
            .set_default("port", 3000)?
            .set_default("database_url", "sqlite:anon_board.db")?
            .add_source(env.try_parsing(true))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let map: config::Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config::Environment::default().source(Some(map))
    }

    #[test]
    fn defaults_apply_without_environment() {
        let cfg = AppConfig::from_env(env(&[])).unwrap();
        assert_eq!(cfg.host, "127.0.0.1");
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.database_url, "sqlite:anon_board.db");
    }

    #[test]
    fn environment_overrides_defaults() {
        let vars = [("PORT", "8080"), ("DATABASE_URL", "sqlite::memory:")];
        let cfg = AppConfig::from_env(env(&vars)).unwrap();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.database_url, "sqlite::memory:");
        assert_eq!(cfg.host, "127.0.0.1");
    }

    #[test]
    fn bad_port_is_an_error() {
        assert!(AppConfig::from_env(env(&[("PORT", "not-a-port")])).is_err());
    }
}
