use crate::error::AlphabyteError;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SQLite location, e.g. `sqlite://alphabyte.db`. Created when missing.
    pub database_url: String,
    pub listen_addr: String,
    /// Fallback log filter when `RUST_LOG` is unset.
    pub loglevel: String,
    pub max_connections: u32,
    pub busy_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub body_limit_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://alphabyte.db".to_string(),
            listen_addr: "0.0.0.0:50051".to_string(),
            loglevel: "info".to_string(),
            max_connections: 8,
            busy_timeout_ms: 5_000,
            request_timeout_ms: 10_000,
            body_limit_bytes: 2 * 1024 * 1024,
        }
    }
}

impl Config {
    /// Defaults, then `config.toml`, then `ALPHABYTE_*` environment variables.
    pub fn load() -> Result<Self, AlphabyteError> {
        Ok(Self::figment().extract()?)
    }

    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("ALPHABYTE_"))
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("ALPHABYTE_LISTEN_ADDR", "127.0.0.1:6000");
            jail.set_env("ALPHABYTE_MAX_CONNECTIONS", "2");

            let cfg: Config = Config::figment().extract()?;
            assert_eq!(cfg.listen_addr, "127.0.0.1:6000");
            assert_eq!(cfg.max_connections, 2);
            assert_eq!(cfg.database_url, "sqlite://alphabyte.db");
            Ok(())
        });
    }

    #[test]
    fn toml_file_is_layered_under_env() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                database_url = "sqlite://from-file.db"
                request_timeout_ms = 250
                "#,
            )?;
            jail.set_env("ALPHABYTE_DATABASE_URL", "sqlite://from-env.db");

            let cfg: Config = Config::figment().extract()?;
            assert_eq!(cfg.database_url, "sqlite://from-env.db");
            assert_eq!(cfg.request_timeout(), Duration::from_millis(250));
            Ok(())
        });
    }
}
