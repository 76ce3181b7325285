use std::env::var;
use std::fs::read_to_string;

use serde::Deserialize;
use tracing::warn;

/// Service configuration, read from a TOML file. Every field has a default
/// so the service runs with no config file at all.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub bind_addr: String,
    pub data_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_addr: "0.0.0.0:9090".into(),
            data_dir: "quizroom_data".into(),
        }
    }
}

impl Config {
    pub fn socket_addr(&self) -> Result<std::net::SocketAddr, String> {
        self.bind_addr
            .parse()
            .map_err(|e| format!("Invalid bind_addr {}: {e}", self.bind_addr))
    }
}

/// Loads the config from `QUIZROOM_CONFIG` (or `quizroom.toml`). A missing
/// file means defaults; an unparseable file is reported and ignored.
pub fn load() -> Config {
    let path = var("QUIZROOM_CONFIG").unwrap_or_else(|_| "quizroom.toml".into());
    let Ok(text) = read_to_string(&path) else {
        return Config::default();
    };
    match toml::from_str(&text) {
        Ok(config) => config,
        Err(e) => {
            warn!("Ignoring unparseable config {path}: {e}");
            Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_for_missing_fields() {
        let config: Config = toml::from_str("bind_addr = \"127.0.0.1:8000\"").unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:8000");
        assert_eq!(config.data_dir, "quizroom_data");
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:9090");
    }

    #[test]
    fn default_bind_addr_parses() {
        assert!(Config::default().socket_addr().is_ok());
    }

    #[test]
    fn malformed_bind_addr_is_an_error_not_a_panic() {
        let config = Config {
            bind_addr: "not-an-address".into(),
            ..Config::default()
        };
        let err = config.socket_addr().unwrap_err();
        assert!(err.contains("not-an-address"));
    }
}
