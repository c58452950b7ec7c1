//! Runtime configuration, read from the environment (and `.env` if present).

use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    /// CSV file holding the ledger.
    pub ledger_path: PathBuf,
    /// How long a ledger snapshot may be served from cache.
    pub cache_ttl: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            ledger_path: PathBuf::from("players.csv"),
            cache_ttl: Duration::from_secs(5),
        }
    }
}

impl Settings {
    /// `HOST`, `PORT`, `LEDGER_PATH`, `CACHE_TTL_SECS`; unset or unparsable values keep the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let host = env::var("HOST").unwrap_or(defaults.host);

        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(defaults.port);

        let ledger_path = env::var("LEDGER_PATH")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.ledger_path);

        let cache_ttl = env::var("CACHE_TTL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.cache_ttl);

        Settings {
            host,
            port,
            ledger_path,
            cache_ttl,
        }
    }
}
