use std::collections::HashMap;
use thiserror::Error;

/// Two years in milliseconds, the default reconstruction window.
const DEFAULT_LOOKBACK_MS: i64 = 2 * 365 * 24 * 60 * 60 * 1000;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub hyperliquid_api_url: String,
    pub event_source: EventSource,
    pub lookback_ms: i64,
}

/// Which provider feed supplies execution history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSource {
    /// Non-funding ledger updates; realized PnL is derived by the engine.
    Ledger,
    /// Fills-by-time; realized PnL is reported per fill.
    Fills,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let hyperliquid_api_url = env_map
            .get("HYPERLIQUID_API_URL")
            .cloned()
            .unwrap_or_else(|| "https://api.hyperliquid.xyz".to_string());

        let event_source = match env_map
            .get("EVENT_SOURCE")
            .map(|s| s.as_str())
            .unwrap_or("ledger")
        {
            "ledger" => EventSource::Ledger,
            "fills" => EventSource::Fills,
            other => {
                return Err(ConfigError::InvalidValue(
                    "EVENT_SOURCE".to_string(),
                    format!("must be ledger or fills, got {}", other),
                ))
            }
        };

        let lookback_ms = match env_map.get("LOOKBACK_MS") {
            Some(s) => s.parse::<i64>().ok().filter(|v| *v > 0).ok_or_else(|| {
                ConfigError::InvalidValue(
                    "LOOKBACK_MS".to_string(),
                    "must be a positive i64".to_string(),
                )
            })?,
            None => DEFAULT_LOOKBACK_MS,
        };

        Ok(Config {
            port,
            hyperliquid_api_url,
            event_source,
            lookback_ms,
        })
    }
}
