//! Environment-driven engine configuration.

use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub const DEFAULT_STORE_PATH: &str = "world_maps.db";
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;
pub const DEFAULT_LOG_FILTER: &str = "wrldbldr_map_engine=debug";

/// Which document store backs the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Sqlite { path: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub store: StoreBackend,
    pub cache_ttl: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            store: StoreBackend::Memory,
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        }
    }
}

impl EngineConfig {
    /// Read configuration from the process environment, loading `.env` first.
    ///
    /// Unknown or malformed values fall back to defaults with a warning.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let path = lookup("MAP_STORE_PATH")
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_STORE_PATH.to_string());

        let store = match lookup("MAP_STORE").as_deref().map(str::trim) {
            None | Some("") | Some("memory") => StoreBackend::Memory,
            Some("sqlite") => StoreBackend::Sqlite { path },
            Some(other) => {
                tracing::warn!(value = other, "Unknown MAP_STORE, using in-memory store");
                StoreBackend::Memory
            }
        };

        let cache_ttl_secs = match lookup("MAP_CACHE_TTL_SECS") {
            None => DEFAULT_CACHE_TTL_SECS,
            Some(raw) => raw.trim().parse::<u64>().unwrap_or_else(|_| {
                tracing::warn!(
                    value = %raw,
                    default = DEFAULT_CACHE_TTL_SECS,
                    "Invalid MAP_CACHE_TTL_SECS, using default"
                );
                DEFAULT_CACHE_TTL_SECS
            }),
        };

        Self {
            store,
            cache_ttl: Duration::from_secs(cache_ttl_secs),
        }
    }
}

/// Install the global tracing subscriber (`RUST_LOG`, else the default filter).
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> EngineConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EngineConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(config_from(&[]), EngineConfig::default());
    }

    #[test]
    fn sqlite_uses_configured_path() {
        let config = config_from(&[("MAP_STORE", "sqlite"), ("MAP_STORE_PATH", "/tmp/maps.db")]);
        assert_eq!(
            config.store,
            StoreBackend::Sqlite {
                path: "/tmp/maps.db".to_string()
            }
        );
    }

    #[test]
    fn sqlite_defaults_path() {
        let config = config_from(&[("MAP_STORE", "sqlite")]);
        assert_eq!(
            config.store,
            StoreBackend::Sqlite {
                path: DEFAULT_STORE_PATH.to_string()
            }
        );
    }

    #[test]
    fn bad_values_fall_back() {
        let config = config_from(&[("MAP_STORE", "postgres"), ("MAP_CACHE_TTL_SECS", "soon")]);
        assert_eq!(config.store, StoreBackend::Memory);
        assert_eq!(config.cache_ttl, Duration::from_secs(DEFAULT_CACHE_TTL_SECS));
    }

    #[test]
    fn cache_ttl_is_parsed() {
        let config = config_from(&[("MAP_CACHE_TTL_SECS", "90")]);
        assert_eq!(config.cache_ttl, Duration::from_secs(90));
    }
}
