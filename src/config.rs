//! Server configuration loaded from environment variables

use crate::types::GameConfig;
use std::net::SocketAddr;
use std::str::FromStr;

/// Runtime configuration for the server binary
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Fixed seed for word/spy/order selection (None = seeded from the OS)
    pub rng_seed: Option<u64>,
    pub game: GameConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 7480)),
            rng_seed: None,
            game: GameConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load config from environment variables
    ///
    /// - `SPY_BIND`: socket address to listen on (default `0.0.0.0:7480`)
    /// - `SPY_RNG_SEED`: optional u64 seed
    /// - see [`GameConfig::from_env`] for the game rules
    pub fn from_env() -> Self {
        let bind_addr =
            env_parsed("SPY_BIND").unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 7480)));

        let rng_seed = env_parsed::<u64>("SPY_RNG_SEED");
        if let Some(seed) = rng_seed {
            tracing::info!("Using fixed RNG seed {}", seed);
        }

        Self {
            bind_addr,
            rng_seed,
            game: GameConfig::from_env(),
        }
    }
}

impl GameConfig {
    /// Load game rules from environment variables, falling back to defaults
    ///
    /// - `SPY_MAX_ROUNDS` (>= 1, default 3)
    /// - `SPY_CHAT_CAPACITY` (>= 1, default 50)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let max_rounds = env_parsed::<u32>("SPY_MAX_ROUNDS")
            .filter(|&n| {
                if n == 0 {
                    tracing::warn!("SPY_MAX_ROUNDS must be at least 1, using default");
                }
                n > 0
            })
            .unwrap_or(defaults.max_rounds);

        let chat_capacity = env_parsed::<usize>("SPY_CHAT_CAPACITY")
            .filter(|&n| {
                if n == 0 {
                    tracing::warn!("SPY_CHAT_CAPACITY must be at least 1, using default");
                }
                n > 0
            })
            .unwrap_or(defaults.chat_capacity);

        Self {
            max_rounds,
            chat_capacity,
            ..defaults
        }
    }
}

/// Read and parse an env var; unset is silent, unparseable logs a warning
fn env_parsed<T: FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring invalid value for {}: {:?}", key, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            "SPY_BIND",
            "SPY_RNG_SEED",
            "SPY_MAX_ROUNDS",
            "SPY_CHAT_CAPACITY",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_defaults_when_unset() {
        clear_env();
        let config = ServerConfig::from_env();

        assert_eq!(config.bind_addr.port(), 7480);
        assert_eq!(config.rng_seed, None);
        assert_eq!(config.game.max_rounds, 3);
        assert_eq!(config.game.chat_capacity, 50);
    }

    #[test]
    #[serial]
    fn test_reads_overrides() {
        clear_env();
        std::env::set_var("SPY_BIND", "127.0.0.1:9000");
        std::env::set_var("SPY_RNG_SEED", "42");
        std::env::set_var("SPY_MAX_ROUNDS", "5");
        std::env::set_var("SPY_CHAT_CAPACITY", "10");

        let config = ServerConfig::from_env();
        clear_env();

        assert_eq!(config.bind_addr, "127.0.0.1:9000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.rng_seed, Some(42));
        assert_eq!(config.game.max_rounds, 5);
        assert_eq!(config.game.chat_capacity, 10);
    }

    #[test]
    #[serial]
    fn test_invalid_values_fall_back() {
        clear_env();
        std::env::set_var("SPY_BIND", "not an address");
        std::env::set_var("SPY_MAX_ROUNDS", "0");
        std::env::set_var("SPY_CHAT_CAPACITY", "lots");

        let config = ServerConfig::from_env();
        clear_env();

        assert_eq!(config.bind_addr.port(), 7480);
        assert_eq!(config.game.max_rounds, 3);
        assert_eq!(config.game.chat_capacity, 50);
    }
}
