use std::str::FromStr;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct PasswordConfig {
    pub time_cost: u32,
    pub memory_kib: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            time_cost: argon2::Params::DEFAULT_T_COST,
            memory_kib: argon2::Params::DEFAULT_M_COST,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub password: PasswordConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let defaults = PasswordConfig::default();
        let password = PasswordConfig {
            time_cost: env_or("PASSWORD_HASH_COST", defaults.time_cost),
            memory_kib: env_or("PASSWORD_HASH_MEMORY_KIB", defaults.memory_kib),
        };
        Ok(Self {
            database_url,
            db_max_connections: env_or("DB_MAX_CONNECTIONS", 10),
            password,
        })
    }
}

/// Reads `key` and parses it, falling back to `default` when unset or malformed.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_or_falls_back_when_unset() {
        assert_eq!(env_or("USER_REGISTRY_TEST_UNSET_VAR", 7u32), 7);
    }

    #[test]
    fn env_or_falls_back_when_malformed() {
        std::env::set_var("USER_REGISTRY_TEST_MALFORMED_VAR", "not-a-number");
        assert_eq!(env_or("USER_REGISTRY_TEST_MALFORMED_VAR", 3u32), 3);
    }

    #[test]
    fn env_or_parses_value() {
        std::env::set_var("USER_REGISTRY_TEST_SET_VAR", "42");
        assert_eq!(env_or("USER_REGISTRY_TEST_SET_VAR", 1u32), 42);
    }

    #[test]
    fn password_defaults_match_argon2() {
        let cfg = PasswordConfig::default();
        assert_eq!(cfg.time_cost, 2);
        assert_eq!(cfg.memory_kib, 19 * 1024);
    }
}
