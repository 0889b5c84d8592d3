use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    8080
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

/// Read an optional environment variable and parse it, falling back to
/// `default` when unset. A value that does not parse is a configuration
/// error rather than silently ignored.
pub fn env_or<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| {
            AppError::ConfigError(anyhow::anyhow!("{} has an invalid value: {}", key, e))
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_or_falls_back_when_unset() {
        let value: usize = env_or("SERVICE_CORE_TEST_UNSET_VARIABLE", 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn env_or_rejects_garbage() {
        // SAFETY: the variable name is unique to this test
        unsafe { std::env::set_var("SERVICE_CORE_TEST_GARBAGE", "not-a-number") };
        let result: Result<u16, _> = env_or("SERVICE_CORE_TEST_GARBAGE", 1);
        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }
}
