//! Runtime configuration from the environment (and `.env` via dotenv).

use std::error::Error;
use std::str::FromStr;
use std::time::Duration;

/// Storage accounts accept at most 200 IP rules.
pub const DEFAULT_RULE_CAP: usize = 200;
pub const DEFAULT_LOG_CONFIG: &str = "log4rs.yml";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of IP rules per resource (`AZNET_RULE_CAP`).
    pub rule_cap: usize,
    /// log4rs config file (`AZNET_LOG_CONFIG`).
    pub log_config: String,
    /// Timeout for fetching address lists (`AZNET_FETCH_TIMEOUT_SECS`).
    pub fetch_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            rule_cap: DEFAULT_RULE_CAP,
            log_config: DEFAULT_LOG_CONFIG.to_string(),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Config, Box<dyn Error>> {
        Config::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any key lookup, unset keys keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Config, Box<dyn Error>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let rule_cap = parse_var(&lookup, "AZNET_RULE_CAP")?.unwrap_or(defaults.rule_cap);
        if rule_cap == 0 {
            return Err("AZNET_RULE_CAP must be at least 1".into());
        }
        let log_config = lookup("AZNET_LOG_CONFIG").unwrap_or(defaults.log_config);
        let fetch_timeout = parse_var(&lookup, "AZNET_FETCH_TIMEOUT_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.fetch_timeout);

        Ok(Config {
            rule_cap,
            log_config,
            fetch_timeout,
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>, Box<dyn Error>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| format!("Invalid {key}={value}: {e}").into()),
        None => Ok(None),
    }
}
