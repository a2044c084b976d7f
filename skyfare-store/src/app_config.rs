use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub business_rules: BusinessRules,
    #[serde(default)]
    pub seed: SeedConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Policy values, not derived: the documented defaults are encoded here and every
/// one of them can be overridden through configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct BusinessRules {
    /// Searches within the surge window needed to trigger the surge.
    #[serde(default = "default_surge_threshold")]
    pub surge_search_threshold: u32,
    /// A repeat search within this many seconds of the previous one counts
    /// towards the surge.
    #[serde(default = "default_surge_window")]
    pub surge_window_seconds: i64,
    /// A gap longer than this resets the search counter and displayed price.
    #[serde(default = "default_reset_window")]
    pub reset_window_seconds: i64,
    /// Flat percentage added on top of the base price during a surge.
    #[serde(default = "default_surge_percent")]
    pub surge_percent: i64,
    /// Percentage of the booking total retained on cancellation.
    #[serde(default = "default_cancellation_fee")]
    pub cancellation_fee_percent: i64,
    /// Wallet balance granted at registration.
    #[serde(default = "default_opening_balance")]
    pub opening_balance: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SeedConfig {
    #[serde(default = "default_seed_enabled")]
    pub enabled: bool,
}

fn default_port() -> u16 {
    8080
}
fn default_surge_threshold() -> u32 {
    3
}
fn default_surge_window() -> i64 {
    300
}
fn default_reset_window() -> i64 {
    600
}
fn default_surge_percent() -> i64 {
    10
}
fn default_cancellation_fee() -> i64 {
    10
}
fn default_opening_balance() -> i64 {
    50_000
}
fn default_seed_enabled() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

impl Default for BusinessRules {
    fn default() -> Self {
        Self {
            surge_search_threshold: default_surge_threshold(),
            surge_window_seconds: default_surge_window(),
            reset_window_seconds: default_reset_window(),
            surge_percent: default_surge_percent(),
            cancellation_fee_percent: default_cancellation_fee(),
            opening_balance: default_opening_balance(),
        }
    }
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            enabled: default_seed_enabled(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `SKYFARE__SERVER__PORT=9000` overrides the server port.
            .add_source(config::Environment::with_prefix("SKYFARE").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_policy_values() {
        let rules = BusinessRules::default();
        assert_eq!(rules.surge_search_threshold, 3);
        assert_eq!(rules.surge_window_seconds, 300);
        assert_eq!(rules.reset_window_seconds, 600);
        assert_eq!(rules.surge_percent, 10);
        assert_eq!(rules.cancellation_fee_percent, 10);
        assert_eq!(rules.opening_balance, 50_000);
    }
}
