//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Plan snapshot configuration.
    pub snapshot: SnapshotConfig,
    /// Default settlement request parameters.
    pub settlement: SettlementDefaults,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Plan snapshot configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotConfig {
    /// Path to the JSON plan snapshot.
    pub path: String,
}

/// Default parameters for a settlement run.
///
/// Rates are given per earn point (one point per $100 of balance), so `5` means 5%.
#[derive(Debug, Clone, Deserialize)]
pub struct SettlementDefaults {
    /// Plan year to settle.
    pub profit_year: i16,
    /// Earnings rate.
    pub earnings_percent: Decimal,
    /// Secondary earnings rate.
    #[serde(default)]
    pub secondary_earnings_percent: Decimal,
    /// Contribution rate per contribution point.
    #[serde(default)]
    pub contribution_percent: Decimal,
    /// Incoming forfeiture rate per contribution point.
    #[serde(default)]
    pub incoming_forfeit_percent: Decimal,
    /// Statutory maximum contribution per member.
    #[serde(default = "default_max_allowed_contributions")]
    pub max_allowed_contributions: Decimal,
}

fn default_max_allowed_contributions() -> Decimal {
    Decimal::new(69_000, 0)
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    #[serde(default = "default_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            json: false,
        }
    }
}

fn default_filter() -> String {
    "profitshare=info".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("PROFITSHARE").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("RUN_MODE", Some("test-env-only")),
                ("PROFITSHARE__SNAPSHOT__PATH", Some("data/plan.json")),
                ("PROFITSHARE__SETTLEMENT__PROFIT_YEAR", Some("2024")),
                ("PROFITSHARE__SETTLEMENT__EARNINGS_PERCENT", Some("5")),
                ("PROFITSHARE__SETTLEMENT__SECONDARY_EARNINGS_PERCENT", Some("0.5")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.snapshot.path, "data/plan.json");
                assert_eq!(config.settlement.profit_year, 2024);
                assert_eq!(config.settlement.earnings_percent, dec!(5));
                assert_eq!(config.settlement.secondary_earnings_percent, dec!(0.5));
                assert_eq!(config.settlement.contribution_percent, Decimal::ZERO);
                assert_eq!(config.settlement.max_allowed_contributions, dec!(69000));
                assert_eq!(config.logging.filter, "profitshare=info");
                assert!(!config.logging.json);
            },
        );
    }

    #[test]
    fn test_missing_snapshot_path_fails() {
        temp_env::with_vars(
            [
                ("RUN_MODE", Some("test-env-only")),
                ("PROFITSHARE__SNAPSHOT__PATH", None::<&str>),
                ("PROFITSHARE__SETTLEMENT__PROFIT_YEAR", Some("2024")),
                ("PROFITSHARE__SETTLEMENT__EARNINGS_PERCENT", Some("5")),
            ],
            || {
                assert!(AppConfig::load().is_err());
            },
        );
    }
}
