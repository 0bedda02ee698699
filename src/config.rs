use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::AppError;
use crate::pricing::catalog::{self, Dimension};

pub const DEFAULT_PRICING_BASE_URL: &str =
    "https://b0.p.awsstatic.com/pricing/2.0/meteredUnitMaps/computesavingsplan/USD/current";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub pricing: PricingConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PricingConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    /// Reject dimension values that are not in the built-in catalogs
    pub strict_catalog: bool,
    pub defaults: PricingDefaults,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_PRICING_BASE_URL.to_string(),
            timeout_seconds: 30,
            strict_catalog: true,
            defaults: PricingDefaults::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PricingDefaults {
    pub term: String,
    pub payment_option: String,
    pub region: String,
}

impl Default for PricingDefaults {
    fn default() -> Self {
        Self {
            term: "1 year".to_string(),
            payment_option: "Partial Upfront".to_string(),
            region: "Asia Pacific (Tokyo)".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "text".to_string(),
        }
    }
}

/// Load configuration from built-in defaults, an optional TOML file and
/// `AWS_COST__*` environment variables, in that order of precedence.
pub fn load_config(path: &Path) -> Result<Config, AppError> {
    let config = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix("AWS_COST")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let cfg: Config = config.try_deserialize()?;
    validate_config(&cfg)?;

    Ok(cfg)
}

pub fn validate_config(cfg: &Config) -> Result<(), AppError> {
    let base_url = cfg.pricing.base_url.trim();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(AppError::ConfigError(format!(
            "pricing.base_url must be an http(s) URL, got '{}'",
            cfg.pricing.base_url
        )));
    }

    if cfg.pricing.timeout_seconds == 0 {
        return Err(AppError::ConfigError(
            "pricing.timeout_seconds must be greater than 0".to_string(),
        ));
    }

    match cfg.logging.format.as_str() {
        "text" | "json" => {}
        other => {
            return Err(AppError::ConfigError(format!(
                "logging.format must be 'text' or 'json', got '{}'",
                other
            )))
        }
    }

    if cfg.pricing.strict_catalog {
        let defaults = &cfg.pricing.defaults;
        catalog::resolve(Dimension::Term, None, &defaults.term)?;
        catalog::resolve(Dimension::PaymentOption, None, &defaults.payment_option)?;
        catalog::resolve(Dimension::Region, None, &defaults.region)?;
    }

    Ok(())
}
