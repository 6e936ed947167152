use config::{Config, ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::{error, info};
use validator::{Validate, ValidationError};

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const DEFAULT_PORT: u16 = 8080;
const CONFIG_DIR: &str = "config";

const DEFAULT_CACHE_TTL_SECS: u64 = 60;
const DEFAULT_REQUEST_DEADLINE_SECS: u64 = 30;
const DEFAULT_UPSTREAM_CALL_TIMEOUT_SECS: u64 = 10;
const DEFAULT_QTY_TOLERANCE: &str = "0.01";
const DEFAULT_SCRAP_CAP: &str = "100";

/// Application configuration, validated at startup.
///
/// Defaults are baked in via `set_default`, overridden by an optional
/// `config/<env>.toml`, overridden again by `APP__*` environment
/// variables, then validated.
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Database connection URL (sqlite or postgres).
    pub database_url: String,

    /// Server bind host.
    pub host: String,

    /// Server bind port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Application environment (development/staging/production).
    pub environment: String,

    /// Logging level passed to the `tracing` env-filter.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit logs as JSON rather than human-readable text.
    #[serde(default)]
    pub log_json: bool,

    /// Freshness window for the process-wide MRP run cache, in seconds.
    #[serde(default = "default_cache_ttl_secs")]
    #[validate(range(min = 1, message = "CACHE_TTL must be positive"))]
    pub cache_ttl_secs: u64,

    /// End-to-end deadline for a single HTTP request, in seconds.
    #[serde(default = "default_request_deadline_secs")]
    #[validate(range(min = 1, message = "REQUEST_DEADLINE must be positive"))]
    pub request_deadline_secs: u64,

    /// Per-upstream-call timeout for ERP gateway / projection store calls.
    #[serde(default = "default_upstream_call_timeout_secs")]
    #[validate(range(min = 1, message = "UPSTREAM_CALL_TIMEOUT must be positive"))]
    pub upstream_call_timeout_secs: u64,

    /// Absolute tolerance used when comparing quantities. Must be >= 0;
    /// checked in `validate_additional_constraints` since `validator`'s
    /// `range` derive needs `Into<f64>`, which `Decimal` doesn't implement.
    #[serde(default = "default_qty_tolerance")]
    pub qty_tolerance: Decimal,

    /// Maximum scrap percent accepted on a BOM line before it is rejected
    /// as a data-integrity error. Must be >= 0; see `qty_tolerance` above
    /// for why this isn't a `#[validate(range(...))]` attribute.
    #[serde(default = "default_scrap_cap")]
    pub scrap_cap: Decimal,

    /// DB pool: max connections.
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,

    /// DB pool: min connections.
    #[serde(default = "default_db_min_connections")]
    pub db_min_connections: u32,

    /// DB connect timeout, seconds.
    #[serde(default = "default_db_connect_timeout_secs")]
    pub db_connect_timeout_secs: u64,

    /// CORS: comma-separated allowed origins.
    #[serde(default)]
    pub cors_allowed_origins: Option<String>,

    /// CORS: allow any origin (development convenience only).
    #[serde(default)]
    pub cors_allow_any_origin: bool,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_cache_ttl_secs() -> u64 {
    DEFAULT_CACHE_TTL_SECS
}

fn default_request_deadline_secs() -> u64 {
    DEFAULT_REQUEST_DEADLINE_SECS
}

fn default_upstream_call_timeout_secs() -> u64 {
    DEFAULT_UPSTREAM_CALL_TIMEOUT_SECS
}

fn default_qty_tolerance() -> Decimal {
    DEFAULT_QTY_TOLERANCE.parse().expect("valid default decimal")
}

fn default_scrap_cap() -> Decimal {
    DEFAULT_SCRAP_CAP.parse().expect("valid default decimal")
}

fn default_db_max_connections() -> u32 {
    10
}

fn default_db_min_connections() -> u32 {
    1
}

fn default_db_connect_timeout_secs() -> u64 {
    8
}

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ConfigError),
    #[error("configuration validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

impl AppConfig {
    /// Cross-field checks that `validator`'s field-level derive can't
    /// express on its own.
    pub fn validate_additional_constraints(&self) -> Result<(), ValidationError> {
        if self.upstream_call_timeout_secs >= self.request_deadline_secs {
            let mut err = ValidationError::new("upstream_timeout_exceeds_deadline");
            err.message = Some(
                "UPSTREAM_CALL_TIMEOUT must be smaller than REQUEST_DEADLINE".into(),
            );
            return Err(err);
        }
        if self.environment != "development" && self.cors_allowed_origins.is_none() && !self.cors_allow_any_origin {
            let mut err = ValidationError::new("cors_not_configured");
            err.message = Some(
                "non-development environments must set cors_allowed_origins or cors_allow_any_origin".into(),
            );
            return Err(err);
        }
        if self.qty_tolerance < Decimal::ZERO {
            let mut err = ValidationError::new("qty_tolerance_negative");
            err.message = Some("QTY_TOLERANCE must be >= 0".into());
            return Err(err);
        }
        if self.scrap_cap < Decimal::ZERO {
            let mut err = ValidationError::new("scrap_cap_negative");
            err.message = Some("SCRAP_CAP must be >= 0".into());
            return Err(err);
        }
        Ok(())
    }
}

/// Loads configuration from `config/<env>.toml` (if present) and `APP__*`
/// environment variables, then validates it.
pub fn load_config() -> Result<AppConfig, AppConfigError> {
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| DEFAULT_ENV.to_string());
    info!("loading configuration for environment: {}", run_env);

    if !Path::new(CONFIG_DIR).exists() {
        info!(
            "config directory '{}' not found; relying on defaults and environment variables",
            CONFIG_DIR
        );
    }

    let builder = Config::builder()
        .set_default("database_url", "sqlite://mrp_portal.db?mode=rwc")?
        .set_default("host", "0.0.0.0")?
        .set_default("port", DEFAULT_PORT as i64)?
        .set_default("environment", DEFAULT_ENV)?
        .set_default("log_level", DEFAULT_LOG_LEVEL)?
        .set_default("log_json", false)?
        .set_default("cache_ttl_secs", DEFAULT_CACHE_TTL_SECS as i64)?
        .set_default("request_deadline_secs", DEFAULT_REQUEST_DEADLINE_SECS as i64)?
        .set_default(
            "upstream_call_timeout_secs",
            DEFAULT_UPSTREAM_CALL_TIMEOUT_SECS as i64,
        )?
        .set_default("qty_tolerance", DEFAULT_QTY_TOLERANCE)?
        .set_default("scrap_cap", DEFAULT_SCRAP_CAP)?
        .add_source(File::with_name(&format!("{}/default", CONFIG_DIR)).required(false))
        .add_source(File::with_name(&format!("{}/{}", CONFIG_DIR, run_env)).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"));

    let config = builder.build()?;
    let app_config: AppConfig = config.try_deserialize()?;

    app_config.validate().map_err(AppConfigError::Validation)?;
    app_config
        .validate_additional_constraints()
        .map_err(|e| AppConfigError::Validation(e.into()))?;

    info!("configuration loaded successfully");
    Ok(app_config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> AppConfig {
        AppConfig {
            database_url: "sqlite://test.db?mode=memory".into(),
            host: "127.0.0.1".into(),
            port: 8080,
            environment: "development".into(),
            log_level: "info".into(),
            log_json: false,
            cache_ttl_secs: 60,
            request_deadline_secs: 30,
            upstream_call_timeout_secs: 10,
            qty_tolerance: default_qty_tolerance(),
            scrap_cap: default_scrap_cap(),
            db_max_connections: 10,
            db_min_connections: 1,
            db_connect_timeout_secs: 8,
            cors_allowed_origins: None,
            cors_allow_any_origin: false,
        }
    }

    #[test]
    fn upstream_timeout_must_be_smaller_than_deadline() {
        let mut cfg = base_config();
        cfg.upstream_call_timeout_secs = 30;
        cfg.request_deadline_secs = 30;
        assert!(cfg.validate_additional_constraints().is_err());
    }

    #[test]
    fn non_dev_requires_cors_configuration() {
        let mut cfg = base_config();
        cfg.environment = "production".into();
        assert!(cfg.validate_additional_constraints().is_err());
        cfg.cors_allow_any_origin = true;
        assert!(cfg.validate_additional_constraints().is_ok());
    }

    #[test]
    fn development_defaults_are_valid() {
        let cfg = base_config();
        assert!(cfg.validate_additional_constraints().is_ok());
    }

    #[test]
    fn negative_qty_tolerance_is_rejected() {
        let mut cfg = base_config();
        cfg.qty_tolerance = "-0.01".parse().unwrap();
        assert!(cfg.validate_additional_constraints().is_err());
    }

    #[test]
    fn negative_scrap_cap_is_rejected() {
        let mut cfg = base_config();
        cfg.scrap_cap = "-1".parse().unwrap();
        assert!(cfg.validate_additional_constraints().is_err());
    }
}
