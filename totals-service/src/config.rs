//! Configuration module for totals-service.

use service_core::config::{self as core_config, env_or};
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone)]
pub struct TotalsConfig {
    pub common: core_config::Config,
    pub service_name: String,
    pub service_version: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub policy: PolicyConfig,
}

/// How submitted documents are checked.
#[derive(Debug, Clone)]
pub struct PolicyConfig {
    /// Reject documents whose client-side totals disagree with ours
    /// instead of overriding them.
    pub reject_client_mismatch: bool,
    pub max_line_items: usize,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            reject_client_mismatch: false,
            max_line_items: 500,
        }
    }
}

impl TotalsConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        let defaults = PolicyConfig::default();

        Ok(Self {
            common,
            service_name: env::var("SERVICE_NAME").unwrap_or_else(|_| "totals-service".to_string()),
            service_version: env::var("SERVICE_VERSION")
                .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|s| !s.is_empty()),
            policy: PolicyConfig {
                reject_client_mismatch: env_or(
                    "TOTALS_REJECT_CLIENT_MISMATCH",
                    defaults.reject_client_mismatch,
                )?,
                max_line_items: env_or("TOTALS_MAX_LINE_ITEMS", defaults.max_line_items)?,
            },
        })
    }
}
