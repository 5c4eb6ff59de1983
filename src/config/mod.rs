use crate::core::{AppError, ReportingTimezone, Result};
use std::env;

pub mod database;
pub mod server;

pub use database::{run_migrations, DatabaseConfig};
pub use server::ServerConfig;

/// Minimum length accepted for the admin token signing secret
const MIN_TOKEN_SECRET_LEN: usize = 32;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub security: SecurityConfig,
    pub reporting: ReportingConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
    /// "json" for structured output, anything else for human-readable lines
    pub log_format: String,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub admin_token_secret: String,
    pub rate_limit_per_minute: u32,
}

#[derive(Debug, Clone)]
pub struct ReportingConfig {
    /// Offset of the reporting timezone in minutes east of UTC
    pub utc_offset_minutes: i32,
}

impl ReportingConfig {
    pub fn timezone(&self) -> Result<ReportingTimezone> {
        ReportingTimezone::from_offset_minutes(self.utc_offset_minutes)
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = Config {
            app: AppConfig {
                env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
                log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),
            },
            database: DatabaseConfig::from_env()?,
            server: ServerConfig::from_env()?,
            security: SecurityConfig {
                admin_token_secret: env::var("ADMIN_TOKEN_SECRET").map_err(|_| {
                    AppError::Configuration("ADMIN_TOKEN_SECRET not set".to_string())
                })?,
                rate_limit_per_minute: env::var("RATE_LIMIT_PER_MINUTE")
                    .unwrap_or_else(|_| "120".to_string())
                    .parse()
                    .map_err(|_| {
                        AppError::Configuration("Invalid RATE_LIMIT_PER_MINUTE".to_string())
                    })?,
            },
            reporting: ReportingConfig {
                utc_offset_minutes: env::var("REPORTING_UTC_OFFSET_MINUTES")
                    .unwrap_or_else(|_| "0".to_string())
                    .parse()
                    .map_err(|_| {
                        AppError::Configuration(
                            "Invalid REPORTING_UTC_OFFSET_MINUTES".to_string(),
                        )
                    })?,
            },
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.security.admin_token_secret.len() < MIN_TOKEN_SECRET_LEN {
            return Err(AppError::Configuration(format!(
                "ADMIN_TOKEN_SECRET must be at least {} characters",
                MIN_TOKEN_SECRET_LEN
            )));
        }

        if self.security.rate_limit_per_minute == 0 {
            return Err(AppError::Configuration(
                "Rate limit must be greater than 0".to_string(),
            ));
        }

        self.reporting.timezone()?;

        Ok(())
    }
}
