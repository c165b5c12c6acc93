// src/config/mod.rs
// Runtime configuration, loaded once from the environment (.env supported).

use once_cell::sync::Lazy;
use serde::Deserialize;
use std::str::FromStr;

#[derive(Debug, Clone, Deserialize)]
pub struct AcConfig {
    // ── Chat-completion endpoint
    pub chat_endpoint: String,
    pub app_id: String,
    pub request_timeout_secs: u64,

    // ── Database
    pub database_url: String,
    pub sqlite_max_connections: u32,

    // ── Admin area
    pub admin_password: String,

    // ── Server
    pub host: String,
    pub port: u16,

    // ── CORS
    pub cors_origin: String,
}

fn var(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn var_parsed<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl AcConfig {
    fn load() -> Self {
        // Missing .env is fine; plain environment variables still apply.
        let _ = dotenvy::dotenv();

        Self {
            chat_endpoint: std::env::var("ACPLAN_CHAT_ENDPOINT")
                .expect("ACPLAN_CHAT_ENDPOINT must be set"),
            app_id: std::env::var("ACPLAN_APP_ID").expect("ACPLAN_APP_ID must be set"),
            request_timeout_secs: var_parsed("ACPLAN_REQUEST_TIMEOUT_SECS", 300),
            database_url: var("ACPLAN_DATABASE_URL", "sqlite://acplan.db"),
            sqlite_max_connections: var_parsed("ACPLAN_SQLITE_MAX_CONNECTIONS", 5),
            admin_password: var("ACPLAN_ADMIN_PASSWORD", "admin123"),
            host: var("ACPLAN_HOST", "0.0.0.0"),
            port: var_parsed("ACPLAN_PORT", 8080),
            cors_origin: var("ACPLAN_CORS_ORIGIN", "*"),
        }
    }
}

pub static CONFIG: Lazy<AcConfig> = Lazy::new(AcConfig::load);
