//! Configuration module for the portfolio backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::roster::DEFAULT_COLLATION_LOCALE;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Emit logs as JSON lines instead of human-readable text
    pub log_json: bool,
    /// JSON roster served while the members table is empty
    pub roster_fallback_path: Option<PathBuf>,
    /// BCP-47 locale used to alphabetize member names
    pub collation_locale: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let db_path = env::var("PORTFOLIO_DB_PATH")
            .unwrap_or_else(|_| "./data/portfolio.sqlite".to_string())
            .into();

        let bind_addr = env::var("PORTFOLIO_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .expect("Invalid PORTFOLIO_BIND_ADDR format");

        let log_level = env::var("PORTFOLIO_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let log_json = env::var("PORTFOLIO_LOG_FORMAT")
            .map(|format| format.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let roster_fallback_path = env::var("PORTFOLIO_ROSTER_FALLBACK")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let collation_locale = env::var("PORTFOLIO_COLLATION_LOCALE")
            .unwrap_or_else(|_| DEFAULT_COLLATION_LOCALE.to_string());

        Self {
            db_path,
            bind_addr,
            log_level,
            log_json,
            roster_fallback_path,
            collation_locale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        env::remove_var("PORTFOLIO_DB_PATH");
        env::remove_var("PORTFOLIO_BIND_ADDR");
        env::remove_var("PORTFOLIO_LOG_LEVEL");
        env::remove_var("PORTFOLIO_LOG_FORMAT");
        env::remove_var("PORTFOLIO_ROSTER_FALLBACK");
        env::remove_var("PORTFOLIO_COLLATION_LOCALE");

        let config = Config::from_env();

        assert_eq!(config.db_path, PathBuf::from("./data/portfolio.sqlite"));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "info");
        assert!(!config.log_json);
        assert!(config.roster_fallback_path.is_none());
        assert_eq!(config.collation_locale, "und");
    }
}
