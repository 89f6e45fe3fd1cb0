//! Server configuration.
//!
//! Everything is read from the environment once at startup. Unset or
//! unparsable values fall back to the defaults below.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_SESSION_TTL_SECS: u64 = 24 * 60 * 60;
const DEFAULT_PAGE_LIMIT: u64 = 20;
const DEFAULT_MAX_PAGE_LIMIT: u64 = 100;
const DEFAULT_MAX_ACTIVE_APPS: u64 = 50;
const DEFAULT_LOGIN_URL: &str = "/login";

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// SeaORM connection string (sqlite or postgres)
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// How long an issued session stays valid
    pub session_ttl: Duration,
    pub default_page_limit: u64,
    pub max_page_limit: u64,
    /// Active apps allowed per entity before inserts are refused
    pub max_active_apps: u64,
    /// Target of the sign-in action in gated dialogs
    pub login_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let db_path = std::env::temp_dir().join("dapp-console").join("console.db");
        Self {
            database_url: format!("sqlite:{}?mode=rwc", db_path.display()),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
            default_page_limit: DEFAULT_PAGE_LIMIT,
            max_page_limit: DEFAULT_MAX_PAGE_LIMIT,
            max_active_apps: DEFAULT_MAX_ACTIVE_APPS,
            login_url: DEFAULT_LOGIN_URL.to_string(),
        }
    }
}

impl ServerConfig {
    /// Build config from process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup (used by `from_env` and tests)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let max_page_limit = parse_or(&lookup, "CONSOLE_MAX_PAGE_LIMIT", DEFAULT_MAX_PAGE_LIMIT).max(1);
        let default_page_limit = parse_or(&lookup, "CONSOLE_DEFAULT_PAGE_LIMIT", DEFAULT_PAGE_LIMIT)
            .clamp(1, max_page_limit);

        Self {
            database_url: lookup("DATABASE_URL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.database_url),
            bind_addr: parse_or(&lookup, "CONSOLE_BIND_ADDR", defaults.bind_addr),
            session_ttl: Duration::from_secs(parse_or(
                &lookup,
                "CONSOLE_SESSION_TTL_SECS",
                DEFAULT_SESSION_TTL_SECS,
            )),
            default_page_limit,
            max_page_limit,
            max_active_apps: parse_or(&lookup, "CONSOLE_MAX_ACTIVE_APPS", DEFAULT_MAX_ACTIVE_APPS),
            login_url: lookup("CONSOLE_LOGIN_URL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.login_url),
        }
    }

    /// Resolve a requested page size: missing means default, otherwise clamp to `[1, max]`
    pub fn page_limit(&self, requested: Option<u64>) -> u64 {
        requested
            .unwrap_or(self.default_page_limit)
            .clamp(1, self.max_page_limit)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!("Ignoring invalid value for {}: {:?}", key, raw);
                default
            }
        },
        None => default,
    }
}
