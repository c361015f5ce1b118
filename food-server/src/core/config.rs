/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | DATABASE_URL | sqlite:food.db | SQLite database (created if missing) |
/// | HTTP_PORT | 8000 | HTTP listen port |
/// | ENVIRONMENT | development | development / staging / production |
/// | DB_MAX_CONNECTIONS | 5 | connection pool size |
/// | CACHE_ENABLED | true | enable the response cache |
/// | REQUEST_TIMEOUT_MS | 30000 | per-request timeout (ms) |
/// | LOG_LEVEL | info | default log level when RUST_LOG is unset |
/// | LOG_JSON | true in production | JSON log lines instead of text |
///
/// # Example
///
/// ```ignore
/// DATABASE_URL=sqlite:/data/food.db HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite connection URL
    pub database_url: String,
    /// HTTP API port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// Maximum pooled database connections
    pub db_max_connections: u32,
    /// Whether read endpoints use the response cache
    pub cache_enabled: bool,
    /// Request timeout (ms)
    pub request_timeout_ms: u64,
    /// Log level used when RUST_LOG is unset
    pub log_level: String,
    pub log_json: bool,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset or unparsable variables fall back to their defaults.
    pub fn from_env() -> Self {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:food.db".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            db_max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|p| p.parse().ok())
                .filter(|&n| n > 0)
                .unwrap_or(5),
            cache_enabled: std::env::var("CACHE_ENABLED")
                .ok()
                .and_then(|v| parse_bool(&v))
                .unwrap_or(true),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30000),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: std::env::var("LOG_JSON")
                .ok()
                .and_then(|v| parse_bool(&v))
                .unwrap_or(environment == "production"),
            environment,
        }
    }

    /// In-memory configuration for tests and embedded use
    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".into(),
            http_port: 0,
            environment: "test".into(),
            db_max_connections: 1,
            cache_enabled: true,
            request_timeout_ms: 30000,
            log_level: "info".into(),
            log_json: false,
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool(" off "), Some(false));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_in_memory_config() {
        let config = Config::in_memory();
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.db_max_connections, 1);
        assert!(!config.log_json);
    }
}
