//! Logging Infrastructure

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "food_server=info,tower_http=info";

/// Initialize the global tracing subscriber
///
/// `RUST_LOG` wins; otherwise `log_level` applies to this crate and tower_http.
/// `json` switches to one JSON object per line.
pub fn init_logger(log_level: Option<&str>, json: bool) {
    let fallback = match log_level {
        Some(level) => format!("food_server={level},tower_http={level}"),
        None => DEFAULT_FILTER.to_string(),
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into());

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
