use std::env;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{0} is not a valid value: {1}")]
    Invalid(&'static str, String),
}

fn env_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<bool>().ok())
        .unwrap_or(default)
}

/// Process configuration, loaded once at startup from the environment
/// (teacher's `dotenv::dotenv().ok()` + `env::var(...)` idiom in
/// `flashlight/src/main.rs`). A missing `ENDPOINT` is the one `Fatal`
/// config error -- the process exits before serving, never panics.
#[derive(Debug, Clone)]
pub struct Config {
    pub env: String,
    pub endpoint: String,
    pub ws_endpoint: String,
    pub port: u16,
    pub use_websocket: bool,
    pub use_order_subscriber: bool,
    pub rate_limit_calls_per_second: u32,
    pub allow_load_test: bool,
    pub commit: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let endpoint = env::var("ENDPOINT").map_err(|_| ConfigError::Missing("ENDPOINT"))?;
        let ws_endpoint = env::var("WS_ENDPOINT").unwrap_or_else(|_| endpoint.replace("http", "ws"));

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| ConfigError::Invalid("PORT", raw))?,
            Err(_) => 6969,
        };

        let rate_limit_calls_per_second = match env::var("RATE_LIMIT_CALLS_PER_SECOND") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| ConfigError::Invalid("RATE_LIMIT_CALLS_PER_SECOND", raw))?,
            Err(_) => 1,
        };

        Ok(Self {
            env: env::var("ENV").unwrap_or_else(|_| "devnet".to_string()),
            endpoint,
            ws_endpoint,
            port,
            use_websocket: env_bool("USE_WEBSOCKET", false),
            use_order_subscriber: env_bool("USE_ORDER_SUBSCRIBER", false),
            rate_limit_calls_per_second,
            allow_load_test: env_bool("ALLOW_LOAD_TEST", false),
            commit: env::var("COMMIT").unwrap_or_else(|_| "unknown".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn missing_endpoint_is_fatal() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::remove_var("ENDPOINT");
        assert!(matches!(Config::from_env(), Err(ConfigError::Missing("ENDPOINT"))));
    }

    #[test]
    fn port_defaults_to_6969() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::set_var("ENDPOINT", "https://example.invalid");
        std::env::remove_var("PORT");
        let config = Config::from_env().unwrap();
        assert_eq!(config.port, 6969);
        std::env::remove_var("ENDPOINT");
    }
}
