use std::env;
use std::time::Duration;

/// Config holds all application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub frontend_dir: String,
    /// Username tried for the default credential candidates.
    pub switch_user: String,
    /// Ordered default passwords tried during credential resolution.
    pub switch_passwords: Vec<String>,
    /// Vendor REST API version segment, e.g. "10.09".
    pub api_version: String,
    pub ssl_verify: bool,
    pub request_timeout: Duration,
    pub poll_interval: Duration,
    /// Switch addresses seeded into the inventory at startup.
    pub default_switches: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn load() -> Self {
        Self {
            listen_addr: get_env("LISTEN_ADDR", "0.0.0.0:8080"),
            frontend_dir: get_env("FRONTEND_DIR", "/app/frontend"),
            switch_user: get_env("SWITCH_USER", "admin"),
            switch_passwords: split_list(&get_env("SWITCH_PASSWORDS", "admin,")),
            api_version: get_env("API_VERSION", "10.09"),
            ssl_verify: get_env("SSL_VERIFY", "false").to_lowercase() == "true",
            request_timeout: Duration::from_secs(
                get_env("REQUEST_TIMEOUT_SECS", "10").parse().unwrap_or(10),
            ),
            poll_interval: Duration::from_secs(
                get_env("POLL_INTERVAL_SECS", "30").parse().unwrap_or(30),
            ),
            default_switches: split_list(&get_env("DEFAULT_SWITCHES", ""))
                .into_iter()
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    /// Default credential pairs in attempt order.
    pub fn default_credentials(&self) -> Vec<(String, String)> {
        self.switch_passwords
            .iter()
            .map(|p| (self.switch_user.clone(), p.clone()))
            .collect()
    }
}

fn get_env(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Split a comma-separated env value, trimming whitespace but keeping empty
/// entries (an empty password is a valid default candidate).
fn split_list(value: &str) -> Vec<String> {
    value.split(',').map(|s| s.trim().to_string()).collect()
}
