use std::{
    net::{Ipv4Addr, SocketAddr},
    time::Duration,
};

/// Selects the in-process history instead of a SQLite file.
pub const IN_MEMORY_DATABASE: &str = ":memory:";

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub database_path: String,
    pub log_level: String,
    pub request_timeout: Duration,
}

impl Config {
    /// Reads `.env` (if present) and the process environment.
    /// Unparseable numbers fall back to their defaults.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let port: u16 = env_or("SERVER_PORT", "8080").parse().unwrap_or(8080);
        let timeout_ms: u64 = env_or("REQUEST_TIMEOUT_MS", "30000")
            .parse()
            .unwrap_or(30000);

        Self {
            listen_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)),
            database_path: env_or("DATABASE_PATH", "portfolio.db"),
            log_level: env_or("LOG_LEVEL", "info"),
            request_timeout: Duration::from_millis(timeout_ms),
        }
    }

    pub fn uses_memory_history(&self) -> bool {
        self.database_path == IN_MEMORY_DATABASE
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 8080)),
            database_path: "portfolio.db".into(),
            log_level: "info".into(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => default.to_string(),
    }
}
