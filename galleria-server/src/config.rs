//! Server configuration module
//!
//! Handles loading configuration from environment variables with sensible defaults.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Default listening port
pub const DEFAULT_PORT: u16 = 5000;

/// Origin allowed by CORS when `ALLOWED_ORIGINS` is unset
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";

/// Server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port (default: 5000)
    pub port: u16,
    /// Server host (default: 127.0.0.1)
    pub host: [u8; 4],
    /// Base URL used to build image URLs (default: http://localhost:<port>)
    pub public_base_url: String,
    /// Directory holding uploaded files (default: ./uploads)
    pub upload_dir: PathBuf,
    /// Allowed CORS origins; `None` allows any origin
    pub allowed_origins: Option<Vec<String>>,
    /// Request body limit in MB (default: 50)
    pub body_limit_mb: usize,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
    /// Enable rate limiting (default: false for tests, true when loaded from env)
    pub rate_limit_enabled: bool,
    /// Rate limit: requests per second (default: 10)
    pub rate_limit_per_sec: u64,
    /// Rate limit: burst size (default: 20)
    pub rate_limit_burst: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            host: [127, 0, 0, 1],
            public_base_url: default_base_url(DEFAULT_PORT),
            upload_dir: PathBuf::from("uploads"),
            allowed_origins: Some(vec![DEFAULT_ALLOWED_ORIGIN.to_string()]),
            body_limit_mb: 50,
            timeout_secs: 30,
            rate_limit_enabled: false, // Disabled by default (for tests)
            rate_limit_per_sec: 10,
            rate_limit_burst: 20,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// `from_env` delegates here; tests pass a map instead of mutating the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = lookup("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let host = lookup("HOST")
            .map(|h| {
                if h == "0.0.0.0" {
                    [0, 0, 0, 0]
                } else {
                    [127, 0, 0, 1]
                }
            })
            .unwrap_or([127, 0, 0, 1]);

        let public_base_url = lookup("BACKEND_URL")
            .map(|u| u.trim().trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| default_base_url(port));

        let upload_dir = lookup("UPLOAD_DIR")
            .filter(|d| !d.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("uploads"));

        // Only an explicit "*" opens CORS to any origin
        let allowed_origins = match lookup("ALLOWED_ORIGINS") {
            Some(origins) if origins.trim() == "*" => None,
            Some(origins) => {
                let origins: Vec<String> = origins
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
                if origins.is_empty() {
                    Some(vec![DEFAULT_ALLOWED_ORIGIN.to_string()])
                } else {
                    Some(origins)
                }
            }
            None => Some(vec![DEFAULT_ALLOWED_ORIGIN.to_string()]),
        };

        let body_limit_mb = lookup("BODY_LIMIT_MB")
            .and_then(|v| v.parse().ok())
            .unwrap_or(50);

        let timeout_secs = lookup("REQUEST_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        let rate_limit_per_sec = lookup("RATE_LIMIT_PER_SEC")
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);

        let rate_limit_burst = lookup("RATE_LIMIT_BURST")
            .and_then(|v| v.parse().ok())
            .unwrap_or(20);

        // Rate limiting enabled by default in production, can be disabled with RATE_LIMIT_ENABLED=false
        let rate_limit_enabled = lookup("RATE_LIMIT_ENABLED")
            .map(|v| v.to_lowercase() != "false")
            .unwrap_or(true);

        Self {
            port,
            host,
            public_base_url,
            upload_dir,
            allowed_origins,
            body_limit_mb,
            timeout_secs,
            rate_limit_enabled,
            rate_limit_per_sec,
            rate_limit_burst,
        }
    }

    /// Request body limit in bytes, saturating for oversized `BODY_LIMIT_MB`
    pub fn body_limit_bytes(&self) -> usize {
        self.body_limit_mb.saturating_mul(1024 * 1024)
    }

    /// Get socket address from config
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::from((self.host, self.port))
    }
}

fn default_base_url(port: u16) -> String {
    format!("http://localhost:{}", port)
}
