use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub store_hash: String,
    pub access_token: String,
    pub api_base_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub public_dir: PathBuf,
    pub export_dir: PathBuf,
    /// `None` leaves the HTTP client without a request timeout.
    pub request_timeout_secs: Option<u64>,
    pub page_size: u32,
    pub page_delay_ms: u64,
    pub create_delay_ms: u64,
    pub max_batch: u32,
    /// Substrings of a remote error message that mark a duplicate-code conflict.
    pub conflict_markers: Vec<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("store_hash", &self.store_hash)
            .field("access_token", &"[redacted]")
            .field("api_base_url", &self.api_base_url)
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("public_dir", &self.public_dir)
            .field("export_dir", &self.export_dir)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("page_size", &self.page_size)
            .field("page_delay_ms", &self.page_delay_ms)
            .field("create_delay_ms", &self.create_delay_ms)
            .field("max_batch", &self.max_batch)
            .field("conflict_markers", &self.conflict_markers)
            .finish()
    }
}
