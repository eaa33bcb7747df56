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

/// Runtime settings shared by the server and the CLI.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub request_timeout_secs: u64,
    /// User agent for detail-page requests. The listing request always
    /// presents a browser user agent instead.
    pub user_agent: String,
    /// Base that relative result links are resolved against. Always ends in `/`.
    pub detail_base_url: String,
    /// Maximum number of detail pages fetched at once. `1` means sequential.
    pub detail_concurrency: usize,
    /// When set, the raw listing HTML of the latest search is written here.
    pub raw_html_log_path: Option<PathBuf>,
}
