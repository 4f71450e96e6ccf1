use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
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

/// Process-wide settings, read from `SNEAKDB_*` environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Upper bound for a plausible price; observations above it are dropped.
    pub max_price: Decimal,
    /// Maximum number of image URLs kept per page.
    pub max_images: usize,
    /// Run the three field extractions on scoped threads.
    pub parallel_fields: bool,
    pub fetch_timeout_secs: u64,
    pub fetch_user_agent: String,
    pub max_concurrent_pages: usize,
}
