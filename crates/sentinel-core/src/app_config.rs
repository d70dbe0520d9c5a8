use std::net::SocketAddr;

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
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub youtube_api_key: String,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub request_timeout_secs: u64,
    /// Minimum wall-clock interval between outbound analysis calls.
    pub min_secs_between_calls: f64,
    /// Pause between consecutive analysis chunks, independent of the
    /// per-call rate gate.
    pub inter_chunk_delay_secs: u64,
    pub chunk_size: usize,
    pub max_comments: usize,
    pub db_max_connections: u32,
    pub db_acquire_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &self.database_url)
            .field("youtube_api_key", &"[redacted]")
            .field("gemini_api_key", &"[redacted]")
            .field("gemini_model", &self.gemini_model)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("min_secs_between_calls", &self.min_secs_between_calls)
            .field("inter_chunk_delay_secs", &self.inter_chunk_delay_secs)
            .field("chunk_size", &self.chunk_size)
            .field("max_comments", &self.max_comments)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .finish()
    }
}
