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
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// JSON Lines dataset loaded at startup, if any.
    pub data_path: Option<PathBuf>,
    /// YAML file merged into the built-in sentiment lexicon.
    pub lexicon_path: Option<PathBuf>,
    pub positive_threshold: f32,
    pub negative_threshold: f32,
    pub remove_stopwords: bool,
    pub expand_acronyms: bool,
    pub vector_dimensions: usize,
    pub rate_limit_per_minute: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            env: Environment::Development,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            log_level: "info".to_string(),
            data_path: None,
            lexicon_path: None,
            positive_threshold: 0.05,
            negative_threshold: -0.05,
            remove_stopwords: true,
            expand_acronyms: true,
            vector_dimensions: 1024,
            rate_limit_per_minute: 120,
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("data_path", &self.data_path)
            .field("lexicon_path", &self.lexicon_path)
            .field(
                "thresholds",
                &(self.negative_threshold, self.positive_threshold),
            )
            .field("remove_stopwords", &self.remove_stopwords)
            .field("expand_acronyms", &self.expand_acronyms)
            .field("vector_dimensions", &self.vector_dimensions)
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .finish()
    }
}
