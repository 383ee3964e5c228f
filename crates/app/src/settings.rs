//! Handles settings for the application. Configuration is read from
//! `settings.toml` (or the file given with `--config`) and can be overridden
//! with `SPENDWISE__<SECTION>__<KEY>` environment variables.
//!
//! See `settings.example.toml` for the configuration.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: None,
            port: 3000,
            database: Database::Sqlite("spendwise.db".to_string()),
        }
    }
}

/// OpenAI-compatible completion provider behind the chat.
#[derive(Debug, Deserialize)]
pub struct Assistant {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_history_turns")]
    pub history_turns: usize,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_history_turns() -> usize {
    engine::DEFAULT_HISTORY_TURNS
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Chat {
    pub persist_attempts: u32,
    pub persist_backoff_ms: u64,
}

impl Default for Chat {
    fn default() -> Self {
        Self {
            persist_attempts: 3,
            persist_backoff_ms: 500,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    #[serde(default)]
    pub server: Server,
    pub assistant: Option<Assistant>,
    #[serde(default)]
    pub chat: Chat,
}

impl Settings {
    pub fn new(path: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("SPENDWISE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}
