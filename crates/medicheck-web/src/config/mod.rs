//! Configuration loading for MediCheck.
//! Reads medicheck.toml from the current directory or the path in the MEDICHECK_CONFIG env var.

use std::path::{Path, PathBuf};
use std::time::Duration;

use medicheck_common::MedicheckError;
use medicheck_llm::RetryPolicy;
use medicheck_rag::prompt::DEFAULT_SYSTEM_PROMPT;
use medicheck_rag::ChatbotOptions;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::state::SessionLimits;

/// Environment variable holding the completion API key.
pub const API_KEY_ENV: &str = "A4F_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16    { 8000 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// CSV export of the pharmacogenomic reference spreadsheet.
    #[serde(default = "default_reference_table")]
    pub reference_table: PathBuf,
    /// CSV export of the toxicity spreadsheet.
    #[serde(default = "default_toxicity_table")]
    pub toxicity_table: PathBuf,
    /// Directory served under `/static`.
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
    /// Structure images, `<DCI>.png`. Must live under `static_dir`.
    #[serde(default = "default_images_dir")]
    pub images_dir: PathBuf,
}

fn default_reference_table() -> PathBuf { PathBuf::from("medicaments/data/chat_RAG.csv") }
fn default_toxicity_table()  -> PathBuf { PathBuf::from("medicaments/data/fichier_medicaments_avec_images_tox.csv") }
fn default_static_dir()      -> PathBuf { PathBuf::from("medicaments/static") }
fn default_images_dir()      -> PathBuf { PathBuf::from("medicaments/static/images_medicaments") }

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            reference_table: default_reference_table(),
            toxicity_table: default_toxicity_table(),
            static_dir: default_static_dir(),
            images_dir: default_images_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Retries on transport errors only.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
    /// Falls back to the A4F_API_KEY environment variable when empty.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
}

fn default_endpoint()         -> String { "https://api.a4f.co/v1/chat/completions".to_string() }
fn default_model()            -> String { "provider-6/gpt-4.1".to_string() }
fn default_temperature()      -> f32    { 0.3 }
fn default_max_tokens()       -> u32    { 800 }
fn default_timeout_secs()     -> u64    { 60 }
fn default_max_retries()      -> u32    { 2 }
fn default_retry_backoff_ms() -> u64    { 500 }

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
            api_key: None,
        }
    }
}

impl LlmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, Duration::from_millis(self.retry_backoff_ms))
    }

    /// Configured key, else the environment variable.
    pub fn resolve_api_key(&self) -> Option<SecretString> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty()))
            .map(SecretString::from)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Most recent turns of a conversation sent with each question; 0 sends all.
    #[serde(default = "default_max_history_turns")]
    pub max_history_turns: usize,
    #[serde(default)]
    pub system_prompt: Option<String>,
    /// Live conversations kept in memory.
    #[serde(default = "default_max_sessions")]
    pub max_sessions: u64,
    /// Seconds of inactivity after which a conversation is dropped.
    #[serde(default = "default_session_idle_secs")]
    pub session_idle_secs: u64,
}

fn default_max_history_turns() -> usize { 20 }
fn default_max_sessions()      -> u64   { 10_000 }
fn default_session_idle_secs() -> u64   { 3600 }

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_history_turns: default_max_history_turns(),
            system_prompt: None,
            max_sessions: default_max_sessions(),
            session_idle_secs: default_session_idle_secs(),
        }
    }
}

impl ChatConfig {
    pub fn history_window(&self) -> Option<usize> {
        (self.max_history_turns > 0).then_some(self.max_history_turns)
    }

    pub fn session_limits(&self) -> SessionLimits {
        SessionLimits {
            max_sessions: self.max_sessions,
            idle_timeout: Duration::from_secs(self.session_idle_secs),
        }
    }
}


impl Config {
    /// Load configuration from medicheck.toml.
    /// Checks MEDICHECK_CONFIG env var first, then current directory.
    /// Without either, built-in defaults are used.
    pub fn load() -> anyhow::Result<Self> {
        let (path, explicit) = match std::env::var("MEDICHECK_CONFIG") {
            Ok(p) => (p, true),
            Err(_) => ("medicheck.toml".to_string(), false),
        };

        if !Path::new(&path).exists() {
            if explicit {
                anyhow::bail!("Config file not found: {}", path);
            }
            tracing::warn!("{} not found, using built-in defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let config = Self::from_toml_str(&content)?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), MedicheckError> {
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(MedicheckError::Config(format!(
                "llm.temperature must be within 0.0..=2.0, got {}",
                self.llm.temperature
            )));
        }
        if self.llm.max_tokens == 0 {
            return Err(MedicheckError::Config("llm.max_tokens must be positive".to_string()));
        }
        if self.chat.max_sessions == 0 {
            return Err(MedicheckError::Config("chat.max_sessions must be positive".to_string()));
        }
        if self.chat.session_idle_secs == 0 {
            return Err(MedicheckError::Config("chat.session_idle_secs must be positive".to_string()));
        }
        Ok(())
    }

    pub fn chatbot_options(&self) -> ChatbotOptions {
        ChatbotOptions {
            system_prompt: self
                .chat
                .system_prompt
                .clone()
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
            temperature: self.llm.temperature,
            max_tokens: self.llm.max_tokens,
            max_history_turns: self.chat.history_window(),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
