//! Shared application state for the web server.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use medicheck_common::DrugTable;
use medicheck_llm::OpenAiCompatibleBackend;
use medicheck_rag::{ConversationHistory, PharmacoChatbot};
use moka::future::Cache;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::{Config, API_KEY_ENV};

/// Conversation used when a request carries no `session_id`.
pub const DEFAULT_SESSION: &str = "default";

/// Bounds on the number of live conversations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionLimits {
    pub max_sessions: u64,
    /// A conversation untouched for this long is dropped.
    pub idle_timeout: Duration,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self { max_sessions: 10_000, idle_timeout: Duration::from_secs(3600) }
    }
}

type SessionCache = Cache<String, Arc<Mutex<ConversationHistory>>>;

fn session_cache(limits: SessionLimits) -> SessionCache {
    Cache::builder()
        .max_capacity(limits.max_sessions)
        .time_to_idle(limits.idle_timeout)
        .build()
}

/// Shared state injected into every Axum handler.
pub struct AppState {
    /// Pharmacogenomic reference table, also read by the chatbot.
    pub reference: Arc<DrugTable>,
    /// Toxicity table; `None` when it failed to load at startup.
    pub toxicity: Option<Arc<DrugTable>>,
    pub chatbot: PharmacoChatbot,
    pub static_dir: PathBuf,
    pub images_dir: PathBuf,
    sessions: SessionCache,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(
        reference: Arc<DrugTable>,
        toxicity: Option<Arc<DrugTable>>,
        chatbot: PharmacoChatbot,
        static_dir: impl Into<PathBuf>,
        images_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            reference,
            toxicity,
            chatbot,
            static_dir: static_dir.into(),
            images_dir: images_dir.into(),
            sessions: session_cache(SessionLimits::default()),
        }
    }

    pub fn with_session_limits(mut self, limits: SessionLimits) -> Self {
        self.sessions = session_cache(limits);
        self
    }

    /// Load both tables and wire the completion backend from `config`.
    ///
    /// A missing reference table is fatal. A missing toxicity table only
    /// disables `/toxicite`.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let reference = DrugTable::load_csv(&config.data.reference_table).with_context(|| {
            format!("Failed to load reference table {}", config.data.reference_table.display())
        })?;
        let reference = Arc::new(reference);

        let toxicity = match DrugTable::load_csv(&config.data.toxicity_table) {
            Ok(table) => Some(Arc::new(table)),
            Err(e) => {
                warn!(
                    path = %config.data.toxicity_table.display(),
                    error = %e,
                    "Toxicity table unavailable, /toxicite will answer 500"
                );
                None
            }
        };

        let api_key = config.llm.resolve_api_key();
        if api_key.is_none() {
            warn!("No API key configured (set llm.api_key or {API_KEY_ENV}), upstream calls will be rejected");
        }

        let backend = OpenAiCompatibleBackend::new(&config.llm.endpoint, &config.llm.model, api_key)
            .with_sampling(config.llm.temperature, config.llm.max_tokens)
            .with_retry(config.llm.retry_policy())
            .with_timeout(config.llm.timeout())?;
        info!(
            endpoint = %config.llm.endpoint,
            model = %config.llm.model,
            timeout_secs = config.llm.timeout_secs,
            max_retries = config.llm.max_retries,
            "Completion backend configured"
        );

        let chatbot = PharmacoChatbot::new(reference.clone(), Arc::new(backend))
            .with_options(config.chatbot_options());

        Ok(Self::new(
            reference,
            toxicity,
            chatbot,
            &config.data.static_dir,
            &config.data.images_dir,
        )
        .with_session_limits(config.chat.session_limits()))
    }

    /// History for `session_id`, created empty on first use.
    ///
    /// Idle or least-used conversations are evicted once the limits are hit;
    /// a request already holding one keeps it alive until it finishes.
    pub async fn session(&self, session_id: &str) -> Arc<Mutex<ConversationHistory>> {
        self.sessions
            .get_with(session_id.to_string(), async {
                Arc::new(Mutex::new(ConversationHistory::new()))
            })
            .await
    }

    pub async fn session_count(&self) -> u64 {
        self.sessions.run_pending_tasks().await;
        self.sessions.entry_count()
    }
}
