//! Retrieval-augmented pharmacogenomic chatbot.
//!
//! One `query` call:
//!   1. decide from the reference table (context vs. fallback)
//!   2. append the user turn to the caller's history
//!   3. call the completion backend with persona + history window
//!   4. append the assistant turn on success only
//!
//! Every failure of step 3 comes back as a readable diagnostic string in
//! place of the answer.

use std::sync::Arc;

use medicheck_common::DrugTable;
use medicheck_llm::{LlmBackend, LlmError, LlmRequest, Message};
use tracing::{info, warn};

use crate::history::ConversationHistory;
use crate::prompt::{build_user_prompt, DEFAULT_SYSTEM_PROMPT};
use crate::retrieval::{retrieve_context, RetrievalOutcome};

/// Sampling and history settings for the chatbot.
#[derive(Debug, Clone)]
pub struct ChatbotOptions {
    pub system_prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Upper bound on history turns sent per call; `None` sends all.
    pub max_history_turns: Option<usize>,
}

impl Default for ChatbotOptions {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            temperature: 0.3,
            max_tokens: 800,
            max_history_turns: None,
        }
    }
}

pub struct PharmacoChatbot {
    table: Arc<DrugTable>,
    backend: Arc<dyn LlmBackend>,
    options: ChatbotOptions,
}

impl PharmacoChatbot {
    pub fn new(table: Arc<DrugTable>, backend: Arc<dyn LlmBackend>) -> Self {
        Self { table, backend, options: ChatbotOptions::default() }
    }

    pub fn with_options(mut self, options: ChatbotOptions) -> Self {
        self.options = options;
        self
    }

    pub fn table(&self) -> &DrugTable {
        &self.table
    }

    pub fn options(&self) -> &ChatbotOptions {
        &self.options
    }

    pub fn retrieve(&self, question: &str) -> RetrievalOutcome {
        retrieve_context(&self.table, question)
    }

    /// Answer `question` within the conversation `history`.
    pub async fn query(&self, history: &mut ConversationHistory, question: &str) -> String {
        let outcome = self.retrieve(question);
        match &outcome {
            RetrievalOutcome::NoMatch(reason) => {
                info!(outcome = outcome.as_str(), reason = %reason, "Answering from general knowledge")
            }
            _ => info!(outcome = outcome.as_str(), "Local retrieval complete"),
        }

        history.push(Message::user(build_user_prompt(question, &outcome)));

        // a window of zero would drop the turn just added
        let window = self.options.max_history_turns.map(|n| n.max(1));
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(Message::system(self.options.system_prompt.clone()));
        messages.extend(history.window(window).iter().cloned());

        let req = LlmRequest {
            messages,
            model: None,
            max_tokens: Some(self.options.max_tokens),
            temperature: Some(self.options.temperature),
        };

        match self.backend.complete(req).await {
            Ok(resp) => {
                info!(
                    model = %resp.model,
                    prompt_tokens = resp.prompt_tokens,
                    completion_tokens = resp.completion_tokens,
                    "Completion received"
                );
                history.push(Message::assistant(resp.content.clone()));
                resp.content
            }
            Err(LlmError::ApiError { status, body }) => {
                warn!(status, model = self.backend.model_id(), "Completion API returned an error");
                format!("❌ API error {status} : {body}")
            }
            Err(e) => {
                warn!(error = %e, model = self.backend.model_id(), "Completion call failed");
                format!("❌ Exception while calling API : {e}")
            }
        }
    }
}
