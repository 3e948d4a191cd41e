//! End-to-end behaviour of `PharmacoChatbot::query` against a scripted backend.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use medicheck_common::{DrugRecord, DrugTable};
use medicheck_llm::{LlmBackend, LlmError, LlmRequest, LlmResponse, Role};
use medicheck_rag::prompt::{CAUTION_CLOSING, DEFAULT_SYSTEM_PROMPT, RELIABLE_CLOSING};
use medicheck_rag::{ChatbotOptions, ConversationHistory, PharmacoChatbot};

#[derive(Default)]
struct ScriptedBackend {
    replies: Mutex<VecDeque<Result<LlmResponse, LlmError>>>,
    requests: Mutex<Vec<LlmRequest>>,
}

impl ScriptedBackend {
    fn with_replies(replies: Vec<Result<LlmResponse, LlmError>>) -> Arc<Self> {
        Arc::new(Self { replies: Mutex::new(replies.into()), requests: Mutex::default() })
    }

    fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().unwrap().clone()
    }
}

fn answer(text: &str) -> Result<LlmResponse, LlmError> {
    Ok(LlmResponse {
        content: text.to_string(),
        model: "stub".to_string(),
        prompt_tokens: 0,
        completion_tokens: 0,
    })
}

#[async_trait]
impl LlmBackend for ScriptedBackend {
    async fn complete(&self, req: LlmRequest) -> Result<LlmResponse, LlmError> {
        self.requests.lock().unwrap().push(req);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| answer("default"))
    }

    fn model_id(&self) -> &str { "stub" }
}

fn aspirin_table() -> Arc<DrugTable> {
    let row = DrugRecord::new()
        .with_field("DCI", "ASPIRIN")
        .with_field("Genes_Involved", "CYP2C9")
        .with_field("Variants_Haplotypes", "*2")
        .with_field("Evidence_Levels", "1A")
        .with_field("Phenotypes", "normal metabolizer");
    Arc::new(DrugTable::new(Vec::new(), vec![row]))
}

#[tokio::test]
async fn test_context_question_sends_persona_and_context() {
    let backend = ScriptedBackend::with_replies(vec![answer("Réponse fiable")]);
    let bot = PharmacoChatbot::new(aspirin_table(), backend.clone());
    let mut history = ConversationHistory::new();

    let reply = bot.query(&mut history, "Quels sont les effets de ASPIRIN ?").await;
    assert_eq!(reply, "Réponse fiable");

    let reqs = backend.requests();
    assert_eq!(reqs.len(), 1);
    let req = &reqs[0];
    assert_eq!(req.temperature, Some(0.3));
    assert_eq!(req.max_tokens, Some(800));
    assert_eq!(req.messages.len(), 2);
    assert_eq!(req.messages[0].role, Role::System);
    assert_eq!(req.messages[0].content, DEFAULT_SYSTEM_PROMPT);

    let user = &req.messages[1];
    assert_eq!(user.role, Role::User);
    for line in [
        "- DCI : ASPIRIN",
        "- Genes_Involved : CYP2C9",
        "- Variants_Haplotypes : *2",
        "- Evidence_Levels : 1A",
        "- Phenotypes : normal metabolizer",
    ] {
        assert!(user.content.contains(line), "missing {line:?} in {}", user.content);
    }
    assert!(user.content.ends_with(RELIABLE_CLOSING));
}

#[tokio::test]
async fn test_unknown_drug_uses_fallback_prompt() {
    let backend = ScriptedBackend::with_replies(vec![answer("Réponse générale")]);
    let bot = PharmacoChatbot::new(aspirin_table(), backend.clone());
    let mut history = ConversationHistory::new();

    bot.query(&mut history, "parle-moi de IBUPROFEN").await;

    let user = &backend.requests()[0].messages[1];
    assert!(user.content.starts_with("parle-moi de IBUPROFEN"));
    assert!(user.content.ends_with(CAUTION_CLOSING));
}

#[tokio::test]
async fn test_history_grows_by_two_per_successful_query() {
    let backend = ScriptedBackend::with_replies(vec![answer("a1"), answer("a2"), answer("a3")]);
    let bot = PharmacoChatbot::new(aspirin_table(), backend.clone());
    let mut history = ConversationHistory::new();

    for q in ["effets de ASPIRIN", "et sur IBUPROFEN ?", "Bonjour"] {
        bot.query(&mut history, q).await;
    }

    assert_eq!(history.len(), 6);
    let roles: Vec<Role> = history.turns().iter().map(|t| t.role).collect();
    assert_eq!(
        roles,
        vec![Role::User, Role::Assistant, Role::User, Role::Assistant, Role::User, Role::Assistant]
    );
    assert_eq!(history.turns()[5].content, "a3");

    // the third call saw the whole conversation plus the persona
    assert_eq!(backend.requests()[2].messages.len(), 1 + 5);
}

#[tokio::test]
async fn test_http_error_returns_diagnostic_and_keeps_user_turn() {
    let backend = ScriptedBackend::with_replies(vec![Err(LlmError::ApiError {
        status: 500,
        body: "internal failure".to_string(),
    })]);
    let bot = PharmacoChatbot::new(aspirin_table(), backend);
    let mut history = ConversationHistory::new();

    let reply = bot.query(&mut history, "effets de ASPIRIN").await;

    assert_eq!(reply, "❌ API error 500 : internal failure");
    assert_eq!(history.len(), 1);
    assert_eq!(history.turns()[0].role, Role::User);
}

#[tokio::test]
async fn test_transport_error_returns_diagnostic() {
    let backend = ScriptedBackend::with_replies(vec![Err(LlmError::InvalidResponse(
        "no choices in response".to_string(),
    ))]);
    let bot = PharmacoChatbot::new(aspirin_table(), backend);
    let mut history = ConversationHistory::new();

    let reply = bot.query(&mut history, "effets de ASPIRIN").await;

    assert!(reply.starts_with("❌ Exception while calling API : "), "{reply}");
    assert!(reply.contains("no choices in response"));
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn test_history_window_bounds_request_not_history() {
    let backend = ScriptedBackend::with_replies(vec![]);
    let options = ChatbotOptions { max_history_turns: Some(3), ..ChatbotOptions::default() };
    let bot = PharmacoChatbot::new(aspirin_table(), backend.clone()).with_options(options);
    let mut history = ConversationHistory::new();

    for _ in 0..4 {
        bot.query(&mut history, "effets de ASPIRIN").await;
    }

    assert_eq!(history.len(), 8);
    let last = backend.requests().pop().unwrap();
    assert_eq!(last.messages.len(), 1 + 3);
    assert_eq!(last.messages[0].role, Role::System);
    assert_eq!(last.messages[3].role, Role::User);
}
