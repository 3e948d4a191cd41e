//! medicheck-llm — chat-completion backend abstraction.
//!
//! Backends:
//!   OpenAiCompatibleBackend: any endpoint speaking the OpenAI
//!                             `/v1/chat/completions` dialect (a4f, OpenAI,
//!                             OpenRouter, vLLM, …)

pub mod backend;
pub mod retry;

pub use backend::{
    LlmBackend, LlmError, LlmRequest, LlmResponse, Message, OpenAiCompatibleBackend, Role,
};
pub use retry::RetryPolicy;
