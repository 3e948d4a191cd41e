//! medicheck-rag — pharmacogenomic question answering over a drug reference table.
//!
//! Pipeline for one question:
//!   extract  : pull a candidate drug name out of the question
//!   retrieval: first table row mentioning it, then the sufficiency gate
//!   prompt   : context prompt or general-knowledge fallback prompt
//!   chatbot  : append to the conversation, call the completion backend

pub mod extract;
pub mod retrieval;
pub mod prompt;
pub mod history;
pub mod chatbot;

pub use chatbot::{ChatbotOptions, PharmacoChatbot};
pub use extract::extract_drug_name;
pub use history::{ConversationHistory, ConversationTurn};
pub use retrieval::{retrieve_context, RetrievalOutcome};
