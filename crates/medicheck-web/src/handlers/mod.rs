//! HTTP handlers for all API routes.

pub mod chat;
pub mod medicaments;
pub mod system;
pub mod toxicity;
