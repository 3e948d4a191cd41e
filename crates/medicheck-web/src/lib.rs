//! medicheck-web — HTTP API for MediCheck
//! Exposes:
//!   - Pharmacogenomic chatbot (`/chat`, `/chatbot`)
//!   - Drug record lookup with structure image (`/medicaments/{name}`)
//!   - Toxicity lookup (`/toxicite`)
//!   - Notice placeholder and liveness (`/notice`, `/ping`)

pub mod config;
pub mod handlers;
pub mod router;
pub mod state;
