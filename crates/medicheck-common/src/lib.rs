//! medicheck-common — Shared types, errors, and the drug reference table used across all MediCheck crates.

pub mod error;
pub mod columns;
pub mod table;

// Re-export commonly used types
pub use error::{ApiError, MedicheckError, Result};
pub use table::{DrugRecord, DrugTable};
