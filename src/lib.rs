//! SmartMed - AI health prediction shell
//!
//! Three pre-trained classifiers (diabetes, heart disease, Parkinson's)
//! behind step-wise forms, plus a chat assistant backed by Gemini.
//!
//! # Architecture
//!
//! - **models**: disease catalogue, classifier artifacts, startup registry
//! - **inference**: feature schemas and the prediction dispatcher
//! - **chat**: Gemini client and the per-session chat bridge
//! - **repl**: the interactive presentation shell

pub mod errors;
pub mod logging;

// Re-export commonly used types
pub use errors::{ErrorCategory, Result, SmartMedError};

pub mod chat;
pub mod cli;
pub mod config;
pub mod doctor;
pub mod inference;
pub mod models;
pub mod repl;
