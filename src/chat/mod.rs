//! Chat assistant module
//!
//! Provides the Gemini client, the service traits it implements and the
//! bridge that owns one conversation per user session.

pub mod bridge;
pub mod client;
pub mod service;
pub mod types;

pub use bridge::{BridgeState, ChatBridge};
pub use client::{GeminiClient, DEFAULT_API_KEY_ENV, DEFAULT_CHAT_MODEL, DEFAULT_GEMINI_URL};
pub use service::{ChatService, ChatSession};
pub use types::{ChatHistory, ChatTurn, Role};
