//! Chat service seam
//!
//! The bridge only talks to these two traits, so the hosted model can be
//! swapped (or mocked in tests) without touching session handling.

use crate::chat::types::ChatTurn;
use crate::errors::Result;
use async_trait::async_trait;

/// A hosted conversational model
#[async_trait]
pub trait ChatService: Send + Sync {
    /// Open a conversation seeded with prior turns
    async fn start_chat(&self, history: &[ChatTurn]) -> Result<Box<dyn ChatSession>>;

    /// Name of the backing model, for display
    fn model_name(&self) -> &str;
}

/// One open conversation with the hosted model
#[async_trait]
pub trait ChatSession: Send {
    /// Send a user message and return the model's reply text.
    ///
    /// On error the session's own context must be left unchanged.
    async fn send_message(&mut self, text: &str) -> Result<String>;
}
