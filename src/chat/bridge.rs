//! Chat bridge state machine
//!
//! Two states:
//! 1. NoSession (initial) → Active   (on: first interaction, start succeeds)
//! 2. NoSession → NoSession          (on: start fails, retried next interaction)
//! 3. Active → Active                (on: send, success or failure)
//!
//! The bridge owns the history. A send appends the user turn, waits for the
//! reply and appends the assistant turn; a failed send rolls the user turn
//! back so history always alternates user/assistant.

use crate::chat::service::{ChatService, ChatSession};
use crate::chat::types::{ChatHistory, ChatTurn};
use crate::errors::{Result, SmartMedError};
use std::sync::Arc;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

/// Bridge state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeState {
    NoSession,
    Active,
}

/// Owns one conversation for one user session
pub struct ChatBridge {
    service: Arc<dyn ChatService>,
    session: Option<Box<dyn ChatSession>>,
    history: ChatHistory,
    session_id: Uuid,
}

impl ChatBridge {
    pub fn new(service: Arc<dyn ChatService>) -> Self {
        Self {
            service,
            session: None,
            history: ChatHistory::new(),
            session_id: Uuid::new_v4(),
        }
    }

    pub fn state(&self) -> BridgeState {
        if self.session.is_some() {
            BridgeState::Active
        } else {
            BridgeState::NoSession
        }
    }

    /// Open the conversation if not already open
    pub async fn ensure_started(&mut self) -> Result<()> {
        if self.session.is_some() {
            return Ok(());
        }

        let span = info_span!("chat_start", session = %self.session_id);
        let started = self
            .service
            .start_chat(self.history.turns())
            .instrument(span)
            .await;

        match started {
            Ok(session) => {
                info!(session = %self.session_id, model = self.service.model_name(), "Chat session started");
                self.session = Some(session);
                Ok(())
            }
            Err(e) => {
                error!(session = %self.session_id, error = %e, "Error starting chat session");
                Err(into_transport(e))
            }
        }
    }

    /// Send one user message and return the assistant's reply
    pub async fn send(&mut self, text: &str) -> Result<&ChatTurn> {
        self.ensure_started().await?;

        let session = match self.session.as_mut() {
            Some(session) => session,
            None => {
                return Err(SmartMedError::ChatTransportError(
                    "chat session not started".to_string(),
                ))
            }
        };

        self.history.push(ChatTurn::user(text));

        let span = info_span!("chat_send", session = %self.session_id, turn = self.history.len());
        match session.send_message(text).instrument(span).await {
            Ok(reply) => {
                self.history.push(ChatTurn::assistant(reply));
                // Just pushed
                Ok(&self.history.turns()[self.history.len() - 1])
            }
            Err(e) => {
                self.history.rollback_pending_user();
                error!(session = %self.session_id, error = %e, "Error sending message");
                Err(e)
            }
        }
    }

    /// Every stored turn in submission order. Never mutates history.
    pub fn replay(&self) -> impl Iterator<Item = &ChatTurn> + '_ {
        self.history.iter()
    }

    pub fn history(&self) -> &ChatHistory {
        &self.history
    }

    pub fn model_name(&self) -> &str {
        self.service.model_name()
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }
}

/// Config errors keep their category; everything else at start is transport
fn into_transport(e: SmartMedError) -> SmartMedError {
    match e {
        SmartMedError::ChatConfigError(_) | SmartMedError::ChatTransportError(_) => e,
        other => SmartMedError::ChatTransportError(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct EchoService {
        starts: AtomicUsize,
        fail_first_starts: usize,
    }

    struct EchoSession;

    #[async_trait]
    impl ChatSession for EchoSession {
        async fn send_message(&mut self, text: &str) -> Result<String> {
            if text == "fail" {
                return Err(SmartMedError::ChatTransportError("boom".to_string()));
            }
            Ok(format!("echo: {}", text))
        }
    }

    #[async_trait]
    impl ChatService for EchoService {
        async fn start_chat(&self, _history: &[ChatTurn]) -> Result<Box<dyn ChatSession>> {
            let n = self.starts.fetch_add(1, Ordering::SeqCst);
            if n < self.fail_first_starts {
                return Err(SmartMedError::ChatTransportError("network down".to_string()));
            }
            Ok(Box::new(EchoSession))
        }

        fn model_name(&self) -> &str {
            "echo"
        }
    }

    fn bridge(fail_first_starts: usize) -> ChatBridge {
        ChatBridge::new(Arc::new(EchoService {
            starts: AtomicUsize::new(0),
            fail_first_starts,
        }))
    }

    #[tokio::test]
    async fn test_initial_state() {
        let bridge = bridge(0);
        assert_eq!(bridge.state(), BridgeState::NoSession);
        assert!(bridge.history().is_empty());
    }

    #[tokio::test]
    async fn test_send_activates_and_appends() {
        let mut bridge = bridge(0);
        let reply = bridge.send("ping").await.unwrap().clone();
        assert_eq!(reply, ChatTurn::assistant("echo: ping"));
        assert_eq!(bridge.state(), BridgeState::Active);
        assert_eq!(
            bridge.history().turns(),
            &[ChatTurn::user("ping"), ChatTurn::assistant("echo: ping")]
        );
    }

    #[tokio::test]
    async fn test_start_failure_stays_no_session_and_retries() {
        let mut bridge = bridge(1);

        let err = bridge.send("hello").await.unwrap_err();
        assert!(matches!(err, SmartMedError::ChatTransportError(_)));
        assert_eq!(bridge.state(), BridgeState::NoSession);
        assert!(bridge.history().is_empty());

        // User-initiated retry succeeds
        bridge.send("hello").await.unwrap();
        assert_eq!(bridge.state(), BridgeState::Active);
        assert_eq!(bridge.history().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_send_leaves_history_unchanged() {
        let mut bridge = bridge(0);
        bridge.send("one").await.unwrap();

        assert!(bridge.send("fail").await.is_err());
        assert_eq!(bridge.state(), BridgeState::Active);
        assert_eq!(bridge.history().len(), 2);

        bridge.send("two").await.unwrap();
        assert_eq!(bridge.history().len(), 4);
        assert_eq!(bridge.history().turns()[2], ChatTurn::user("two"));
    }

    #[tokio::test]
    async fn test_replay_is_idempotent() {
        let mut bridge = bridge(0);
        bridge.send("a").await.unwrap();
        bridge.send("b").await.unwrap();

        let first: Vec<ChatTurn> = bridge.replay().cloned().collect();
        let second: Vec<ChatTurn> = bridge.replay().cloned().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 4);
        assert_eq!(bridge.history().len(), 4);
    }
}
