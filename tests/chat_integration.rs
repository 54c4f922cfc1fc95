//! Chat bridge integration tests
//!
//! Scripted chat services stand in for the hosted model.

use async_trait::async_trait;
use smartmed::{
    chat::{BridgeState, ChatBridge, ChatService, ChatSession, ChatTurn, GeminiClient, Role},
    config::ChatSettings,
    ErrorCategory, Result, SmartMedError,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Replies from a script and records the context each session started with
struct ScriptedService {
    starts: AtomicUsize,
    seen_history: Arc<Mutex<Vec<usize>>>,
    fail_starts: usize,
}

impl ScriptedService {
    fn new(fail_starts: usize) -> Self {
        Self {
            starts: AtomicUsize::new(0),
            seen_history: Arc::new(Mutex::new(Vec::new())),
            fail_starts,
        }
    }
}

struct ScriptedSession {
    sent: usize,
}

#[async_trait]
impl ChatSession for ScriptedSession {
    async fn send_message(&mut self, text: &str) -> Result<String> {
        self.sent += 1;
        match text {
            "hello" => Ok("hi there".to_string()),
            "timeout" => Err(SmartMedError::ChatTransportError(
                "request timed out".to_string(),
            )),
            other => Ok(format!("reply {} to {}", self.sent, other)),
        }
    }
}

#[async_trait]
impl ChatService for ScriptedService {
    async fn start_chat(&self, history: &[ChatTurn]) -> Result<Box<dyn ChatSession>> {
        let attempt = self.starts.fetch_add(1, Ordering::SeqCst);
        if attempt < self.fail_starts {
            return Err(SmartMedError::ChatTransportError("unreachable".to_string()));
        }
        if let Ok(mut seen) = self.seen_history.lock() {
            seen.push(history.len());
        }
        Ok(Box::new(ScriptedSession { sent: 0 }))
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

#[tokio::test]
async fn test_hello_round_trip() {
    let mut bridge = ChatBridge::new(Arc::new(ScriptedService::new(0)));
    assert_eq!(bridge.state(), BridgeState::NoSession);

    let reply = bridge.send("hello").await.unwrap();
    assert_eq!(reply.role, Role::Assistant);
    assert_eq!(reply.text, "hi there");

    let turns: Vec<(Role, &str)> = bridge
        .replay()
        .map(|t| (t.role, t.text.as_str()))
        .collect();
    assert_eq!(
        turns,
        vec![(Role::User, "hello"), (Role::Assistant, "hi there")]
    );
    assert_eq!(bridge.state(), BridgeState::Active);
}

#[tokio::test]
async fn test_n_cycles_give_2n_alternating_turns() {
    let mut bridge = ChatBridge::new(Arc::new(ScriptedService::new(0)));
    let messages = ["one", "two", "three", "four", "five"];

    for message in messages {
        bridge.send(message).await.unwrap();
    }

    let history = bridge.history();
    assert_eq!(history.len(), 2 * messages.len());
    for (index, turn) in history.iter().enumerate() {
        let expected = if index % 2 == 0 { Role::User } else { Role::Assistant };
        assert_eq!(turn.role, expected);
    }
    assert_eq!(history.turns()[4], ChatTurn::user("three"));
    assert_eq!(history.last().map(|t| t.role), Some(Role::Assistant));
}

#[tokio::test]
async fn test_transport_failure_keeps_session_and_history() {
    let mut bridge = ChatBridge::new(Arc::new(ScriptedService::new(0)));
    bridge.send("hello").await.unwrap();

    let err = bridge.send("timeout").await.unwrap_err();
    assert_eq!(err.category(), ErrorCategory::ChatTransport);
    assert!(!err.is_fatal());
    assert_eq!(bridge.state(), BridgeState::Active);
    assert_eq!(bridge.history().len(), 2);

    // Resubmission works on the same session
    bridge.send("again").await.unwrap();
    assert_eq!(bridge.history().len(), 4);
}

#[tokio::test]
async fn test_start_failure_then_retry() {
    let service = Arc::new(ScriptedService::new(2));
    let mut bridge = ChatBridge::new(service.clone());

    assert!(bridge.ensure_started().await.is_err());
    assert!(bridge.send("hello").await.is_err());
    assert_eq!(bridge.state(), BridgeState::NoSession);
    assert!(bridge.history().is_empty());

    bridge.send("hello").await.unwrap();
    assert_eq!(bridge.state(), BridgeState::Active);
    assert_eq!(service.starts.load(Ordering::SeqCst), 3);
    assert_eq!(*service.seen_history.lock().unwrap(), vec![0]);
}

#[tokio::test]
async fn test_session_started_once() {
    let service = Arc::new(ScriptedService::new(0));
    let mut bridge = ChatBridge::new(service.clone());

    bridge.ensure_started().await.unwrap();
    bridge.send("a").await.unwrap();
    bridge.send("b").await.unwrap();
    bridge.ensure_started().await.unwrap();

    assert_eq!(service.starts.load(Ordering::SeqCst), 1);
}

#[test]
fn test_replay_is_read_only() {
    tokio_test::block_on(async {
        let mut bridge = ChatBridge::new(Arc::new(ScriptedService::new(0)));
        bridge.send("hello").await.unwrap();
        bridge.send("how are you").await.unwrap();

        let first: Vec<ChatTurn> = bridge.replay().cloned().collect();
        let second: Vec<ChatTurn> = bridge.replay().cloned().collect();
        assert_eq!(first, second);
        assert_eq!(bridge.history().len(), 4);
    });
}

#[test]
fn test_bridges_are_independent() {
    tokio_test::block_on(async {
        let service: Arc<dyn ChatService> = Arc::new(ScriptedService::new(0));
        let mut alice = ChatBridge::new(service.clone());
        let mut bob = ChatBridge::new(service);

        alice.send("hello").await.unwrap();
        assert_eq!(alice.history().len(), 2);
        assert!(bob.history().is_empty());
        assert_eq!(bob.state(), BridgeState::NoSession);
        assert_ne!(alice.session_id(), bob.session_id());

        bob.send("hello").await.unwrap();
        assert_eq!(bob.history().len(), 2);
    });
}

#[test]
fn test_missing_api_key_is_config_error() {
    let settings = ChatSettings {
        api_key_env: "SMARTMED_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
        ..ChatSettings::default()
    };
    let err = GeminiClient::from_settings(&settings).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::ChatConfig);
    assert!(err.user_message().contains("API key"));
}

#[tokio::test]
async fn test_unreachable_endpoint_is_transport_error() {
    // Nothing listens on port 9 locally
    let client = GeminiClient::with_config(
        "http://127.0.0.1:9",
        "gemini-test",
        "test-key",
        Duration::from_millis(500),
    )
    .unwrap();

    let mut bridge = ChatBridge::new(Arc::new(client));
    let err = bridge.send("hello").await.unwrap_err();
    assert_eq!(err.category(), ErrorCategory::ChatTransport);
    assert!(bridge.history().is_empty());
}
