//! Per-user session context
//!
//! Everything a user session owns lives here and is passed explicitly:
//! current page, the open form, the chat bridge and a few counters for
//! `/status`. Nothing is persisted.

use crate::chat::ChatBridge;
use crate::inference::Outcome;
use crate::models::Disease;
use crate::repl::form::FormState;
use crate::repl::pages::Page;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Chat feature for this session
pub enum ChatAvailability {
    /// Configured; the bridge starts its session on first use
    Ready(ChatBridge),
    /// Configuration failed; the reason is shown instead of the chat
    Disabled(String),
}

impl ChatAvailability {
    pub fn is_ready(&self) -> bool {
        matches!(self, ChatAvailability::Ready(_))
    }
}

/// Per-disease prediction counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PredictionTally {
    pub positive: usize,
    pub negative: usize,
    pub failed: usize,
}

impl PredictionTally {
    pub fn total(&self) -> usize {
        self.positive + self.negative + self.failed
    }
}

/// State owned by one interactive session
pub struct SessionContext {
    page: Page,
    form: Option<FormState>,
    chat: ChatAvailability,
    tallies: HashMap<Disease, PredictionTally>,
    started_at: DateTime<Utc>,
}

impl SessionContext {
    pub fn new(chat: ChatAvailability) -> Self {
        Self {
            page: Page::Home,
            form: None,
            chat,
            tallies: HashMap::new(),
            started_at: Utc::now(),
        }
    }

    pub fn page(&self) -> Page {
        self.page
    }

    /// Switch page; opening a prediction page starts a fresh form
    pub fn navigate(&mut self, page: Page) {
        self.page = page;
        self.form = match page {
            Page::Prediction(disease) => Some(FormState::new(disease)),
            _ => None,
        };
    }

    pub fn form(&self) -> Option<&FormState> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut FormState> {
        self.form.as_mut()
    }

    pub fn chat(&self) -> &ChatAvailability {
        &self.chat
    }

    pub fn chat_mut(&mut self) -> &mut ChatAvailability {
        &mut self.chat
    }

    /// Count a prediction attempt; `None` means it failed
    pub fn record_prediction(&mut self, disease: Disease, outcome: Option<Outcome>) {
        let tally = self.tallies.entry(disease).or_default();
        match outcome {
            Some(Outcome::Positive) => tally.positive += 1,
            Some(Outcome::Negative) => tally.negative += 1,
            None => tally.failed += 1,
        }
    }

    pub fn tally(&self, disease: Disease) -> PredictionTally {
        self.tallies.get(&disease).copied().unwrap_or_default()
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Session duration in seconds
    pub fn session_duration(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds().max(0)
    }
}
