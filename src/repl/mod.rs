//! Interactive presentation shell
//!
//! A terminal rendition of the SmartMed pages: a home page, one step-wise
//! form per disease and the chat page. Built-in `/` commands navigate and
//! inspect the session; any other input goes to the current page.

pub mod commands;
pub mod display;
pub mod form;
pub mod input;
pub mod pages;
pub mod session;

use anyhow::Result;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::chat::BridgeState;
use crate::errors::{ErrorCategory, SmartMedError};
use crate::inference::{FeatureSchema, InferenceDispatcher};
use crate::repl::commands::{is_command, Command, CommandHandler};
pub use crate::repl::display::DisplayManager;
use crate::repl::form::FormStep;
use crate::repl::input::InputHandler;
pub use crate::repl::pages::Page;
pub use crate::repl::session::{ChatAvailability, PredictionTally, SessionContext};

/// Shell coordinator for one user session
pub struct ReplSession {
    input_handler: InputHandler,
    command_handler: CommandHandler,
    display_manager: DisplayManager,
    context: SessionContext,
    dispatcher: InferenceDispatcher,
}

impl ReplSession {
    pub fn new(dispatcher: InferenceDispatcher, chat: ChatAvailability) -> Result<Self> {
        Ok(ReplSession {
            input_handler: InputHandler::new()?,
            command_handler: CommandHandler::new(),
            display_manager: DisplayManager::new(),
            context: SessionContext::new(chat),
            dispatcher,
        })
    }

    /// Create shell session with persistent input history
    pub fn with_history(
        dispatcher: InferenceDispatcher,
        chat: ChatAvailability,
        history_path: PathBuf,
    ) -> Result<Self> {
        Ok(ReplSession {
            input_handler: InputHandler::with_history(history_path)?,
            command_handler: CommandHandler::new(),
            display_manager: DisplayManager::new(),
            context: SessionContext::new(chat),
            dispatcher,
        })
    }

    pub fn show_welcome(&self, version: &str) {
        let model = match self.context.chat() {
            ChatAvailability::Ready(bridge) => Some(bridge.model_name()),
            ChatAvailability::Disabled(_) => None,
        };
        self.display_manager.show_banner(version, model);
        self.display_manager.show_home();
    }

    /// Prompt for the next read: the open form field, else the page prompt
    pub fn current_prompt(&self) -> String {
        match self.context.form() {
            Some(form) => form.prompt(),
            None => self.context.page().prompt(),
        }
    }

    pub fn read_input(&mut self) -> Result<Option<String>> {
        let prompt = self.current_prompt();
        self.input_handler.read_line_with(&prompt)
    }

    /// Handle one line of user input
    ///
    /// Returns true if the session should continue, false to exit
    pub async fn handle_input(&mut self, input: &str) -> Result<bool> {
        if input.trim().is_empty() {
            return Ok(true);
        }

        if is_command(input) {
            let command = self.command_handler.parse(input);
            return self.execute(command).await;
        }

        match self.context.page() {
            Page::Home => {
                self.display_manager
                    .show_info("Pick a page to get started, or type /help.");
            }
            Page::Prediction(_) => self.submit_field(input),
            Page::Chatbot => self.send_chat(input).await,
        }

        Ok(true)
    }

    async fn execute(&mut self, command: Command) -> Result<bool> {
        match command {
            Command::Help => self.command_handler.show_help(),
            Command::Go(page) => self.open_page(page).await,
            Command::Pages => self.command_handler.show_pages(self.context.page()),
            Command::History => match self.context.chat() {
                ChatAvailability::Ready(bridge) => {
                    self.display_manager.show_transcript(bridge.replay())
                }
                ChatAvailability::Disabled(reason) => self.display_manager.show_error(reason),
            },
            Command::Cancel => match self.context.form_mut() {
                Some(form) => {
                    form.reset();
                    self.display_manager.show_info("Form restarted.");
                }
                None => self.display_manager.show_info("No form is open."),
            },
            Command::Status => self.command_handler.show_status(&self.context),
            Command::Verbose { enable } => {
                self.command_handler.set_verbose(enable);
                self.display_manager.show_info(&format!(
                    "Verbose mode {}",
                    if enable { "enabled" } else { "disabled" }
                ));
            }
            Command::Clear => {
                self.display_manager.clear_screen()?;
            }
            Command::Exit => {
                println!("Goodbye!");
                return Ok(false);
            }
            Command::Unknown { input } => self.command_handler.show_unknown(&input),
        }
        Ok(true)
    }

    /// Navigate and render the page
    pub async fn open_page(&mut self, page: Page) {
        self.context.navigate(page);
        debug!(page = %page, "Opened page");

        match page {
            Page::Home => self.display_manager.show_home(),
            Page::Prediction(disease) => {
                self.display_manager.show_page_header(page);
                self.display_manager
                    .show_schema(FeatureSchema::for_disease(disease));
            }
            Page::Chatbot => {
                self.display_manager.show_page_header(page);
                self.open_chat().await;
            }
        }
    }

    async fn open_chat(&mut self) {
        let verbose = self.command_handler.is_verbose();
        match self.context.chat_mut() {
            ChatAvailability::Ready(bridge) => {
                self.display_manager.show_transcript(bridge.replay());
                if let Err(e) = bridge.ensure_started().await {
                    self.display_manager.show_error(&e.user_message());
                    self.display_manager.show_debug(&e.to_string(), verbose);
                    self.disable_chat_on_config_error(&e);
                }
            }
            ChatAvailability::Disabled(reason) => {
                self.display_manager.show_error(reason);
            }
        }
    }

    /// Rejected credentials will not recover by resubmitting, so the page
    /// stays disabled for the rest of the session
    fn disable_chat_on_config_error(&mut self, e: &SmartMedError) {
        if e.category() == ErrorCategory::ChatConfig {
            warn!(error = %e, "Chat assistant disabled");
            *self.context.chat_mut() = ChatAvailability::Disabled(e.user_message());
        }
    }

    fn submit_field(&mut self, input: &str) {
        let step = match self.context.form_mut() {
            Some(form) => form.submit(input),
            None => return,
        };

        match step {
            FormStep::Next => {}
            FormStep::Invalid(message) => self.display_manager.show_warning(&message),
            FormStep::Complete(vector) => {
                let disease = match self.context.form() {
                    Some(form) => form.disease(),
                    None => return,
                };
                match self.dispatcher.predict(disease, &vector) {
                    Ok(result) => {
                        self.display_manager.show_prediction(&result);
                        self.context.record_prediction(disease, Some(result.outcome));
                    }
                    Err(e) => {
                        self.display_manager.show_error(&e.user_message());
                        self.display_manager
                            .show_debug(&e.to_string(), self.command_handler.is_verbose());
                        self.context.record_prediction(disease, None);
                    }
                }
                self.display_manager
                    .show_info("Enter new values to predict again, or pick another page.");
            }
        }
    }

    async fn send_chat(&mut self, input: &str) {
        let verbose = self.command_handler.is_verbose();
        let bridge = match self.context.chat_mut() {
            ChatAvailability::Ready(bridge) => bridge,
            ChatAvailability::Disabled(reason) => {
                self.display_manager.show_error(reason);
                return;
            }
        };

        self.display_manager.start_waiting("Thinking...");
        let result = bridge.send(input).await.map(|reply| reply.clone());
        self.display_manager.finish_current();

        match result {
            Ok(reply) => self.display_manager.show_turn(&reply),
            Err(e) => {
                self.display_manager.show_error(&e.user_message());
                self.display_manager.show_debug(&e.to_string(), verbose);
                self.disable_chat_on_config_error(&e);
            }
        }
    }

    /// Main loop until /exit or EOF
    pub async fn run(&mut self) -> Result<()> {
        loop {
            match self.read_input() {
                Ok(Some(input)) => {
                    if input.is_empty() {
                        continue;
                    }
                    if !self.handle_input(&input).await? {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    if e.to_string().contains("Interrupted") {
                        println!("\nUse /exit to quit gracefully");
                        continue;
                    }
                    return self.fail_after_saving(e);
                }
            }
        }

        self.save()
    }

    /// Keep the history of a session that ends on a terminal error
    fn fail_after_saving(&mut self, e: anyhow::Error) -> Result<()> {
        if let Err(save_err) = self.save() {
            warn!(error = %save_err, "Failed to save input history");
        }
        Err(e)
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    /// Chat state, None when chat is disabled
    pub fn chat_state(&self) -> Option<BridgeState> {
        match self.context.chat() {
            ChatAvailability::Ready(bridge) => Some(bridge.state()),
            ChatAvailability::Disabled(_) => None,
        }
    }

    pub fn is_verbose(&self) -> bool {
        self.command_handler.is_verbose()
    }

    pub fn set_verbose(&mut self, enable: bool) {
        self.command_handler.set_verbose(enable);
    }

    pub fn set_show_progress(&mut self, show_progress: bool) {
        let display = std::mem::take(&mut self.display_manager);
        self.display_manager = display.with_progress(show_progress);
    }

    pub fn save(&mut self) -> Result<()> {
        self.input_handler.save_history()
    }
}
