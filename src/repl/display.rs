//! Display manager for the shell
//!
//! Renders pages, prediction results and chat turns, and runs the spinner
//! shown while a chat reply is pending.

use crate::chat::{ChatTurn, Role};
use crate::inference::{FeatureSchema, PredictionResult};
use crate::repl::pages::{Page, HOME_TEXT};
use colored::*;
use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::time::Duration;

/// Display manager for shell output
pub struct DisplayManager {
    current_bar: Option<ProgressBar>,
    update_interval: Duration,
    show_progress: bool,
}

impl DisplayManager {
    /// Update frequency: 10 FPS (100ms interval)
    pub fn new() -> Self {
        DisplayManager {
            current_bar: None,
            update_interval: Duration::from_millis(100),
            show_progress: true,
        }
    }

    /// Disable spinners, e.g. in quiet mode
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn show_banner(&self, version: &str, chat_model: Option<&str>) {
        let width = 64;
        let title = format!("  SmartMed {} - AI Health Prediction System", version);
        let chat = match chat_model {
            Some(model) => format!("  Models: 3 loaded | Chat: {}", model),
            None => "  Models: 3 loaded | Chat: disabled".to_string(),
        };

        println!("\n{}", "=".repeat(width).cyan());
        println!("{}", title.bold().cyan());
        println!("{}", chat.dimmed());
        println!("{}\n", "=".repeat(width).cyan());
        println!(
            "Pick a page (or {} for commands, {} to quit)\n",
            "/help".green(),
            "/exit".green()
        );
    }

    /// Page title plus a rule underneath
    pub fn show_page_header(&self, page: Page) {
        println!("\n{}", page.title().bold().cyan());
        println!("{}", "-".repeat(60).cyan());
    }

    pub fn show_home(&self) {
        self.show_page_header(Page::Home);
        println!("{}\n", HOME_TEXT);
        for page in Page::ALL.iter().skip(1) {
            self.show_bullet(&format!("{:<28} {}", page.menu_name(), page.command().green()));
        }
        println!();
    }

    /// Fields of a prediction form in entry order
    pub fn show_schema(&self, schema: &FeatureSchema) {
        println!("{}", "Enter the following details to predict:".dimmed());
        for (index, spec) in schema.fields.iter().enumerate() {
            println!(
                "  {:>2}. {:<42} {}",
                (index + 1).to_string().cyan(),
                spec.label,
                spec.bounds_hint().dimmed()
            );
        }
        println!(
            "{}\n",
            "Type /cancel to restart the form.".dimmed()
        );
    }

    /// Positive outcomes render in the error style, negative in the success style
    pub fn show_prediction(&self, result: &PredictionResult) {
        println!();
        if result.is_positive() {
            println!("{} {}", "✗".red().bold(), result.to_string().red().bold());
        } else {
            println!("{} {}", "✓".green().bold(), result.to_string().green().bold());
        }
        println!();
    }

    pub fn show_turn(&self, turn: &ChatTurn) {
        match turn.role {
            Role::User => println!("{} {}", "You:".green().bold(), turn.text),
            Role::Assistant => println!("{} {}", "Assistant:".cyan().bold(), turn.text),
        }
    }

    /// Re-render a conversation
    pub fn show_transcript<'a>(&self, turns: impl IntoIterator<Item = &'a ChatTurn>) {
        let mut count = 0;
        for turn in turns {
            self.show_turn(turn);
            count += 1;
        }
        if count == 0 {
            println!("{}", "No messages yet. Say hello!".dimmed());
        }
        println!();
    }

    /// Spinner while waiting on the assistant
    pub fn start_waiting(&mut self, message: &str) {
        self.finish_current();
        if !self.show_progress {
            return;
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(self.update_interval);
        self.current_bar = Some(pb);
    }

    pub fn finish_current(&mut self) {
        if let Some(pb) = self.current_bar.take() {
            pb.finish_and_clear();
        }
    }

    pub fn show_error(&self, error: &str) {
        println!("{} {}", "Error:".red().bold(), error.red());
    }

    pub fn show_warning(&self, warning: &str) {
        println!("{} {}", "Warning:".yellow().bold(), warning.yellow());
    }

    pub fn show_info(&self, info: &str) {
        println!("{} {}", "Info:".cyan(), info);
    }

    /// Display debug message (only if verbose)
    pub fn show_debug(&self, debug: &str, verbose: bool) {
        if verbose {
            println!("{} {}", "Debug:".dimmed(), debug.dimmed());
        }
    }

    pub fn clear_screen(&self) -> io::Result<()> {
        execute!(io::stdout(), Clear(ClearType::All), cursor::MoveTo(0, 0))
    }

    pub fn show_bullet(&self, text: &str) {
        println!("  {} {}", "•".cyan(), text);
    }
}

impl Default for DisplayManager {
    fn default() -> Self {
        Self::new()
    }
}
