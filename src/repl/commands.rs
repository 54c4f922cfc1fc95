//! Command handler for shell built-in commands
//!
//! Navigation commands open pages; the rest inspect or tidy the session.

use crate::models::Disease;
use crate::repl::pages::Page;
use crate::repl::session::{ChatAvailability, SessionContext};
use colored::*;

/// Shell command types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Go(Page),
    Pages,
    History,
    Cancel,
    Status,
    Verbose { enable: bool },
    Clear,
    Exit,
    Unknown { input: String },
}

/// Check whether input is a command
pub fn is_command(input: &str) -> bool {
    input.trim_start().starts_with('/')
}

/// Command handler for parsing commands and rendering informational ones
pub struct CommandHandler {
    verbose: bool,
}

impl CommandHandler {
    pub fn new() -> Self {
        CommandHandler { verbose: false }
    }

    /// Parse input string into a command
    pub fn parse(&self, input: &str) -> Command {
        let trimmed = input.trim();

        if !trimmed.starts_with('/') {
            return Command::Unknown {
                input: input.to_string(),
            };
        }

        let parts: Vec<&str> = trimmed[1..].split_whitespace().collect();
        if parts.is_empty() {
            return Command::Unknown {
                input: input.to_string(),
            };
        }

        match parts[0].to_lowercase().as_str() {
            "help" | "h" => Command::Help,
            "exit" | "quit" | "q" => Command::Exit,
            "home" => Command::Go(Page::Home),
            "diabetes" => Command::Go(Page::Prediction(Disease::Diabetes)),
            "heart" => Command::Go(Page::Prediction(Disease::HeartDisease)),
            "parkinsons" | "parkinson" => Command::Go(Page::Prediction(Disease::Parkinsons)),
            "chat" | "chatbot" => Command::Go(Page::Chatbot),
            "pages" | "menu" => Command::Pages,
            "history" => Command::History,
            "cancel" => Command::Cancel,
            "status" => Command::Status,
            "verbose" => {
                let enable = parts
                    .get(1)
                    .map(|s| s.to_lowercase() == "on" || s == &"1" || s == &"true")
                    .unwrap_or(true);
                Command::Verbose { enable }
            }
            "clear" | "cls" => Command::Clear,
            _ => Command::Unknown {
                input: input.to_string(),
            },
        }
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn set_verbose(&mut self, enable: bool) {
        self.verbose = enable;
    }

    /// Display help information
    pub fn show_help(&self) {
        println!("\n{}", "Available Commands:".bold().cyan());
        println!("{}", "=".repeat(60).cyan());

        let commands = vec![
            ("/home", "Welcome page"),
            ("/diabetes", "Diabetes prediction form"),
            ("/heart", "Heart disease prediction form"),
            ("/parkinsons", "Parkinson's prediction form"),
            ("/chat", "AI chat assistant"),
            ("/pages", "List pages"),
            ("/history", "Replay the chat conversation"),
            ("/cancel", "Restart the current form"),
            ("/status", "Show session status"),
            ("/verbose [on|off]", "Toggle verbose output"),
            ("/clear, /cls", "Clear screen"),
            ("/exit, /quit, /q", "Exit"),
        ];

        for (cmd, desc) in commands {
            println!("  {:<20} {}", cmd.green(), desc);
        }

        println!("\n{}", "Usage:".bold());
        println!("  - On a prediction page, answer each field prompt in turn");
        println!("  - On the chat page, type your message directly");
        println!("  - Press {} or {} to exit", "Ctrl-D".cyan(), "/exit".cyan());
        println!();
    }

    /// Display the page menu, marking the current page
    pub fn show_pages(&self, current: Page) {
        println!("\n{}", "SmartMed".bold().cyan());
        println!("{}", "=".repeat(60).cyan());
        for page in Page::ALL {
            let marker = if page == current { "▸".green() } else { " ".normal() };
            println!("  {} {:<28} {}", marker, page.menu_name(), page.command().dimmed());
        }
        println!();
    }

    /// Display session status
    pub fn show_status(&self, session: &SessionContext) {
        println!("\n{}", "Session Status:".bold().cyan());
        println!("{}", "=".repeat(60).cyan());

        let duration = session.session_duration();
        let minutes = duration / 60;
        let seconds = duration % 60;

        println!(
            "  Started:      {}",
            session.started_at().format("%Y-%m-%d %H:%M:%S UTC")
        );
        println!("  Duration:     {}m {}s", minutes, seconds);
        println!("  Page:         {}", session.page().menu_name());

        for disease in Disease::ALL {
            let tally = session.tally(disease);
            println!(
                "  {:<14}{} run ({} detected, {} not detected, {} failed)",
                format!("{}:", disease.display_name()),
                tally.total(),
                tally.positive,
                tally.negative,
                tally.failed
            );
        }

        match session.chat() {
            ChatAvailability::Ready(bridge) => println!(
                "  Chat:         {} ({:?}, {} turns)",
                bridge.model_name(),
                bridge.state(),
                bridge.history().len()
            ),
            ChatAvailability::Disabled(reason) => {
                println!("  Chat:         {} ({})", "disabled".red(), reason)
            }
        }

        println!(
            "  Verbose:      {}",
            if self.verbose { "on".green() } else { "off".dimmed() }
        );
        println!();
    }

    /// Report an unrecognised command
    pub fn show_unknown(&self, input: &str) {
        println!("{}", format!("Unknown command: {}", input).red());
        println!("Type {} for available commands", "/help".cyan());
    }
}

impl Default for CommandHandler {
    fn default() -> Self {
        Self::new()
    }
}
