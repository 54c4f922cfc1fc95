//! Command-line argument parsing for SmartMed
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// SmartMed - health prediction shell with an AI chat assistant
#[derive(Parser, Debug)]
#[command(name = "smartmed")]
#[command(version)]
#[command(about = "Predict diabetes, heart disease and Parkinson's, or chat with an AI assistant", long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding <disease>_model.json artifacts
    #[arg(long, global = true)]
    pub models_dir: Option<PathBuf>,

    /// Verbosity level: -q (quiet), default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (errors only in the log)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand (interactive shell when omitted)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the interactive shell
    Start,

    /// Run one prediction from feature values given in schema order
    Predict {
        /// diabetes, heart or parkinsons
        disease: String,

        /// Feature values in schema order (see `smartmed schema <disease>`)
        #[arg(required = true, allow_negative_numbers = true)]
        values: Vec<f64>,
    },

    /// Send one message to the chat assistant and print the reply
    Chat {
        /// Message text
        #[arg(required = true)]
        message: Vec<String>,
    },

    /// List the form fields of a disease
    Schema {
        /// diabetes, heart or parkinsons
        disease: String,
    },

    /// Run model and chat health checks
    Doctor,

    /// Display current configuration
    Config,
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }
}

impl Verbosity {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "quiet",
            Verbosity::Normal => "normal",
            Verbosity::Verbose => "verbose",
            Verbosity::VeryVerbose => "very_verbose",
        }
    }

    /// Check if should show spinners
    pub fn show_progress(&self) -> bool {
        !matches!(self, Verbosity::Quiet)
    }
}
