//! SmartMed - Main CLI Entry Point

use anyhow::{anyhow, Result};
use clap::Parser;
use colored::Colorize;
use smartmed::{
    chat::{ChatBridge, GeminiClient},
    cli::{Args, Commands},
    config::Config,
    doctor::Doctor,
    inference::{FeatureSchema, FeatureVector, InferenceDispatcher},
    logging::{init_logging, LogConfig},
    models::{Disease, ModelRegistry},
    repl::{ChatAvailability, ReplSession},
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&LogConfig::from_verbosity(args.verbosity()));

    // A .env file may supply the chat API key
    if let Some(path) = Config::load_env_file(None) {
        info!(path = %path.display(), "Loaded environment file");
    }

    let config = Config::load(args.config.as_deref())?;

    match &args.command {
        Some(Commands::Start) | None => {
            run_shell(&args, &config).await?;
        }
        Some(Commands::Predict { disease, values }) => {
            run_predict(&args, &config, disease, values)?;
        }
        Some(Commands::Chat { message }) => {
            run_chat(&config, &message.join(" ")).await?;
        }
        Some(Commands::Schema { disease }) => {
            show_schema(disease)?;
        }
        Some(Commands::Doctor) => {
            run_doctor(&args, &config).await?;
        }
        Some(Commands::Config) => {
            show_config(&args, &config)?;
        }
    }

    Ok(())
}

/// Load every classifier or stop. Nothing is served with a partial registry.
fn load_dispatcher(args: &Args, config: &Config) -> InferenceDispatcher {
    let paths = config.artifact_paths(args.models_dir.as_deref());

    match ModelRegistry::load(&paths) {
        Ok(registry) => InferenceDispatcher::new(Arc::new(registry)),
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e.user_message().red());
            eprintln!("  {}", e);
            eprintln!("\nRun {} for details.", "smartmed doctor".cyan());
            std::process::exit(1);
        }
    }
}

/// Chat is optional: a configuration failure disables the page only
fn chat_availability(config: &Config) -> ChatAvailability {
    match GeminiClient::from_settings(&config.chat) {
        Ok(client) => ChatAvailability::Ready(ChatBridge::new(Arc::new(client))),
        Err(e) => {
            warn!(error = %e, "Chat assistant disabled");
            ChatAvailability::Disabled(format!("{} ({})", e.user_message(), e))
        }
    }
}

async fn run_shell(args: &Args, config: &Config) -> Result<()> {
    let dispatcher = load_dispatcher(args, config);
    let chat = chat_availability(config);

    let history_path = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".smartmed")
        .join("history");

    let mut repl_session = ReplSession::with_history(dispatcher, chat, history_path)?;
    repl_session.set_show_progress(args.verbosity().show_progress());

    info!(verbosity = args.verbosity().as_str(), "Starting shell");
    repl_session.show_welcome(env!("CARGO_PKG_VERSION"));
    repl_session.run().await
}

fn run_predict(args: &Args, config: &Config, disease: &str, values: &[f64]) -> Result<()> {
    let disease: Disease = disease.parse().map_err(|e: String| anyhow!(e))?;
    let schema = FeatureSchema::for_disease(disease);
    let vector = FeatureVector::new(values.to_vec());

    if vector.len() == schema.len() {
        if let Err(message) = schema.check(&vector) {
            eprintln!("{} {}", "Invalid input:".red().bold(), message);
            std::process::exit(2);
        }
    }

    let dispatcher = load_dispatcher(args, config);
    match dispatcher.predict(disease, &vector) {
        Ok(result) => {
            if result.is_positive() {
                println!("{}", result.to_string().red().bold());
            } else {
                println!("{}", result.to_string().green().bold());
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e.user_message().red());
            std::process::exit(1);
        }
    }
}

async fn run_chat(config: &Config, message: &str) -> Result<()> {
    let client = match GeminiClient::from_settings(&config.chat) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e.user_message().red());
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    };

    let mut bridge = ChatBridge::new(Arc::new(client));
    match bridge.send(message).await {
        Ok(reply) => {
            println!("{}", reply.text);
            Ok(())
        }
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e.user_message().red());
            std::process::exit(1);
        }
    }
}

fn show_schema(disease: &str) -> Result<()> {
    let disease: Disease = disease.parse().map_err(|e: String| anyhow!(e))?;
    let schema = FeatureSchema::for_disease(disease);

    println!("\n{} ({} fields)", disease.display_name().bold().cyan(), schema.len());
    println!("{}", "=".repeat(60).cyan());
    for (index, spec) in schema.fields.iter().enumerate() {
        println!("  {:>2}. {:<28} {}", index + 1, spec.name.green(), spec);
    }
    println!();

    Ok(())
}

async fn run_doctor(args: &Args, config: &Config) -> Result<()> {
    let doctor = Doctor::new(
        config.artifact_paths(args.models_dir.as_deref()),
        config.chat.clone(),
    );

    let checks = doctor.run_diagnostics().await;
    Doctor::display_results(&checks);

    std::process::exit(if Doctor::overall_status(&checks) { 0 } else { 1 });
}

fn show_config(args: &Args, config: &Config) -> Result<()> {
    println!("\n{}", "SmartMed Configuration".bold().cyan());
    println!("{}", "=".repeat(60).cyan());

    match &args.config {
        Some(path) => println!("File:       {}", path.display()),
        None => println!("File:       {}", Config::config_path()?.display()),
    }
    println!();

    println!("Models:");
    let paths = config.artifact_paths(args.models_dir.as_deref());
    for disease in Disease::ALL {
        if let Some(path) = paths.get(&disease) {
            println!("  {:<16} {}", disease.key(), path.display());
        }
    }
    println!();

    let key_set = std::env::var(&config.chat.api_key_env)
        .map(|v| !v.trim().is_empty())
        .unwrap_or(false);
    println!("Chat:");
    println!("  Model:          {}", config.chat.model);
    println!("  Endpoint:       {}", config.chat.api_base);
    println!(
        "  API key:        {} ({})",
        config.chat.api_key_env,
        if key_set { "set".green() } else { "not set".red() }
    );
    println!("  Timeout:        {}s", config.chat.timeout_secs);
    println!();
    println!("Verbosity:        {}", args.verbosity().as_str());
    println!();

    Ok(())
}
