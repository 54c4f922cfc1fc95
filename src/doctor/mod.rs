//! Doctor command for system diagnostics
//!
//! Checks that every classifier artifact loads and matches its form, and
//! that the chat assistant is configured and reachable.

use crate::chat::GeminiClient;
use crate::config::ChatSettings;
use crate::models::{Disease, ModelRegistry};
use colored::*;
use std::collections::HashMap;
use std::path::PathBuf;

/// Health check result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Pass,
    Warn(String),
    Fail(String),
}

/// Individual health check
#[derive(Debug)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
}

/// Doctor diagnostics system
pub struct Doctor {
    artifact_paths: HashMap<Disease, PathBuf>,
    chat: ChatSettings,
}

impl Doctor {
    pub fn new(artifact_paths: HashMap<Disease, PathBuf>, chat: ChatSettings) -> Self {
        Self {
            artifact_paths,
            chat,
        }
    }

    /// Run all health checks
    pub async fn run_diagnostics(&self) -> Vec<HealthCheck> {
        let mut checks: Vec<HealthCheck> = Disease::ALL
            .iter()
            .map(|disease| self.check_artifact(*disease))
            .collect();

        match GeminiClient::from_settings(&self.chat) {
            Ok(client) => {
                checks.push(HealthCheck {
                    name: "Chat API key".to_string(),
                    status: HealthStatus::Pass,
                });
                checks.push(Self::check_chat_endpoint(&client).await);
            }
            Err(e) => checks.push(HealthCheck {
                name: "Chat API key".to_string(),
                status: HealthStatus::Warn(format!("{} (chat page disabled)", e)),
            }),
        }

        checks
    }

    /// Artifact exists and passes the same checks as startup loading
    fn check_artifact(&self, disease: Disease) -> HealthCheck {
        let name = format!("{} model", disease.display_name());

        let path = match self.artifact_paths.get(&disease) {
            Some(path) => path,
            None => {
                return HealthCheck {
                    name,
                    status: HealthStatus::Fail("No artifact path configured".to_string()),
                }
            }
        };

        if !path.exists() {
            return HealthCheck {
                name,
                status: HealthStatus::Fail(format!("Not found: {}", path.display())),
            };
        }

        let status = match ModelRegistry::load_artifact(disease, path) {
            Ok(model) if model.feature_names.is_empty() => {
                HealthStatus::Warn("No feature names recorded".to_string())
            }
            Ok(_) => HealthStatus::Pass,
            Err(e) => HealthStatus::Fail(e.to_string()),
        };

        HealthCheck { name, status }
    }

    async fn check_chat_endpoint(client: &GeminiClient) -> HealthCheck {
        let name = "Chat endpoint".to_string();
        match client.health_check().await {
            Ok(true) => HealthCheck {
                name,
                status: HealthStatus::Pass,
            },
            Ok(false) => HealthCheck {
                name,
                status: HealthStatus::Warn(format!(
                    "{} did not accept model {}",
                    client.base_url(),
                    client.model()
                )),
            },
            Err(e) => HealthCheck {
                name,
                status: HealthStatus::Warn(e.to_string()),
            },
        }
    }

    /// Display diagnostics results
    pub fn display_results(checks: &[HealthCheck]) {
        println!("\n{}\n", "SmartMed System Diagnostics".bold().cyan());
        println!("{:<28} {}", "Check", "Status");
        println!("{}", "=".repeat(60));

        for check in checks {
            let status = match &check.status {
                HealthStatus::Pass => "PASS".green(),
                HealthStatus::Warn(msg) => format!("WARN: {}", msg).yellow(),
                HealthStatus::Fail(msg) => format!("FAIL: {}", msg).red(),
            };
            println!("{:<28} {}", check.name, status);
        }

        println!();
    }

    /// False when any check failed; warnings do not count
    pub fn overall_status(checks: &[HealthCheck]) -> bool {
        !checks.iter().any(|c| matches!(c.status, HealthStatus::Fail(_)))
    }
}
