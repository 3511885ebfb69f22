//! Runs a SQL migration file against Supabase, one statement per request.
//!
//! There is no transaction: statements that succeeded stay applied even if
//! later ones fail.

use crate::backends::{http_client, truncate_body};
use crate::config_loader::{Secret, Settings};
use crate::error::{AssetError, Result};
use reqwest::blocking::Client;
use serde_json::json;

/// Splits on every literal `;`. Semicolons inside string literals or
/// function bodies are not special-cased.
pub fn split_statements(sql: &str) -> Vec<String> {
    sql.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementOutcome {
    Success,
    /// The endpoint answered with a non-success status.
    Rejected { status: u16, body: String },
    /// The request never completed.
    Failed(String),
}

impl StatementOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, StatementOutcome::Success)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    pub successful: usize,
    pub errors: usize,
}

impl MigrationReport {
    pub fn all_succeeded(&self) -> bool {
        self.errors == 0
    }
}

pub struct MigrationClient {
    client: Client,
    base_url: String,
    service_key: Secret,
}

impl MigrationClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        if settings.supabase_url.trim().is_empty() {
            return Err(AssetError::BackendUnavailable(
                "Supabase URL not configured. Set SINBAD_SUPABASE_URL".to_string(),
            ));
        }
        if settings.service_role_key.is_empty() {
            return Err(AssetError::BackendUnavailable(
                "Service role key not configured. Set SINBAD_SERVICE_ROLE_KEY".to_string(),
            ));
        }

        Ok(Self {
            client: http_client(settings)?,
            base_url: settings.supabase_url.trim_end_matches('/').to_string(),
            service_key: settings.service_role_key.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn execute(&self, statement: &str) -> StatementOutcome {
        let url = format!("{}/rest/v1/rpc/exec_sql", self.base_url);
        let key = self.service_key.expose();

        let resp = self
            .client
            .post(&url)
            .header("apikey", key)
            .bearer_auth(key)
            .json(&json!({ "query": statement }))
            .send();

        match resp {
            Ok(resp) => {
                let status = resp.status().as_u16();
                if matches!(status, 200 | 201 | 204) {
                    StatementOutcome::Success
                } else {
                    let body = resp.text().unwrap_or_default();
                    StatementOutcome::Rejected {
                        status,
                        body: truncate_body(&body, 200),
                    }
                }
            }
            Err(e) => StatementOutcome::Failed(e.to_string()),
        }
    }

    /// Executes every statement in order, continuing past failures.
    pub fn execute_all(&self, sql: &str) -> MigrationReport {
        let statements = split_statements(sql);
        let total = statements.len();
        println!("Executing {} SQL statements...", total);

        let mut report = MigrationReport::default();
        for (i, statement) in statements.iter().enumerate() {
            println!("\n[{}/{}] Executing statement...", i + 1, total);
            tracing::debug!("statement: {}", statement);

            match self.execute(statement) {
                StatementOutcome::Success => {
                    println!("Success");
                    report.successful += 1;
                }
                StatementOutcome::Rejected { status, body } => {
                    println!("Warning: {} - {}", status, body);
                    report.errors += 1;
                }
                StatementOutcome::Failed(e) => {
                    println!("Error: {}", e);
                    tracing::warn!("statement {} failed: {}", i + 1, e);
                    report.errors += 1;
                }
            }
        }

        println!("\n{}", "=".repeat(60));
        println!("Successful: {}", report.successful);
        println!("Errors: {}", report.errors);
        println!("{}", "=".repeat(60));
        report
    }
}
