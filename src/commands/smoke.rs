//! Smoke check command implementation

use crate::backend::build_client;
use crate::config::Config;
use crate::error::{Error, Result};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, warn};
use url::Url;

/// Smoke check options
#[derive(Debug, Clone, Default)]
pub struct SmokeOptions {
    /// Target URL (defaults to `smoke.url`)
    pub url: Option<String>,
    /// Question to send (defaults to `smoke.question`)
    pub question: Option<String>,
}

/// What came back from the endpoint
#[derive(Debug, Clone, Serialize)]
pub struct SmokeReport {
    pub url: String,
    pub status: u16,
    pub body: String,
    /// Decoded body, when it was valid JSON
    pub json: Option<Value>,
    /// Why the body could not be decoded
    pub parse_error: Option<String>,
}

/// POST `{"question": ..}` to the target and capture the response
///
/// A non-JSON body is reported on the result rather than returned as an error.
pub async fn cmd_smoke(config: &Config, options: SmokeOptions) -> Result<SmokeReport> {
    let url = options.url.unwrap_or_else(|| config.smoke.url.clone());
    let question = options
        .question
        .unwrap_or_else(|| config.smoke.question.clone());
    let target = Url::parse(&url)
        .map_err(|e| Error::Config(format!("Invalid smoke URL '{}': {}", url, e)))?;

    info!("Posting question to {}", target);
    let client = build_client(config.timeout())?;
    let response = client
        .post(target)
        .json(&json!({ "question": question }))
        .send()
        .await?;

    let status = response.status().as_u16();
    let body = response.text().await?;

    let (json, parse_error) = match parse_body(&body) {
        Ok(value) => (Some(value), None),
        Err(e) => {
            warn!("{}", e);
            (None, Some(e.to_string()))
        }
    };

    Ok(SmokeReport {
        url,
        status,
        body,
        json,
        parse_error,
    })
}

fn parse_body(body: &str) -> Result<Value> {
    serde_json::from_str(body)
        .map_err(|e| Error::Parse(format!("Response is not valid JSON: {}", e)))
}

/// Print smoke check results to console
pub fn print_smoke_report(report: &SmokeReport) {
    println!("POST {} -> {}", report.url, report.status);
    println!("{}", report.body);

    match &report.json {
        Some(value) => match serde_json::to_string_pretty(value) {
            Ok(pretty) => println!("{}", pretty),
            Err(_) => println!("{}", value),
        },
        None => println!("Response is not valid JSON"),
    }
}
