use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ClassifyError;

/// Sentiment of one review as reported by the server
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub sentiment: String,
    pub confidence: f64,
}

/// Anything that can classify a review. The chat driver only talks to this.
#[async_trait]
pub trait Classifier: Send + Sync + 'static {
    async fn classify(&self, text: &str) -> Result<Classification, ClassifyError>;
}

#[derive(Serialize)]
struct AnalyzeRequest<'a> {
    content: &'a str,
}

#[derive(Deserialize)]
struct AnalyzeResponse {
    sentiment: String,
    #[serde(default)]
    confidence: Value,
    // Echo of the submitted review
    #[allow(dead_code)]
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct HealthResponse {
    #[serde(default)]
    message: String,
}

/// Coerce the server's confidence into a number; anything unusable counts as 0
fn coerce_confidence(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|c| c.is_finite()).unwrap_or(0.0)
}

/// HTTP client for the review sentiment server
#[derive(Clone)]
pub struct SentimentClient {
    client: Client,
    base_url: String,
}

impl SentimentClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClassifyError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Ask the server whether the model is up; returns its status message
    pub async fn health(&self) -> Result<String, ClassifyError> {
        let url = format!("{}/", self.base_url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(ClassifyError::connection(format!(
                "health check failed with status: {}",
                response.status()
            )));
        }

        let health: HealthResponse = response.json().await?;
        Ok(health.message)
    }
}

#[async_trait]
impl Classifier for SentimentClient {
    async fn classify(&self, text: &str) -> Result<Classification, ClassifyError> {
        let url = format!("{}/analyze", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&AnalyzeRequest { content: text })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ClassifyError::connection(format!(
                "analyze request failed with status: {}",
                response.status()
            )));
        }

        let body = response.bytes().await?;
        let analyzed: AnalyzeResponse = serde_json::from_slice(&body)
            .map_err(|e| ClassifyError::connection(format!("malformed analyze response: {}", e)))?;

        tracing::debug!(sentiment = %analyzed.sentiment, "review classified");

        Ok(Classification {
            sentiment: analyzed.sentiment,
            confidence: coerce_confidence(&analyzed.confidence),
        })
    }
}
