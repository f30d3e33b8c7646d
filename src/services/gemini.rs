//! Gemini client for breaking a session goal into subtasks

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound on subtasks returned for one goal
pub const MAX_SUBTASKS: usize = 5;

/// Error from a subtask generation attempt.
///
/// None of these are surfaced to the user as hard failures; the session
/// controller falls back to adding the raw goal as a plain task.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("GEMINI_API_KEY is not configured")]
    MissingApiKey,
    #[error("request failed: {0}")]
    Network(String),
    #[error("service returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed response: {0}")]
    Parse(String),
}

/// Port for the external text-generation service. The session controller
/// depends on this trait so tests can inject a stub.
#[async_trait]
pub trait SubtaskGenerator: Send + Sync {
    /// Break a goal into at most [`MAX_SUBTASKS`] concise subtask titles.
    /// A single attempt per invocation; no retries, no internal fallback.
    async fn generate_subtasks(&self, goal: &str) -> Result<Vec<String>, GeneratorError>;
}

/// Gemini `generateContent` implementation of [`SubtaskGenerator`]
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
        }
    }

    fn request_body(goal: &str) -> serde_json::Value {
        json!({
            "contents": [{
                "parts": [{
                    "text": format!(
                        "Break down the following content creation or scripting goal into \
                         3-5 concise, actionable subtasks suitable for a single Pomodoro \
                         work session (25 minutes). Goal: \"{}\"",
                        goal
                    )
                }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {
                        "tasks": {
                            "type": "ARRAY",
                            "items": { "type": "STRING" },
                            "description": "A list of actionable subtasks"
                        }
                    }
                }
            }
        })
    }
}

#[async_trait]
impl SubtaskGenerator for GeminiClient {
    async fn generate_subtasks(&self, goal: &str) -> Result<Vec<String>, GeneratorError> {
        let api_key = self.api_key.as_deref().ok_or(GeneratorError::MissingApiKey)?;
        let url = format!("{}/{}:generateContent", GEMINI_API_BASE, self.model);

        debug!("Requesting subtask breakdown for goal ({} chars)", goal.len());

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .timeout(REQUEST_TIMEOUT)
            .json(&Self::request_body(goal))
            .send()
            .await
            .map_err(|e| GeneratorError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GeneratorError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(GeneratorError::Status {
                status: status.as_u16(),
                body,
            });
        }

        parse_subtasks(&body)
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

/// Schema-constrained payload the model is asked to produce
#[derive(Debug, Serialize, Deserialize)]
struct SubtaskPayload {
    #[serde(default)]
    tasks: Vec<String>,
}

/// Extract the subtask list from a raw `generateContent` response body.
/// The candidate text is itself a JSON object of shape `{"tasks": [...]}`.
fn parse_subtasks(body: &str) -> Result<Vec<String>, GeneratorError> {
    let response: GenerateContentResponse =
        serde_json::from_str(body).map_err(|e| GeneratorError::Parse(e.to_string()))?;

    let text = response
        .candidates
        .into_iter()
        .next()
        .map(|c| {
            c.content
                .parts
                .into_iter()
                .map(|p| p.text)
                .collect::<String>()
        })
        .ok_or_else(|| GeneratorError::Parse("no candidates in response".to_string()))?;

    let payload: SubtaskPayload =
        serde_json::from_str(&text).map_err(|e| GeneratorError::Parse(e.to_string()))?;

    Ok(payload
        .tasks
        .into_iter()
        .filter(|t| !t.trim().is_empty())
        .take(MAX_SUBTASKS)
        .collect())
}
