//! Claude API integration for daily summaries.
//!
//! Turns a day's grouped activities into a short, linked, bullet-point
//! narrative.

use std::fmt;
use std::time::Duration;

use ds_core::GroupedActivities;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default request timeout for API calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const SUMMARY_MAX_TOKENS: u32 = 1024;

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "claude-3-haiku-20240307";

/// Stands in for the summary text when generation is skipped.
pub const SKIPPED_SUMMARY: &str = "LLM summary generation skipped";

const SUMMARY_INSTRUCTIONS: &str = r#"Write a personal end-of-day summary from the activities below. Describe what I did and what happened, without value judgments.

Keep Linear issues grouped with the pull request they belong to.

Give each top-level activity its own bullet point, linking to it with a markdown link whose text is the activity's name.

Summarise the commits of a pull request as one prose description of the changes, starting like: "Made commits to...". Do NOT list the commit messages.

Use this structure:

Opened PRs:
- {repo name}: [PR title](PR URL)
  - what the PR does, if it has a description
  - details about the changes made and the PR itself

Merged PRs:
- {repo name}: [PR title](PR URL)
  - what the PR does, if it has a description
  - details about the changes made and the PR itself

Linear:
- [Linear issue title](Linear issue URL)
  - summary of the activity on the issue

Activities:"#;

/// LLM client errors.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The provided API key was invalid.
    #[error("invalid API key: {reason}")]
    InvalidApiKey { reason: &'static str },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// Failed to serialize the prompt input.
    #[error("failed to serialize activities: {0}")]
    Serialize(#[source] serde_json::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// API returned an error response.
    #[error("API error: {message}")]
    Api { message: String },
    /// Failed to parse response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Claude API client.
///
/// # Thread Safety
///
/// The client is safe to clone and share across threads. Each clone shares
/// the underlying HTTP connection pool.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    api_key: String,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a new client with the given API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty or whitespace-only, or if
    /// the HTTP client fails to build.
    pub fn new(api_key: impl Into<String>) -> Result<Self, LlmError> {
        let api_key = api_key.into();

        if api_key.is_empty() {
            return Err(LlmError::InvalidApiKey {
                reason: "API key cannot be empty",
            });
        }
        if api_key.trim().is_empty() {
            return Err(LlmError::InvalidApiKey {
                reason: "API key cannot be whitespace-only",
            });
        }

        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(LlmError::ClientBuild)?;

        Ok(Self { http, api_key })
    }

    /// Writes a narrative summary of the day's activities.
    pub async fn summarize(
        &self,
        model: &str,
        activities: &GroupedActivities,
    ) -> Result<String, LlmError> {
        let prompt = build_summary_prompt(activities)?;
        let request = MessageRequest {
            model: model.to_string(),
            max_tokens: SUMMARY_MAX_TOKENS,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .http
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(parse_api_error(&body).unwrap_or_else(|| LlmError::Api {
                message: format!("status {status}: {body}"),
            }));
        }

        let payload: MessageResponse = serde_json::from_str(&body)
            .map_err(|err| LlmError::InvalidResponse(err.to_string()))?;
        extract_text(payload.content)
    }
}

#[derive(Debug, Serialize)]
struct MessageRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text { text: String },
    #[serde(other)]
    Other,
}

fn extract_text(blocks: Vec<ContentBlock>) -> Result<String, LlmError> {
    let pieces: Vec<String> = blocks
        .into_iter()
        .filter_map(|block| match block {
            ContentBlock::Text { text } => Some(text),
            ContentBlock::Other => None,
        })
        .collect();
    if pieces.is_empty() {
        return Err(LlmError::InvalidResponse(
            "missing text content".to_string(),
        ));
    }
    Ok(pieces.join("\n"))
}

fn parse_api_error(body: &str) -> Option<LlmError> {
    #[derive(Deserialize)]
    struct ErrorPayload {
        error: ErrorDetails,
    }

    #[derive(Deserialize)]
    struct ErrorDetails {
        message: String,
    }

    serde_json::from_str::<ErrorPayload>(body)
        .ok()
        .map(|payload| LlmError::Api {
            message: payload.error.message,
        })
}

fn build_summary_prompt(activities: &GroupedActivities) -> Result<String, LlmError> {
    let rendered = serde_json::to_string_pretty(activities).map_err(LlmError::Serialize)?;
    Ok(format!("{SUMMARY_INSTRUCTIONS} {rendered}"))
}
