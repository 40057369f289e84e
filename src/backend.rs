//! OpenAI-compatible chat completion backend for commit messages.
//!
//! The caller-facing contract is `Option<String>`: `None` means no message was
//! produced, for whatever reason, and the keyword classifier should be used.

use crate::config::{AiApiConfig, DIFF_SUMMARY_PLACEHOLDER};
use crate::constants::{MAX_TOKENS, TEMPERATURE};
use crate::svn::FileDiff;
use crate::warning;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("generative backend is not configured")]
    NotConfigured,

    #[error("no diff content to describe")]
    NothingToDescribe,

    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("authentication rejected, check apiKey")]
    Unauthorized,

    #[error("endpoint not found (404), check baseUrl: {0}")]
    NotFound(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("empty response")]
    EmptyResponse,
}

/// anything that can turn diffs into a commit message
pub trait MessageBackend {
    /// false when calling `generate` could not possibly succeed, so callers
    /// can skip collecting diffs
    fn is_available(&self) -> bool {
        true
    }

    fn generate(&self, files: &[FileDiff]) -> Option<String>;
}

#[derive(Serialize, Debug)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize, Debug)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize, Debug)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

pub struct OpenAiBackend {
    settings: AiApiConfig,
}

impl OpenAiBackend {
    pub fn new(settings: AiApiConfig) -> Self {
        Self { settings }
    }

    pub fn is_configured(&self) -> bool {
        let s = &self.settings;
        s.enabled && !s.base_url.trim().is_empty() && !s.api_key.trim().is_empty()
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.settings.base_url.trim().trim_end_matches('/')
        )
    }

    pub fn request(&self, files: &[FileDiff]) -> Result<String, BackendError> {
        if !self.is_configured() {
            return Err(BackendError::NotConfigured);
        }

        let summary = build_diff_summary(files, self.settings.max_diff_length);
        if summary.is_empty() {
            return Err(BackendError::NothingToDescribe);
        }

        let prompts = &self.settings.prompts;
        let user_prompt = prompts.user.replace(DIFF_SUMMARY_PLACEHOLDER, &summary);
        let request = ChatRequest {
            model: &self.settings.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &prompts.system,
                },
                ChatMessage {
                    role: "user",
                    content: &user_prompt,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(self.settings.timeout_secs)))
            .build()
            .into();

        let endpoint = self.endpoint();
        let mut response = agent
            .post(endpoint.as_str())
            .header("Authorization", format!("Bearer {}", self.settings.api_key.trim()))
            .send_json(&request)
            .map_err(|e| match e {
                ureq::Error::StatusCode(404) => BackendError::NotFound(endpoint.clone()),
                other => BackendError::from(other),
            })?;

        let body: ChatResponse = response
            .body_mut()
            .read_json()
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;

        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| clean_reply(&content))
            .filter(|message| !message.is_empty())
            .ok_or(BackendError::EmptyResponse)
    }
}

impl MessageBackend for OpenAiBackend {
    fn is_available(&self) -> bool {
        self.is_configured()
    }

    fn generate(&self, files: &[FileDiff]) -> Option<String> {
        match self.request(files) {
            Ok(message) => Some(message),
            Err(BackendError::NotConfigured | BackendError::NothingToDescribe) => None,
            Err(e) => {
                warning!("commit message generation failed: {}", e);
                None
            }
        }
    }
}

impl From<ureq::Error> for BackendError {
    fn from(error: ureq::Error) -> Self {
        match error {
            ureq::Error::StatusCode(401 | 403) => Self::Unauthorized,
            ureq::Error::StatusCode(code) => Self::Status(code),
            ureq::Error::Timeout(_) => Self::Timeout,
            ureq::Error::Io(e) if e.kind() == std::io::ErrorKind::TimedOut => Self::Timeout,
            other => Self::Connection(other.to_string()),
        }
    }
}

/// first `max_chars` characters of a diff
pub fn truncate_diff(diff: &str, max_chars: usize) -> &str {
    match diff.char_indices().nth(max_chars) {
        Some((end, _)) => &diff[..end],
        None => diff,
    }
}

/// one section per file with a non-empty diff, each diff truncated on its own
pub fn build_diff_summary(files: &[FileDiff], max_chars: usize) -> String {
    files
        .iter()
        .filter(|file| !file.diff.is_empty())
        .map(|file| {
            format!(
                "File: {}\nChanges:\n{}",
                file.path,
                truncate_diff(&file.diff, max_chars)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// models like to wrap the message in quotes
fn clean_reply(content: &str) -> String {
    content.trim().trim_matches(['"', '\'']).trim().to_string()
}
