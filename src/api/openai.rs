//! OpenAI-compatible chat completion client for habit insights.
//!
//! The assistant receives a JSON snapshot of every habit with its completion
//! statistics, followed by the user's question. HTTP failures are translated
//! into actionable messages (bad key, rate limit, exhausted quota).

use crate::libs::config::AiConfig;
use crate::libs::error::DhaError;
use crate::libs::insight::HabitInsight;
use crate::libs::validation;
use anyhow::Result;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const API_KEY_SECRET_FILE: &str = ".openai_key";

const SYSTEM_PROMPT: &str = "You are a helpful assistant for a daily habits tracking application. \
You have access to the user's habits and their completion logs. \
Answer questions about their habits, provide insights, suggestions, and help them understand their habit tracking data. \
Be friendly, concise, and helpful.";

pub const FALLBACK_ANSWER: &str = "I apologize, but I could not generate a response.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChatMessage>,
}

pub struct AiClient {
    client: Client,
    config: AiConfig,
    api_key: String,
}

impl AiClient {
    pub fn new(config: AiConfig, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            config,
            api_key: api_key.into(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.api_url.trim_end_matches('/'))
    }

    /// Builds the completion request for `question` over `context`.
    pub fn build_request(&self, question: &str, context: &[HabitInsight]) -> Result<ChatRequest> {
        let question = validation::question(question)?;
        let user_prompt = format!(
            "Here is the user's habit data:\n{}\n\nUser's question: {}\n\nPlease provide a helpful answer based on this data.",
            serde_json::to_string_pretty(context)?,
            question
        );

        Ok(ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_prompt,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        })
    }

    pub async fn ask(&self, question: &str, context: &[HabitInsight]) -> Result<String> {
        let request = self.build_request(question, context)?;
        if self.api_key.trim().is_empty() {
            return Err(DhaError::Ai(format!("OpenAI API key is not configured. Please set {}.", API_KEY_ENV)).into());
        }

        info!(habits = context.len(), model = %request.model, "calling chat completion API");
        let response = self.client.post(self.endpoint()).bearer_auth(&self.api_key).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(%status, body = %body, "chat completion failed");
            return Err(classify_failure(status, &body).into());
        }

        let completion: ChatResponse = response.json().await?;
        debug!(completion_id = ?completion.id, "chat completion succeeded");
        Ok(answer_from(completion))
    }
}

fn answer_from(completion: ChatResponse) -> String {
    completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .map(|message| message.content)
        .filter(|content| !content.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_ANSWER.to_string())
}

/// Maps an unsuccessful completion response to a user-facing error.
pub fn classify_failure(status: StatusCode, body: &str) -> DhaError {
    let detail: serde_json::Value = serde_json::from_str(body).unwrap_or_default();
    let code = detail["error"]["code"].as_str().unwrap_or_default();
    let kind = detail["error"]["type"].as_str().unwrap_or_default();
    let message = detail["error"]["message"].as_str().unwrap_or(body);

    if status == StatusCode::UNAUTHORIZED || code == "invalid_api_key" {
        return DhaError::Ai(format!("Invalid OpenAI API key. Please check your {} environment variable.", API_KEY_ENV));
    }

    if status == StatusCode::TOO_MANY_REQUESTS && code != "insufficient_quota" {
        return if message.contains("quota") {
            DhaError::Ai(
                "OpenAI API quota exceeded. Visit https://platform.openai.com/account/billing to add credits or upgrade your plan."
                    .to_string(),
            )
        } else {
            DhaError::Ai("OpenAI API rate limit exceeded. Rate limits reset periodically; please wait a moment and try again.".to_string())
        };
    }

    if code == "insufficient_quota" || kind == "insufficient_quota" || code == "billing_not_active" {
        return DhaError::Ai(
            "OpenAI API quota exceeded or billing is not active. Check your plan and billing details at https://platform.openai.com/account/billing."
                .to_string(),
        );
    }

    DhaError::Ai(format!("{} ({})", message.trim(), status))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_choices_fall_back() {
        let completion: ChatResponse = serde_json::from_str(r#"{"id":"x","choices":[]}"#).unwrap();
        assert_eq!(answer_from(completion), FALLBACK_ANSWER);
    }

    #[test]
    fn first_choice_is_the_answer() {
        let completion: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"role":"assistant","content":"Keep going"}}]}"#).unwrap();
        assert_eq!(answer_from(completion), "Keep going");
    }
}
