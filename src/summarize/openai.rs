// src/summarize/openai.rs
//! Summaries from an OpenAI-compatible chat completions endpoint.

use super::Summarizer;
use crate::config::SummarizerSettings;
use crate::constants::{SUMMARY_MAX_TOKENS, SUMMARY_TEMPERATURE};
use crate::error::{preview_body, SummarizeError};
use serde_json::{json, Value};

const SYSTEM_PROMPT: &str = "You are an expert at summarizing. Summarize the key points of the \
given text concisely in about 100 characters, in the language of the text.";

pub struct OpenAiSummarizer {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl OpenAiSummarizer {
    pub fn new(settings: &SummarizerSettings) -> Result<Self, SummarizeError> {
        Ok(Self {
            client: reqwest::Client::builder().build()?,
            endpoint: completions_endpoint(settings.base_url.base()),
            api_key: settings.api_key.as_str().to_string(),
            model: settings.model.clone(),
        })
    }
}

pub fn completions_endpoint(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

#[async_trait::async_trait]
impl Summarizer for OpenAiSummarizer {
    async fn summarize(&self, text: &str) -> Result<String, SummarizeError> {
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": text },
            ],
            "max_tokens": SUMMARY_MAX_TOKENS,
            "temperature": SUMMARY_TEMPERATURE,
        });

        log::debug!("POST {} (model {})", self.endpoint, self.model);
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let raw = response.text().await?;
        if !status.is_success() {
            let message = parse_error_message(&raw).unwrap_or_else(|| preview_body(&raw));
            return Err(SummarizeError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let value: Value =
            serde_json::from_str(&raw).map_err(|e| SummarizeError::Malformed(e.to_string()))?;
        extract_message_text(&value)
    }
}

fn parse_error_message(raw_json: &str) -> Option<String> {
    let value: Value = serde_json::from_str(raw_json).ok()?;
    let message = value.get("error")?.get("message")?.as_str()?.to_owned();
    Some(message)
}

fn extract_message_text(value: &Value) -> Result<String, SummarizeError> {
    let content = value
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str)
        .ok_or_else(|| SummarizeError::Malformed("missing `choices[0].message.content`".into()))?;

    let text = content.trim();
    if text.is_empty() {
        return Err(SummarizeError::EmptyOutput);
    }
    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn endpoint_joins_without_double_slash() {
        assert_eq!(
            completions_endpoint("https://api.openai.com/v1/"),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn extracts_first_choice() {
        let value = json!({
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": "  A short summary. \n" } }
            ]
        });
        assert_eq!(extract_message_text(&value).unwrap(), "A short summary.");
    }

    #[test]
    fn blank_content_is_an_error() {
        let value = json!({ "choices": [ { "message": { "content": "   " } } ] });
        assert!(matches!(
            extract_message_text(&value),
            Err(SummarizeError::EmptyOutput)
        ));
        assert!(matches!(
            extract_message_text(&json!({})),
            Err(SummarizeError::Malformed(_))
        ));
    }

    #[test]
    fn error_message_is_read_from_body() {
        let raw = r#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}"#;
        assert_eq!(
            parse_error_message(raw).as_deref(),
            Some("Incorrect API key provided")
        );
        assert_eq!(parse_error_message("not json"), None);
    }
}
