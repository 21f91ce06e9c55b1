// Inference gateway: PNG in, short text answer out.
// The app only sees the `Solver` trait; `OpenAiGateway` is the real HTTP client
// and tests plug in stubs.

use crate::config::Config;
use crate::error::Error;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// What we ask the model to do with the picture.
pub const INSTRUCTION: &str = "Solve this math equation and give the answer. Be precise, be brief.";

/// Turns a picture of a math expression into an answer. Blocking.
pub trait Solver: Send + Sync {
    fn solve(&self, png: &[u8]) -> Result<String, Error>;
}

/// `data:image/png;base64,...` for the given PNG bytes.
pub fn png_data_url(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png))
}

/* ---------- chat-completions wire format ---------- */

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub max_tokens: u32,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: Vec<ContentPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    pub content: Option<String>,
}

/// One user message: the instruction plus the picture.
pub fn build_request<'a>(model: &'a str, max_tokens: u32, png: &[u8]) -> ChatRequest<'a> {
    ChatRequest {
        model,
        max_tokens,
        messages: vec![ChatMessage {
            role: "user",
            content: vec![
                ContentPart::Text { text: INSTRUCTION },
                ContentPart::ImageUrl { image_url: ImageUrl { url: png_data_url(png) } },
            ],
        }],
    }
}

/// First choice's text, trimmed. Missing or blank content is an error.
pub fn extract_answer(response: ChatResponse) -> Result<String, Error> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| Error::MalformedResponse("no choices returned".into()))?;
    let content = choice
        .message
        .content
        .ok_or_else(|| Error::MalformedResponse("first choice has no content".into()))?;
    let answer = content.trim();
    if answer.is_empty() {
        return Err(Error::MalformedResponse("first choice is empty".into()));
    }
    Ok(answer.to_owned())
}

/// Chat-completions client for OpenAI or any compatible endpoint.
pub struct OpenAiGateway {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl OpenAiGateway {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent("math-notes")
            .build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.api_base.trim_end_matches('/')),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Solver for OpenAiGateway {
    fn solve(&self, png: &[u8]) -> Result<String, Error> {
        let request = build_request(&self.model, self.max_tokens, png);
        debug!(endpoint = %self.endpoint, model = %self.model, png_bytes = png.len(), "sending solve request");
        let response: ChatResponse = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()?
            .error_for_status()?
            .json()?;
        let answer = extract_answer(response)?;
        info!(answer = %answer, "solver answered");
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn data_url_is_base64_png() {
        assert_eq!(png_data_url(b"abc"), "data:image/png;base64,YWJj");
    }

    #[test]
    fn request_has_instruction_then_image() {
        let request = build_request("gpt-4o", 300, b"abc");
        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(
            value,
            json!({
                "model": "gpt-4o",
                "max_tokens": 300,
                "messages": [{
                    "role": "user",
                    "content": [
                        { "type": "text", "text": INSTRUCTION },
                        { "type": "image_url", "image_url": { "url": "data:image/png;base64,YWJj" } }
                    ]
                }]
            })
        );
    }

    #[test]
    fn answer_is_first_choice_trimmed() {
        let response: ChatResponse = serde_json::from_value(json!({
            "id": "x",
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": " 7\n" } },
                { "index": 1, "message": { "role": "assistant", "content": "8" } }
            ]
        }))
        .expect("deserialize");
        assert_eq!(extract_answer(response).expect("answer"), "7");
    }

    #[test]
    fn missing_or_blank_answers_are_malformed() {
        let none: ChatResponse = serde_json::from_value(json!({ "choices": [] })).expect("deserialize");
        assert!(matches!(extract_answer(none), Err(Error::MalformedResponse(_))));

        let absent: ChatResponse = serde_json::from_value(json!({})).expect("deserialize");
        assert!(matches!(extract_answer(absent), Err(Error::MalformedResponse(_))));

        let null: ChatResponse =
            serde_json::from_value(json!({ "choices": [{ "message": { "content": null } }] })).expect("deserialize");
        assert!(matches!(extract_answer(null), Err(Error::MalformedResponse(_))));

        let blank: ChatResponse =
            serde_json::from_value(json!({ "choices": [{ "message": { "content": "  " } }] })).expect("deserialize");
        assert!(matches!(extract_answer(blank), Err(Error::MalformedResponse(_))));
    }

    #[test]
    fn endpoint_joins_base_without_double_slash() {
        let config = Config::for_tests("https://example.test/v1/");
        let gateway = OpenAiGateway::new(&config).expect("client");
        assert_eq!(gateway.endpoint(), "https://example.test/v1/chat/completions");
    }
}
