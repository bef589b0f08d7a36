use crate::config::SummarizerConfig;
use crate::error::{ConfigError, SummarizeError};
use crate::results::ExtractedContent;
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};

pub const SYSTEM_PROMPT: &str = "You are an assistant that analyzes the contents of a website \
and provides a short summary, ignoring text that might be navigation related. \
Respond in markdown.";

const USER_PROMPT_TITLE: &str = "You are looking at a website titled";

const USER_PROMPT_CONTENT: &str = "The contents of this website is as follows; \
please provide a short summary of this website in markdown. \
If it includes news or announcements, then summarize these too";

/// One message of a chat completion prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    fn new(role: &str, content: String) -> Self {
        Self {
            role: role.to_string(),
            content,
        }
    }
}

/// Builds the system and user messages for one page
pub fn build_prompt(content: &ExtractedContent) -> Vec<Message> {
    vec![
        Message::new("system", SYSTEM_PROMPT.to_string()),
        Message::new(
            "user",
            format!(
                "{} {}\n{}:\n{}",
                USER_PROMPT_TITLE, content.title, USER_PROMPT_CONTENT, content.text
            ),
        ),
    ]
}

/// A text-generation backend that turns extracted page content into markdown
#[async_trait]
pub trait Summarize: Send + Sync {
    async fn summarize(
        &self,
        content: &ExtractedContent,
        model: &str,
    ) -> Result<String, SummarizeError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// Summarizer backed by an OpenAI-compatible chat completions endpoint
#[derive(Debug, Clone)]
pub struct OpenAiSummarizer {
    client: Client,
    endpoint: String,
}

impl OpenAiSummarizer {
    /// Create a summarizer from explicit configuration; the API key must be present
    pub fn new(config: &SummarizerConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|_| ConfigError::InvalidApiKey)?;
        headers.insert(AUTHORIZATION, bearer);

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(ConfigError::HttpClient)?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl Summarize for OpenAiSummarizer {
    async fn summarize(
        &self,
        content: &ExtractedContent,
        model: &str,
    ) -> Result<String, SummarizeError> {
        let messages = build_prompt(content);
        let request = ChatRequest {
            model,
            messages: &messages,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(SummarizeError::Http)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizeError::Status { status, body });
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| SummarizeError::MalformedResponse(e.to_string()))?;

        body.choices
            .into_iter()
            .next()
            .ok_or_else(|| SummarizeError::MalformedResponse("no choices returned".to_string()))?
            .message
            .content
            .ok_or_else(|| SummarizeError::MalformedResponse("choice has no content".to_string()))
    }
}
