//! HTTP client for hosted and local LLM providers.
//!
//! Speaks three wire dialects, all asking for JSON that matches a schema:
//! - Gemini `generateContent` with `responseSchema`
//! - OpenAI-compatible `chat/completions` with `response_format: json_schema`
//! - Ollama `api/generate` with `format: <schema>`

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use super::config::{LlmConfig, LlmProvider};
use super::provider::{GenerateRequest, ModelProvider};
use super::schema::close_objects;
use super::LlmError;

/// LLM client for structured generation.
pub struct LlmClient {
    config: LlmConfig,
    client: Client,
}

// Gemini wire format

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    generation_config: GeminiGenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    role: &'static str,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig<'a> {
    temperature: f32,
    max_output_tokens: u32,
    response_mime_type: &'static str,
    response_schema: &'a Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    prompt_feedback: Option<GeminiPromptFeedback>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiResponseContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    block_reason: Option<String>,
}

// OpenAI wire format

#[derive(Debug, Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAiMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    response_format: OpenAiResponseFormat<'a>,
}

#[derive(Debug, Serialize)]
struct OpenAiMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct OpenAiResponseFormat<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    json_schema: OpenAiJsonSchema<'a>,
}

#[derive(Debug, Serialize)]
struct OpenAiJsonSchema<'a> {
    name: &'a str,
    schema: Value,
    strict: bool,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

// Ollama wire format

#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    format: &'a Value,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl LlmClient {
    /// Create a new LLM client with the given configuration.
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let endpoint = url::Url::parse(config.endpoint())
            .map_err(|e| LlmError::Client(format!("Invalid endpoint {}: {}", config.endpoint(), e)))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(LlmError::Client(format!(
                "Unsupported endpoint scheme: {}",
                endpoint.scheme()
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Client(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Get the config.
    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn api_key(&self) -> Result<&str, LlmError> {
        self.config
            .api_key
            .as_deref()
            .ok_or(LlmError::MissingApiKey(self.config.provider))
    }

    async fn call_gemini(&self, request: &GenerateRequest) -> Result<String, LlmError> {
        let body = gemini_body(&self.config, request);
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.endpoint(),
            self.config.model()
        );

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key()?)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Connection(e.to_string()))?;

        let resp = check_status(resp).await?;
        let parsed: GeminiResponse = resp
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;
        gemini_text(parsed)
    }

    async fn call_openai(&self, request: &GenerateRequest) -> Result<String, LlmError> {
        let body = openai_body(&self.config, request);
        let url = format!("{}/v1/chat/completions", self.config.endpoint());

        let resp = self
            .client
            .post(&url)
            .bearer_auth(self.api_key()?)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Connection(e.to_string()))?;

        let resp = check_status(resp).await?;
        let parsed: OpenAiResponse = resp
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;
        openai_text(parsed)
    }

    async fn call_ollama(&self, request: &GenerateRequest) -> Result<String, LlmError> {
        let body = OllamaRequest {
            model: self.config.model(),
            prompt: &request.prompt,
            stream: false,
            format: &request.schema,
            options: OllamaOptions {
                temperature: self.config.temperature,
                num_predict: self.config.max_tokens,
            },
        };
        let url = format!("{}/api/generate", self.config.endpoint());

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Connection(e.to_string()))?;

        let resp = check_status(resp).await?;
        let parsed: OllamaResponse = resp
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;
        Ok(parsed.response)
    }
}

#[async_trait]
impl ModelProvider for LlmClient {
    async fn generate(&self, request: &GenerateRequest) -> Result<String, LlmError> {
        if !self.config.enabled {
            return Err(LlmError::Disabled);
        }

        debug!(
            flow = request.name,
            provider = %self.config.provider,
            model = self.config.model(),
            "Sending generation request"
        );
        let started = Instant::now();

        let text = match self.config.provider {
            LlmProvider::Gemini => self.call_gemini(request).await?,
            LlmProvider::OpenAI => self.call_openai(request).await?,
            LlmProvider::Ollama => self.call_ollama(request).await?,
        };

        info!(
            flow = request.name,
            elapsed_ms = started.elapsed().as_millis() as u64,
            bytes = text.len(),
            "Generation complete"
        );
        Ok(text)
    }

    fn describe(&self) -> String {
        format!("{} ({})", self.config.provider, self.config.model())
    }

    async fn is_available(&self) -> bool {
        if !self.config.enabled {
            return false;
        }
        let endpoint = self.config.endpoint();
        let request = match self.config.provider {
            LlmProvider::Gemini => match self.config.api_key.as_deref() {
                Some(key) => self
                    .client
                    .get(format!("{}/v1beta/models", endpoint))
                    .header("x-goog-api-key", key),
                None => return false,
            },
            LlmProvider::OpenAI => match self.config.api_key.as_deref() {
                Some(key) => self
                    .client
                    .get(format!("{}/v1/models", endpoint))
                    .bearer_auth(key),
                None => return false,
            },
            LlmProvider::Ollama => self.client.get(format!("{}/api/tags", endpoint)),
        };
        match request.send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }
}

/// Turn a non-2xx response into an API error carrying the body.
async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, LlmError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    Err(LlmError::Api { status, body })
}

fn gemini_body<'a>(config: &LlmConfig, request: &'a GenerateRequest) -> GeminiRequest<'a> {
    GeminiRequest {
        contents: vec![GeminiContent {
            role: "user",
            parts: vec![GeminiPart {
                text: &request.prompt,
            }],
        }],
        generation_config: GeminiGenerationConfig {
            temperature: config.temperature,
            max_output_tokens: config.max_tokens,
            response_mime_type: "application/json",
            response_schema: &request.schema,
        },
    }
}

fn gemini_text(response: GeminiResponse) -> Result<String, LlmError> {
    if let Some(error) = response.error {
        return Err(LlmError::Parse(error.message));
    }
    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(LlmError::Blocked(reason));
    }

    let text: String = response
        .candidates
        .and_then(|c| c.into_iter().next())
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .concat()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(LlmError::Parse("Gemini returned no candidates".to_string()));
    }
    Ok(text)
}

fn openai_body<'a>(config: &'a LlmConfig, request: &'a GenerateRequest) -> OpenAiRequest<'a> {
    OpenAiRequest {
        model: config.model(),
        messages: vec![OpenAiMessage {
            role: "user",
            content: &request.prompt,
        }],
        temperature: config.temperature,
        max_tokens: config.max_tokens,
        response_format: OpenAiResponseFormat {
            kind: "json_schema",
            json_schema: OpenAiJsonSchema {
                name: request.name,
                schema: close_objects(&request.schema),
                strict: true,
            },
        },
    }
}

fn openai_text(response: OpenAiResponse) -> Result<String, LlmError> {
    if let Some(error) = response.error {
        return Err(LlmError::Parse(error.message));
    }
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| LlmError::Parse("Empty completion".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request() -> GenerateRequest {
        GenerateRequest::new(
            "summarize",
            "Summarize: hello",
            json!({
                "type": "object",
                "properties": { "summary": { "type": "string" } },
                "required": ["summary"]
            }),
        )
    }

    #[test]
    fn test_gemini_body_requests_json() {
        let config = LlmConfig::default();
        let req = request();
        let body = serde_json::to_value(gemini_body(&config, &req)).unwrap();

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Summarize: hello");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(
            body["generationConfig"]["responseSchema"]["required"][0],
            "summary"
        );
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 2048);
    }

    #[test]
    fn test_gemini_text_joins_parts() {
        let response: GeminiResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "{\"summary\":" }, { "text": "\"hi\"}" }] }
            }]
        }))
        .unwrap();
        assert_eq!(gemini_text(response).unwrap(), "{\"summary\":\"hi\"}");
    }

    #[test]
    fn test_gemini_blocked_prompt() {
        let response: GeminiResponse = serde_json::from_value(json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        }))
        .unwrap();
        assert!(matches!(gemini_text(response), Err(LlmError::Blocked(r)) if r == "SAFETY"));
    }

    #[test]
    fn test_gemini_empty_candidates() {
        let response: GeminiResponse =
            serde_json::from_value(json!({ "candidates": [] })).unwrap();
        assert!(matches!(gemini_text(response), Err(LlmError::Parse(_))));
    }

    #[test]
    fn test_openai_body_uses_strict_schema() {
        let config = LlmConfig::default()
            .with_provider(LlmProvider::OpenAI)
            .with_model("gpt-4o-mini");
        let req = request();
        let body = serde_json::to_value(openai_body(&config, &req)).unwrap();

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["content"], "Summarize: hello");
        assert_eq!(body["response_format"]["type"], "json_schema");
        assert_eq!(body["response_format"]["json_schema"]["name"], "summarize");
        assert_eq!(body["response_format"]["json_schema"]["strict"], true);
        assert_eq!(
            body["response_format"]["json_schema"]["schema"]["additionalProperties"],
            false
        );
    }

    #[test]
    fn test_openai_text() {
        let response: OpenAiResponse = serde_json::from_value(json!({
            "choices": [{ "message": { "content": "{\"analysis\":\"ok\"}" } }]
        }))
        .unwrap();
        assert_eq!(openai_text(response).unwrap(), "{\"analysis\":\"ok\"}");

        let empty: OpenAiResponse = serde_json::from_value(json!({ "choices": [] })).unwrap();
        assert!(openai_text(empty).is_err());
    }

    #[tokio::test]
    async fn test_disabled_client_refuses() {
        let mut config = LlmConfig::default();
        config.enabled = false;
        let client = LlmClient::new(config).unwrap();

        let err = client.generate(&request()).await.unwrap_err();
        assert!(matches!(err, LlmError::Disabled));
        assert!(!client.is_available().await);
    }

    #[tokio::test]
    async fn test_missing_key() {
        let client = LlmClient::new(LlmConfig::default()).unwrap();
        let err = client.generate(&request()).await.unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey(LlmProvider::Gemini)));
    }

    #[test]
    fn test_invalid_endpoint() {
        let err = LlmClient::new(LlmConfig::default().with_endpoint("not a url"));
        assert!(matches!(err, Err(LlmError::Client(_))));

        let err = LlmClient::new(LlmConfig::default().with_endpoint("ftp://example.com"));
        assert!(matches!(err, Err(LlmError::Client(_))));
    }

    #[test]
    fn test_describe() {
        let client = LlmClient::new(
            LlmConfig::default()
                .with_provider(LlmProvider::Ollama)
                .with_model("llama3.2"),
        )
        .unwrap();
        assert_eq!(client.describe(), "ollama (llama3.2)");
    }
}
