//! LLM client configuration.

use serde::{Deserialize, Serialize};

/// LLM provider type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// Google Gemini `generateContent` API (default)
    #[default]
    Gemini,
    /// OpenAI-compatible API (OpenAI, Groq, Together.ai, etc.)
    OpenAI,
    /// Ollama API (local)
    Ollama,
}

impl LlmProvider {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "gemini" | "google" | "googleai" => Some(Self::Gemini),
            "openai" | "groq" | "together" => Some(Self::OpenAI),
            "ollama" => Some(Self::Ollama),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::OpenAI => "openai",
            Self::Ollama => "ollama",
        }
    }

    /// Endpoint used when none is configured.
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            Self::Gemini => "https://generativelanguage.googleapis.com",
            Self::OpenAI => "https://api.openai.com",
            Self::Ollama => "http://localhost:11434",
        }
    }

    /// Model used when none is configured.
    pub fn default_model(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini-2.0-flash",
            Self::OpenAI => "gpt-4o-mini",
            Self::Ollama => "llama3.2",
        }
    }

    /// Whether requests need an API key.
    pub fn requires_api_key(&self) -> bool {
        !matches!(self, Self::Ollama)
    }
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for the LLM client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Whether model calls are enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Provider wire dialect
    #[serde(default)]
    pub provider: LlmProvider,
    /// API endpoint (provider default when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// API key (never written back out)
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// Model name (provider default when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Maximum tokens in response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Temperature for generation (0.0 - 2.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_max_tokens() -> u32 {
    2048
}

fn default_temperature() -> f32 {
    0.4
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            provider: LlmProvider::default(),
            endpoint: None,
            api_key: None,
            model: None,
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl LlmConfig {
    /// Check if the config equals the default (for skip_serializing_if).
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// Supported env vars:
    /// - `LLM_ENABLED`: "true" or "false"
    /// - `LLM_PROVIDER`: "gemini" (default), "openai", "groq", "together" or "ollama"
    /// - `LLM_ENDPOINT`: API endpoint (defaults based on provider)
    /// - `LLM_API_KEY`: API key, wins over provider-specific keys
    /// - `GEMINI_API_KEY` / `GOOGLE_API_KEY`: key for Gemini
    /// - `OPENAI_API_KEY` / `GROQ_API_KEY`: key for OpenAI-compatible providers
    /// - `LLM_MODEL`: Model name
    /// - `LLM_MAX_TOKENS`: Maximum tokens in response
    /// - `LLM_TEMPERATURE`: Generation temperature
    /// - `LLM_TIMEOUT_SECS`: HTTP request timeout
    pub fn with_overrides_from<F>(self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        self.with_setting_overrides_from(&lookup)
            .with_provider_key_from(&lookup)
    }

    /// Apply every override except the provider-specific key fallback.
    ///
    /// Use this when the provider may still change (command-line flags),
    /// then call [`Self::with_provider_key_from`] once it is final.
    pub fn with_setting_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(val) = var("LLM_ENABLED") {
            self.enabled = val.eq_ignore_ascii_case("true") || val == "1";
        }

        if let Some(name) = var("LLM_PROVIDER") {
            if let Some(provider) = LlmProvider::parse(&name) {
                self.provider = provider;
            }
            // OpenAI-compatible hosts that are not api.openai.com
            if self.endpoint.is_none() {
                match name.to_lowercase().as_str() {
                    "groq" => self.endpoint = Some("https://api.groq.com/openai".to_string()),
                    "together" => self.endpoint = Some("https://api.together.xyz".to_string()),
                    _ => {}
                }
            }
        }

        if let Some(endpoint) = var("LLM_ENDPOINT") {
            self.endpoint = Some(endpoint);
        }

        if let Some(key) = var("LLM_API_KEY") {
            self.api_key = Some(key);
        }

        if let Some(model) = var("LLM_MODEL") {
            self.model = Some(model);
        }
        if let Some(n) = var("LLM_MAX_TOKENS").and_then(|v| v.parse().ok()) {
            self.max_tokens = n;
        }
        if let Some(t) = var("LLM_TEMPERATURE").and_then(|v| v.parse().ok()) {
            self.temperature = t;
        }
        if let Some(n) = var("LLM_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.timeout_secs = n;
        }
        self
    }

    /// Fill a missing API key from the variable that belongs to the
    /// current provider.
    pub fn with_provider_key_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.api_key.is_some() {
            return self;
        }
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());
        self.api_key = match self.provider {
            LlmProvider::Gemini => var("GEMINI_API_KEY").or_else(|| var("GOOGLE_API_KEY")),
            LlmProvider::OpenAI => var("OPENAI_API_KEY").or_else(|| var("GROQ_API_KEY")),
            LlmProvider::Ollama => None,
        };
        self
    }

    pub fn with_provider(mut self, provider: LlmProvider) -> Self {
        self.provider = provider;
        self
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = Some(endpoint.to_string());
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = Some(model.to_string());
        self
    }

    pub fn with_api_key(mut self, key: &str) -> Self {
        self.api_key = Some(key.to_string());
        self
    }

    /// Endpoint without trailing slash, falling back to the provider default.
    pub fn endpoint(&self) -> &str {
        self.endpoint
            .as_deref()
            .unwrap_or_else(|| self.provider.default_endpoint())
            .trim_end_matches('/')
    }

    /// Model name, falling back to the provider default.
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }
}
