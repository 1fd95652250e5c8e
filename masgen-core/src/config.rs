use crate::error::ConfigError;
use std::collections::HashMap;
use std::time::Duration;

/// Connection and generation settings for one model endpoint.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible API
    ///
    /// Default: `https://openrouter.ai/api/v1`
    pub api_base: String,

    /// Model identifier sent with each request
    pub model: String,

    /// Maximum tokens per request
    ///
    /// Default: 4096
    pub max_tokens: u32,

    /// Temperature for generation (0.0 - 1.0)
    ///
    /// Default: 0.7
    pub temperature: f32,

    /// Timeout for individual requests
    ///
    /// Default: 60 seconds
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_base: "https://openrouter.ai/api/v1".to_string(),
            model: "openai/gpt-oss-20b".to_string(),
            max_tokens: 4096,
            temperature: 0.7,
            timeout: Duration::from_secs(60),
        }
    }
}

impl LlmConfig {
    /// Set the API base URL.
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Set the model identifier.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the maximum tokens per request.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the temperature for generation (0.0 - 1.0).
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Registry mapping model identifiers to their connection settings.
///
/// Lookup of an unregistered identifier is a fatal [`ConfigError`]; callers
/// resolve their generation and execution models through the registry before
/// any pipeline work begins.
///
/// # Example
///
/// ```
/// use masgen_core::ModelRegistry;
///
/// let registry = ModelRegistry::with_defaults("https://openrouter.ai/api/v1");
/// assert!(registry.get("openai/gpt-oss-20b").is_ok());
/// assert!(registry.get("no-such-model").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    models: HashMap<String, LlmConfig>,
}

impl ModelRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-populated with the stock model set, all served
    /// from the given API base.
    pub fn with_defaults(api_base: impl Into<String>) -> Self {
        let api_base = api_base.into();
        let mut registry = Self::new();
        for model in [
            "openai/gpt-oss-20b",
            "openai/gpt-oss-120b",
            "openai/gpt-4o-mini",
            "deepseek/deepseek-chat",
        ] {
            registry.register(
                model,
                LlmConfig::default()
                    .with_api_base(api_base.clone())
                    .with_model(model),
            );
        }
        registry
    }

    /// Register a model identifier with its settings.
    pub fn register(&mut self, id: impl Into<String>, config: LlmConfig) {
        self.models.insert(id.into(), config);
    }

    /// Look up a model identifier.
    ///
    /// Returns [`ConfigError::UnknownModel`] if the identifier was never
    /// registered.
    pub fn get(&self, id: &str) -> Result<&LlmConfig, ConfigError> {
        self.models
            .get(id)
            .ok_or_else(|| ConfigError::UnknownModel(id.to_string()))
    }

    /// Check whether an identifier is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.models.contains_key(id)
    }

    /// Registered model identifiers (sorted).
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.models.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}
