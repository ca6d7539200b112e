use std::time::Duration;

/// Default image model.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";

/// Default service base URL.
pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com";

/// Default transport timeout for a single generation call.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Generation client configuration loaded from environment variables.
#[derive(Clone)]
pub struct GenAiConfig {
    /// API key; `None` when unset or blank. Its absence only surfaces when
    /// an operation is attempted.
    pub api_key: Option<String>,
    pub model: String,
    /// Base URL without a trailing slash.
    pub api_url: String,
    pub timeout: Duration,
}

impl GenAiConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var              | Default                                     |
    /// |----------------------|---------------------------------------------|
    /// | `GEMINI_API_KEY`     | unset                                       |
    /// | `GENAI_MODEL`        | `gemini-2.5-flash-image`                    |
    /// | `GENAI_API_URL`      | `https://generativelanguage.googleapis.com` |
    /// | `GENAI_TIMEOUT_SECS` | `120`                                       |
    pub fn from_env() -> Self {
        let api_key = std::env::var("GEMINI_API_KEY").ok();

        let model = std::env::var("GENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());

        let api_url = std::env::var("GENAI_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());

        let timeout_secs: u64 = std::env::var("GENAI_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .expect("GENAI_TIMEOUT_SECS must be a valid u64");

        Self::new(api_key, model, api_url, Duration::from_secs(timeout_secs))
    }

    pub fn new(
        api_key: Option<String>,
        model: impl Into<String>,
        api_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            api_key: api_key
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty()),
            model: model.into(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for GenAiConfig {
    fn default() -> Self {
        Self::new(
            None,
            DEFAULT_MODEL,
            DEFAULT_API_URL,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }
}

// Never print the key.
impl std::fmt::Debug for GenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenAiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("api_url", &self.api_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}
