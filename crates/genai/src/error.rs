/// Errors from the generation client.
///
/// Callers treat [`GenerationError::Upstream`] and
/// [`GenerationError::NoImageReturned`] the same way: the action failed and
/// there is nothing to preview.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// No API key is configured. Raised before any network call.
    #[error("GEMINI_API_KEY is not set")]
    MissingCredential,

    /// The call itself failed: network, TLS, non-2xx status, or an
    /// undecodable response body.
    #[error("Generation service error: {message}")]
    Upstream {
        /// HTTP status code, when the service answered.
        status: Option<u16>,
        message: String,
    },

    /// The service answered but supplied no inline image.
    #[error("No image generated")]
    NoImageReturned,
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        Self::Upstream {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}
