use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure taxonomy for weather tool invocations.
///
/// None of these are ever retried: an invalid query is the caller's fault,
/// and upstream/network failures surface immediately to the invocation that
/// triggered them.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed, ambiguous, or missing caller input.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// OpenWeatherMap answered with an error body; `code` and `message` are
    /// the provider's own fields.
    #[error("OpenWeatherMap API error ({code}): {message}")]
    UpstreamApi { code: String, message: String },

    /// Transport-level failure: DNS, connect, timeout, or an unreadable body.
    #[error("network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_provider_code() {
        let err = Error::UpstreamApi {
            code: "401".to_string(),
            message: "Invalid API key".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "OpenWeatherMap API error (401): Invalid API key"
        );
    }

    #[test]
    fn display_invalid_query() {
        let err = Error::InvalidQuery("no location given".to_string());
        assert!(err.to_string().contains("no location given"));
    }
}
