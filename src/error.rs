//! Custom error types for storyqa

use std::fmt;
use thiserror::Error;

/// Which hosted capability produced a provider error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Embedding,
    Index,
    Chat,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Provider::Embedding => "embedding",
            Provider::Index => "vector index",
            Provider::Chat => "chat completion",
        };
        f.write_str(name)
    }
}

/// Main error type for storyqa operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{provider} provider error: {message}")]
    Provider { provider: Provider, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Query must not be empty")]
    EmptyQuery,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl Error {
    pub fn provider(provider: Provider, message: impl Into<String>) -> Self {
        Error::Provider {
            provider,
            message: message.into(),
        }
    }

    /// The failing provider, if this is a provider error
    #[cfg(test)]
    pub fn provider_kind(&self) -> Option<Provider> {
        match self {
            Error::Provider { provider, .. } => Some(*provider),
            _ => None,
        }
    }
}

/// Result type alias for storyqa
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_display() {
        let err = Error::provider(Provider::Index, "status 503");
        assert_eq!(err.to_string(), "vector index provider error: status 503");
        assert_eq!(err.provider_kind(), Some(Provider::Index));
        assert_eq!(Error::EmptyQuery.provider_kind(), None);
    }
}
