//! Natural-language commentary for dashboard views.
//!
//! Views hand a [`CommentaryPrompt`] to a [`CommentaryProvider`] and display
//! the returned text verbatim. Two providers ship here:
//!
//! | Provider | Backend |
//! |----------|---------|
//! | [`OpenAiCommentary`] | OpenAI-compatible chat-completion API |
//! | [`CannedCommentary`] | deterministic offline text |

mod canned;
mod openai;
pub mod prompt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use canned::CannedCommentary;
pub use openai::OpenAiCommentary;
pub use prompt::CommentaryPrompt;

/// Text returned by a commentary provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commentary {
    pub model: String,
    pub text: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommentaryError {
    #[error("commentary API key not set (expected environment variable {env})")]
    MissingApiKey { env: String },
    #[error("invalid commentary request: {0}")]
    InvalidRequest(String),
    #[error("commentary provider failed: {0}")]
    Upstream(String),
    #[error("commentary provider returned no text")]
    EmptyResponse,
}

impl CommentaryError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingApiKey { .. } => "commentary.missing_key",
            Self::InvalidRequest(_) => "commentary.invalid_request",
            Self::Upstream(_) => "commentary.upstream",
            Self::EmptyResponse => "commentary.empty",
        }
    }
}

/// Chat-completion backend used by views that offer commentary.
#[async_trait]
pub trait CommentaryProvider: Send + Sync {
    /// Model identifier shown next to the generated text.
    fn model(&self) -> &str;

    async fn complete(&self, prompt: &CommentaryPrompt) -> Result<Commentary, CommentaryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_are_namespaced() {
        let err = CommentaryError::MissingApiKey {
            env: "OPENAI_API_KEY".to_owned(),
        };
        assert_eq!(err.code(), "commentary.missing_key");
        assert!(err.to_string().contains("OPENAI_API_KEY"));
        assert_eq!(CommentaryError::EmptyResponse.code(), "commentary.empty");
    }
}
