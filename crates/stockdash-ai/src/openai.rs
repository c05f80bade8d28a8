use async_openai::config::OpenAIConfig;
use async_openai::error::OpenAIError;
use async_openai::types::{
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use async_trait::async_trait;
use stockdash_core::AiConfig;

use crate::{Commentary, CommentaryError, CommentaryPrompt, CommentaryProvider};

/// Commentary backed by an OpenAI-compatible chat-completion endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiCommentary {
    client: Client<OpenAIConfig>,
    model: String,
    max_tokens: u16,
    temperature: f32,
}

impl OpenAiCommentary {
    pub fn new(api_key: impl Into<String>, config: &AiConfig) -> Self {
        let mut openai = OpenAIConfig::new().with_api_key(api_key.into());
        if let Some(base) = &config.api_base {
            openai = openai.with_api_base(base.clone());
        }
        Self {
            client: Client::with_config(openai),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }

    /// Builds a provider with the key read from `config.api_key_env`.
    pub fn from_config(config: &AiConfig) -> Result<Self, CommentaryError> {
        let key = config
            .api_key()
            .ok_or_else(|| CommentaryError::MissingApiKey {
                env: config.api_key_env.clone(),
            })?;
        Ok(Self::new(key, config))
    }
}

#[async_trait]
impl CommentaryProvider for OpenAiCommentary {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &CommentaryPrompt) -> Result<Commentary, CommentaryError> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(self.model.as_str())
            .max_tokens(self.max_tokens)
            .temperature(self.temperature)
            .messages([
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(prompt.system.as_str())
                    .build()
                    .map_err(invalid_request)?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(prompt.user.as_str())
                    .build()
                    .map_err(invalid_request)?
                    .into(),
            ])
            .build()
            .map_err(invalid_request)?;

        tracing::debug!(model = %self.model, topic = prompt.headline(), "requesting commentary");
        let response = self.client.chat().create(request).await.map_err(|error| {
            tracing::debug!(model = %self.model, %error, "commentary request failed");
            CommentaryError::Upstream(error.to_string())
        })?;

        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|text| text.trim().to_owned())
            .filter(|text| !text.is_empty())
            .ok_or(CommentaryError::EmptyResponse)?;

        Ok(Commentary {
            model: response.model,
            text,
        })
    }
}

fn invalid_request(error: OpenAIError) -> CommentaryError {
    CommentaryError::InvalidRequest(error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_names_the_variable() {
        let config = AiConfig {
            api_key_env: "STOCKDASH_TEST_KEY_THAT_IS_NEVER_SET".to_owned(),
            ..AiConfig::default()
        };
        let err = OpenAiCommentary::from_config(&config).expect_err("must fail");
        assert_eq!(
            err,
            CommentaryError::MissingApiKey {
                env: "STOCKDASH_TEST_KEY_THAT_IS_NEVER_SET".to_owned()
            }
        );
    }

    #[test]
    fn explicit_key_uses_configured_model() {
        let config = AiConfig {
            model: "gpt-4o".to_owned(),
            api_base: Some("http://127.0.0.1:9/v1".to_owned()),
            ..AiConfig::default()
        };
        let provider = OpenAiCommentary::new("sk-test", &config);
        assert_eq!(provider.model(), "gpt-4o");
    }
}
