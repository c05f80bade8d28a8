use async_trait::async_trait;

use crate::{Commentary, CommentaryError, CommentaryPrompt, CommentaryProvider};

const MODEL: &str = "canned";

/// Offline provider that echoes the prompt topic back as commentary.
///
/// Output depends only on the prompt, so repeated renders match exactly.
#[derive(Debug, Clone, Copy, Default)]
pub struct CannedCommentary;

#[async_trait]
impl CommentaryProvider for CannedCommentary {
    fn model(&self) -> &str {
        MODEL
    }

    async fn complete(&self, prompt: &CommentaryPrompt) -> Result<Commentary, CommentaryError> {
        let topic = prompt.headline().trim();
        if topic.is_empty() {
            return Err(CommentaryError::InvalidRequest("prompt is empty".to_owned()));
        }
        let facts = prompt.user.lines().skip(1).filter(|line| line.contains(':')).count();
        Ok(Commentary {
            model: MODEL.to_owned(),
            text: format!(
                "Offline commentary. {topic} Based on {facts} data points; configure an API key for a live interpretation."
            ),
        })
    }
}
