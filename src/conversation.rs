//! Conversation records and their tokenized form.

use crate::common::*;
use tokenizers::Tokenizer;

/// Label value for positions excluded from the loss.
pub const IGNORE_INDEX: i64 = -100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Speaker {
    #[serde(rename = "human")]
    Human,
    #[serde(rename = "gpt")]
    Assistant,
}

/// A single turn of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub from: Speaker,
    pub value: String,
}

impl Turn {
    pub fn human(value: impl Into<String>) -> Self {
        Self {
            from: Speaker::Human,
            value: value.into(),
        }
    }
}

pub type Conversation = Vec<Turn>;

/// Token ids and per-token labels of one tokenized conversation.
///
/// Both tensors are rank-1 `i64` tensors of the same length. Labels are only
/// meaningful at training time; at inference they mirror the shared
/// preprocessing interface and stay fully masked.
#[derive(Debug)]
pub struct TokenizedExample {
    pub input_ids: Tensor,
    pub labels: Tensor,
}

/// The conversation-to-token-ids convention shared with training-time
/// preprocessing.
pub trait ExampleBuilder {
    fn build(
        &self,
        sources: &[Conversation],
        tokenizer: &Tokenizer,
    ) -> Result<Vec<TokenizedExample>>;
}

/// Renders conversations with a system header and `"###"`-separated speaker
/// turns, the same convention the stopping keyword relies on.
#[derive(Debug, Clone)]
pub struct SeparatorExampleBuilder {
    system: String,
    separator: String,
}

impl SeparatorExampleBuilder {
    pub fn new(system: impl Into<String>, separator: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            separator: separator.into(),
        }
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// The rendered prompt text for one conversation.
    pub fn render(&self, conversation: &Conversation) -> String {
        self.segments(conversation)
            .into_iter()
            .map(|(text, _)| text)
            .join("")
    }

    /// Prompt segments paired with whether the segment belongs to the
    /// assistant (and thus contributes labels).
    fn segments(&self, conversation: &Conversation) -> Vec<(String, bool)> {
        let mut segments = vec![(format!("{}{}", self.system, self.separator), false)];
        segments.extend(conversation.iter().map(|turn| {
            let role = match turn.from {
                Speaker::Human => "Human",
                Speaker::Assistant => "Assistant",
            };
            let text = format!(" {}: {}{}", role, turn.value, self.separator);
            (text, turn.from == Speaker::Assistant)
        }));
        segments
    }

    fn build_one(
        &self,
        conversation: &Conversation,
        tokenizer: &Tokenizer,
    ) -> Result<TokenizedExample> {
        ensure!(
            !conversation.is_empty(),
            "conversation must have at least one turn"
        );

        let mut input_ids: Vec<i64> = vec![];
        let mut labels: Vec<i64> = vec![];

        for (text, is_assistant) in self.segments(conversation) {
            let encoding = tokenizer
                .encode(text.as_str(), false)
                .map_err(|err| format_err!("failed to tokenize conversation: {}", err))?;
            let ids = encoding.get_ids().iter().map(|&id| id as i64);

            if is_assistant {
                labels.extend(ids.clone());
            } else {
                labels.extend(ids.clone().map(|_| IGNORE_INDEX));
            }
            input_ids.extend(ids);
        }

        Ok(TokenizedExample {
            input_ids: Tensor::of_slice(&input_ids),
            labels: Tensor::of_slice(&labels),
        })
    }
}

impl Default for SeparatorExampleBuilder {
    fn default() -> Self {
        Self::new(
            "A chat between a curious human and an artificial intelligence assistant. \
             The assistant gives helpful, detailed, and polite answers to the human's questions.",
            "###",
        )
    }
}

impl ExampleBuilder for SeparatorExampleBuilder {
    fn build(
        &self,
        sources: &[Conversation],
        tokenizer: &Tokenizer,
    ) -> Result<Vec<TokenizedExample>> {
        sources
            .iter()
            .map(|conversation| self.build_one(conversation, tokenizer))
            .collect()
    }
}
