//! Early-stopping rules for autoregressive generation.

use crate::common::*;
use tokenizers::Tokenizer;

/// A stopping rule consulted after every generated token.
pub trait StoppingCriteria {
    /// Inspects the running `[batch, seq]` output ids and reports whether
    /// generation should halt.
    fn should_stop(&mut self, output_ids: &Tensor) -> Result<bool>;
}

/// Stops generation once a keyword appears in the decoded continuation.
///
/// The first invocation only records the prompt length as the decode offset
/// and always reports continue; every later invocation decodes the tokens
/// beyond that offset, skipping special tokens, and matches the keywords as
/// substrings. The offset is recorded once and never reset within a call.
///
/// Only the first sequence of a batched generation is inspected. This is a
/// known limitation carried over from the original design, not a general
/// batch-stop mechanism.
pub struct KeywordsStoppingCriteria<'a> {
    keywords: Vec<String>,
    tokenizer: &'a Tokenizer,
    input_ids: Tensor,
    start_len: Option<i64>,
}

impl<'a> KeywordsStoppingCriteria<'a> {
    /// `input_ids` is the `[batch, seq]` prompt the generation starts from.
    pub fn new(
        keywords: impl IntoIterator<Item = impl Into<String>>,
        tokenizer: &'a Tokenizer,
        input_ids: &Tensor,
    ) -> Self {
        let keywords: Vec<String> = keywords.into_iter().map(Into::into).collect();
        if keywords.is_empty() {
            warn!("no stop keywords configured; generation only stops at the token budget");
        }

        Self {
            keywords,
            tokenizer,
            input_ids: input_ids.shallow_clone(),
            start_len: None,
        }
    }

    /// The recorded decode offset, set on the first invocation.
    pub fn start_len(&self) -> Option<i64> {
        self.start_len
    }
}

impl StoppingCriteria for KeywordsStoppingCriteria<'_> {
    fn should_stop(&mut self, output_ids: &Tensor) -> Result<bool> {
        let start_len = match self.start_len {
            None => {
                let (_batch, seq_len) = self.input_ids.size2()?;
                self.start_len = Some(seq_len);
                return Ok(false);
            }
            Some(start_len) => start_len,
        };

        let suffix = output_ids.i((0, start_len..));
        let ids: Vec<u32> = Vec::<i64>::from(&suffix)
            .into_iter()
            .map(|id| id as u32)
            .collect();
        let text = self
            .tokenizer
            .decode(&ids, true)
            .map_err(|err| format_err!("failed to decode generated tokens: {}", err))?;

        Ok(self.keywords.iter().any(|keyword| text.contains(keyword)))
    }
}
