//! Shared test fixtures: a tiny word-level tokenizer and a scripted model.

use crate::{
    common::*,
    model::{RoiModel, VisualInputs},
};
use image::{Rgb, RgbImage};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use tokenizers::{
    models::wordlevel::WordLevel, pre_tokenizers::whitespace::Whitespace, AddedToken, Tokenizer,
};

static TOKENIZER: Lazy<Tokenizer> = Lazy::new(|| {
    let vocab: HashMap<String, u32> = [
        "[UNK]", "</s>", "a", "cat", "sitting", "the", "Describe", "region", "###", "on", ".",
        ":", "Human", "Assistant",
    ]
    .iter()
    .enumerate()
    .map(|(id, token)| (token.to_string(), id as u32))
    .collect();

    let model = WordLevel::builder()
        .vocab(vocab)
        .unk_token("[UNK]".into())
        .build()
        .expect("word-level model");
    let mut tokenizer = Tokenizer::new(model);
    tokenizer.with_pre_tokenizer(Whitespace::default());
    tokenizer.add_special_tokens(&[AddedToken::from("</s>", true)]);
    tokenizer
});

pub fn word_level_tokenizer() -> Tokenizer {
    TOKENIZER.clone()
}

/// The id of a test-vocabulary word, as an i64 token id.
pub fn tok(word: &str) -> i64 {
    TOKENIZER
        .token_to_id(word)
        .unwrap_or_else(|| panic!("'{}' is not in the test vocabulary", word)) as i64
}

pub fn save_test_image(name: &str, width: u32, height: u32, color: Rgb<u8>) -> Result<PathBuf> {
    let path = std::env::temp_dir().join(format!("roi-infer-{}", name));
    RgbImage::from_pixel(width, height, color).save(&path)?;
    Ok(path)
}

/// A mock model that deterministically emits a scripted continuation by
/// putting all probability mass on the scripted token at every step.
#[derive(Debug)]
pub struct ScriptedModel {
    prompt_len: i64,
    script: Vec<i64>,
    vocab_size: i64,
    pub visual: Option<VisualInputs>,
}

impl ScriptedModel {
    pub fn new(prompt_len: i64, script: &[&str]) -> Self {
        let script: Vec<i64> = script.iter().map(|word| tok(word)).collect();
        assert!(!script.is_empty());

        Self {
            prompt_len,
            script,
            vocab_size: TOKENIZER.get_vocab_size(true) as i64,
            visual: None,
        }
    }
}

impl RoiModel for ScriptedModel {
    fn device(&self) -> Device {
        Device::Cpu
    }

    fn forward(&self, input_ids: &Tensor) -> Result<Tensor> {
        let (batch, seq_len) = input_ids.size2()?;
        let index = (seq_len - self.prompt_len).clamp(0, self.script.len() as i64 - 1);
        let target = self.script[index as usize];

        let mut peaked = vec![0f32; self.vocab_size as usize];
        peaked[target as usize] = 1e4;
        let last = Tensor::of_slice(&peaked)
            .view([1, 1, self.vocab_size])
            .expand(&[batch, 1, self.vocab_size], false);
        let rest = Tensor::zeros(
            &[batch, seq_len - 1, self.vocab_size],
            (Kind::Float, Device::Cpu),
        );
        Ok(Tensor::cat(&[&rest, &last], 1))
    }

    fn pin_visual_inputs(&mut self, visual: VisualInputs) {
        self.visual = Some(visual);
    }
}
