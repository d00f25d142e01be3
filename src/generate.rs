//! Autoregressive decoding over the model seam.

use crate::{common::*, model::RoiModel, stop::StoppingCriteria};

/// Generation settings.
///
/// The defaults are the inference settings of the evaluation drivers:
/// sampling enabled at temperature 0.2 with a budget of 1024 new tokens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerateInit {
    pub do_sample: bool,
    pub temperature: R64,
    pub max_new_tokens: usize,
}

impl Default for GenerateInit {
    fn default() -> Self {
        Self {
            do_sample: true,
            temperature: r64(0.2),
            max_new_tokens: 1024,
        }
    }
}

impl GenerateInit {
    /// Extends `input_ids` (`[batch, seq]`, i64) one token at a time until the
    /// stopping rule fires or the token budget is exhausted, and returns the
    /// full prompt-plus-continuation sequence.
    ///
    /// The stopping rule is consulted after every appended token.
    pub fn generate<M>(
        &self,
        model: &M,
        input_ids: &Tensor,
        mut stopping: Option<&mut dyn StoppingCriteria>,
    ) -> Result<Tensor>
    where
        M: RoiModel + ?Sized,
    {
        let Self {
            do_sample,
            temperature,
            max_new_tokens,
        } = *self;
        ensure!(
            !do_sample || temperature.raw() > 0.0,
            "sampling temperature must be positive"
        );

        let mut output_ids = input_ids.shallow_clone();

        for _ in 0..max_new_tokens {
            let logits = model.forward(&output_ids)?;
            let (_batch, seq_len, _vocab) = logits.size3()?;
            let step_logits = logits.select(1, seq_len - 1);

            let next_ids = if do_sample {
                (step_logits / temperature.raw())
                    .softmax(-1, Kind::Float)
                    .multinomial(1, false)
            } else {
                step_logits.argmax(-1, true)
            };

            output_ids = Tensor::cat(&[&output_ids, &next_ids], 1);

            if let Some(stopping) = stopping.as_deref_mut() {
                if stopping.should_stop(&output_ids)? {
                    return Ok(output_ids);
                }
            }
        }

        if stopping.is_some() {
            warn!(
                "generation hit the {} new-token budget without a stop signal",
                max_new_tokens
            );
        }

        Ok(output_ids)
    }
}
