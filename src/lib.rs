//! Inference-time adapter for region-grounded visual dialogue models.
//!
//! The crate assembles model inputs from an image, a pixel bounding box and a
//! text prompt, then drives autoregressive generation with a keyword-based
//! early stop. The pretrained model itself is a collaborator behind the
//! [`RoiModel`](model::RoiModel) trait; tokenization is delegated to the
//! `tokenizers` crate.

mod common;

pub mod bbox;
pub mod config;
pub mod conversation;
pub mod eval;
pub mod generate;
pub mod inputs;
pub mod model;
pub mod preprocess;
pub mod stop;

#[cfg(test)]
pub(crate) mod testing;

pub use bbox::PixelBox;
pub use config::Config;
pub use conversation::{Conversation, ExampleBuilder, SeparatorExampleBuilder, Speaker, Turn};
pub use eval::{eval_model, eval_model_with_ids};
pub use generate::GenerateInit;
pub use inputs::{init_inputs, ImageMeta, InitInputs};
pub use model::{RoiModel, VisualInputs};
pub use preprocess::ImagePreprocessor;
pub use stop::{KeywordsStoppingCriteria, StoppingCriteria};
