//! Assembly of per-call model inputs.

use crate::{
    common::*,
    bbox::PixelBox,
    conversation::{Conversation, ExampleBuilder, TokenizedExample, Turn},
    preprocess::ImagePreprocessor,
};
use tokenizers::Tokenizer;

/// Bookkeeping metadata of the source image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageMeta {
    pub filename: PathBuf,
}

/// The assembled inputs of one inference call.
#[derive(Debug)]
pub struct InitInputs {
    /// `[T]` token ids of the tokenized prompt.
    pub input_ids: Tensor,
    /// `[T]` label ids; fully masked at inference, kept to mirror the shared
    /// preprocessing interface.
    pub labels: Tensor,
    /// A copy of the conversation record the ids were produced from.
    pub sources: Vec<Conversation>,
    /// The original prompt text.
    pub init_question: String,
    /// `[3, size, size]` preprocessed image tensor.
    pub image: Tensor,
    /// `[4]` bounding box tensor.
    pub bboxes: Tensor,
    pub img_metas: ImageMeta,
}

/// Builds model inputs from an image file, a bounding box and a text prompt.
///
/// The prompt is wrapped as a one-turn human conversation and tokenized
/// through the shared conversation convention; the image always comes out at
/// the preprocessor's fixed square resolution regardless of its aspect ratio.
pub fn init_inputs<P>(
    img_path: P,
    bbox: &PixelBox,
    preprocessor: &ImagePreprocessor,
    tokenizer: &Tokenizer,
    builder: &dyn ExampleBuilder,
    text: &str,
) -> Result<InitInputs>
where
    P: AsRef<Path>,
{
    let img_path = img_path.as_ref();
    let image = preprocessor.open(img_path)?;
    let bboxes = bbox.to_tensor();

    let sources: Vec<Conversation> = vec![vec![Turn::human(text)]];
    let mut examples = builder.build(&sources, tokenizer)?;
    ensure!(
        !examples.is_empty(),
        "example builder returned no tokenized example"
    );
    let TokenizedExample { input_ids, labels } = examples.swap_remove(0);

    Ok(InitInputs {
        input_ids,
        labels,
        sources,
        init_question: text.to_owned(),
        image,
        bboxes,
        img_metas: ImageMeta {
            filename: img_path.to_owned(),
        },
    })
}
