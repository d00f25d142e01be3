//! Evaluation drivers wiring assembled inputs into the model.

use crate::{
    common::*,
    bbox::PixelBox,
    conversation::ExampleBuilder,
    generate::GenerateInit,
    inputs::{init_inputs, InitInputs},
    model::{RoiModel, VisualInputs},
    preprocess::ImagePreprocessor,
    stop::KeywordsStoppingCriteria,
};
use tokenizers::Tokenizer;

/// Keywords that terminate generation, matching the turn separator of the
/// conversation convention.
pub const STOP_KEYWORDS: &[&str] = &["###"];

/// Runs one inference call from a raw text prompt.
///
/// The prompt is tokenized through `builder`, the image and bounding box are
/// pinned onto the model in half precision, and generation runs with the
/// default settings until the `"###"` keyword appears in the decoded
/// continuation or the token budget is exhausted. The returned tensor holds
/// the raw `[1, T]` output ids, prompt included; decoding is the caller's
/// responsibility.
///
/// The pinned visual inputs stay installed on the model after this returns.
pub fn eval_model<M, P>(
    model: &mut M,
    tokenizer: &Tokenizer,
    builder: &dyn ExampleBuilder,
    preprocessor: &ImagePreprocessor,
    img_path: P,
    bbox: &PixelBox,
    text: &str,
) -> Result<Tensor>
where
    M: RoiModel,
    P: AsRef<Path>,
{
    let inputs = init_inputs(img_path, bbox, preprocessor, tokenizer, builder, text)?;
    let device = model.device();

    let InitInputs {
        input_ids,
        image,
        bboxes,
        img_metas,
        ..
    } = inputs;
    info!(
        "generating region description for '{}'",
        img_metas.filename.display()
    );

    let input_ids = input_ids.to_device(device).unsqueeze(0);
    run_generation(model, tokenizer, &input_ids, image, bboxes)
}

/// Runs one inference call from pre-tokenized `[1, L]` input ids.
///
/// Image preprocessing and bounding box conversion are identical to
/// [`eval_model`]; only the tokenization step is skipped. The stopping rule
/// records `L` as its decode offset.
pub fn eval_model_with_ids<M, P>(
    model: &mut M,
    tokenizer: &Tokenizer,
    preprocessor: &ImagePreprocessor,
    img_path: P,
    bbox: &PixelBox,
    input_ids: &Tensor,
) -> Result<Tensor>
where
    M: RoiModel,
    P: AsRef<Path>,
{
    let device = model.device();
    let image = preprocessor.open(img_path)?;
    let bboxes = bbox.to_tensor();
    let input_ids = input_ids.to_device(device);

    run_generation(model, tokenizer, &input_ids, image, bboxes)
}

fn run_generation<M>(
    model: &mut M,
    tokenizer: &Tokenizer,
    input_ids: &Tensor,
    image: Tensor,
    bboxes: Tensor,
) -> Result<Tensor>
where
    M: RoiModel,
{
    let device = model.device();
    let mut stopping = KeywordsStoppingCriteria::new(
        STOP_KEYWORDS.iter().copied(),
        tokenizer,
        input_ids,
    );

    // The pinned inputs apply to every later forward call and are not
    // uninstalled afterwards; each driver call re-pins its own.
    model.pin_visual_inputs(VisualInputs {
        img_metas: None,
        images: image.unsqueeze(0).to_kind(Kind::Half).to_device(device),
        bboxes: bboxes.to_device(device).to_kind(Kind::Half),
    });

    tch::no_grad(|| GenerateInit::default().generate(&*model, input_ids, Some(&mut stopping)))
}
