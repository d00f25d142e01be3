//! The seam to the pretrained multimodal model.

use crate::{common::*, inputs::ImageMeta};

/// Visual inputs pinned onto the model for one generation call.
#[derive(Debug)]
pub struct VisualInputs {
    pub img_metas: Option<ImageMeta>,
    /// `[1, 3, size, size]` image tensor.
    pub images: Tensor,
    /// `[4]` bounding box tensor in (x1, y1, x2, y2) pixel coordinates.
    pub bboxes: Tensor,
}

/// A pretrained region-conditioned causal generation model.
///
/// `forward` only receives the running token sequence; the visual inputs are
/// pinned up front with [`pin_visual_inputs`](Self::pin_visual_inputs) and
/// apply to every subsequent `forward` call until pinned again. The drivers in
/// [`eval`](crate::eval) leave the pinned inputs installed after they return,
/// matching the original design.
pub trait RoiModel {
    /// The device the model lives on; drivers move all tensors there.
    fn device(&self) -> Device;

    /// Computes next-token logits of shape `[batch, seq, vocab]` for the
    /// `[batch, seq]` token ids.
    fn forward(&self, input_ids: &Tensor) -> Result<Tensor>;

    /// Pins the visual inputs consumed by subsequent `forward` calls.
    fn pin_visual_inputs(&mut self, visual: VisualInputs);
}
