//! Image loading and normalization.

use crate::{common::*, config::PreprocessConfig};
use image::DynamicImage;

/// Pixel normalization and resizing for model input images.
///
/// The preprocessor scales pixels to `[0, 1]`, applies per-channel mean/std
/// normalization, and resizes to a fixed square resolution with bilinear
/// interpolation without corner alignment. Aspect ratio is not preserved;
/// distortion is accepted.
#[derive(Debug, Clone)]
pub struct ImagePreprocessor {
    image_size: i64,
    image_mean: [f64; 3],
    image_std: [f64; 3],
    do_center_crop: bool,
    device: Device,
}

impl ImagePreprocessor {
    pub fn new(config: &PreprocessConfig) -> Self {
        let PreprocessConfig {
            image_size,
            image_mean,
            image_std,
            do_center_crop,
            device,
        } = *config;

        Self {
            image_size: image_size.get() as i64,
            image_mean: image_mean.map(R64::raw),
            image_std: image_std.map(R64::raw),
            do_center_crop,
            device,
        }
    }

    pub fn image_size(&self) -> i64 {
        self.image_size
    }

    /// Opens an image file and preprocesses it to a `[3, size, size]` tensor.
    pub fn open<P>(&self, path: P) -> Result<Tensor>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let image = image::open(path)
            .with_context(|| format!("failed to open image file '{}'", path.display()))?;
        self.preprocess(&image)
    }

    /// Preprocesses a decoded image to a `[3, size, size]` float tensor.
    pub fn preprocess(&self, image: &DynamicImage) -> Result<Tensor> {
        let mut buffer = image.to_rgb8();

        if self.do_center_crop {
            let (width, height) = buffer.dimensions();
            let side = width.min(height);
            let left = (width - side) / 2;
            let top = (height - side) / 2;
            buffer = image::imageops::crop_imm(&buffer, left, top, side, side).to_image();
        }

        let (width, height) = buffer.dimensions();
        ensure!(width > 0 && height > 0, "image has empty dimensions");

        // HWC u8 buffer to CHW float tensor in [0, 1]
        let tensor = Tensor::of_slice(buffer.as_raw())
            .view([height as i64, width as i64, 3])
            .permute(&[2, 0, 1])
            .to_kind(Kind::Float)
            .to_device(self.device)
            / 255.0;

        let mean = Tensor::of_slice(&self.image_mean)
            .view([3, 1, 1])
            .to_kind(Kind::Float)
            .to_device(self.device);
        let std = Tensor::of_slice(&self.image_std)
            .view([3, 1, 1])
            .to_kind(Kind::Float)
            .to_device(self.device);
        let tensor = (tensor - mean) / std;

        let resized = tensor
            .unsqueeze(0)
            .upsample_bilinear2d(&[self.image_size, self.image_size], false, None, None)
            .i(0);

        Ok(resized)
    }
}

impl Default for ImagePreprocessor {
    fn default() -> Self {
        Self::new(&PreprocessConfig::default())
    }
}
