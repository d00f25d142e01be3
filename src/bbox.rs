//! Pixel-coordinate bounding boxes.

use crate::common::*;

/// A bounding box in pixel coordinates, stored as (x1, y1, x2, y2) where
/// (x1, y1) is the top-left corner and (x2, y2) the bottom-right corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PixelBox {
    x1: R64,
    y1: R64,
    x2: R64,
    y2: R64,
}

impl PixelBox {
    pub fn try_from_xyxy(xyxy: [f64; 4]) -> Result<Self> {
        let [x1, y1, x2, y2]: [R64; 4] = xyxy
            .iter()
            .map(|&value| {
                R64::try_new(value).ok_or_else(|| format_err!("bbox coordinate is not finite"))
            })
            .collect::<Result<Vec<_>>>()?
            .try_into()
            .unwrap();
        ensure!(x2 >= x1 && y2 >= y1, "x2 >= x1 and y2 >= y1 must hold");

        Ok(Self { x1, y1, x2, y2 })
    }

    pub fn x1(&self) -> f64 {
        self.x1.raw()
    }

    pub fn y1(&self) -> f64 {
        self.y1.raw()
    }

    pub fn x2(&self) -> f64 {
        self.x2.raw()
    }

    pub fn y2(&self) -> f64 {
        self.y2.raw()
    }

    pub fn w(&self) -> f64 {
        (self.x2 - self.x1).raw()
    }

    pub fn h(&self) -> f64 {
        (self.y2 - self.y1).raw()
    }

    pub fn xyxy(&self) -> [f64; 4] {
        [self.x1(), self.y1(), self.x2(), self.y2()]
    }

    /// Converts the box to a rank-1 float tensor holding exactly the four
    /// coordinates in (x1, y1, x2, y2) order.
    pub fn to_tensor(&self) -> Tensor {
        let components: Vec<f32> = self.xyxy().iter().map(|&value| value as f32).collect();
        Tensor::of_slice(&components)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_box_accessors() -> Result<()> {
        let bbox = PixelBox::try_from_xyxy([10.0, 10.0, 110.0, 60.0])?;
        assert_eq!(bbox.w(), 100.0);
        assert_eq!(bbox.h(), 50.0);
        assert_eq!(bbox.xyxy(), [10.0, 10.0, 110.0, 60.0]);
        Ok(())
    }

    #[test]
    fn pixel_box_rejects_flipped_corners() {
        assert!(PixelBox::try_from_xyxy([110.0, 10.0, 10.0, 60.0]).is_err());
        assert!(PixelBox::try_from_xyxy([10.0, 60.0, 110.0, 10.0]).is_err());
        assert!(PixelBox::try_from_xyxy([0.0, 0.0, f64::NAN, 1.0]).is_err());
    }

    #[test]
    fn to_tensor_preserves_components() -> Result<()> {
        let bbox = PixelBox::try_from_xyxy([10.0, 10.0, 110.0, 60.0])?;
        let tensor = bbox.to_tensor();
        assert_eq!(tensor.size(), &[4]);
        assert_eq!(tensor.kind(), Kind::Float);

        let components: Vec<f32> = Vec::from(&tensor);
        assert_eq!(components, vec![10.0, 10.0, 110.0, 60.0]);
        Ok(())
    }
}
