use clap::ValueEnum;
use opencv::core::Mat;
use opencv::prelude::*;

use super::{Descriptor, FeatureExtractor, ensure_size, to_gray};
use crate::error::Result;

/// 中心块的边长
pub const PATCH_SIZE: i32 = 7;

/// 中心块左上角的定位方式
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PatchCenter {
    /// ((rows - 7) / 2, (cols - 7) / 2)
    #[default]
    Offset,
    /// (rows / 2 - 3, cols / 2 - 3)
    Half,
}

impl PatchCenter {
    fn origin(self, rows: i32, cols: i32) -> (i32, i32) {
        match self {
            Self::Offset => ((rows - PATCH_SIZE) / 2, (cols - PATCH_SIZE) / 2),
            Self::Half => (rows / 2 - PATCH_SIZE / 2, cols / 2 - PATCH_SIZE / 2),
        }
    }
}

/// 图片中心 7x7 灰度块，按行展开为 49 维向量
#[derive(Debug, Clone, Copy, Default)]
pub struct PatchExtractor {
    center: PatchCenter,
}

impl PatchExtractor {
    pub fn new(center: PatchCenter) -> Self {
        Self { center }
    }
}

impl FeatureExtractor for PatchExtractor {
    type Descriptor = Descriptor;

    fn extract(&self, image: &Mat) -> Result<Descriptor> {
        ensure_size(image, PATCH_SIZE, PATCH_SIZE)?;
        let gray = to_gray(image)?;
        let (row0, col0) = self.center.origin(gray.rows(), gray.cols());

        let data = gray.data_bytes()?;
        let cols = gray.cols() as usize;
        let mut descriptor = Vec::with_capacity((PATCH_SIZE * PATCH_SIZE) as usize);
        for r in row0..row0 + PATCH_SIZE {
            let start = r as usize * cols + col0 as usize;
            let row = &data[start..start + PATCH_SIZE as usize];
            descriptor.extend(row.iter().map(|&v| v as f32));
        }
        Ok(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;
    use crate::error::CbirError;

    #[test]
    fn test_patch_length_and_order() {
        let image = gray_from_fn(9, 9, |r, c| (r * 10 + c) as u8);
        let descriptor = PatchExtractor::default().extract(&image).unwrap();
        assert_eq!(descriptor.len(), 49);
        // 9x9 的图片中心块从 (1, 1) 开始
        assert_eq!(descriptor[0], 11.0);
        assert_eq!(descriptor[6], 17.0);
        assert_eq!(descriptor[7], 21.0);
        assert_eq!(descriptor[48], 77.0);
    }

    #[test]
    fn test_patch_centering_rules() {
        // 偶数尺寸时两种规则不同
        let image = gray_from_fn(10, 10, |r, c| (r * 10 + c) as u8);
        let offset = PatchExtractor::new(PatchCenter::Offset).extract(&image).unwrap();
        let half = PatchExtractor::new(PatchCenter::Half).extract(&image).unwrap();
        assert_eq!(offset[0], 11.0);
        assert_eq!(half[0], 22.0);
    }

    #[test]
    fn test_patch_color_image() {
        let image = solid(20, 30, [50, 50, 50]);
        let descriptor = PatchExtractor::default().extract(&image).unwrap();
        assert!(descriptor.iter().all(|&v| v == 50.0));
    }

    #[test]
    fn test_patch_too_small() {
        let image = solid(6, 30, [0, 0, 0]);
        let err = PatchExtractor::default().extract(&image).unwrap_err();
        assert!(matches!(err, CbirError::ImageTooSmall { min_rows: 7, min_cols: 7, .. }));
    }
}
