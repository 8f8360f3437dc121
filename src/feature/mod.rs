mod embedding;
mod histogram;
mod patch;
mod texture;

pub use embedding::*;
pub use histogram::*;
pub use patch::*;
pub use texture::*;

use opencv::core::Mat;
use opencv::imgproc;
use opencv::prelude::*;

use crate::error::{CbirError, Result};

/// 特征向量
pub type Descriptor = Vec<f32>;

/// 从解码后的图片中提取固定长度的描述符
pub trait FeatureExtractor {
    type Descriptor;

    fn extract(&self, image: &Mat) -> Result<Self::Descriptor>;
}

/// 图片上 2/3 与下 2/3 两个区域的直方图
#[derive(Debug, Clone, PartialEq)]
pub struct RegionalDescriptor {
    pub upper: Descriptor,
    pub lower: Descriptor,
}

/// 颜色直方图和纹理直方图
#[derive(Debug, Clone, PartialEq)]
pub struct ColorTextureDescriptor {
    pub color: Descriptor,
    pub texture: Descriptor,
}

/// 将直方图归一化为和为 1，全零直方图保持不变
pub fn normalize_l1(hist: &mut [f32]) {
    let sum: f64 = hist.iter().map(|&v| v as f64).sum();
    if sum > 0.0 {
        hist.iter_mut().for_each(|v| *v = (*v as f64 / sum) as f32);
    }
}

pub(crate) fn ensure_size(image: &Mat, min_rows: i32, min_cols: i32) -> Result<()> {
    if image.empty() {
        return Err(CbirError::EmptyImage);
    }
    if image.rows() < min_rows || image.cols() < min_cols {
        return Err(CbirError::ImageTooSmall {
            rows: image.rows(),
            cols: image.cols(),
            min_rows,
            min_cols,
        });
    }
    Ok(())
}

/// 转换为 BGR 三通道图片
pub(crate) fn to_bgr(image: &Mat) -> Result<Mat> {
    let code = match image.channels() {
        3 => return Ok(image.try_clone()?),
        1 => imgproc::COLOR_GRAY2BGR,
        4 => imgproc::COLOR_BGRA2BGR,
        n => return Err(CbirError::UnsupportedChannels(n)),
    };
    let mut output = Mat::default();
    imgproc::cvt_color_def(image, &mut output, code)?;
    Ok(output)
}

/// 转换为单通道灰度图
pub(crate) fn to_gray(image: &Mat) -> Result<Mat> {
    let code = match image.channels() {
        1 => return Ok(image.try_clone()?),
        3 => imgproc::COLOR_BGR2GRAY,
        4 => imgproc::COLOR_BGRA2GRAY,
        n => return Err(CbirError::UnsupportedChannels(n)),
    };
    let mut output = Mat::default();
    imgproc::cvt_color_def(image, &mut output, code)?;
    Ok(output)
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    #[test]
    fn test_normalize_l1() {
        let mut hist = vec![1.0, 3.0, 0.0, 4.0];
        normalize_l1(&mut hist);
        assert_eq!(hist, vec![0.125, 0.375, 0.0, 0.5]);
    }

    #[test]
    fn test_normalize_l1_zero() {
        let mut hist = vec![0.0; 4];
        normalize_l1(&mut hist);
        assert_eq!(hist, vec![0.0; 4]);
    }

    #[test]
    fn test_ensure_size() {
        let image = solid(6, 10, [0, 0, 0]);
        assert!(ensure_size(&image, 6, 10).is_ok());
        assert!(matches!(
            ensure_size(&image, 7, 7),
            Err(CbirError::ImageTooSmall { rows: 6, cols: 10, .. })
        ));
        assert!(matches!(ensure_size(&Mat::default(), 1, 1), Err(CbirError::EmptyImage)));
    }

    #[test]
    fn test_to_gray_and_back() {
        let image = solid(4, 4, [10, 10, 10]);
        let gray = to_gray(&image).unwrap();
        assert_eq!(gray.channels(), 1);
        assert!(gray.data_bytes().unwrap().iter().all(|&v| v == 10));
        let bgr = to_bgr(&gray).unwrap();
        assert_eq!(bgr.channels(), 3);
    }
}
