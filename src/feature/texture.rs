use clap::ValueEnum;
use opencv::core::{CV_32F, Mat};
use opencv::imgproc;
use opencv::prelude::*;

use super::{
    ColorTextureDescriptor, Descriptor, FeatureExtractor, HsvHistogram, ensure_size, normalize_l1,
    to_gray,
};
use crate::error::Result;

const DERIVATIVE: [i16; 3] = [-1, 0, 1];
const SMOOTHING: [i16; 3] = [1, 2, 1];

/// 梯度幅值直方图的 bin 数量，范围为 [0, 256)
pub const TEXTURE_BINS: usize = 256;

/// Sobel 算子的实现方式
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SobelKind {
    /// OpenCV 内置的 Sobel
    #[default]
    Builtin,
    /// 可分离卷积核，分两次计算
    Separable,
}

/// 有符号的逐通道梯度
#[derive(Debug, Clone)]
pub struct Gradient {
    pub rows: usize,
    pub cols: usize,
    pub channels: usize,
    pub data: Vec<i16>,
}

#[derive(Debug, Clone, Copy)]
enum Axis {
    X,
    Y,
}

/// 水平方向的 3x3 Sobel 梯度
pub fn sobel_x3x3(src: &Mat) -> Result<Gradient> {
    separable_sobel(src, Axis::X)
}

/// 垂直方向的 3x3 Sobel 梯度
pub fn sobel_y3x3(src: &Mat) -> Result<Gradient> {
    separable_sobel(src, Axis::Y)
}

/// 第一遍沿梯度方向使用 [-1, 0, 1]，第二遍沿另一方向使用 [1, 2, 1]
///
/// 两遍都只处理卷积核完全落在图片内的像素，边缘保持为 0
fn separable_sobel(src: &Mat, axis: Axis) -> Result<Gradient> {
    let (rows, cols, channels) = (src.rows() as usize, src.cols() as usize, src.channels() as usize);
    let data = src.data_bytes()?;
    let at = |y: usize, x: usize, c: usize| (y * cols + x) * channels + c;

    let mut tmp = vec![0i16; rows * cols * channels];
    let mut dst = vec![0i16; rows * cols * channels];

    let (first, second) = match axis {
        Axis::X => ((0, 1), (1, 0)),
        Axis::Y => ((1, 0), (0, 1)),
    };

    let (dy, dx) = first;
    for y in dy..rows.saturating_sub(dy) {
        for x in dx..cols.saturating_sub(dx) {
            for c in 0..channels {
                tmp[at(y, x, c)] = (0..3)
                    .map(|k| data[at(y + k * dy - dy, x + k * dx - dx, c)] as i16 * DERIVATIVE[k])
                    .sum();
            }
        }
    }

    let (dy, dx) = second;
    for y in dy..rows.saturating_sub(dy) {
        for x in dx..cols.saturating_sub(dx) {
            for c in 0..channels {
                dst[at(y, x, c)] =
                    (0..3).map(|k| tmp[at(y + k * dy - dy, x + k * dx - dx, c)] * SMOOTHING[k]).sum();
            }
        }
    }

    Ok(Gradient { rows, cols, channels, data: dst })
}

/// 灰度图的 Sobel 梯度幅值直方图，归一化为和为 1
///
/// 幅值大于等于 256 的像素不计入
#[derive(Debug, Clone, Copy, Default)]
pub struct TextureHistogram {
    sobel: SobelKind,
}

impl TextureHistogram {
    pub fn new(sobel: SobelKind) -> Self {
        Self { sobel }
    }

    fn magnitude(&self, gray: &Mat) -> Result<Vec<f32>> {
        match self.sobel {
            SobelKind::Builtin => {
                let mut gx = Mat::default();
                let mut gy = Mat::default();
                imgproc::sobel_def(gray, &mut gx, CV_32F, 1, 0)?;
                imgproc::sobel_def(gray, &mut gy, CV_32F, 0, 1)?;
                let (gx, gy) = (gx.data_typed::<f32>()?, gy.data_typed::<f32>()?);
                Ok(gx.iter().zip(gy).map(|(x, y)| (x * x + y * y).sqrt()).collect())
            }
            SobelKind::Separable => {
                let gx = sobel_x3x3(gray)?;
                let gy = sobel_y3x3(gray)?;
                Ok(gx
                    .data
                    .iter()
                    .zip(&gy.data)
                    .map(|(&x, &y)| {
                        let (x, y) = (x as f32, y as f32);
                        (x * x + y * y).sqrt()
                    })
                    .collect())
            }
        }
    }
}

impl FeatureExtractor for TextureHistogram {
    type Descriptor = Descriptor;

    fn extract(&self, image: &Mat) -> Result<Descriptor> {
        ensure_size(image, 1, 1)?;
        let gray = to_gray(image)?;

        let mut hist = vec![0f32; TEXTURE_BINS];
        for m in self.magnitude(&gray)? {
            if m < TEXTURE_BINS as f32 {
                hist[m as usize] += 1.;
            }
        }

        normalize_l1(&mut hist);
        Ok(hist)
    }
}

/// 同时提取颜色直方图和纹理直方图
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorTextureExtractor {
    color: HsvHistogram,
    texture: TextureHistogram,
}

impl ColorTextureExtractor {
    pub fn new(color: HsvHistogram, texture: TextureHistogram) -> Self {
        Self { color, texture }
    }
}

impl FeatureExtractor for ColorTextureExtractor {
    type Descriptor = ColorTextureDescriptor;

    fn extract(&self, image: &Mat) -> Result<ColorTextureDescriptor> {
        Ok(ColorTextureDescriptor {
            color: self.color.extract(image)?,
            texture: self.texture.extract(image)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;

    #[test]
    fn test_flat_image_has_no_texture() {
        let image = solid(8, 8, [90, 90, 90]);
        for kind in [SobelKind::Builtin, SobelKind::Separable] {
            let hist = TextureHistogram::new(kind).extract(&image).unwrap();
            assert_eq!(hist.len(), TEXTURE_BINS);
            assert_eq!(hist[0], 1.0);
        }
    }

    #[test]
    fn test_texture_sum() {
        let image = from_fn(16, 16, |r, c| [(r * 3) as u8, (c * 5) as u8, ((r + c) * 2) as u8]);
        for kind in [SobelKind::Builtin, SobelKind::Separable] {
            let hist = TextureHistogram::new(kind).extract(&image).unwrap();
            assert!((sum(&hist) - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_separable_matches_kernel() {
        // 水平方向每列递增 2，内部像素的 x 梯度为 (2 * 2) * (1 + 2 + 1) = 16
        let image = gray_from_fn(5, 6, |_, c| (c * 2) as u8);
        let gx = sobel_x3x3(&image).unwrap();
        let gy = sobel_y3x3(&image).unwrap();
        for y in 1..4 {
            for x in 1..5 {
                assert_eq!(gx.data[y * 6 + x], 16);
                assert_eq!(gy.data[y * 6 + x], 0);
            }
        }
        // 边缘保持为 0
        assert_eq!(gx.data[0], 0);
        assert_eq!(gx.data[5], 0);
    }

    #[test]
    fn test_separable_sign_and_channels() {
        // 亮度自上而下递减，y 梯度为负
        let image = from_fn(4, 4, |r, _| [(200 - r * 10) as u8, 0, (r * 10) as u8]);
        let gy = sobel_y3x3(&image).unwrap();
        assert_eq!(gy.channels, 3);
        let at = |y: usize, x: usize, c: usize| gy.data[(y * 4 + x) * 3 + c];
        assert_eq!(at(1, 1, 0), -80);
        assert_eq!(at(1, 1, 1), 0);
        assert_eq!(at(1, 1, 2), 80);
    }

    #[test]
    fn test_separable_agrees_with_builtin() {
        let image = gray_from_fn(12, 12, |r, c| ((r * r + 3 * c) % 200) as u8);
        let builtin = TextureHistogram::new(SobelKind::Builtin).magnitude(&image).unwrap();
        let separable = TextureHistogram::new(SobelKind::Separable).magnitude(&image).unwrap();
        for y in 1..11 {
            for x in 1..11 {
                let i = y * 12 + x;
                assert!((builtin[i] - separable[i]).abs() < 1e-3);
            }
        }
    }

    #[test]
    fn test_color_texture() {
        let image = solid(8, 8, [0, 0, 255]);
        let descriptor = ColorTextureExtractor::default().extract(&image).unwrap();
        assert_eq!(descriptor.color.len(), 30 * 32 * 32);
        assert_eq!(descriptor.texture.len(), TEXTURE_BINS);
    }
}
