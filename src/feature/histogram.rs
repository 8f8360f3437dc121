use std::ops::Range;

use opencv::core::Mat;
use opencv::imgproc;
use opencv::prelude::*;

use super::{
    Descriptor, FeatureExtractor, RegionalDescriptor, ensure_size, normalize_l1, to_bgr,
};
use crate::error::Result;

/// HSV 三个通道的 bin 数量
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HsvBins {
    pub h: usize,
    pub s: usize,
    pub v: usize,
}

impl HsvBins {
    pub fn new(h: usize, s: usize, v: usize) -> Self {
        Self { h, s, v }
    }

    pub fn len(&self) -> usize {
        self.h * self.s * self.v
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for HsvBins {
    fn default() -> Self {
        Self::new(30, 32, 32)
    }
}

/// 3D HSV 颜色直方图，按 (h, s, v) 的嵌套顺序展开
///
/// H 的范围为 [0, 180)，S 和 V 的范围为 [0, 256)。
/// 不归一化时保存原始计数，这种情况下只应比较尺寸相同的图片。
#[derive(Debug, Clone, Copy)]
pub struct HsvHistogram {
    bins: HsvBins,
    normalize: bool,
}

impl HsvHistogram {
    pub fn new(bins: HsvBins, normalize: bool) -> Self {
        Self { bins, normalize }
    }

    pub fn bins(&self) -> HsvBins {
        self.bins
    }

    /// 统计 HSV 图片中指定行范围内的像素
    fn histogram(&self, hsv: &Mat, rows: Range<i32>) -> Result<Descriptor> {
        let HsvBins { h: hb, s: sb, v: vb } = self.bins;
        let mut hist = vec![0f32; self.bins.len()];

        let width = hsv.cols() as usize * 3;
        let data = hsv.data_bytes()?;
        let data = &data[rows.start as usize * width..rows.end as usize * width];
        for pixel in data.chunks_exact(3) {
            let hi = (pixel[0] as usize * hb / 180).min(hb - 1);
            let si = pixel[1] as usize * sb / 256;
            let vi = pixel[2] as usize * vb / 256;
            hist[(hi * sb + si) * vb + vi] += 1.;
        }

        if self.normalize {
            normalize_l1(&mut hist);
        }
        Ok(hist)
    }
}

impl Default for HsvHistogram {
    fn default() -> Self {
        Self::new(HsvBins::default(), true)
    }
}

impl FeatureExtractor for HsvHistogram {
    type Descriptor = Descriptor;

    fn extract(&self, image: &Mat) -> Result<Descriptor> {
        ensure_size(image, 1, 1)?;
        let hsv = to_hsv(image)?;
        self.histogram(&hsv, 0..hsv.rows())
    }
}

/// 上 2/3 与下 2/3 两个重叠区域各自的 HSV 直方图
#[derive(Debug, Clone, Copy)]
pub struct RegionalHistogram {
    hist: HsvHistogram,
}

impl RegionalHistogram {
    pub fn new(bins: HsvBins) -> Self {
        Self { hist: HsvHistogram::new(bins, true) }
    }
}

impl FeatureExtractor for RegionalHistogram {
    type Descriptor = RegionalDescriptor;

    fn extract(&self, image: &Mat) -> Result<RegionalDescriptor> {
        // 区域高度为 rows * 2 / 3，至少需要 2 行
        ensure_size(image, 2, 1)?;
        let hsv = to_hsv(image)?;
        let height = hsv.rows() * 2 / 3;
        let offset = hsv.rows() / 3;
        Ok(RegionalDescriptor {
            upper: self.hist.histogram(&hsv, 0..height)?,
            lower: self.hist.histogram(&hsv, offset..offset + height)?,
        })
    }
}

/// rg 色度的 2D 直方图，归一化为和为 1
#[derive(Debug, Clone, Copy)]
pub struct ChromaHistogram {
    bins: usize,
}

impl ChromaHistogram {
    const EPSILON: f32 = 1e-6;

    pub fn new(bins: usize) -> Self {
        Self { bins }
    }
}

impl Default for ChromaHistogram {
    fn default() -> Self {
        Self::new(16)
    }
}

impl FeatureExtractor for ChromaHistogram {
    type Descriptor = Descriptor;

    fn extract(&self, image: &Mat) -> Result<Descriptor> {
        ensure_size(image, 1, 1)?;
        let bgr = to_bgr(image)?;
        let bins = self.bins;
        let mut hist = vec![0f32; bins * bins];

        for pixel in bgr.data_bytes()?.chunks_exact(3) {
            let (b, g, r) = (pixel[0] as f32, pixel[1] as f32, pixel[2] as f32);
            let sum = r + g + b + Self::EPSILON;
            // 纯色像素的比值在 f32 下会舍入为 1.0，归入最后一个 bin
            let ri = ((r / sum * bins as f32) as usize).min(bins - 1);
            let gi = ((g / sum * bins as f32) as usize).min(bins - 1);
            hist[ri * bins + gi] += 1.;
        }

        normalize_l1(&mut hist);
        Ok(hist)
    }
}

fn to_hsv(image: &Mat) -> Result<Mat> {
    let bgr = to_bgr(image)?;
    let mut hsv = Mat::default();
    imgproc::cvt_color_def(&bgr, &mut hsv, imgproc::COLOR_BGR2HSV)?;
    Ok(hsv)
}
