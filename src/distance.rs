use clap::ValueEnum;

use crate::error::{CbirError, Result};
use crate::feature::{ColorTextureDescriptor, Descriptor, RegionalDescriptor};

/// 排序方向，决定分数越小还是越大越相似
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// 距离，越小越相似
    Ascending,
    /// 相似度，越大越相似
    Descending,
}

/// 向量长度不一致时的处理方式
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LengthPolicy {
    /// 长度不一致时报错
    #[default]
    Strict,
    /// 截断到较短的向量，兼容旧数据
    Truncate,
}

/// 两个描述符之间的比较方式
pub trait Metric<D> {
    /// 分数的排序方向
    fn direction(&self) -> Direction;
    /// 计算两个描述符的分数
    fn score(&self, a: &D, b: &D) -> Result<f32>;
}

fn check_len(a: &[f32], b: &[f32]) -> Result<()> {
    if a.len() != b.len() {
        return Err(CbirError::LengthMismatch { left: a.len(), right: b.len() });
    }
    Ok(())
}

/// 差的平方和，只比较两者共有的前缀
#[inline(always)]
pub fn ssd(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// 直方图交，各个 bin 上较小值之和
#[inline(always)]
pub fn intersection(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x.min(*y)).sum()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Ssd {
    policy: LengthPolicy,
}

impl Ssd {
    pub fn new(policy: LengthPolicy) -> Self {
        Self { policy }
    }
}

impl Metric<Descriptor> for Ssd {
    fn direction(&self) -> Direction {
        Direction::Ascending
    }

    fn score(&self, a: &Descriptor, b: &Descriptor) -> Result<f32> {
        if self.policy == LengthPolicy::Strict {
            check_len(a, b)?;
        }
        Ok(ssd(a, b))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Intersection;

impl Metric<Descriptor> for Intersection {
    fn direction(&self) -> Direction {
        Direction::Descending
    }

    fn score(&self, a: &Descriptor, b: &Descriptor) -> Result<f32> {
        check_len(a, b)?;
        Ok(intersection(a, b))
    }
}

/// 上下两个区域直方图交的加权和
#[derive(Debug, Clone, Copy)]
pub struct WeightedRegions {
    upper: f32,
    lower: f32,
}

impl WeightedRegions {
    pub fn new(upper: f32, lower: f32) -> Self {
        Self { upper, lower }
    }
}

impl Default for WeightedRegions {
    fn default() -> Self {
        Self::new(0.5, 0.5)
    }
}

impl Metric<RegionalDescriptor> for WeightedRegions {
    fn direction(&self) -> Direction {
        Direction::Descending
    }

    fn score(&self, a: &RegionalDescriptor, b: &RegionalDescriptor) -> Result<f32> {
        let upper = Intersection.score(&a.upper, &b.upper)?;
        let lower = Intersection.score(&a.lower, &b.lower)?;
        Ok(self.upper * upper + self.lower * lower)
    }
}

/// 颜色直方图与纹理直方图的 SSD 之和，两者权重相同
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorTextureSsd;

impl Metric<ColorTextureDescriptor> for ColorTextureSsd {
    fn direction(&self) -> Direction {
        Direction::Ascending
    }

    fn score(&self, a: &ColorTextureDescriptor, b: &ColorTextureDescriptor) -> Result<f32> {
        let ssd = Ssd::new(LengthPolicy::Strict);
        Ok(ssd.score(&a.color, &b.color)? + ssd.score(&a.texture, &b.texture)?)
    }
}
