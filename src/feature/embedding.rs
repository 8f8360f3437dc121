use opencv::core::Mat;

use super::{Descriptor, FeatureExtractor, HsvHistogram};
use crate::error::Result;

/// 预先计算好的网络嵌入向量，可选地在后面拼接一个 HSV 颜色直方图
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddingFeature {
    histogram: Option<HsvHistogram>,
}

impl EmbeddingFeature {
    pub fn new(histogram: Option<HsvHistogram>) -> Self {
        Self { histogram }
    }

    /// 是否需要读取原始图片
    pub fn needs_image(&self) -> bool {
        self.histogram.is_some()
    }

    /// 组合描述符，顺序为嵌入向量在前，直方图在后
    pub fn combine(&self, embedding: &[f32], image: Option<&Mat>) -> Result<Descriptor> {
        let mut descriptor = embedding.to_vec();
        if let (Some(histogram), Some(image)) = (&self.histogram, image) {
            descriptor.extend(histogram.extract(image)?);
        }
        Ok(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;
    use crate::feature::HsvBins;

    #[test]
    fn test_embedding_passthrough() {
        let feature = EmbeddingFeature::default();
        assert!(!feature.needs_image());
        let descriptor = feature.combine(&[0.1, 0.2, 0.3], None).unwrap();
        assert_eq!(descriptor, vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_embedding_with_histogram() {
        let histogram = HsvHistogram::new(HsvBins::new(2, 2, 2), true);
        let feature = EmbeddingFeature::new(Some(histogram));
        assert!(feature.needs_image());

        let image = solid(3, 3, [0, 0, 255]);
        let descriptor = feature.combine(&[7.0, 8.0], Some(&image)).unwrap();
        assert_eq!(descriptor.len(), 2 + 8);
        assert_eq!(&descriptor[..2], &[7.0, 8.0]);
        assert_eq!(descriptor[2 + 3], 1.0);
        assert!((descriptor[2..].iter().sum::<f32>() - 1.0).abs() < 1e-4);
    }
}
