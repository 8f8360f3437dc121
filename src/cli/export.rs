use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;

use crate::catalog::{Catalog, CsvWriter, suffix_regex};
use crate::cli::SubCommandExtend;
use crate::config::{HistogramOptions, Opts};
use crate::feature::{
    ChromaHistogram, Descriptor, FeatureExtractor, HsvHistogram, PatchCenter, PatchExtractor,
    SobelKind, TextureHistogram,
};

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum ExportFeature {
    /// 中心 7x7 块
    Patch,
    /// rg 色度直方图
    Chroma,
    /// HSV 颜色直方图
    Hsv,
    /// 梯度幅值纹理直方图
    Texture,
}

#[derive(Parser, Debug, Clone)]
pub struct ExportCommand {
    /// 图片所在目录
    pub path: PathBuf,
    /// 输出的 CSV 文件
    pub csv: PathBuf,
    /// 提取的特征类型
    #[arg(short, long, value_enum, default_value_t = ExportFeature::Hsv)]
    pub feature: ExportFeature,
    /// 扫描的文件后缀名，多个后缀用逗号分隔
    #[arg(short, long, default_value = "jpg,png,ppm,tif")]
    pub suffix: String,
    #[command(flatten)]
    pub histogram: HistogramOptions,
    /// rg 色度直方图的 bin 数量
    #[arg(long, value_name = "N", default_value_t = 16, value_parser = clap::value_parser!(u32).range(1..=256))]
    pub chroma_bins: u32,
    /// 追加到已有文件末尾，而不是覆盖
    #[arg(long)]
    pub append: bool,
}

impl SubCommandExtend for ExportCommand {
    fn run(&self, _opts: &Opts) -> Result<()> {
        match self.feature {
            ExportFeature::Patch => self.export(&PatchExtractor::new(PatchCenter::Offset)),
            ExportFeature::Chroma => self.export(&ChromaHistogram::new(self.chroma_bins as usize)),
            ExportFeature::Hsv => self.export(&HsvHistogram::new(self.histogram.bins, true)),
            ExportFeature::Texture => self.export(&TextureHistogram::new(SobelKind::Builtin)),
        }
    }
}

impl ExportCommand {
    fn export<E>(&self, extractor: &E) -> Result<()>
    where
        E: FeatureExtractor<Descriptor = Descriptor>,
    {
        let catalog = Catalog::from_directory(&self.path, &suffix_regex(&self.suffix)?, extractor)
            .with_context(|| format!("无法访问图片目录: {}", self.path.display()))?
            .non_empty()?;

        let mut writer = CsvWriter::open(&self.csv, self.append)
            .with_context(|| format!("无法打开输出文件: {}", self.csv.display()))?;
        for entry in catalog.entries() {
            writer.write(&entry.id, &entry.descriptor)?;
        }
        writer.finish()?;

        info!("导出 {} 条特征到 {}", catalog.len(), self.csv.display());
        Ok(())
    }
}
