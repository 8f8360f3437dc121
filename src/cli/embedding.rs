use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use super::query::present;
use crate::catalog::Catalog;
use crate::cli::SubCommandExtend;
use crate::config::{DatabaseOptions, HistogramOptions, Opts, OutputOptions, QueryOptions};
use crate::distance::{LengthPolicy, Ssd};
use crate::feature::{EmbeddingFeature, HsvHistogram};
use crate::rank::rank;
use crate::utils;

#[derive(Parser, Debug, Clone)]
pub struct EmbeddingCommand {
    #[command(flatten)]
    pub query: QueryOptions,
    #[command(flatten)]
    pub database: DatabaseOptions,
    #[command(flatten)]
    pub output: OutputOptions,
    #[command(flatten)]
    pub histogram: HistogramOptions,
    /// 保存图片嵌入向量的 CSV 文件
    #[arg(long, value_name = "FILE")]
    pub csv: PathBuf,
    /// 嵌入向量的维度，维度不符的行会被丢弃
    #[arg(long, value_name = "N", default_value_t = 512)]
    pub dim: usize,
    /// 不按维度过滤 CSV 中的行
    #[arg(long)]
    pub any_dim: bool,
    /// 在嵌入向量后拼接 HSV 颜色直方图
    #[arg(long)]
    pub with_histogram: bool,
    /// 拼接的颜色直方图不归一化
    #[arg(long, requires = "with_histogram")]
    pub raw_histogram: bool,
    /// 向量长度不一致时的处理方式
    #[arg(long, value_enum, default_value_t = LengthPolicy::Strict)]
    pub length_policy: LengthPolicy,
}

impl SubCommandExtend for EmbeddingCommand {
    fn run(&self, _opts: &Opts) -> Result<()> {
        let dim = (!self.any_dim).then_some(self.dim);
        let catalog = Catalog::from_csv(&self.csv, dim)
            .with_context(|| format!("无法读取特征文件: {}", self.csv.display()))?
            .non_empty()?;

        let histogram = self
            .with_histogram
            .then(|| HsvHistogram::new(self.histogram.bins, !self.raw_histogram));
        let feature = EmbeddingFeature::new(histogram);

        let dir = self.database.dir(&self.query.image);
        let catalog = if feature.needs_image() {
            info!("computing color histograms from {}", dir.display());
            catalog
                .filter_map(|entry| {
                    let image = utils::imread(&dir.join(&entry.id))?;
                    feature.combine(&entry.descriptor, Some(&image))
                })
                .non_empty()?
        } else {
            catalog
        };

        let target_id = self.query.target_id();
        let target = &catalog.find(&target_id)?.descriptor;
        let metric = Ssd::new(self.length_policy);
        let result = rank(target, &target_id, catalog.entries(), &metric, self.query.count)?;

        present(&self.query, &dir, &result, &self.output)
    }
}
