use anyhow::Result;
use clap::Parser;

use super::query::{present, search_directory};
use crate::cli::SubCommandExtend;
use crate::config::{DatabaseOptions, HistogramOptions, Opts, OutputOptions, QueryOptions};
use crate::distance::Intersection;
use crate::feature::HsvHistogram;

#[derive(Parser, Debug, Clone)]
pub struct HsvCommand {
    #[command(flatten)]
    pub query: QueryOptions,
    #[command(flatten)]
    pub database: DatabaseOptions,
    #[command(flatten)]
    pub output: OutputOptions,
    #[command(flatten)]
    pub histogram: HistogramOptions,
    /// 使用原始计数而不归一化，只适用于尺寸相同的图片
    #[arg(long)]
    pub raw: bool,
}

impl SubCommandExtend for HsvCommand {
    fn run(&self, _opts: &Opts) -> Result<()> {
        let extractor = HsvHistogram::new(self.histogram.bins, !self.raw);
        let result = search_directory(&self.query, &self.database, &extractor, &Intersection)?;
        present(&self.query, &self.database.dir(&self.query.image), &result, &self.output)
    }
}
