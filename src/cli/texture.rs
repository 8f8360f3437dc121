use anyhow::Result;
use clap::Parser;

use super::query::{present, search_directory};
use crate::cli::SubCommandExtend;
use crate::config::{DatabaseOptions, HistogramOptions, Opts, OutputOptions, QueryOptions};
use crate::distance::ColorTextureSsd;
use crate::feature::{ColorTextureExtractor, HsvHistogram, SobelKind, TextureHistogram};

#[derive(Parser, Debug, Clone)]
pub struct TextureCommand {
    #[command(flatten)]
    pub query: QueryOptions,
    #[command(flatten)]
    pub database: DatabaseOptions,
    #[command(flatten)]
    pub output: OutputOptions,
    #[command(flatten)]
    pub histogram: HistogramOptions,
    /// Sobel 梯度的计算方式
    #[arg(long, value_enum, default_value_t = SobelKind::Builtin)]
    pub sobel: SobelKind,
}

impl SubCommandExtend for TextureCommand {
    fn run(&self, _opts: &Opts) -> Result<()> {
        let extractor = ColorTextureExtractor::new(
            HsvHistogram::new(self.histogram.bins, true),
            TextureHistogram::new(self.sobel),
        );
        let result = search_directory(&self.query, &self.database, &extractor, &ColorTextureSsd)?;
        present(&self.query, &self.database.dir(&self.query.image), &result, &self.output)
    }
}
