use anyhow::Result;
use clap::Parser;

use super::query::{present, search_directory};
use crate::cli::SubCommandExtend;
use crate::config::{
    DatabaseOptions, HistogramOptions, Opts, OutputOptions, QueryOptions, parse_weights,
};
use crate::distance::WeightedRegions;
use crate::feature::RegionalHistogram;

#[derive(Parser, Debug, Clone)]
pub struct RegionsCommand {
    #[command(flatten)]
    pub query: QueryOptions,
    #[command(flatten)]
    pub database: DatabaseOptions,
    #[command(flatten)]
    pub output: OutputOptions,
    #[command(flatten)]
    pub histogram: HistogramOptions,
    /// 上 2/3 区域和下 2/3 区域的权重
    #[arg(long, value_name = "UPPER,LOWER", value_parser = parse_weights, default_value = "0.5,0.5")]
    pub weights: (f32, f32),
}

impl SubCommandExtend for RegionsCommand {
    fn run(&self, _opts: &Opts) -> Result<()> {
        let extractor = RegionalHistogram::new(self.histogram.bins);
        let metric = WeightedRegions::new(self.weights.0, self.weights.1);
        let result = search_directory(&self.query, &self.database, &extractor, &metric)?;
        present(&self.query, &self.database.dir(&self.query.image), &result, &self.output)
    }
}
