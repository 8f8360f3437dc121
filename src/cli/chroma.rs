use anyhow::Result;
use clap::Parser;

use super::query::{present, search_directory};
use crate::cli::SubCommandExtend;
use crate::config::{DatabaseOptions, Opts, OutputOptions, QueryOptions};
use crate::distance::Intersection;
use crate::feature::ChromaHistogram;

#[derive(Parser, Debug, Clone)]
pub struct ChromaCommand {
    #[command(flatten)]
    pub query: QueryOptions,
    #[command(flatten)]
    pub database: DatabaseOptions,
    #[command(flatten)]
    pub output: OutputOptions,
    /// r 和 g 两个维度各自的 bin 数量
    #[arg(long, value_name = "N", default_value_t = 16, value_parser = clap::value_parser!(u32).range(1..=256))]
    pub bins: u32,
}

impl SubCommandExtend for ChromaCommand {
    fn run(&self, _opts: &Opts) -> Result<()> {
        let extractor = ChromaHistogram::new(self.bins as usize);
        let result = search_directory(&self.query, &self.database, &extractor, &Intersection)?;
        present(&self.query, &self.database.dir(&self.query.image), &result, &self.output)
    }
}
