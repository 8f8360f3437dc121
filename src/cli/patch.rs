use anyhow::Result;
use clap::Parser;

use super::query::{present, search_directory};
use crate::cli::SubCommandExtend;
use crate::config::{DatabaseOptions, Opts, OutputOptions, QueryOptions};
use crate::distance::Ssd;
use crate::feature::{PatchCenter, PatchExtractor};

#[derive(Parser, Debug, Clone)]
pub struct PatchCommand {
    #[command(flatten)]
    pub query: QueryOptions,
    #[command(flatten)]
    pub database: DatabaseOptions,
    #[command(flatten)]
    pub output: OutputOptions,
    /// 中心块的定位方式
    #[arg(long, value_enum, default_value_t = PatchCenter::Offset)]
    pub center: PatchCenter,
}

impl SubCommandExtend for PatchCommand {
    fn run(&self, _opts: &Opts) -> Result<()> {
        let extractor = PatchExtractor::new(self.center);
        let result = search_directory(&self.query, &self.database, &extractor, &Ssd::default())?;
        present(&self.query, &self.database.dir(&self.query.image), &result, &self.output)
    }
}
