mod chroma;
mod embedding;
mod export;
mod hsv;
mod patch;
mod query;
mod regions;
mod texture;

pub use chroma::*;
pub use embedding::*;
pub use export::*;
pub use hsv::*;
pub use patch::*;
pub use regions::*;
pub use texture::*;

use crate::config::Opts;

pub trait SubCommandExtend {
    fn run(&self, opts: &Opts) -> anyhow::Result<()>;
}
