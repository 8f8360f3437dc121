pub mod catalog;
pub mod cli;
pub mod config;
pub mod distance;
pub mod error;
pub mod feature;
pub mod rank;
pub mod utils;

pub use catalog::{Catalog, Entry};
pub use config::Opts;
pub use error::{CbirError, Result};
pub use rank::{RankedMatch, rank};
