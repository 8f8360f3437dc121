mod csv;
mod scan;

pub use csv::*;
pub use scan::*;

use std::path::Path;

use indicatif::{ProgressBar, ProgressIterator};
use log::{debug, info, warn};
use regex::Regex;

use crate::error::{CbirError, Result};
use crate::feature::FeatureExtractor;
use crate::utils;

/// 图库中的一条记录
#[derive(Debug, Clone, PartialEq)]
pub struct Entry<D> {
    /// 图片文件名
    pub id: String,
    pub descriptor: D,
}

/// 用于匹配的全部图片及其描述符
#[derive(Debug, Clone)]
pub struct Catalog<D> {
    entries: Vec<Entry<D>>,
}

impl<D> Catalog<D> {
    pub fn new(entries: Vec<Entry<D>>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[Entry<D>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 按标识符查找条目，存在重复时返回第一个
    pub fn find(&self, id: &str) -> Result<&Entry<D>> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .ok_or_else(|| CbirError::TargetNotFound(id.to_owned()))
    }

    /// 空图库视为错误
    pub fn non_empty(self) -> Result<Self> {
        if self.is_empty() {
            return Err(CbirError::EmptyCatalog);
        }
        Ok(self)
    }

    /// 转换每条记录的描述符，转换失败的记录会被跳过
    pub fn filter_map<T, F>(self, mut f: F) -> Catalog<T>
    where
        F: FnMut(&Entry<D>) -> Result<T>,
    {
        let entries = self
            .entries
            .into_iter()
            .filter_map(|entry| match f(&entry) {
                Ok(descriptor) => Some(Entry { id: entry.id, descriptor }),
                Err(e) => {
                    warn!("skipping {}: {}", entry.id, e);
                    None
                }
            })
            .collect();
        Catalog { entries }
    }

    /// 从图片目录中提取全部描述符
    ///
    /// # Arguments
    ///
    /// * `dir` - 图片所在目录，只扫描一层
    /// * `suffix` - 文件后缀名过滤
    /// * `extractor` - 特征提取器
    pub fn from_directory<E>(dir: &Path, suffix: &Regex, extractor: &E) -> Result<Self>
    where
        E: FeatureExtractor<Descriptor = D>,
    {
        let paths = scan_images(dir, suffix)?;
        info!("found {} images in {}", paths.len(), dir.display());

        let pb = ProgressBar::new(paths.len() as u64).with_style(utils::pb_style());
        let mut entries = Vec::with_capacity(paths.len());
        for path in paths.iter().progress_with(pb) {
            let descriptor = utils::imread(path).and_then(|image| extractor.extract(&image));
            match descriptor {
                Ok(descriptor) => {
                    debug!("extracted {}", path.display());
                    entries.push(Entry { id: utils::file_name(path), descriptor });
                }
                Err(e) => warn!("skipping {}: {}", path.display(), e),
            }
        }

        info!("loaded {} of {} images", entries.len(), paths.len());
        Ok(Self { entries })
    }
}

impl Catalog<Vec<f32>> {
    /// 从 CSV 文件中读取图库，长度不等于 `dim` 的行会被丢弃
    pub fn from_csv(path: &Path, dim: Option<usize>) -> Result<Self> {
        let entries = read_csv(path, dim)?;
        info!("read {} rows from {}", entries.len(), path.display());
        Ok(Self { entries })
    }
}
