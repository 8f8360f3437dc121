use std::path::{Path, PathBuf};

use regex::Regex;
use walkdir::WalkDir;

use crate::error::Result;

/// 根据逗号分隔的后缀名构建不区分大小写的正则表达式
pub fn suffix_regex(suffix: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("(?i)^({})$", suffix.replace(',', "|")))
}

/// 列出目录下（不递归）所有后缀名匹配的图片文件，按文件名排序
pub fn scan_images(dir: &Path, suffix: &Regex) -> Result<Vec<PathBuf>> {
    let mut paths = vec![];
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(ext) = entry.path().extension() else {
            continue;
        };
        if suffix.is_match(&ext.to_string_lossy()) {
            paths.push(entry.into_path());
        }
    }
    Ok(paths)
}
