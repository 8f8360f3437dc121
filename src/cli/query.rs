use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use log::{debug, info, warn};

use crate::catalog::Catalog;
use crate::config::{DatabaseOptions, OutputFormat, OutputOptions, QueryOptions};
use crate::distance::Metric;
use crate::feature::FeatureExtractor;
use crate::rank::{RankedMatch, rank};
use crate::utils;

/// 提取目标图片和图库目录中所有图片的特征，返回最相似的结果
pub(crate) fn search_directory<E, M>(
    query: &QueryOptions,
    database: &DatabaseOptions,
    extractor: &E,
    metric: &M,
) -> Result<Vec<RankedMatch>>
where
    E: FeatureExtractor,
    M: Metric<E::Descriptor>,
{
    let image = utils::imread(&query.image)
        .with_context(|| format!("无法读取目标图片: {}", query.image.display()))?;
    let target = extractor.extract(&image)?;

    let dir = database.dir(&query.image);
    let catalog = Catalog::from_directory(&dir, &database.suffix_regex()?, extractor)
        .with_context(|| format!("无法访问图库目录: {}", dir.display()))?
        .non_empty()?;

    let instant = Instant::now();
    let result = rank(&target, &query.target_id(), catalog.entries(), metric, query.count)?;
    debug!("rank time: {:.2}ms", instant.elapsed().as_secs_f32() * 1000.);
    Ok(result)
}

/// 输出结果，然后展示或保存图片
pub(crate) fn present(
    query: &QueryOptions,
    dir: &Path,
    result: &[RankedMatch],
    output: &OutputOptions,
) -> Result<()> {
    print_result(&query.target_id(), result, output.output_format)?;

    if let Some(out) = &output.output {
        save_matches(&query.image, dir, result, out)
    } else if !output.no_gui {
        show_matches(&query.image, dir, result)
    } else {
        Ok(())
    }
}

fn print_result(target_id: &str, result: &[RankedMatch], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(result)?)
        }
        OutputFormat::Table => {
            println!("Top {} matches for {}:", result.len(), target_id);
            for m in result {
                println!("{:.4}\t{}", m.score, m.id);
            }
        }
    }
    Ok(())
}

fn show_matches(target: &Path, dir: &Path, result: &[RankedMatch]) -> Result<()> {
    let image = utils::imread(target)?;
    utils::imshow("Target Image", &image)?;
    utils::wait_key()?;

    for (i, m) in result.iter().enumerate() {
        let path = dir.join(&m.id);
        match utils::imread(&path) {
            Ok(image) => utils::imshow(&format!("Match {}: {}", i + 1, m.id), &image)?,
            Err(e) => warn!("无法打开匹配图片 {}: {}", path.display(), e),
        }
    }

    utils::wait_key()?;
    utils::destroy_all_windows()?;
    Ok(())
}

fn save_matches(target: &Path, dir: &Path, result: &[RankedMatch], out: &Path) -> Result<()> {
    fs::create_dir_all(out)?;

    let image = utils::imread(target)?;
    utils::imwrite(&out.join(format!("00_{}", utils::file_name(target))), &image)?;

    for (i, m) in result.iter().enumerate() {
        let path = dir.join(&m.id);
        match utils::imread(&path) {
            Ok(image) => utils::imwrite(&out.join(format!("{:02}_{}", i + 1, m.id)), &image)?,
            Err(e) => warn!("无法打开匹配图片 {}: {}", path.display(), e),
        }
    }

    info!("结果已保存到 {}", out.display());
    Ok(())
}
