use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use regex::Regex;

use crate::catalog::suffix_regex;
use crate::cli::*;
use crate::feature::HsvBins;

#[derive(Parser, Debug, Clone)]
#[command(name = "cbir", version, about = "基于内容的图片检索")]
pub struct Opts {
    #[command(subcommand)]
    pub subcmd: SubCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum SubCommand {
    /// 使用中心 7x7 块和 SSD 搜索
    Patch(PatchCommand),
    /// 使用 rg 色度直方图和直方图交搜索
    Chroma(ChromaCommand),
    /// 使用 HSV 颜色直方图和直方图交搜索
    Hsv(HsvCommand),
    /// 使用上下两个区域的 HSV 直方图加权搜索
    Regions(RegionsCommand),
    /// 使用颜色直方图和纹理直方图搜索
    Texture(TextureCommand),
    /// 使用 CSV 中预先计算的网络嵌入搜索
    Embedding(EmbeddingCommand),
    /// 提取目录中所有图片的特征并写入 CSV
    Export(ExportCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct QueryOptions {
    /// 目标图片路径
    pub image: PathBuf,
    /// 显示的结果数量
    #[arg(value_name = "COUNT", default_value_t = 3)]
    pub count: usize,
}

impl QueryOptions {
    /// 目标图片在图库中的标识符
    pub fn target_id(&self) -> String {
        crate::utils::file_name(&self.image)
    }
}

#[derive(Parser, Debug, Clone)]
pub struct DatabaseOptions {
    /// 图库目录，默认为目标图片所在目录
    #[arg(short, long, value_name = "DIR")]
    pub database: Option<PathBuf>,
    /// 扫描的文件后缀名，多个后缀用逗号分隔
    #[arg(short, long, default_value = "jpg,png,ppm,tif")]
    pub suffix: String,
}

impl DatabaseOptions {
    pub fn dir(&self, image: &Path) -> PathBuf {
        match &self.database {
            Some(dir) => dir.clone(),
            None => match image.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            },
        }
    }

    pub fn suffix_regex(&self) -> anyhow::Result<Regex> {
        Ok(suffix_regex(&self.suffix)?)
    }
}

#[derive(Parser, Debug, Clone)]
pub struct OutputOptions {
    /// 输出格式
    #[arg(long, value_name = "FORMAT", value_enum, default_value_t = OutputFormat::Table)]
    pub output_format: OutputFormat,
    /// 不使用 GUI 展示结果
    #[arg(long)]
    pub no_gui: bool,
    /// 不使用 GUI 展示，而是将目标和结果图片保存到目录
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct HistogramOptions {
    /// HSV 直方图的 bin 数量
    #[arg(long, value_name = "HxSxV", value_parser = parse_bins, default_value = "30x32x32")]
    pub bins: HsvBins,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Json,
    Table,
}

fn parse_bins(s: &str) -> anyhow::Result<HsvBins> {
    let parts: Vec<&str> = s.split('x').collect();
    if parts.len() != 3 {
        return Err(anyhow::anyhow!("无效的 bin 数量: {}", s));
    }
    let bins = HsvBins::new(parts[0].parse()?, parts[1].parse()?, parts[2].parse()?);
    if bins.is_empty() {
        return Err(anyhow::anyhow!("bin 数量必须大于 0: {}", s));
    }
    Ok(bins)
}

pub(crate) fn parse_weights(s: &str) -> anyhow::Result<(f32, f32)> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 2 {
        return Err(anyhow::anyhow!("无效的权重: {}", s));
    }
    Ok((parts[0].trim().parse()?, parts[1].trim().parse()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bins() {
        assert_eq!(parse_bins("30x32x32").unwrap(), HsvBins::new(30, 32, 32));
        assert!(parse_bins("30x32").is_err());
        assert!(parse_bins("0x32x32").is_err());
        assert!(parse_bins("ax1x1").is_err());
    }

    #[test]
    fn test_parse_weights() {
        assert_eq!(parse_weights("0.7, 0.3").unwrap(), (0.7, 0.3));
        assert!(parse_weights("1").is_err());
    }

    #[test]
    fn test_database_dir() {
        let db = DatabaseOptions { database: None, suffix: "jpg".to_owned() };
        assert_eq!(db.dir(Path::new("/data/olympus/a.jpg")), PathBuf::from("/data/olympus"));
        assert_eq!(db.dir(Path::new("a.jpg")), PathBuf::from("."));

        let db = DatabaseOptions { database: Some(PathBuf::from("/db")), ..db };
        assert_eq!(db.dir(Path::new("/data/olympus/a.jpg")), PathBuf::from("/db"));
    }

    #[test]
    fn test_parse_args() {
        let opts = Opts::try_parse_from(["cbir", "patch", "a.jpg", "5", "--no-gui"]).unwrap();
        let SubCommand::Patch(cmd) = opts.subcmd else { panic!("expected patch") };
        assert_eq!(cmd.query.count, 5);
        assert!(cmd.output.no_gui);

        assert!(Opts::try_parse_from(["cbir", "patch"]).is_err());
        assert!(Opts::try_parse_from(["cbir", "patch", "a.jpg", "x"]).is_err());
    }
}
