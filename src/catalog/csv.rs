use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use log::warn;

use super::Entry;
use crate::error::{CbirError, Result};

/// 从文件中读取 `id,v1,v2,...` 格式的图库
pub fn read_csv(path: &Path, dim: Option<usize>) -> Result<Vec<Entry<Vec<f32>>>> {
    let file = File::open(path)?;
    parse_csv(BufReader::new(file), dim)
}

/// 解析 CSV 图库，格式错误或长度不符的行会被丢弃
pub fn parse_csv<R: BufRead>(reader: R, dim: Option<usize>) -> Result<Vec<Entry<Vec<f32>>>> {
    let mut entries = vec![];
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match parse_row(i + 1, &line, dim) {
            Ok(entry) => entries.push(entry),
            Err(e) => warn!("dropping row: {}", e),
        }
    }
    Ok(entries)
}

fn parse_row(line: usize, row: &str, dim: Option<usize>) -> Result<Entry<Vec<f32>>> {
    let malformed = |reason: String| CbirError::MalformedRow { line, reason };

    let mut fields = row.split(',');
    let id = fields.next().unwrap_or_default().trim();
    if id.is_empty() {
        return Err(malformed("empty identifier".to_owned()));
    }

    let descriptor = fields
        .map(|field| field.trim().parse::<f32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| malformed(e.to_string()))?;

    match dim {
        Some(dim) if descriptor.len() != dim => {
            Err(malformed(format!("expected {} values, found {}", dim, descriptor.len())))
        }
        _ if descriptor.is_empty() => Err(malformed("no values".to_owned())),
        _ => Ok(Entry { id: id.to_owned(), descriptor }),
    }
}

/// 写入一行 `id,v1,v2,...`，每个值保留 4 位小数
pub fn write_row<W: Write>(writer: &mut W, id: &str, values: &[f32]) -> Result<()> {
    write!(writer, "{}", id)?;
    for v in values {
        write!(writer, ",{:.4}", v)?;
    }
    writeln!(writer)?;
    Ok(())
}

/// 逐行写入的 CSV 图库文件
pub struct CsvWriter {
    writer: BufWriter<File>,
}

impl CsvWriter {
    /// 打开输出文件
    ///
    /// # Arguments
    ///
    /// * `path` - 文件路径
    /// * `append` - 追加到已有文件末尾，否则清空文件
    pub fn open(path: &Path, append: bool) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(path)?;
        Ok(Self { writer: BufWriter::new(file) })
    }

    pub fn write(&mut self, id: &str, values: &[f32]) -> Result<()> {
        write_row(&mut self.writer, id, values)
    }

    pub fn finish(mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_parse_rows() {
        let data = "a.jpg,1,2,3\nb.jpg, 4.5 ,5,6\n\nc.jpg,7,8\n";
        let entries = parse_csv(Cursor::new(data), None).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1].id, "b.jpg");
        assert_eq!(entries[1].descriptor, vec![4.5, 5.0, 6.0]);
    }

    #[test]
    fn test_length_filter() {
        let data = "a.jpg,1,2,3\nb.jpg,4,5\nc.jpg,6,7,8\n";
        let entries = parse_csv(Cursor::new(data), Some(3)).unwrap();
        let ids = entries.iter().map(|e| e.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, ["a.jpg", "c.jpg"]);
    }

    #[test]
    fn test_malformed_rows_dropped() {
        let data = "a.jpg,1,x\n,1,2\nb.jpg\nc.jpg,1,2\n";
        let entries = parse_csv(Cursor::new(data), None).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, "c.jpg");
    }

    #[test]
    fn test_write_row_format() {
        let mut buf = vec![];
        write_row(&mut buf, "a.jpg", &[1.0, 0.123456, -2.5]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "a.jpg,1.0000,0.1235,-2.5000\n");
    }

    #[test]
    fn test_roundtrip_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("features.csv");
        let a = vec![0.5, 0.333333, 12.25];
        let b = vec![1.0 / 7.0, 0.0, -3.0];

        let mut writer = CsvWriter::open(&path, false).unwrap();
        writer.write("a.jpg", &a).unwrap();
        writer.finish().unwrap();

        let mut writer = CsvWriter::open(&path, true).unwrap();
        writer.write("b.jpg", &b).unwrap();
        writer.finish().unwrap();

        let entries = read_csv(&path, Some(3)).unwrap();
        assert_eq!(entries.len(), 2);
        for (entry, expected) in entries.iter().zip([&a, &b]) {
            for (x, y) in entry.descriptor.iter().zip(expected.iter()) {
                assert!((x - y).abs() < 1e-4);
            }
        }

        // 不追加时清空旧内容
        CsvWriter::open(&path, false).unwrap().finish().unwrap();
        assert!(read_csv(&path, None).unwrap().is_empty());
    }
}
