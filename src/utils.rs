use std::path::Path;

use indicatif::ProgressStyle;
use opencv::core::{Mat, ToInputArray, Vector};
use opencv::prelude::*;
use opencv::{highgui, imgcodecs};

use crate::error::{CbirError, Result};

/// 以 BGR 三通道读取图片
pub fn imread(path: &Path) -> Result<Mat> {
    let filename = path.to_string_lossy();
    let image = imgcodecs::imread(&filename, imgcodecs::IMREAD_COLOR)?;
    if image.empty() {
        return Err(CbirError::ImageRead(filename.into_owned()));
    }
    Ok(image)
}

pub fn imwrite(path: &Path, image: &impl ToInputArray) -> Result<()> {
    let filename = path.to_string_lossy();
    if !imgcodecs::imwrite(&filename, image, &Vector::new())? {
        return Err(CbirError::ImageWrite(filename.into_owned()));
    }
    Ok(())
}

/// 在可缩放的窗口中显示图片
pub fn imshow(winname: &str, image: &impl ToInputArray) -> Result<()> {
    highgui::named_window(winname, highgui::WINDOW_NORMAL)?;
    highgui::imshow(winname, image)?;
    Ok(())
}

/// 阻塞直到按下任意键
pub fn wait_key() -> Result<()> {
    highgui::wait_key(0)?;
    Ok(())
}

pub fn destroy_all_windows() -> Result<()> {
    highgui::destroy_all_windows()?;
    Ok(())
}

/// 路径中的文件名部分，用作图库中的标识符
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

pub fn pb_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
        .expect("failed to build progress style")
        .progress_chars("#>-")
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use opencv::core::{CV_8UC3, Scalar};
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_file_name() {
        assert_eq!(file_name(Path::new("/data/olympus/pic.0001.jpg")), "pic.0001.jpg");
        assert_eq!(file_name(Path::new("pic.jpg")), "pic.jpg");
        assert_eq!(file_name(&PathBuf::from("/")), "/");
    }

    #[test]
    fn test_imread_missing() {
        let err = imread(Path::new("/nonexistent/image.png")).unwrap_err();
        assert!(matches!(err, CbirError::ImageRead(_)));
    }

    #[test]
    fn test_imwrite_imread() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("red.png");
        let image =
            Mat::new_rows_cols_with_default(4, 6, CV_8UC3, Scalar::new(0., 0., 255., 0.)).unwrap();
        imwrite(&path, &image).unwrap();

        let loaded = imread(&path).unwrap();
        assert_eq!((loaded.rows(), loaded.cols(), loaded.channels()), (4, 6, 3));
        assert_eq!(&loaded.data_bytes().unwrap()[..3], &[0, 0, 255]);
    }
}
