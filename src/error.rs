use thiserror::Error;

/// 检索流程中的错误
#[derive(Error, Debug)]
pub enum CbirError {
    #[error("descriptor length mismatch: {left} != {right}")]
    LengthMismatch { left: usize, right: usize },
    #[error("image is {rows}x{cols}, but at least {min_rows}x{min_cols} is required")]
    ImageTooSmall { rows: i32, cols: i32, min_rows: i32, min_cols: i32 },
    #[error("image is empty")]
    EmptyImage,
    #[error("unsupported channel count: {0}")]
    UnsupportedChannels(i32),
    #[error("cannot read image: {0}")]
    ImageRead(String),
    #[error("cannot write image: {0}")]
    ImageWrite(String),
    #[error("target image {0} not found in catalog")]
    TargetNotFound(String),
    #[error("catalog is empty")]
    EmptyCatalog,
    #[error("malformed catalog row at line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },
    #[error("Opencv Error")]
    OpenCv(#[from] opencv::Error),
    #[error("Io Error")]
    Io(#[from] std::io::Error),
    #[error("Directory Walk Error")]
    Walk(#[from] walkdir::Error),
}

pub type Result<T, E = CbirError> = std::result::Result<T, E>;
