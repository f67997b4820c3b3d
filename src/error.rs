use std::path::PathBuf;
use thiserror::Error;
#[derive(Debug, Error)]
pub enum PrunecopyError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Walk error: {0}")]
    Walk(String),
    #[error("Invalid path: {0}")]
    InvalidPath(String),
    #[error("{} is a file instead of a directory", .0.display())]
    TargetIsFile(PathBuf),
    #[error("Unsupported archive format for {}: use .zip, .tar, .tar.gz or .tgz", .0.display())]
    UnsupportedFormat(PathBuf),
    #[error("Archive error: {0}")]
    Archive(String),
    #[error("Preset error: {0}")]
    Preset(String),
    #[error("Editor error: {0}")]
    Editor(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("{0} item(s) could not be processed")]
    Partial(usize),
}
impl PrunecopyError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PrunecopyError::Io {
            path: path.into(),
            source,
        }
    }
}
impl From<zip::result::ZipError> for PrunecopyError {
    fn from(e: zip::result::ZipError) -> Self {
        PrunecopyError::Archive(e.to_string())
    }
}
impl From<serde_json::Error> for PrunecopyError {
    fn from(e: serde_json::Error) -> Self {
        PrunecopyError::Serialize(e.to_string())
    }
}
