use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error("download command '{0}' failed for '{1}'")]
    DownloadError(String, String),

    #[error("model card '{0}' is empty after download")]
    EmptyModelCard(PathBuf),

    #[error("invalid library path '{0}'")]
    InvalidPath(PathBuf),
}
