#[derive(Debug, thiserror::Error)]
pub enum CharzError {
    #[error("lack sweep config field '{0}'")]
    LackSweepConfigField(&'static str),

    #[error("sweep grid is empty")]
    EmptySweepGrid,

    #[error("build thread pool failed: {0}")]
    ThreadPool(String),
}
