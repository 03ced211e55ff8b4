use std::num::ParseFloatError;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SimulateError {
    #[error("unsupport spice execute '{0}'")]
    UnsupportExecute(String),

    #[error("execute command '{0}' failed for '{1}'")]
    ExecuteError(String, String),

    #[error("invalid path '{0}'")]
    InvalidPath(PathBuf),

    #[error("simulator reported: {0}")]
    SimulatorReport(String),

    #[error("sweep data holds {1} values, not a multiple of {0} per record")]
    RaggedSweepData(usize, usize),

    #[error("parse value '{0}' failed for '{1}'")]
    ParseValue(String, ParseFloatError),

    #[error("empty sweep data file '{0}'")]
    EmptySweepData(PathBuf),
}
