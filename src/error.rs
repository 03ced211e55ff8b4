use crate::{charz::CharzError, dataset::DatasetError, library::LibraryError, simulate::SimulateError};

#[derive(Debug, thiserror::Error)]
pub enum MoscharError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Fmt(#[from] std::fmt::Error),

    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    Library(#[from] LibraryError),

    #[error(transparent)]
    Simulate(#[from] SimulateError),

    #[error(transparent)]
    Charz(#[from] CharzError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error("{0}")]
    Message(String),

    #[error("{msg} >> {err}")]
    Context { msg: String, err: Box<dyn std::error::Error + Send + Sync> }
}

pub type MoscharResult<T> = Result<T, MoscharError>;

pub trait ErrorContext<T> {
    fn context<S: Into<String>>(self, msg: S) -> MoscharResult<T>;
    fn with_context<S: Into<String>>(self, f: impl Fn() -> S) -> MoscharResult<T>;
}

impl<T, E: std::error::Error + Send + Sync + 'static> ErrorContext<T> for Result<T, E> {
    fn context<S: Into<String>>(self, msg: S) -> MoscharResult<T> {
        self.map_err(|e| MoscharError::Context { msg: msg.into(), err: Box::new(e) })
    }

    fn with_context<S: Into<String>>(self, f: impl Fn() -> S) -> MoscharResult<T> {
        let msg = f();
        self.context(msg)
    }
}
