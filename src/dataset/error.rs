#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("column '{0}' not found")]
    ColumnNotFound(String),

    #[error("column '{0}' already exists")]
    ColumnExists(String),

    #[error("batch schema {0} columns, expect {1}")]
    SchemaMismatch(usize, usize),

    #[error("column '{0}' holds {1} values, expect {2}")]
    ColumnLenMismatch(String, usize, usize),

    #[error("no batches to concatenate")]
    NoBatches,
}
