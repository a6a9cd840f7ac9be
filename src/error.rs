use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("malformed file at line {line}: {reason}")]
    Format { line: usize, reason: String },
    #[error("key column {0} is not present")]
    MissingKeyColumn(String),
    #[error("no row has {column} == {value}")]
    KeyValueNotFound { column: String, value: f64 },
    #[error("unknown column: {0}")]
    UnknownColumn(String),
    #[error("no columns named for selection")]
    NoColumns,
    #[error("a predicate is required for selection")]
    MissingPredicate,
    #[error("index file {0} not found in log directory")]
    MissingIndexFile(String),
    #[error("history file {0} not found in log directory")]
    MissingHistoryFile(String),
    #[error("no snapshot recorded for sequence id {0}")]
    NoSnapshotForSequence(u64),
    #[error("snapshot index is empty")]
    EmptyIndex,
    #[error("snapshot file {0} not found in log directory")]
    MissingSnapshotFile(String),
}

impl Error {
    pub(crate) fn format(line: usize, reason: impl Into<String>) -> Self {
        Error::Format {
            line,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
