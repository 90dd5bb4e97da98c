use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WindowError {
    #[error("window duration must be a positive finite number, got {0}")]
    InvalidDuration(f64),

    #[error("non-finite observation: timestamp={timestamp}, value={value}")]
    NonFinite { timestamp: f64, value: f64 },

    #[error("timestamp {timestamp} is older than the latest accepted timestamp {latest}")]
    OutOfOrder { timestamp: f64, latest: f64 },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("expected 2 tab-separated fields, found {found}")]
    FieldCount { found: usize },

    #[error("{field} is not a number: {text:?}")]
    InvalidNumber { field: &'static str, text: String },

    #[error("{field} is not finite")]
    NonFinite { field: &'static str },

    #[error("line is not valid UTF-8")]
    InvalidUtf8,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LineErrorKind {
    #[error(transparent)]
    Record(#[from] RecordError),

    #[error(transparent)]
    Window(#[from] WindowError),
}

/// A rejected input line, numbered from 1.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("line {line}: {kind}")]
pub struct LineError {
    pub line: usize,
    pub kind: LineErrorKind,
}

impl LineError {
    pub fn new(line: usize, kind: impl Into<LineErrorKind>) -> Self {
        LineError {
            line,
            kind: kind.into(),
        }
    }
}
