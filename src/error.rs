
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum KeepsetError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(String),
    #[error("Unique constraint violated on {table}.{field}")]
    UniqueConstraintViolation { table: String, field: String },
    #[error("Type mismatch: {left} cannot be combined with {right}")]
    TypeMismatch { left: &'static str, right: &'static str },
    #[error("Type mismatch: {data_type} values cannot be added")]
    NotSummable { data_type: &'static str },
    #[error("Unknown field {field} in {table}")]
    UnknownField { table: String, field: String },
    #[error("Cursor exhausted")]
    CursorExhausted,
    #[error("Parse error: {message}")]
    Parse { message: String },
}

pub type Result<T> = std::result::Result<T, KeepsetError>;

// Helper conversions
impl From<config::ConfigError> for KeepsetError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}
impl From<std::io::Error> for KeepsetError {
    fn from(e: std::io::Error) -> Self { Self::Io(e.to_string()) }
}
