use std::io;

use regex::Error as RegexError;
use serde::{Deserialize, Serialize};
use serde_json::Error as JsonError;
use thiserror::Error;

#[cfg(feature = "db")]
use sqlx::Error as SqlxError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
pub enum KoineError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Database error: {0}")]
    Database(String),
    #[error("File System error: {0}")]
    Io(String),
    #[error("Item Not Found: {0}")]
    NotFound(String),
    #[error("You do not have permission to access this resource")]
    PermissionDenied,
    #[error("Trait table error: {0}")]
    Schema(String),
    #[error("(De)Serialization error: {0}")]
    Serialization(String),
    #[error("Word stream error in {source_name} line {line}: {message}")]
    Stream {
        source_name: String,
        line: usize,
        message: String,
    },
}

impl KoineError {
    pub fn stream<S: Into<String>, M: Into<String>>(source_name: S, line: usize, message: M) -> Self {
        KoineError::Stream {
            source_name: source_name.into(),
            line,
            message: message.into(),
        }
    }
}

impl From<toml::de::Error> for KoineError {
    fn from(src: toml::de::Error) -> KoineError {
        KoineError::Serialization(format!("Toml deserialization error: {src}"))
    }
}

impl From<toml::ser::Error> for KoineError {
    fn from(src: toml::ser::Error) -> KoineError {
        KoineError::Serialization(format!("Toml serialization error: {src}"))
    }
}

impl From<JsonError> for KoineError {
    fn from(src: JsonError) -> KoineError {
        KoineError::Serialization(format!("JSON (de)serialization error: {src}"))
    }
}

impl From<io::Error> for KoineError {
    fn from(x: io::Error) -> Self {
        match x.kind() {
            io::ErrorKind::NotFound => KoineError::NotFound(format!("{x}")),
            io::ErrorKind::PermissionDenied => KoineError::PermissionDenied,
            _ => KoineError::Io(format!("IOError: {}", x.kind())),
        }
    }
}

impl From<RegexError> for KoineError {
    fn from(x: RegexError) -> Self {
        KoineError::Serialization(format!("Regex parse failed: {x}"))
    }
}

#[cfg(feature = "db")]
impl From<SqlxError> for KoineError {
    fn from(db_error: SqlxError) -> Self {
        KoineError::Database(format!("database error: {db_error:?}"))
    }
}
