use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("subset artifact error: {0}")]
    Artifact(#[from] postcard::Error),

    #[error("example has no field named {0}")]
    MissingField(String),

    #[error("field {field} is not of type {expected}")]
    FieldType {
        field: String,
        expected: &'static str,
    },

    #[error("line {line} of {path} is not a JSON object")]
    MalformedLine { path: PathBuf, line: usize },

    #[error("unsupported JSON value for field {0}")]
    UnsupportedValue(String),
}
