use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::envelope::Operation;

/// `<field>: <message> (line L, column C)`, dropping whichever parts
/// serde_yaml did not record
fn describe_parse_error(e: &serde_path_to_error::Error<serde_yaml::Error>) -> String {
    let field = match e.path().to_string() {
        path if path.is_empty() || path == "." => None,
        path => Some(path),
    };
    let position = e
        .inner()
        .location()
        .map(|at| format!(" (line {}, column {})", at.line(), at.column()))
        .unwrap_or_default();

    match field {
        Some(field) => format!("{}: {}{}", field, e.inner(), position),
        None => format!("{}{}", e.inner(), position),
    }
}

#[derive(Error, Debug)]
pub enum ZtpError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse config file '{path}':\n  {}", describe_parse_error(.source))]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_path_to_error::Error<serde_yaml::Error>,
    },

    #[error("Config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("Host not found: {0}")]
    HostNotFound(String),

    #[error("Invalid host record: {0}")]
    InvalidHost(String),

    #[error("Inventory is locked, {0} rejected")]
    Locked(Operation),

    #[error("Failed to encode document: {0}")]
    Encode(String),

    #[error("Failed to render {template}: {message}")]
    Template { template: String, message: String },

    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Restart of {service} via '{command}' failed: {message}")]
    ServiceRestart {
        service: String,
        command: String,
        message: String,
    },

    #[error("{operation} timed out after {after:?}")]
    Timeout { operation: Operation, after: Duration },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ZtpError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ZtpError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ZtpError>;
