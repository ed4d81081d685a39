use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Zabbix(#[from] ZbxError),
    #[error("telemetry initialization failed: {0}")]
    Telemetry(String),
    #[error("failed to write output")]
    Output(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found: {}", path.display())]
    FileMissing { path: PathBuf },
    #[error("failed to parse configuration: {0}")]
    Parse(String),
    #[error("missing required configuration field: {field}")]
    MissingField { field: &'static str },
    #[error("invalid configuration for {field}: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },
    #[error("configuration error: {0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum ZbxError {
    #[error("failed to build HTTP client")]
    Client {
        #[source]
        source: reqwest::Error,
    },
    #[error("request failed: {source}")]
    Request {
        #[source]
        source: reqwest::Error,
    },
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: reqwest::StatusCode },
    #[error("invalid JSON payload: {message}")]
    Json { message: String },
    #[error("Zabbix API error {code}: {message}")]
    Api { code: i64, message: String },
    #[error("missing field in API response: {field}")]
    MissingField { field: &'static str },
    #[error("retry budget exhausted")]
    RetryExhausted {
        #[source]
        source: Box<ZbxError>,
    },
    #[error("no {resource} matched the query")]
    NotFound { resource: &'static str },
    #[error("error mapping record {index} in response: {source}")]
    FieldParse {
        index: usize,
        #[source]
        source: FieldParseError,
    },
}

/// A numeric field of a wire record that did not hold a base-10 integer.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("invalid {field} {value:?}: {source}")]
pub struct FieldParseError {
    pub field: &'static str,
    pub value: String,
    #[source]
    pub source: ParseIntError,
}

impl From<reqwest::Error> for ZbxError {
    fn from(source: reqwest::Error) -> Self {
        if source.is_status() {
            if let Some(status) = source.status() {
                return Self::HttpStatus { status };
            }
        }
        Self::Request { source }
    }
}

impl Error {
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Zabbix(ZbxError::NotFound { .. }))
    }

    /// Record index and field name when a response record failed conversion.
    #[must_use]
    pub fn field_parse(&self) -> Option<(usize, &'static str)> {
        match self {
            Self::Zabbix(ZbxError::FieldParse { index, source }) => Some((*index, source.field)),
            _ => None,
        }
    }
}
