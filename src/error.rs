//! Error types for vkrfmt library.

use std::io;
use thiserror::Error;

/// Result type alias for vkrfmt operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while loading, formatting or saving a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format is not recognized as DOCX.
    #[error("Unknown file format: not a valid DOCX package")]
    UnknownFormat,

    /// Error reading or writing the zip container.
    #[error("Package error: {0}")]
    Package(String),

    /// Error parsing or serializing document markup.
    #[error("XML error: {0}")]
    Xml(String),

    /// A required package part is missing.
    #[error("Missing required part: {0}")]
    MissingPart(String),

    /// The requirements model violates one of its invariants.
    #[error("Invalid requirements: {0}")]
    InvalidRequirements(String),

    /// A formatting value cannot be applied (non-finite, out of range).
    #[error("Invalid value for {field}: {value}")]
    InvalidValue {
        /// Name of the offending setting.
        field: &'static str,
        /// The rejected value.
        value: String,
    },

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    pub(crate) fn invalid_value(field: &'static str, value: impl ToString) -> Self {
        Error::InvalidValue {
            field,
            value: value.to_string(),
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            zip::result::ZipError::InvalidArchive(_) => Error::UnknownFormat,
            _ => Error::Package(err.to_string()),
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::Xml(err.to_string())
    }
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Error::InvalidRequirements(err.to_string())
    }
}
