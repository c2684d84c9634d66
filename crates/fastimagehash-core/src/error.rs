use std::path::PathBuf;
use thiserror::Error;

use crate::types::HashAlgorithm;

pub type Result<T> = core::result::Result<T, Error>;

/// Custom error types for the fastimagehash library
#[derive(Error, Debug)]
pub enum Error {
    /// The input bytes could not be obtained
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Bytes were obtained but are not a decodable image
    #[error("Image decode error: {0}")]
    Decode(String),

    /// Invalid hashing parameters
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Malformed hex string
    #[error("Invalid hex string: {0}")]
    InvalidHex(String),

    /// Hashes from different algorithms or sizes cannot be compared
    #[error("Cannot compare {left} (size {left_size}) with {right} (size {right_size})")]
    Incomparable {
        left: HashAlgorithm,
        left_size: u32,
        right: HashAlgorithm,
        right_size: u32,
    },
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Decode(err.to_string())
    }
}

/// Operation-result code for callers that want a flat status value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Code {
    Ok = 0,
    InvalidConfig = -1,
    ReadError = -2,
    DecodeError = -3,
    InvalidHex = -4,
    Incomparable = -5,
}

impl Code {
    /// Status code of an operation result
    pub fn of<T>(result: &Result<T>) -> Code {
        match result {
            Ok(_) => Code::Ok,
            Err(e) => e.code(),
        }
    }
}

impl Error {
    /// Map the error onto its result code
    pub fn code(&self) -> Code {
        match self {
            Error::Read { .. } => Code::ReadError,
            Error::Decode(_) => Code::DecodeError,
            Error::Configuration(_) => Code::InvalidConfig,
            Error::InvalidHex(_) => Code::InvalidHex,
            Error::Incomparable { .. } => Code::Incomparable,
        }
    }

    /// Whether retrying with the same input could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Read { .. })
    }
}
