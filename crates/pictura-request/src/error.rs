//! Error types for pictura-request.
//!
//! Building and mutating a request never fails. Errors only arise at the
//! edges where a caller starts from text: a locator string or a TOML
//! configuration document.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("invalid request configuration: {0}")]
    InvalidConfig(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, RequestError>;
