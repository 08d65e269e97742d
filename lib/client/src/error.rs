//! Error types for the wordvec client.

use thiserror::Error;

/// Errors that can occur when querying a wordvec server.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The request could not be sent or the response body could not be read
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("non-200 status code: {status}: {message}")]
    Status { status: u16, message: String },

    /// The query could not be encoded as JSON
    #[error("error encoding query: {0}")]
    Encode(#[source] serde_json::Error),

    /// The response body was not the expected JSON shape
    #[error("error unmarshalling result: {0}")]
    Decode(#[source] serde_json::Error),

    /// The server address could not be turned into a base URL
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
}
