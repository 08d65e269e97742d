use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure evaluating a query
#[derive(Error, Debug)]
pub enum Error {
    #[error("must specify at least one term to evaluate")]
    EmptyExpression,

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Failure reported by a [`Model`](crate::Model) implementation
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("term not found in vocabulary: {0}")]
    UnknownTerm(String),

    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("Model load error at line {line}: {message}")]
    Load { line: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}
