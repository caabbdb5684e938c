//! Error types for the benchmark core

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BenchError>;

#[derive(Error, Debug)]
pub enum BenchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Corrupt graph log: {0}")]
    Corrupt(String),

    #[error("Operation not supported by backend: {0}")]
    Unsupported(&'static str),

    #[error("Vertex not found: {0}")]
    VertexNotFound(String),

    #[error("No vertex with serial {0}")]
    SerialNotFound(u64),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),
}
