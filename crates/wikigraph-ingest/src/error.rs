//! Error types for the wikigraph-ingest crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Graph error: {0}")]
    Graph(#[from] wikigraph_graph::GraphError),

    #[error("Invalid article record on line {line}: {source}")]
    Article {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Write task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Write limiter closed: {0}")]
    Limiter(#[from] tokio::sync::AcquireError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, IngestError>;
