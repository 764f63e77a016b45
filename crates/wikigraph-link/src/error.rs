//! Error types for the wikigraph-link crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LinkError {
    #[error("Graph error: {0}")]
    Graph(#[from] wikigraph_graph::GraphError),

    #[error("Unknown link strategy: {0} (choose: hyperlink, topic-direct, topic-indexed)")]
    UnknownStrategy(String),
}

pub type Result<T> = std::result::Result<T, LinkError>;
