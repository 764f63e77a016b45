//! wikigraph-ingest: Loading articles into the wikigraph article graph.
//!
//! Reads the title list and the article stream produced by the acquisition
//! side, prepares the fulltext index, and upserts one node per article.
//! The `wikigraph` binary sequences ingestion and the linking passes.

pub mod articles;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod titles;

pub use error::IngestError;
