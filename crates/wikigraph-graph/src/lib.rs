//! wikigraph-graph: Neo4j client for the article graph.
//!
//! All graph reads and writes flow through this crate. Nodes and
//! relationships are addressed by label plus property match, property
//! values are always bound as query parameters, and every write uses
//! MERGE so that repeated runs are idempotent.

pub mod client;
pub mod memory;
pub mod mutations;
pub mod props;
pub mod queries;
pub mod store;

pub use client::{GraphClient, GraphConfig, GraphError};
pub use memory::MemoryGraph;
pub use store::GraphStore;
