//! wikigraph-core: Shared types for the wikigraph article graph.
//!
//! This crate provides the foundational types used across all wikigraph crates:
//! - Property values and ordered property bags sent to the graph store
//! - Node and relationship references addressed by property match
//! - The article record produced by the acquisition side
//! - Schema naming (labels, relationship types, property keys)

pub mod schema;
pub mod types;

pub use schema::Schema;
pub use types::{ArticleData, NodeRef, PropValue, Props, RelRef};
