//! The store seam the linkers and the ingest pipeline are written against.

use async_trait::async_trait;

use wikigraph_core::{NodeRef, PropValue, Props, RelRef};

use crate::client::{GraphClient, GraphError};

/// Property-graph operations addressed by label plus property match.
///
/// Writes have MERGE semantics; reads are fully materialized.
#[async_trait]
pub trait GraphStore: Send + Sync {
    async fn push_node(&self, node: &NodeRef) -> Result<(), GraphError>;

    async fn pull_node(&self, node: &NodeRef) -> Result<Vec<Props>, GraphError>;

    async fn pull_node_prop(&self, node: &NodeRef, prop: &str)
        -> Result<Vec<PropValue>, GraphError>;

    async fn push_rel(&self, rel: &RelRef) -> Result<(), GraphError>;

    async fn pull_rel(&self, rel: &RelRef) -> Result<Vec<(Props, Props)>, GraphError>;

    /// Fails with [`GraphError::IndexAlreadyExists`] when `name` is taken.
    async fn create_fulltext_index(
        &self,
        name: &str,
        label: &str,
        prop: &str,
    ) -> Result<(), GraphError>;
}

#[async_trait]
impl GraphStore for GraphClient {
    async fn push_node(&self, node: &NodeRef) -> Result<(), GraphError> {
        GraphClient::push_node(self, node).await
    }

    async fn pull_node(&self, node: &NodeRef) -> Result<Vec<Props>, GraphError> {
        GraphClient::pull_node(self, node).await
    }

    async fn pull_node_prop(
        &self,
        node: &NodeRef,
        prop: &str,
    ) -> Result<Vec<PropValue>, GraphError> {
        GraphClient::pull_node_prop(self, node, prop).await
    }

    async fn push_rel(&self, rel: &RelRef) -> Result<(), GraphError> {
        GraphClient::push_rel(self, rel).await
    }

    async fn pull_rel(&self, rel: &RelRef) -> Result<Vec<(Props, Props)>, GraphError> {
        GraphClient::pull_rel(self, rel).await
    }

    async fn create_fulltext_index(
        &self,
        name: &str,
        label: &str,
        prop: &str,
    ) -> Result<(), GraphError> {
        GraphClient::create_fulltext_index(self, name, label, prop).await
    }
}
