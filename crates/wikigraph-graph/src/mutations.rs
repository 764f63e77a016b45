//! Write operations for the article graph.
//!
//! All mutations use MERGE (upsert) semantics: pushing the same node or
//! relationship twice leaves exactly one copy. Nodes are identified by
//! label plus property match, never by the store's internal id.

use neo4rs::query;

use wikigraph_core::{NodeRef, RelRef};

use crate::client::{require_fulltext_spec, require_label, GraphClient, GraphError};
use crate::props::{encode, EDGE_ALIAS, FROM_ALIAS, TO_ALIAS};

impl GraphClient {
    // ── Node Upserts ─────────────────────────────────────────────

    /// Upsert a node carrying at least `node.props` under `node.label`.
    pub async fn push_node(&self, node: &NodeRef) -> Result<(), GraphError> {
        require_label("node", &node.label)?;
        let props = encode(&node.props, "");
        let cypher = format!("MERGE (n:{} {})", node.label, props.clause);

        self.run(props.bind(query(&cypher))).await
    }

    // ── Edge Upserts ─────────────────────────────────────────────

    /// Upsert a directed edge between every pair of nodes matching the two
    /// endpoint references.
    ///
    /// Endpoint and edge bags are encoded under the `v`, `w` and `e` aliases
    /// so a `title` on both endpoints binds two distinct parameters.
    pub async fn push_rel(&self, rel: &RelRef) -> Result<(), GraphError> {
        require_label("from-node", &rel.from.label)?;
        require_label("to-node", &rel.to.label)?;
        require_label("relationship", &rel.label)?;

        let v = encode(&rel.from.props, FROM_ALIAS);
        let w = encode(&rel.to.props, TO_ALIAS);
        let e = encode(&rel.props, EDGE_ALIAS);

        let cypher = format!(
            "MATCH (v:{v_label} {v_props}), (w:{w_label} {w_props})
             MERGE (v)-[:{e_label} {e_props}]->(w)",
            v_label = rel.from.label,
            v_props = v.clause,
            w_label = rel.to.label,
            w_props = w.clause,
            e_label = rel.label,
            e_props = e.clause,
        );

        let q = e.bind(w.bind(v.bind(query(&cypher))));
        self.run(q).await
    }

    // ── Indexes ──────────────────────────────────────────────────

    /// Create a fulltext index over one property of one label.
    ///
    /// Fails with [`GraphError::IndexAlreadyExists`] if the store already
    /// has an index by that name (or an equivalent one).
    pub async fn create_fulltext_index(
        &self,
        name: &str,
        label: &str,
        prop: &str,
    ) -> Result<(), GraphError> {
        require_fulltext_spec(name, label, prop)?;

        let cypher = format!("CREATE FULLTEXT INDEX `{name}` FOR (n:{label}) ON EACH [n.{prop}]");

        match self.run(query(&cypher)).await {
            Ok(()) => {
                tracing::info!(index = %name, label = %label, prop = %prop, "Created fulltext index");
                Ok(())
            }
            Err(GraphError::Query(e)) if is_already_exists(&e.to_string()) => {
                Err(GraphError::IndexAlreadyExists {
                    name: name.to_string(),
                })
            }
            Err(e) => Err(e),
        }
    }

    // ── Bulk Deletion ────────────────────────────────────────────

    /// Delete every node (and its edges), optionally only those with `label`.
    ///
    /// Destructive; meant for test fixtures and resetting a scratch database.
    pub async fn clear(&self, label: Option<&str>) -> Result<(), GraphError> {
        let cypher = match label {
            Some(label) => {
                require_label("node", label)?;
                format!("MATCH (x:{label}) DETACH DELETE x")
            }
            None => "MATCH (x) DETACH DELETE x".to_string(),
        };

        tracing::warn!(label = ?label, "Clearing graph nodes");
        self.run(query(&cypher)).await
    }
}

/// Neo4j reports a taken index name as `IndexWithNameAlreadyExists` or
/// `EquivalentSchemaRuleAlreadyExists`, depending on version.
fn is_already_exists(message: &str) -> bool {
    message.contains("AlreadyExists") || message.to_lowercase().contains("already exists")
}
