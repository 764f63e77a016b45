//! Read operations and result extraction for the article graph.
//!
//! Every read returns fully materialized results; nothing borrows the
//! connection past the end of the call.

use neo4rs::query;

use wikigraph_core::{NodeRef, PropValue, Props, RelRef};

use crate::client::{require_label, require_prop_name, GraphClient, GraphError};
use crate::props::{encode, EDGE_ALIAS, FROM_ALIAS, TO_ALIAS};

impl GraphClient {
    // ── Node Reads ───────────────────────────────────────────────

    /// Every node matching `node`, as property bags.
    pub async fn pull_node(&self, node: &NodeRef) -> Result<Vec<Props>, GraphError> {
        require_label("node", &node.label)?;
        let props = encode(&node.props, "");
        let cypher = format!("MATCH (n:{} {}) RETURN n", node.label, props.clause);

        let rows = self.query_rows(props.bind(query(&cypher))).await?;
        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            results.extend(extract_nodes(&row, &["n"])?);
        }
        Ok(results)
    }

    /// The value of `prop` on every node matching `node`.
    ///
    /// Nodes that do not carry `prop` contribute nothing.
    pub async fn pull_node_prop(
        &self,
        node: &NodeRef,
        prop: &str,
    ) -> Result<Vec<PropValue>, GraphError> {
        require_label("node", &node.label)?;
        require_prop_name(prop)?;
        let props = encode(&node.props, "");
        let cypher = format!(
            "MATCH (n:{label} {clause})
             WHERE n.{prop} IS NOT NULL
             RETURN n.{prop} AS value",
            label = node.label,
            clause = props.clause,
        );

        let rows = self.query_rows(props.bind(query(&cypher))).await?;
        let mut values = Vec::with_capacity(rows.len());
        for row in rows {
            let value: PropValue = row.get("value").map_err(|e| {
                GraphError::Extraction(format!("Failed to decode property '{prop}': {e}"))
            })?;
            values.push(value);
        }
        Ok(values)
    }

    /// Count nodes matching `node`.
    pub async fn count_nodes(&self, node: &NodeRef) -> Result<i64, GraphError> {
        require_label("node", &node.label)?;
        let props = encode(&node.props, "");
        let cypher = format!(
            "MATCH (n:{} {}) RETURN count(n) AS cnt",
            node.label, props.clause
        );

        match self.query_one(props.bind(query(&cypher))).await? {
            Some(row) => decode_count(&row),
            None => Ok(0),
        }
    }

    // ── Relationship Reads ───────────────────────────────────────

    /// `(from, to)` property bags, once per connected node pair.
    ///
    /// Parallel edges that all match `rel` still yield a single pair.
    pub async fn pull_rel(&self, rel: &RelRef) -> Result<Vec<(Props, Props)>, GraphError> {
        let (cypher, bound) = rel_match(rel, PULL_REL_TAIL)?;
        let rows = self.query_rows(bound(query(&cypher))).await?;

        let mut pairs = Vec::with_capacity(rows.len());
        for row in rows {
            let mut nodes = extract_nodes(&row, &["v", "w"])?.into_iter();
            match (nodes.next(), nodes.next(), nodes.next()) {
                (Some(from), Some(to), None) => pairs.push((from, to)),
                _ => {
                    return Err(GraphError::Extraction(
                        "relationship row did not contain exactly two nodes".to_string(),
                    ))
                }
            }
        }
        Ok(pairs)
    }

    /// Count edges matching `rel`.
    pub async fn count_rels(&self, rel: &RelRef) -> Result<i64, GraphError> {
        let (cypher, bound) = rel_match(rel, "RETURN count(e) AS cnt")?;

        match self.query_one(bound(query(&cypher))).await? {
            Some(row) => decode_count(&row),
            None => Ok(0),
        }
    }
}

const PULL_REL_TAIL: &str = "RETURN DISTINCT v, w";

/// Build `MATCH (v)-[e]->(w) <tail>` for `rel`, plus a closure binding its
/// aliased parameters.
fn rel_match(
    rel: &RelRef,
    tail: &str,
) -> Result<(String, impl FnOnce(neo4rs::Query) -> neo4rs::Query), GraphError> {
    require_label("from-node", &rel.from.label)?;
    require_label("to-node", &rel.to.label)?;
    require_label("relationship", &rel.label)?;

    let v = encode(&rel.from.props, FROM_ALIAS);
    let w = encode(&rel.to.props, TO_ALIAS);
    let e = encode(&rel.props, EDGE_ALIAS);

    let cypher = format!(
        "MATCH (v:{v_label} {v_props})-[e:{e_label} {e_props}]->(w:{w_label} {w_props})
         {tail}",
        v_label = rel.from.label,
        v_props = v.clause,
        e_label = rel.label,
        e_props = e.clause,
        w_label = rel.to.label,
        w_props = w.clause,
    );

    Ok((cypher, move |q| e.bind(w.bind(v.bind(q)))))
}

fn decode_count(row: &neo4rs::Row) -> Result<i64, GraphError> {
    row.get::<i64>("cnt")
        .map_err(|e| GraphError::Extraction(format!("Failed to decode count: {e}")))
}

/// Collect the node-valued columns of `row` as property bags.
///
/// Generic `RETURN` clauses can mix nodes with relationships and scalars;
/// only values that decode as nodes are kept, in column order.
fn extract_nodes(row: &neo4rs::Row, columns: &[&str]) -> Result<Vec<Props>, GraphError> {
    let mut nodes = Vec::new();
    for column in columns {
        if let Ok(node) = row.get::<neo4rs::Node>(column) {
            nodes.push(node_to_props(&node)?);
        }
    }
    Ok(nodes)
}

/// Convert a neo4rs::Node into a property bag, keys sorted by name.
fn node_to_props(node: &neo4rs::Node) -> Result<Props, GraphError> {
    let mut keys = node.keys();
    keys.sort_unstable();

    let mut props = Props::new();
    for key in keys {
        let value: PropValue = node.get(key).map_err(|e| {
            GraphError::Extraction(format!("Failed to decode node property '{key}': {e}"))
        })?;
        props.insert(key, value);
    }
    Ok(props)
}
