//! In-process graph store following Neo4j's MERGE and property-match rules
//! (numbers compare across integer and float, as in Cypher).
//!
//! Used to exercise the linkers and the ingest pipeline without a running
//! database, and for dry runs of a linking pass.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use wikigraph_core::{NodeRef, PropValue, Props, RelRef};

use crate::client::{require_fulltext_spec, require_label, require_prop_name, GraphError};
use crate::store::GraphStore;

#[derive(Debug, Clone)]
struct StoredNode {
    label: String,
    props: Props,
}

#[derive(Debug, Clone)]
struct StoredEdge {
    from: usize,
    to: usize,
    label: String,
    props: Props,
}

#[derive(Debug, Default)]
struct State {
    nodes: Vec<StoredNode>,
    edges: Vec<StoredEdge>,
    /// Fulltext index name -> (label, property).
    indexes: BTreeMap<String, (String, String)>,
}

impl State {
    fn matching(&self, node: &NodeRef) -> impl Iterator<Item = usize> + '_ {
        let label = node.label.clone();
        let props = node.props.clone();
        self.nodes
            .iter()
            .enumerate()
            .filter(move |(_, n)| n.label == label && n.props.matches(&props))
            .map(|(i, _)| i)
    }

    fn edge_matches(&self, edge: &StoredEdge, rel: &RelRef) -> bool {
        let from = &self.nodes[edge.from];
        let to = &self.nodes[edge.to];
        edge.label == rel.label
            && edge.props.matches(&rel.props)
            && from.label == rel.from.label
            && from.props.matches(&rel.from.props)
            && to.label == rel.to.label
            && to.props.matches(&rel.to.props)
    }
}

/// Shared, thread-safe in-memory graph. Clone is cheap (inner Arc).
#[derive(Debug, Clone, Default)]
pub struct MemoryGraph {
    state: Arc<Mutex<State>>,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn count_nodes(&self, node: &NodeRef) -> usize {
        self.state().matching(node).count()
    }

    pub fn count_rels(&self, rel: &RelRef) -> usize {
        let state = self.state();
        state.edges.iter().filter(|e| state.edge_matches(e, rel)).count()
    }

    /// Names of the fulltext indexes created so far.
    pub fn index_names(&self) -> Vec<String> {
        self.state().indexes.keys().cloned().collect()
    }

    /// Every stored edge with `label`, as `(from, edge, to)` property bags.
    pub fn edges(&self, label: &str) -> Vec<(Props, Props, Props)> {
        let state = self.state();
        state
            .edges
            .iter()
            .filter(|e| e.label == label)
            .map(|e| {
                (
                    state.nodes[e.from].props.clone(),
                    e.props.clone(),
                    state.nodes[e.to].props.clone(),
                )
            })
            .collect()
    }

    /// Remove every node (and its edges), optionally only those with `label`.
    pub fn clear(&self, label: Option<&str>) {
        let mut state = self.state();
        let keep: Vec<bool> = state
            .nodes
            .iter()
            .map(|n| label.is_some_and(|l| n.label != l))
            .collect();

        let mut remap = Vec::with_capacity(keep.len());
        let mut next = 0;
        for &k in &keep {
            remap.push(next);
            if k {
                next += 1;
            }
        }

        let edges = std::mem::take(&mut state.edges);
        state.edges = edges
            .into_iter()
            .filter(|e| keep[e.from] && keep[e.to])
            .map(|e| StoredEdge {
                from: remap[e.from],
                to: remap[e.to],
                ..e
            })
            .collect();

        let nodes = std::mem::take(&mut state.nodes);
        state.nodes = nodes
            .into_iter()
            .zip(keep)
            .filter_map(|(n, k)| k.then_some(n))
            .collect();
    }
}

#[async_trait]
impl GraphStore for MemoryGraph {
    async fn push_node(&self, node: &NodeRef) -> Result<(), GraphError> {
        require_label("node", &node.label)?;
        let mut state = self.state();
        if state.matching(node).next().is_none() {
            state.nodes.push(StoredNode {
                label: node.label.clone(),
                props: node.props.clone(),
            });
        }
        Ok(())
    }

    async fn pull_node(&self, node: &NodeRef) -> Result<Vec<Props>, GraphError> {
        require_label("node", &node.label)?;
        let state = self.state();
        Ok(state
            .matching(node)
            .map(|i| state.nodes[i].props.clone())
            .collect())
    }

    async fn pull_node_prop(
        &self,
        node: &NodeRef,
        prop: &str,
    ) -> Result<Vec<PropValue>, GraphError> {
        require_label("node", &node.label)?;
        require_prop_name(prop)?;
        let state = self.state();
        Ok(state
            .matching(node)
            .filter_map(|i| state.nodes[i].props.get(prop).cloned())
            .collect())
    }

    async fn push_rel(&self, rel: &RelRef) -> Result<(), GraphError> {
        require_label("from-node", &rel.from.label)?;
        require_label("to-node", &rel.to.label)?;
        require_label("relationship", &rel.label)?;

        let mut state = self.state();
        let froms: Vec<usize> = state.matching(&rel.from).collect();
        let tos: Vec<usize> = state.matching(&rel.to).collect();

        for &from in &froms {
            for &to in &tos {
                let exists = state.edges.iter().any(|e| {
                    e.from == from && e.to == to && e.label == rel.label && e.props.matches(&rel.props)
                });
                if !exists {
                    state.edges.push(StoredEdge {
                        from,
                        to,
                        label: rel.label.clone(),
                        props: rel.props.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    async fn pull_rel(&self, rel: &RelRef) -> Result<Vec<(Props, Props)>, GraphError> {
        require_label("from-node", &rel.from.label)?;
        require_label("to-node", &rel.to.label)?;
        require_label("relationship", &rel.label)?;

        let state = self.state();
        let mut seen = BTreeSet::new();
        Ok(state
            .edges
            .iter()
            .filter(|e| state.edge_matches(e, rel))
            .filter(|e| seen.insert((e.from, e.to)))
            .map(|e| {
                (
                    state.nodes[e.from].props.clone(),
                    state.nodes[e.to].props.clone(),
                )
            })
            .collect())
    }

    async fn create_fulltext_index(
        &self,
        name: &str,
        label: &str,
        prop: &str,
    ) -> Result<(), GraphError> {
        require_fulltext_spec(name, label, prop)?;
        let mut state = self.state();
        if state.indexes.contains_key(name) {
            return Err(GraphError::IndexAlreadyExists {
                name: name.to_string(),
            });
        }
        state
            .indexes
            .insert(name.to_string(), (label.to_string(), prop.to_string()));
        Ok(())
    }
}
