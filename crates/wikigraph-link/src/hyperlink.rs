//! Hyperlink linking: `(V)-[HYPERLINKS]->(W)` whenever V's link list
//! contains W's title.
//!
//! All titles are pulled once into a set. Each node's link list is then
//! filtered against that set before anything is sent back to the store, so
//! links to articles that were never ingested cost no round trip. Total
//! store calls are O(N + number of qualifying links).

use std::collections::HashSet;

use wikigraph_core::{PropValue, Props, RelRef, Schema};
use wikigraph_graph::{GraphError, GraphStore};

use crate::error::Result;
use crate::{all_titles, expect_string, LinkReport, LinkStrategy};

/// Run the hyperlink pass over every article node.
pub async fn link<S: GraphStore + ?Sized>(store: &S, schema: &Schema) -> Result<LinkReport> {
    let mut report = LinkReport::new(LinkStrategy::Hyperlink);
    let titles: HashSet<String> = all_titles(store, schema).await?.into_iter().collect();
    tracing::debug!(titles = titles.len(), "Loaded article titles");

    for title in &titles {
        let links = links_of(store, schema, title).await?;

        for target in links {
            report.candidates += 1;

            if target == *title {
                report.skipped_self += 1;
                continue;
            }
            if !titles.contains(&target) {
                tracing::debug!(from = %title, to = %target, "Link target not stored, skipping");
                report.skipped_missing += 1;
                continue;
            }

            let rel = RelRef::new(
                schema.article(title),
                schema.article(&target),
                schema.hyperlink_rel.clone(),
                Props::new(),
            );
            store.push_rel(&rel).await?;
            report.edges_pushed += 1;
        }
    }

    Ok(report)
}

/// The link list of the node titled `title`.
///
/// Titles are assumed unique, so only the first match is used. A node with
/// no link property has no links.
async fn links_of<S: GraphStore + ?Sized>(
    store: &S,
    schema: &Schema,
    title: &str,
) -> Result<Vec<String>> {
    let values = store
        .pull_node_prop(&schema.article(title), &schema.links_key)
        .await?;

    let Some(first) = values.into_iter().next() else {
        return Ok(Vec::new());
    };

    match first {
        PropValue::List(items) => Ok(items
            .into_iter()
            .map(|item| expect_string(&schema.links_key, item))
            .collect::<std::result::Result<_, _>>()?),
        other => Err(GraphError::Validation(format!(
            "expected '{}' of article '{title}' to be a list, got {other:?}",
            schema.links_key
        ))
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wikigraph_core::{NodeRef, PropValue};
    use wikigraph_graph::MemoryGraph;

    use crate::LinkError;

    async fn push_article(graph: &MemoryGraph, title: &str, links: &[&str]) {
        let node = NodeRef::new(
            "Article",
            Props::new()
                .with("title", title)
                .with("links", links.to_vec()),
        );
        graph.push_node(&node).await.unwrap();
    }

    fn hyperlink(schema: &Schema, from: &str, to: &str) -> RelRef {
        RelRef::new(
            schema.article(from),
            schema.article(to),
            "HYPERLINKS",
            Props::new(),
        )
    }

    #[tokio::test]
    async fn test_links_only_to_stored_titles() {
        let graph = MemoryGraph::new();
        let schema = Schema::default();
        push_article(&graph, "A", &["B", "C"]).await;
        push_article(&graph, "B", &[]).await;

        let report = link(&graph, &schema).await.unwrap();

        let edges = graph.edges("HYPERLINKS");
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].0.get("title"), Some(&PropValue::from("A")));
        assert_eq!(edges[0].2.get("title"), Some(&PropValue::from("B")));
        assert_eq!(graph.count_rels(&hyperlink(&schema, "A", "C")), 0);

        assert_eq!(report.candidates, 2);
        assert_eq!(report.edges_pushed, 1);
        assert_eq!(report.skipped_missing, 1);
    }

    #[tokio::test]
    async fn test_no_self_loops() {
        let graph = MemoryGraph::new();
        let schema = Schema::default();
        push_article(&graph, "A", &["A", "B"]).await;
        push_article(&graph, "B", &["B"]).await;

        let report = link(&graph, &schema).await.unwrap();

        assert_eq!(graph.count_rels(&hyperlink(&schema, "A", "A")), 0);
        assert_eq!(graph.count_rels(&hyperlink(&schema, "B", "B")), 0);
        assert_eq!(graph.count_rels(&hyperlink(&schema, "A", "B")), 1);
        assert_eq!(report.skipped_self, 2);
    }

    #[tokio::test]
    async fn test_rerun_does_not_duplicate_edges() {
        let graph = MemoryGraph::new();
        let schema = Schema::default();
        push_article(&graph, "A", &["B", "B"]).await;
        push_article(&graph, "B", &["A"]).await;

        link(&graph, &schema).await.unwrap();
        link(&graph, &schema).await.unwrap();

        assert_eq!(graph.edges("HYPERLINKS").len(), 2);
        assert_eq!(graph.count_rels(&hyperlink(&schema, "A", "B")), 1);
        assert_eq!(graph.count_rels(&hyperlink(&schema, "B", "A")), 1);
    }

    #[tokio::test]
    async fn test_nodes_without_links_property_are_skipped() {
        let graph = MemoryGraph::new();
        let schema = Schema::default();
        graph
            .push_node(&NodeRef::new("Article", Props::new().with("title", "Bare")))
            .await
            .unwrap();
        push_article(&graph, "A", &["Bare"]).await;

        let report = link(&graph, &schema).await.unwrap();
        assert_eq!(report.edges_pushed, 1);
        assert_eq!(graph.count_rels(&hyperlink(&schema, "A", "Bare")), 1);
    }

    #[tokio::test]
    async fn test_non_list_links_is_a_validation_error() {
        let graph = MemoryGraph::new();
        let schema = Schema::default();
        graph
            .push_node(&NodeRef::new(
                "Article",
                Props::new().with("title", "A").with("links", "B"),
            ))
            .await
            .unwrap();

        let err = link(&graph, &schema).await.unwrap_err();
        assert!(matches!(err, LinkError::Graph(GraphError::Validation(_))));
    }

    #[tokio::test]
    async fn test_other_labels_are_ignored() {
        let graph = MemoryGraph::new();
        let schema = Schema::default();
        push_article(&graph, "A", &["Z"]).await;
        graph
            .push_node(&NodeRef::new("IndexNode", Props::new().with("title", "Z")))
            .await
            .unwrap();

        let report = link(&graph, &schema).await.unwrap();
        assert_eq!(report.edges_pushed, 0);
        assert!(graph.edges("HYPERLINKS").is_empty());
    }
}
