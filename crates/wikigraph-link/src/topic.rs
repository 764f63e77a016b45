//! Topic linking: connect articles that share a pre-assigned topic.
//!
//! Two strategies over the same grouping:
//! - direct: one `TOPIC` edge per unordered pair in a group, directed from
//!   the lexicographically smaller title to the larger one. Quadratic in the
//!   group size, fit only for small curated sets.
//! - indexed: one `IndexNode {topic}` per group and one `PRELINKED` edge
//!   from each member to it. Linear.
//!
//! Articles whose topic is empty take part in neither.

use std::collections::{BTreeMap, BTreeSet};

use wikigraph_core::{Props, RelRef, Schema};
use wikigraph_graph::GraphStore;

use crate::error::Result;
use crate::{all_titles, expect_string, LinkReport, LinkStrategy};

/// Topics are assigned ahead of time, so every topic edge is certain.
const TOPIC_CONFIDENCE: f64 = 1.0;

/// Article titles grouped by non-empty topic.
#[derive(Debug, Default)]
pub struct TopicGroups {
    pub groups: BTreeMap<String, BTreeSet<String>>,
    /// Titles carrying a non-empty topic.
    pub assigned: usize,
    /// Titles with an empty or missing topic.
    pub unassigned: usize,
}

/// Read every article's topic and group titles by it.
pub async fn collect_groups<S: GraphStore + ?Sized>(
    store: &S,
    schema: &Schema,
) -> Result<TopicGroups> {
    let mut out = TopicGroups::default();

    for title in all_titles(store, schema).await? {
        let topic = store
            .pull_node_prop(&schema.article(&title), &schema.topic_key)
            .await?
            .into_iter()
            .next()
            .map(|v| expect_string(&schema.topic_key, v))
            .transpose()?
            .unwrap_or_default();

        if topic.is_empty() {
            out.unassigned += 1;
            continue;
        }
        out.assigned += 1;
        out.groups.entry(topic).or_default().insert(title);
    }

    Ok(out)
}

fn confidence() -> Props {
    Props::new().with("confidence", TOPIC_CONFIDENCE)
}

/// Connect every pair of articles sharing a topic with a `TOPIC` edge.
pub async fn link_direct<S: GraphStore + ?Sized>(
    store: &S,
    schema: &Schema,
    group_warn: usize,
) -> Result<LinkReport> {
    let mut report = LinkReport::new(LinkStrategy::TopicDirect);
    let topics = collect_groups(store, schema).await?;
    report.candidates = topics.assigned;
    report.skipped_no_topic = topics.unassigned;

    for (topic, titles) in &topics.groups {
        if titles.len() > group_warn {
            tracing::warn!(
                topic = %topic,
                members = titles.len(),
                edges = titles.len() * (titles.len() - 1) / 2,
                "Large topic group for direct linking; consider topic-indexed"
            );
        }

        let members: Vec<&String> = titles.iter().collect();
        for (i, from) in members.iter().enumerate() {
            for to in &members[i + 1..] {
                let rel = RelRef::new(
                    schema.article(from),
                    schema.article(to),
                    schema.topic_rel.clone(),
                    confidence(),
                );
                store.push_rel(&rel).await?;
                report.edges_pushed += 1;
            }
        }
    }

    Ok(report)
}

/// Link every article to a per-topic index node with a `PRELINKED` edge.
pub async fn link_indexed<S: GraphStore + ?Sized>(
    store: &S,
    schema: &Schema,
) -> Result<LinkReport> {
    let mut report = LinkReport::new(LinkStrategy::TopicIndexed);
    let topics = collect_groups(store, schema).await?;
    report.candidates = topics.assigned;
    report.skipped_no_topic = topics.unassigned;

    for topic in topics.groups.keys() {
        store.push_node(&schema.index_node(topic)).await?;
        report.index_nodes += 1;
    }

    for (topic, titles) in &topics.groups {
        for title in titles {
            let rel = RelRef::new(
                schema.article(title),
                schema.index_node(topic),
                schema.prelinked_rel.clone(),
                confidence(),
            );
            store.push_rel(&rel).await?;
            report.edges_pushed += 1;
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wikigraph_core::{NodeRef, PropValue};
    use wikigraph_graph::MemoryGraph;

    async fn push_article(graph: &MemoryGraph, title: &str, topic: &str) {
        let node = NodeRef::new(
            "Article",
            Props::new().with("title", title).with("topic", topic),
        );
        graph.push_node(&node).await.unwrap();
    }

    async fn seeded() -> MemoryGraph {
        let graph = MemoryGraph::new();
        push_article(&graph, "Physics", "sci").await;
        push_article(&graph, "Chemistry", "sci").await;
        push_article(&graph, "Biology", "sci").await;
        push_article(&graph, "Poetry", "").await;
        graph
    }

    #[tokio::test]
    async fn test_collect_groups_excludes_empty_topic() {
        let graph = seeded().await;
        let groups = collect_groups(&graph, &Schema::default()).await.unwrap();

        assert_eq!(groups.groups.len(), 1);
        assert_eq!(groups.groups["sci"].len(), 3);
        assert_eq!(groups.assigned, 3);
        assert_eq!(groups.unassigned, 1);
    }

    #[tokio::test]
    async fn test_indexed_creates_one_index_node_per_topic() {
        let graph = seeded().await;
        let schema = Schema::default();

        let report = link_indexed(&graph, &schema).await.unwrap();

        assert_eq!(graph.count_nodes(&NodeRef::any("IndexNode")), 1);
        assert_eq!(graph.count_nodes(&schema.index_node("sci")), 1);

        let edges = graph.edges("PRELINKED");
        assert_eq!(edges.len(), 3);
        for (from, edge, to) in &edges {
            assert_eq!(edge.get("confidence"), Some(&PropValue::Float(1.0)));
            assert_eq!(to.get("topic"), Some(&PropValue::from("sci")));
            assert_ne!(from.get("title"), Some(&PropValue::from("Poetry")));
        }

        assert_eq!(report.index_nodes, 1);
        assert_eq!(report.edges_pushed, 3);
        assert_eq!(report.skipped_no_topic, 1);
    }

    #[tokio::test]
    async fn test_indexed_is_idempotent() {
        let graph = seeded().await;
        let schema = Schema::default();

        link_indexed(&graph, &schema).await.unwrap();
        link_indexed(&graph, &schema).await.unwrap();

        assert_eq!(graph.count_nodes(&NodeRef::any("IndexNode")), 1);
        assert_eq!(graph.edges("PRELINKED").len(), 3);
    }

    #[tokio::test]
    async fn test_direct_links_each_pair_once_smaller_title_first() {
        let graph = seeded().await;
        let schema = Schema::default();

        let report = link_direct(&graph, &schema, 10).await.unwrap();

        let mut pairs: Vec<(String, String)> = graph
            .edges("TOPIC")
            .into_iter()
            .map(|(from, edge, to)| {
                assert_eq!(edge.get("confidence"), Some(&PropValue::Float(1.0)));
                (
                    from.get("title").and_then(|v| v.as_str()).unwrap().to_string(),
                    to.get("title").and_then(|v| v.as_str()).unwrap().to_string(),
                )
            })
            .collect();
        pairs.sort();

        assert_eq!(
            pairs,
            vec![
                ("Biology".to_string(), "Chemistry".to_string()),
                ("Biology".to_string(), "Physics".to_string()),
                ("Chemistry".to_string(), "Physics".to_string()),
            ]
        );
        assert_eq!(report.edges_pushed, 3);
    }

    #[tokio::test]
    async fn test_direct_excludes_empty_topic() {
        let graph = MemoryGraph::new();
        let schema = Schema::default();
        push_article(&graph, "A", "").await;
        push_article(&graph, "B", "").await;
        push_article(&graph, "C", "art").await;

        let report = link_direct(&graph, &schema, 10).await.unwrap();

        assert!(graph.edges("TOPIC").is_empty());
        assert_eq!(report.skipped_no_topic, 2);
    }

    #[tokio::test]
    async fn test_missing_topic_property_counts_as_empty() {
        let graph = MemoryGraph::new();
        let schema = Schema::default();
        graph
            .push_node(&NodeRef::new("Article", Props::new().with("title", "Bare")))
            .await
            .unwrap();

        let groups = collect_groups(&graph, &schema).await.unwrap();
        assert!(groups.groups.is_empty());
        assert_eq!(groups.unassigned, 1);
    }
}
