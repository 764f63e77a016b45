//! wikigraph-link: Edge construction between stored article nodes.
//!
//! Linking runs after ingestion, reads node properties through a
//! [`GraphStore`], computes candidate pairs in memory, and writes edges
//! with MERGE so that re-running a pass never duplicates edges.

pub mod error;
pub mod hyperlink;
pub mod topic;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use wikigraph_core::{PropValue, Schema};
use wikigraph_graph::{GraphError, GraphStore};

pub use error::LinkError;

/// Topic groups larger than this trigger a warning under direct linking.
pub const DEFAULT_TOPIC_GROUP_WARN: usize = 500;

/// The available linking passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkStrategy {
    /// `(V)-[HYPERLINKS]->(W)` when V's link list names W.
    Hyperlink,
    /// `(a)-[TOPIC]->(b)` for every pair sharing a topic. Quadratic per topic.
    TopicDirect,
    /// `(article)-[PRELINKED]->(IndexNode)` per topic. Linear.
    TopicIndexed,
}

impl LinkStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hyperlink => "hyperlink",
            Self::TopicDirect => "topic-direct",
            Self::TopicIndexed => "topic-indexed",
        }
    }
}

impl fmt::Display for LinkStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LinkStrategy {
    type Err = LinkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "hyperlink" | "hyperlinks" => Ok(Self::Hyperlink),
            "topic-direct" => Ok(Self::TopicDirect),
            "topic-indexed" | "prelinked" => Ok(Self::TopicIndexed),
            _ => Err(LinkError::UnknownStrategy(s.to_string())),
        }
    }
}

/// Counters from a single linking pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkReport {
    pub strategy: LinkStrategy,
    /// Candidate pairs considered (links read, or titles carrying a topic).
    pub candidates: usize,
    /// Edge MERGE calls issued.
    pub edges_pushed: usize,
    /// Links dropped because they point back at their own node.
    pub skipped_self: usize,
    /// Links dropped because no stored node has the target title.
    pub skipped_missing: usize,
    /// Nodes excluded from topic linking because their topic is empty.
    pub skipped_no_topic: usize,
    /// Index nodes upserted by indexed topic linking.
    pub index_nodes: usize,
}

impl LinkReport {
    pub(crate) fn new(strategy: LinkStrategy) -> Self {
        Self {
            strategy,
            candidates: 0,
            edges_pushed: 0,
            skipped_self: 0,
            skipped_missing: 0,
            skipped_no_topic: 0,
            index_nodes: 0,
        }
    }
}

/// Runs linking passes against one store.
pub struct Linker<S> {
    store: S,
    schema: Schema,
    topic_group_warn: usize,
}

impl<S: GraphStore> Linker<S> {
    pub fn new(store: S, schema: Schema) -> Self {
        Self {
            store,
            schema,
            topic_group_warn: DEFAULT_TOPIC_GROUP_WARN,
        }
    }

    /// Set the topic group size above which direct linking warns.
    pub fn with_topic_group_warn(mut self, size: usize) -> Self {
        self.topic_group_warn = size;
        self
    }

    /// Run one linking pass.
    pub async fn run(&self, strategy: LinkStrategy) -> error::Result<LinkReport> {
        tracing::info!(strategy = %strategy, label = %self.schema.article_label, "Linking started");

        let report = match strategy {
            LinkStrategy::Hyperlink => hyperlink::link(&self.store, &self.schema).await?,
            LinkStrategy::TopicDirect => {
                topic::link_direct(&self.store, &self.schema, self.topic_group_warn).await?
            }
            LinkStrategy::TopicIndexed => topic::link_indexed(&self.store, &self.schema).await?,
        };

        tracing::info!(
            strategy = %strategy,
            candidates = report.candidates,
            edges_pushed = report.edges_pushed,
            skipped_self = report.skipped_self,
            skipped_missing = report.skipped_missing,
            skipped_no_topic = report.skipped_no_topic,
            index_nodes = report.index_nodes,
            "Linking finished"
        );
        Ok(report)
    }
}

/// Every distinct article title in the store.
pub(crate) async fn all_titles<S: GraphStore + ?Sized>(
    store: &S,
    schema: &Schema,
) -> error::Result<Vec<String>> {
    let values = store
        .pull_node_prop(&wikigraph_core::NodeRef::any(&schema.article_label), &schema.title_key)
        .await?;

    let mut titles = Vec::with_capacity(values.len());
    for value in values {
        titles.push(expect_string(&schema.title_key, value)?);
    }
    titles.sort_unstable();
    titles.dedup();
    Ok(titles)
}

pub(crate) fn expect_string(key: &str, value: PropValue) -> Result<String, GraphError> {
    match value {
        PropValue::String(s) => Ok(s),
        other => Err(GraphError::Validation(format!(
            "expected property '{key}' to be a string, got {other:?}"
        ))),
    }
}
