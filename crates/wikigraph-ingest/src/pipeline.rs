//! Ingestion: fulltext index setup followed by one node upsert per article.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use wikigraph_core::{ArticleData, Schema};
use wikigraph_graph::GraphStore;

use crate::error::Result;
use crate::titles::TitleList;

/// Counters from one ingestion run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// Article nodes upserted.
    pub pushed: usize,
    /// Articles dropped because their title is not in the title list.
    pub skipped: usize,
}

/// Create the fulltext index over article content.
///
/// An index that already exists under the configured name is not an error.
pub async fn ensure_fulltext_index<S: GraphStore + ?Sized>(
    store: &S,
    schema: &Schema,
) -> Result<()> {
    match store
        .create_fulltext_index(
            &schema.fulltext_index,
            &schema.article_label,
            &schema.fulltext_property,
        )
        .await
    {
        Ok(()) => Ok(()),
        Err(e) if e.is_index_already_exists() => {
            tracing::debug!(index = %schema.fulltext_index, "Fulltext index already present");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Ingest an article stream.
///
/// The stream is pulled lazily; at most `max_concurrent` upserts are in
/// flight at once. When `titles` is given, only listed articles are kept and
/// an article without a topic takes the one its title was filed under. The
/// first read or write failure stops the run; nodes already written remain.
pub async fn ingest<S, I>(
    store: S,
    schema: &Schema,
    articles: I,
    titles: Option<&TitleList>,
    max_concurrent: usize,
) -> Result<IngestReport>
where
    S: GraphStore + Clone + 'static,
    I: IntoIterator<Item = Result<ArticleData>>,
{
    ensure_fulltext_index(&store, schema).await?;

    let limiter = Arc::new(Semaphore::new(max_concurrent.max(1)));
    let schema = Arc::new(schema.clone());
    let mut tasks = JoinSet::new();
    let mut report = IngestReport::default();

    for article in articles {
        let mut article = article?;

        if let Some(list) = titles {
            if !list.contains(&article.title) {
                tracing::debug!(title = %article.title, "Not in title list, skipping");
                report.skipped += 1;
                continue;
            }
            if article.topic.is_empty() {
                if let Some(topic) = list.topic_of(&article.title) {
                    article.topic = topic.to_string();
                }
            }
        }

        let permit = limiter.clone().acquire_owned().await?;
        let store = store.clone();
        let schema = schema.clone();
        tasks.spawn(async move {
            let _permit = permit;
            let node = schema.article_node(&article);
            store.push_node(&node).await?;
            tracing::debug!(title = %article.title, "Article node upserted");
            Ok::<_, crate::IngestError>(())
        });

        while let Some(done) = tasks.try_join_next() {
            done??;
            report.pushed += 1;
        }
    }

    while let Some(done) = tasks.join_next().await {
        done??;
        report.pushed += 1;
    }

    tracing::info!(
        pushed = report.pushed,
        skipped = report.skipped,
        "Ingestion finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    use wikigraph_core::{NodeRef, PropValue};
    use wikigraph_graph::{GraphError, MemoryGraph};

    fn article(title: &str, topic: &str) -> ArticleData {
        ArticleData {
            title: title.to_string(),
            url: format!("https://en.wikipedia.org/wiki/{title}"),
            content: format!("{title} content"),
            links: vec![],
            html: String::new(),
            topic: topic.to_string(),
        }
    }

    #[tokio::test]
    async fn test_ensure_index_twice_is_quiet() {
        let graph = MemoryGraph::new();
        let schema = Schema::default();

        ensure_fulltext_index(&graph, &schema).await.unwrap();
        ensure_fulltext_index(&graph, &schema).await.unwrap();

        assert_eq!(graph.index_names(), vec!["ArticleContentIndex".to_string()]);
    }

    #[tokio::test]
    async fn test_index_failure_other_than_existing_is_fatal() {
        let graph = MemoryGraph::new();
        let schema = Schema {
            article_label: String::new(),
            ..Schema::default()
        };

        let err = ensure_fulltext_index(&graph, &schema).await.unwrap_err();
        assert!(matches!(
            err,
            crate::IngestError::Graph(GraphError::Validation(_))
        ));

        let result = ingest(
            graph.clone(),
            &schema,
            vec![article("A", "")].into_iter().map(Ok),
            None,
            1,
        )
        .await;
        assert!(matches!(
            result,
            Err(crate::IngestError::Graph(GraphError::Validation(_)))
        ));
        assert!(graph.index_names().is_empty());
        assert_eq!(graph.count_nodes(&NodeRef::any("Article")), 0);
        assert_eq!(graph.count_nodes(&NodeRef::any("")), 0);
    }

    #[tokio::test]
    async fn test_ingest_pushes_every_article_once() {
        let graph = MemoryGraph::new();
        let schema = Schema::default();
        let articles = vec![article("A", ""), article("B", "sci"), article("A", "")];

        let report = ingest(graph.clone(), &schema, articles.into_iter().map(Ok), None, 2)
            .await
            .unwrap();

        assert_eq!(report, IngestReport { pushed: 3, skipped: 0 });
        assert_eq!(graph.count_nodes(&NodeRef::any("Article")), 2);
        assert_eq!(graph.index_names().len(), 1);
    }

    #[tokio::test]
    async fn test_title_list_filters_and_assigns_topics() {
        let graph = MemoryGraph::new();
        let schema = Schema::default();
        let titles = TitleList::parse("A\n[TOPIC=sci]\nB\tC\n");
        let articles = vec![
            article("A", ""),
            article("B", ""),
            article("C", "math"),
            article("D", ""),
        ];

        let report = ingest(
            graph.clone(),
            &schema,
            articles.into_iter().map(Ok),
            Some(&titles),
            4,
        )
        .await
        .unwrap();

        assert_eq!(report, IngestReport { pushed: 3, skipped: 1 });

        assert_eq!(topic_of(&graph, &schema, "A").await, PropValue::from(""));
        assert_eq!(topic_of(&graph, &schema, "B").await, PropValue::from("sci"));
        assert_eq!(topic_of(&graph, &schema, "C").await, PropValue::from("math"));
        assert_eq!(graph.count_nodes(&schema.article("D")), 0);
    }

    #[tokio::test]
    async fn test_bad_record_stops_ingestion() {
        let graph = MemoryGraph::new();
        let schema = Schema::default();
        let bad = serde_json::from_str::<ArticleData>("{}").unwrap_err();
        let articles: Vec<Result<ArticleData>> = vec![
            Ok(article("A", "")),
            Err(crate::IngestError::Article { line: 2, source: bad }),
            Ok(article("B", "")),
        ];

        let result = ingest(graph.clone(), &schema, articles, None, 1).await;

        assert!(matches!(result, Err(crate::IngestError::Article { line: 2, .. })));
        assert_eq!(graph.count_nodes(&schema.article("B")), 0);
    }

    async fn topic_of(graph: &MemoryGraph, schema: &Schema, title: &str) -> PropValue {
        let nodes = graph.pull_node(&schema.article(title)).await.unwrap();
        assert_eq!(nodes.len(), 1, "expected one node titled {title}");
        nodes[0].get(&schema.topic_key).cloned().unwrap()
    }
}
