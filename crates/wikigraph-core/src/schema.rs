//! Graph naming: labels, relationship types, and property keys.
//!
//! Labels and property names are interpolated directly into query text,
//! so they come from operator configuration and never from article data.

use serde::Deserialize;

use crate::types::{ArticleData, NodeRef, Props};

/// Names used when writing and linking article nodes.
///
/// Loaded from the `[schema]` section of `wikigraph.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Schema {
    /// Label of article nodes.
    #[serde(default = "default_article_label")]
    pub article_label: String,

    /// Label of the per-topic index nodes created by indexed topic linking.
    #[serde(default = "default_index_label")]
    pub index_label: String,

    #[serde(default = "default_hyperlink_rel")]
    pub hyperlink_rel: String,

    #[serde(default = "default_topic_rel")]
    pub topic_rel: String,

    #[serde(default = "default_prelinked_rel")]
    pub prelinked_rel: String,

    /// Name of the fulltext index over article content.
    #[serde(default = "default_fulltext_index")]
    pub fulltext_index: String,

    #[serde(default = "default_fulltext_property")]
    pub fulltext_property: String,

    #[serde(default = "default_title_key")]
    pub title_key: String,

    #[serde(default = "default_links_key")]
    pub links_key: String,

    #[serde(default = "default_topic_key")]
    pub topic_key: String,
}

impl Schema {
    /// Reference to the article node with the given title.
    pub fn article(&self, title: &str) -> NodeRef {
        NodeRef::new(
            self.article_label.clone(),
            Props::new().with(self.title_key.clone(), title),
        )
    }

    /// The full node written for an article at ingestion, keyed by this
    /// schema's property names.
    pub fn article_node(&self, article: &ArticleData) -> NodeRef {
        NodeRef::new(
            self.article_label.clone(),
            Props::new()
                .with(self.title_key.clone(), &article.title)
                .with("url", &article.url)
                .with(self.fulltext_property.clone(), &article.content)
                .with(self.links_key.clone(), article.links.clone())
                .with("html", &article.html)
                .with(self.topic_key.clone(), &article.topic),
        )
    }

    /// Reference to the index node for the given topic.
    pub fn index_node(&self, topic: &str) -> NodeRef {
        NodeRef::new(
            self.index_label.clone(),
            Props::new().with(self.topic_key.clone(), topic),
        )
    }
}

fn default_article_label() -> String {
    "Article".to_string()
}

fn default_index_label() -> String {
    "IndexNode".to_string()
}

fn default_hyperlink_rel() -> String {
    "HYPERLINKS".to_string()
}

fn default_topic_rel() -> String {
    "TOPIC".to_string()
}

fn default_prelinked_rel() -> String {
    "PRELINKED".to_string()
}

fn default_fulltext_index() -> String {
    "ArticleContentIndex".to_string()
}

fn default_fulltext_property() -> String {
    "content".to_string()
}

fn default_title_key() -> String {
    "title".to_string()
}

fn default_links_key() -> String {
    "links".to_string()
}

fn default_topic_key() -> String {
    "topic".to_string()
}

impl Default for Schema {
    fn default() -> Self {
        Self {
            article_label: default_article_label(),
            index_label: default_index_label(),
            hyperlink_rel: default_hyperlink_rel(),
            topic_rel: default_topic_rel(),
            prelinked_rel: default_prelinked_rel(),
            fulltext_index: default_fulltext_index(),
            fulltext_property: default_fulltext_property(),
            title_key: default_title_key(),
            links_key: default_links_key(),
            topic_key: default_topic_key(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PropValue;

    #[test]
    fn test_default_schema() {
        let schema = Schema::default();
        assert_eq!(schema.article_label, "Article");
        assert_eq!(schema.index_label, "IndexNode");
        assert_eq!(schema.hyperlink_rel, "HYPERLINKS");
        assert_eq!(schema.prelinked_rel, "PRELINKED");
        assert_eq!(schema.fulltext_index, "ArticleContentIndex");
    }

    #[test]
    fn test_partial_schema_fills_defaults() {
        let schema: Schema = serde_json::from_str(r#"{"article_label": "WikiData"}"#).unwrap();
        assert_eq!(schema.article_label, "WikiData");
        assert_eq!(schema.title_key, "title");
    }

    #[test]
    fn test_article_ref() {
        let node = Schema::default().article("Rust");
        assert_eq!(node.label, "Article");
        assert_eq!(node.props.get("title"), Some(&PropValue::from("Rust")));
    }

    #[test]
    fn test_article_node_uses_configured_keys() {
        let schema = Schema {
            title_key: "name".to_string(),
            links_key: "outlinks".to_string(),
            ..Schema::default()
        };
        let article = ArticleData {
            title: "Rust".to_string(),
            url: "u".to_string(),
            content: "text".to_string(),
            links: vec!["C".to_string()],
            html: String::new(),
            topic: "lang".to_string(),
        };

        let node = schema.article_node(&article);
        let keys: Vec<&str> = node.props.keys().collect();
        assert_eq!(keys, vec!["name", "url", "content", "outlinks", "html", "topic"]);
        assert_eq!(node.props.get("topic"), Some(&PropValue::from("lang")));
    }
}
