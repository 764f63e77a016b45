//! Core domain types for the wikigraph article graph.
//!
//! Nodes are never addressed by a stored identifier. Every read and write
//! locates its nodes through a label plus an exact match on property values,
//! so the types here describe property bags rather than entities.

use serde::{Deserialize, Serialize};

// ── Property Values ───────────────────────────────────────────────

/// A value the graph store accepts as a node or edge property.
///
/// There is no null variant: the store rejects missing-value
/// properties, so absence is modelled by leaving the key out of a [`Props`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<PropValue>),
}

impl PropValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Equality as the graph store evaluates it in a property match:
    /// integers and floats compare by numeric value, lists element-wise.
    pub fn same_value(&self, other: &PropValue) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::List(a), Self::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same_value(y))
            }
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a == b,
                _ => self == other,
            },
        }
    }
}

impl From<bool> for PropValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for PropValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for PropValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for PropValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for PropValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<&String> for PropValue {
    fn from(v: &String) -> Self {
        Self::String(v.clone())
    }
}

impl<T: Into<PropValue>> From<Vec<T>> for PropValue {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

// ── Property Bags ─────────────────────────────────────────────────

/// An insertion-ordered mapping of property name to value.
///
/// Order is preserved so that generated query text is stable for a given
/// input. Inserting a name that is already present replaces its value
/// without moving it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Props(Vec<(String, PropValue)>);

impl Props {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<PropValue>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.0.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    /// True if every entry of `subset` is present here with an equal value.
    /// This is the store's match rule for `{k: v, ...}` patterns.
    pub fn matches(&self, subset: &Props) -> bool {
        subset
            .iter()
            .all(|(k, v)| self.get(k).is_some_and(|own| own.same_value(v)))
    }
}

impl<K: Into<String>, V: Into<PropValue>> FromIterator<(K, V)> for Props {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut props = Props::new();
        for (k, v) in iter {
            props.insert(k, v);
        }
        props
    }
}

impl IntoIterator for Props {
    type Item = (String, PropValue);
    type IntoIter = std::vec::IntoIter<(String, PropValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

// ── Graph References ──────────────────────────────────────────────

/// A node located by label and property match.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRef {
    pub label: String,
    pub props: Props,
}

impl NodeRef {
    pub fn new(label: impl Into<String>, props: Props) -> Self {
        Self {
            label: label.into(),
            props,
        }
    }

    /// Every node carrying `label`, regardless of properties.
    pub fn any(label: impl Into<String>) -> Self {
        Self::new(label, Props::new())
    }
}

/// A directed, labeled edge `(from)-[label {props}]->(to)`.
#[derive(Debug, Clone, PartialEq)]
pub struct RelRef {
    pub from: NodeRef,
    pub to: NodeRef,
    pub label: String,
    pub props: Props,
}

impl RelRef {
    pub fn new(from: NodeRef, to: NodeRef, label: impl Into<String>, props: Props) -> Self {
        Self {
            from,
            to,
            label: label.into(),
            props,
        }
    }
}

// ── Articles ──────────────────────────────────────────────────────

/// An article as handed over by the acquisition side.
///
/// Every field is stored verbatim as a node property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleData {
    pub title: String,
    pub url: String,
    pub content: String,
    pub links: Vec<String>,
    pub html: String,
    /// Pre-assigned topic. Empty means "no topic"; never absent.
    #[serde(default)]
    pub topic: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_props_insert_replaces_in_place() {
        let mut props = Props::new().with("a", 1i64).with("b", "x");
        props.insert("a", 2i64);

        assert_eq!(props.len(), 2);
        assert_eq!(props.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(props.get("a"), Some(&PropValue::Int(2)));
    }

    #[test]
    fn test_numbers_match_across_int_and_float() {
        let edge = Props::new().with("confidence", 1.0).with("rank", 2i64);

        assert!(edge.matches(&Props::new().with("confidence", 1i64)));
        assert!(edge.matches(&Props::new().with("rank", 2.0)));
        assert!(!edge.matches(&Props::new().with("confidence", 0.5)));
        assert!(!edge.matches(&Props::new().with("confidence", "1")));
        assert!(PropValue::from(vec![1i64, 2]).same_value(&PropValue::from(vec![1.0, 2.0])));
        assert!(!PropValue::from(vec![1i64]).same_value(&PropValue::from(vec![1i64, 2])));
    }

    #[test]
    fn test_props_matches_subset() {
        let node = Props::new().with("title", "A").with("topic", "sci");

        assert!(node.matches(&Props::new()));
        assert!(node.matches(&Props::new().with("title", "A")));
        assert!(!node.matches(&Props::new().with("title", "B")));
        assert!(!node.matches(&Props::new().with("missing", "A")));
    }

    #[test]
    fn test_article_topic_defaults_to_empty() {
        let json = r#"{"title":"A","url":"u","content":"c","links":["B"],"html":"h"}"#;
        let article: ArticleData = serde_json::from_str(json).unwrap();
        assert_eq!(article.topic, "");
    }

    #[test]
    fn test_prop_value_untagged_deserialize() {
        let values: Vec<PropValue> = serde_json::from_str(r#"[true, 3, 1.5, "s", ["a", 1]]"#).unwrap();
        assert_eq!(
            values,
            vec![
                PropValue::Bool(true),
                PropValue::Int(3),
                PropValue::Float(1.5),
                PropValue::String("s".to_string()),
                PropValue::List(vec!["a".into(), PropValue::Int(1)]),
            ]
        );
    }
}
