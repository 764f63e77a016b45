//! Title list parsing.
//!
//! One title per line. Blank lines and lines starting with `#` are ignored.
//! A `[TOPIC=name]` line assigns `name` to every title below it until the
//! next such line; titles before any header have no topic. Several titles
//! may share a line when separated by tabs.

use std::collections::HashMap;
use std::path::Path;

use crate::error::Result;

/// A listed title and the topic it was filed under (empty if none).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleEntry {
    pub title: String,
    pub topic: String,
}

/// The parsed title list, in file order.
#[derive(Debug, Clone, Default)]
pub struct TitleList {
    entries: Vec<TitleEntry>,
    topics: HashMap<String, String>,
}

impl TitleList {
    pub fn parse(input: &str) -> Self {
        let mut entries = Vec::new();
        let mut current_topic = String::new();

        for line in input.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(topic) = parse_topic_header(line) {
                current_topic = topic;
                continue;
            }
            for title in line.split('\t').map(str::trim).filter(|t| !t.is_empty()) {
                entries.push(TitleEntry {
                    title: title.to_string(),
                    topic: current_topic.clone(),
                });
            }
        }

        let topics = entries
            .iter()
            .map(|e| (e.title.clone(), e.topic.clone()))
            .collect();
        Self { entries, topics }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let input = std::fs::read_to_string(path)?;
        Ok(Self::parse(&input))
    }

    pub fn entries(&self) -> &[TitleEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, title: &str) -> bool {
        self.topics.contains_key(title)
    }

    /// The non-empty topic `title` was filed under, if any. A title listed
    /// twice keeps its last topic.
    pub fn topic_of(&self, title: &str) -> Option<&str> {
        self.topics
            .get(title)
            .map(String::as_str)
            .filter(|t| !t.is_empty())
    }
}

/// `[TOPIC=Physics]` -> `Physics`. Case-insensitive on the keyword.
fn parse_topic_header(line: &str) -> Option<String> {
    let inner = line.strip_prefix('[')?.strip_suffix(']')?;
    let (key, value) = inner.split_once('=')?;
    if !key.trim().eq_ignore_ascii_case("topic") {
        return None;
    }
    Some(value.trim().to_string())
}
