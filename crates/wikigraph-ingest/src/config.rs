//! Configuration for wikigraph.
//!
//! Configuration is loaded from (in priority order):
//! 1. Environment variables (`WIKIGRAPH` prefix, `__` between levels,
//!    e.g. `WIKIGRAPH__NEO4J__URI`)
//! 2. Config file (`wikigraph.toml` by default)
//! 3. Defaults

use serde::Deserialize;

use wikigraph_core::Schema;
use wikigraph_graph::GraphConfig;
use wikigraph_link::DEFAULT_TOPIC_GROUP_WARN;

use crate::error::Result;

/// Top-level settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub neo4j: GraphConfig,

    #[serde(default)]
    pub schema: Schema,

    #[serde(default)]
    pub ingest: IngestConfig,
}

/// The `[ingest]` section.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct IngestConfig {
    /// Maximum node upserts in flight at once.
    #[serde(default = "default_max_concurrent_writes")]
    pub max_concurrent_writes: usize,

    /// Topic group size above which direct topic linking warns.
    #[serde(default = "default_topic_group_warn")]
    pub topic_group_warn: usize,
}

fn default_max_concurrent_writes() -> usize {
    4
}

fn default_topic_group_warn() -> usize {
    DEFAULT_TOPIC_GROUP_WARN
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_concurrent_writes: default_max_concurrent_writes(),
            topic_group_warn: default_topic_group_warn(),
        }
    }
}

/// Load settings from `<file_prefix>.toml` (optional) and the environment.
pub fn load_settings(file_prefix: &str) -> Result<Settings> {
    let cfg = config::Config::builder()
        .add_source(config::File::with_name(file_prefix).required(false))
        .add_source(
            config::Environment::with_prefix("WIKIGRAPH")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(cfg.try_deserialize()?)
}
