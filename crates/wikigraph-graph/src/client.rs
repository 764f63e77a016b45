//! Neo4j connection management and shared graph client.

use neo4rs::{ConfigBuilder, Graph, Query};
use serde::Deserialize;

/// Errors from graph operations.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// The store could not be reached with the configured URI and credentials.
    #[error("Neo4j configuration error: {0}")]
    Configuration(String),

    /// A caller passed a reference or record of unexpected shape.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Neo4j query error: {0}")]
    Query(#[from] neo4rs::Error),

    /// Returned when creating an index whose name is taken. Callers that
    /// only need the index to exist should ignore this variant.
    #[error("Index already exists: {name}")]
    IndexAlreadyExists { name: String },

    #[error("Extraction error: {0}")]
    Extraction(String),
}

impl GraphError {
    pub fn is_index_already_exists(&self) -> bool {
        matches!(self, Self::IndexAlreadyExists { .. })
    }
}

/// Configuration for connecting to Neo4j.
///
/// Loaded from the `[neo4j]` section of `wikigraph.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphConfig {
    #[serde(default = "default_uri")]
    pub uri: String,
    #[serde(default = "default_user")]
    pub user: String,
    #[serde(default = "default_password")]
    pub password: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_fetch_size")]
    pub fetch_size: usize,
}

fn default_uri() -> String {
    "bolt://localhost:7687".to_string()
}

fn default_user() -> String {
    "neo4j".to_string()
}

fn default_password() -> String {
    "neo4j".to_string()
}

fn default_max_connections() -> u32 {
    16
}

fn default_fetch_size() -> usize {
    256
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: default_uri(),
            user: default_user(),
            password: default_password(),
            max_connections: default_max_connections(),
            fetch_size: default_fetch_size(),
        }
    }
}

/// Thread-safe Neo4j graph client with connection pooling.
///
/// Each call borrows a pooled connection for the duration of one query and
/// hands it back before returning, on success and on error alike.
/// Clone is cheap (inner Arc).
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
}

impl GraphClient {
    /// Connect to Neo4j with the given configuration.
    ///
    /// The driver pool is lazy, so a `RETURN 1` ping is sent to surface bad
    /// URIs, credentials, or an unreachable server here rather than on the
    /// first real query.
    pub async fn connect(config: &GraphConfig) -> Result<Self, GraphError> {
        let neo_config = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .max_connections(config.max_connections as usize)
            .fetch_size(config.fetch_size)
            .build()
            .map_err(|e| connection_error(config, e))?;

        let graph = Graph::connect(neo_config)
            .await
            .map_err(|e| connection_error(config, e))?;

        graph
            .run(Query::new("RETURN 1".to_string()))
            .await
            .map_err(|e| connection_error(config, e))?;

        tracing::info!(uri = %config.uri, "Connected to Neo4j");
        Ok(Self { graph })
    }

    /// Execute a write-only query (MERGE, DELETE, CREATE INDEX).
    pub async fn run(&self, query: Query) -> Result<(), GraphError> {
        self.graph.run(query).await?;
        Ok(())
    }

    /// Execute a read query and collect all rows.
    pub async fn query_rows(&self, query: Query) -> Result<Vec<neo4rs::Row>, GraphError> {
        let mut stream = self.graph.execute(query).await?;
        let mut rows = Vec::new();
        while let Some(row) = stream.next().await? {
            rows.push(row);
        }
        Ok(rows)
    }

    /// Execute a read query and return the first row, if any.
    pub async fn query_one(&self, query: Query) -> Result<Option<neo4rs::Row>, GraphError> {
        let mut stream = self.graph.execute(query).await?;
        Ok(stream.next().await?)
    }
}

fn connection_error(config: &GraphConfig, err: impl std::fmt::Display) -> GraphError {
    GraphError::Configuration(format!(
        "could not connect to {} as '{}' ({err}); check the URI and credentials \
         and that Neo4j is running",
        config.uri, config.user
    ))
}

/// Reject labels that would produce an unparseable query.
///
/// Labels are interpolated into query text without escaping; this only
/// catches the empty string, which is always a caller mistake.
pub(crate) fn require_label(kind: &str, label: &str) -> Result<(), GraphError> {
    if label.trim().is_empty() {
        return Err(GraphError::Validation(format!("{kind} label must not be empty")));
    }
    Ok(())
}

pub(crate) fn require_prop_name(prop: &str) -> Result<(), GraphError> {
    if prop.trim().is_empty() {
        return Err(GraphError::Validation(
            "property name must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Shared by every store so a bad index spec fails before anything is sent.
pub(crate) fn require_fulltext_spec(name: &str, label: &str, prop: &str) -> Result<(), GraphError> {
    require_label("index", label)?;
    if name.trim().is_empty() || prop.trim().is_empty() {
        return Err(GraphError::Validation(
            "fulltext index name and property must not be empty".to_string(),
        ));
    }
    Ok(())
}
