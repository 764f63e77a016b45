//! CLI entry point for building the wikigraph article graph.

use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

use wikigraph_core::{NodeRef, Props, RelRef, Schema};
use wikigraph_graph::GraphClient;
use wikigraph_link::{LinkStrategy, Linker};

use wikigraph_ingest::articles::ArticleReader;
use wikigraph_ingest::config::{load_settings, Settings};
use wikigraph_ingest::pipeline::{ensure_fulltext_index, ingest};
use wikigraph_ingest::titles::TitleList;

#[derive(Parser)]
#[command(name = "wikigraph")]
#[command(about = "Load Wikipedia articles into Neo4j and link them")]
struct Cli {
    /// Config file prefix (default: wikigraph).
    #[arg(short, long, default_value = "wikigraph", global = true)]
    config: String,

    /// Override the Neo4j URI from config.
    #[arg(long, global = true)]
    uri: Option<String>,

    /// Override the Neo4j user from config.
    #[arg(long, global = true)]
    user: Option<String>,

    /// Override the Neo4j password from config.
    #[arg(long, global = true)]
    password: Option<String>,

    /// Emit logs as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the fulltext index over article content.
    Index,

    /// Ingest articles from a JSON Lines file (`-` for stdin).
    Load {
        #[arg(short, long)]
        articles: PathBuf,

        /// Title list; only listed titles are ingested.
        #[arg(short, long)]
        titles: Option<PathBuf>,
    },

    /// Run a linking pass: hyperlink, topic-direct, topic-indexed.
    Link {
        #[arg(short, long, default_value = "hyperlink")]
        strategy: String,
    },

    /// Delete nodes and their edges.
    Clear {
        /// Only delete nodes with this label.
        #[arg(long)]
        label: Option<String>,
    },

    /// Print node and edge counts.
    Status,
}

#[derive(Serialize)]
struct StatusReport {
    articles: i64,
    index_nodes: i64,
    hyperlinks: i64,
    topic_edges: i64,
    prelinked_edges: i64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json);

    let settings = load_settings(&cli.config)?;
    let graph = connect(&cli, &settings).await?;
    let schema = &settings.schema;

    match cli.command {
        Command::Index => {
            ensure_fulltext_index(&graph, schema).await?;
            tracing::info!(index = %schema.fulltext_index, "Fulltext index ready");
        }
        Command::Load { articles, titles } => {
            let titles = titles.as_deref().map(TitleList::load).transpose()?;
            if let Some(list) = &titles {
                if list.is_empty() {
                    tracing::warn!("Title list is empty; no article will be ingested");
                }
                tracing::info!(titles = list.len(), "Title list loaded");
            }

            let reader = open_articles(&articles)?;
            let report = ingest(
                graph,
                schema,
                reader,
                titles.as_ref(),
                settings.ingest.max_concurrent_writes,
            )
            .await?;
            print_json(&report)?;
        }
        Command::Link { strategy } => {
            let strategy: LinkStrategy = strategy.parse()?;
            let linker = Linker::new(graph, schema.clone())
                .with_topic_group_warn(settings.ingest.topic_group_warn);
            let report = linker.run(strategy).await?;
            print_json(&report)?;
        }
        Command::Clear { label } => {
            graph.clear(label.as_deref()).await?;
        }
        Command::Status => {
            let report = status(&graph, schema).await?;
            print_json(&report)?;
        }
    }

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt().with_env_filter(filter).with_writer(io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn connect(cli: &Cli, settings: &Settings) -> anyhow::Result<GraphClient> {
    let mut graph_config = settings.neo4j.clone();
    if let Some(uri) = &cli.uri {
        graph_config.uri = uri.clone();
    }
    if let Some(user) = &cli.user {
        graph_config.user = user.clone();
    }
    if let Some(password) = &cli.password {
        graph_config.password = password.clone();
    }

    Ok(GraphClient::connect(&graph_config).await?)
}

fn open_articles(path: &Path) -> anyhow::Result<ArticleReader<Box<dyn BufRead>>> {
    let input: Box<dyn BufRead> = if path.as_os_str() == "-" {
        Box::new(io::stdin().lock())
    } else {
        Box::new(BufReader::new(std::fs::File::open(path)?))
    };
    Ok(ArticleReader::new(input))
}

async fn status(graph: &GraphClient, schema: &Schema) -> anyhow::Result<StatusReport> {
    let article = NodeRef::any(&schema.article_label);
    let index = NodeRef::any(&schema.index_label);
    let between = |from: &NodeRef, to: &NodeRef, label: &str| {
        RelRef::new(from.clone(), to.clone(), label, Props::new())
    };

    Ok(StatusReport {
        articles: graph.count_nodes(&article).await?,
        index_nodes: graph.count_nodes(&index).await?,
        hyperlinks: graph
            .count_rels(&between(&article, &article, &schema.hyperlink_rel))
            .await?,
        topic_edges: graph
            .count_rels(&between(&article, &article, &schema.topic_rel))
            .await?,
        prelinked_edges: graph
            .count_rels(&between(&article, &index, &schema.prelinked_rel))
            .await?,
    })
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
