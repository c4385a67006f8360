//! Graph Layout CLI
//!
//! Queries the graph around a managed object (live service or synthetic
//! fallback), runs the force layout and prints the positioned graph as JSON.
//!
//! Usage:
//!   cargo run --bin graph_layout -- svc-a
//!   cargo run --bin graph_layout -- svc-a --api-url http://localhost:8000 --depth 3
//!   cargo run --bin graph_layout -- svc-a --config graph-view.yaml --pretty

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use tkg_graph_canvas::config::API_URL_ENV;
use tkg_graph_canvas::{EngineConfig, GraphEngine};

/// Lay out a managed-object graph and dump it as JSON
#[derive(Parser, Debug)]
#[command(name = "graph_layout")]
#[command(about = "Lay out a managed-object topology graph and print it as JSON")]
struct Args {
    /// Managed object to centre the graph on
    root: String,

    /// YAML engine config
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Graph service base URL (overrides the config file)
    #[arg(long, env = API_URL_ENV)]
    api_url: Option<String>,

    /// Traversal depth (overrides the config file)
    #[arg(long, short = 'd')]
    depth: Option<u32>,

    /// Skip the service and use the synthetic graph
    #[arg(long)]
    synthetic: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(url) = args.api_url {
        config.api_base_url = Some(url);
    }
    if let Some(depth) = args.depth {
        config.depth = depth;
    }
    if args.synthetic {
        config.api_base_url = None;
    }
    let config = config.validated()?;

    let mut engine = GraphEngine::new(config);
    if !engine.query(&args.root) {
        anyhow::bail!("root name must not be blank");
    }

    let graph = engine.graph();
    let json = if args.pretty {
        serde_json::to_string_pretty(graph)?
    } else {
        serde_json::to_string(graph)?
    };
    println!("{json}");

    tracing::info!(
        root = %args.root,
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        "layout written"
    );
    Ok(())
}
