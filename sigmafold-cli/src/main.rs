// Copyright 2025 Sigmafold Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Sigmafold CLI
//!
//! Command-line interface for shape co-occurrence analysis: build the
//! graph for a chain length, partition it into communities, or compute a
//! 2-D layout. Upstream record exports are read from
//! `<data_dir>/upstream` through the file-based source adapter.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use sigmafold_analysis::Pipeline;
use sigmafold_core::AnalysisConfig;
use sigmafold_storage::FileUpstream;
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(name = "sigmafold")]
#[command(about = "Sigmafold - shape co-occurrence graph analysis", long_about = None)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Data directory (overrides the configured one)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Verbose mode
    #[arg(short, long)]
    verbose: bool,

    /// Output as JSON (machine-readable)
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// (Re)build the co-occurrence graph for a chain length
    Build {
        /// Chain length; defaults to the configured default_n
        #[arg(long)]
        n: Option<u32>,

        /// Rebuild even when a valid cached graph exists
        #[arg(long)]
        force: bool,
    },

    /// Partition the graph into communities
    Partition {
        /// Chain length; defaults to the configured default_n
        #[arg(long)]
        n: Option<u32>,

        /// Override the detector seed
        #[arg(long)]
        seed: Option<u64>,

        /// Seed from entropy instead (nondeterministic runs)
        #[arg(long, conflicts_with = "seed")]
        entropy: bool,

        /// Override the resolution parameter
        #[arg(long)]
        resolution: Option<f64>,
    },

    /// Compute a force-directed 2-D layout of the graph
    Layout {
        /// Chain length; defaults to the configured default_n
        #[arg(long)]
        n: Option<u32>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();

    let mut config = match &cli.config {
        Some(path) => AnalysisConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => AnalysisConfig::default(),
    };
    if let Some(dir) = cli.data_dir.clone() {
        config.data_dir = dir;
    }

    match cli.command {
        Commands::Build { n, force } => {
            let n = n.unwrap_or(config.default_n);
            let pipeline = make_pipeline(config);
            let graph = if force {
                pipeline.rebuild(n)
            } else {
                pipeline.graph(n)
            }
            .with_context(|| format!("graph build failed for n={n}"))?;

            if cli.json {
                let edges: Vec<_> = graph
                    .edges()
                    .map(|(a, b, w)| json!([a, b, w]))
                    .collect();
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({
                        "n": n,
                        "nodes": graph.nodes().collect::<Vec<_>>(),
                        "edges": edges,
                    }))?
                );
            } else {
                println!(
                    "graph for n={n}: {} nodes, {} edges (total weight {})",
                    graph.node_count(),
                    graph.edge_count(),
                    graph.total_weight()
                );
            }
        }

        Commands::Partition {
            n,
            seed,
            entropy,
            resolution,
        } => {
            let n = n.unwrap_or(config.default_n);
            if let Some(seed) = seed {
                config.detect.seed = Some(seed);
            }
            if entropy {
                config.detect.seed = None;
            }
            if let Some(resolution) = resolution {
                config.detect.resolution = resolution;
            }

            let pipeline = make_pipeline(config);
            let partition = pipeline
                .partition(n)
                .with_context(|| format!("community detection failed for n={n}"))?;

            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({
                        "n": n,
                        "communities": partition.community_count,
                        "modularity": partition.modularity,
                        "membership": partition.membership,
                    }))?
                );
            } else {
                println!(
                    "n={n}: {} communities, modularity {:.4}",
                    partition.community_count, partition.modularity
                );
                for (community, members) in partition.communities() {
                    let ids: Vec<&str> = members.iter().map(|m| m.as_str()).collect();
                    println!("  community {community} ({} shapes): {}", ids.len(), ids.join(" "));
                }
            }
        }

        Commands::Layout { n } => {
            let n = n.unwrap_or(config.default_n);
            let pipeline = make_pipeline(config);
            let layout = pipeline
                .layout(n)
                .with_context(|| format!("layout failed for n={n}"))?;

            if cli.json {
                let coords: serde_json::Map<String, serde_json::Value> = layout
                    .iter()
                    .map(|(id, (x, y))| (id.clone(), json!([x, y])))
                    .collect();
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({ "n": n, "positions": coords }))?
                );
            } else {
                for (id, (x, y)) in &layout {
                    println!("{id}\t{x:.4}\t{y:.4}");
                }
            }
        }
    }

    Ok(())
}

fn make_pipeline(config: AnalysisConfig) -> Pipeline<FileUpstream> {
    let upstream = FileUpstream::new(config.data_dir.join("upstream"));
    Pipeline::new(config, upstream)
}
