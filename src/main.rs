use anyhow::{Result, bail};
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use tripsnap::conflict::conflict_report;
use tripsnap::connections::{BlockConnection, connections};
use tripsnap::geometry::Point;
use tripsnap::label::{LabelContent, label_content};
use tripsnap::relationships::{LabelRole, group_relationships, label_role};
use tripsnap::{SnapConfig, TripDocument, find_snap_target};

#[derive(Parser, Debug)]
#[command(author, version, about = "Inspect travel itinerary canvases: conflicts, groups and drop targets", long_about = None)]
struct Cli {
    /// Trip document (JSON with `timeline` and `blocks`)
    #[arg(value_name = "TRIP_JSON")]
    trip_file: Utf8PathBuf,

    /// Snap tunables (JSON); defaults are used for missing fields
    #[arg(long, value_name = "SNAP_JSON")]
    config: Option<Utf8PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Conflicts of every block, keyed by block id
    Conflicts,
    /// Parent/child groups with their label text
    Groups,
    /// Resolve dropping a block with its top-left corner at (x, y)
    Snap {
        #[arg(long)]
        block: String,
        #[arg(long, allow_negative_numbers = true)]
        x: f64,
        #[arg(long, allow_negative_numbers = true)]
        y: f64,
    },
    /// One marker per calendar day of the trip
    Markers,
    /// Temporal connections between blocks
    Connections,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LabelEntry {
    block_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    relationship_type: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<String>,
    label: LabelContent,
}

/// `RUST_LOG` directives such as `tripsnap=debug`; `info` when unset or unparsable.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn main() -> Result<()> {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    FmtSubscriber::builder()
        .with_env_filter(log_filter(directives.as_deref()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => SnapConfig::load(path)?,
        None => SnapConfig::default(),
    };
    let mut doc = TripDocument::load(&cli.trip_file)?;
    doc.normalize_geometry(config.min_block_width);

    let json = match cli.command {
        Command::Conflicts => {
            let report = conflict_report(&doc.blocks, &doc.timeline);
            info!(blocks_with_conflicts = report.len(), "conflict report ready");
            serde_json::to_string_pretty(&report)?
        }
        Command::Groups => {
            let rels = group_relationships(&doc.blocks);
            let mut labels = Vec::new();
            for block in &doc.blocks {
                let entry = match label_role(&block.id, &rels) {
                    LabelRole::GroupedChild { .. } => continue,
                    LabelRole::Individual => LabelEntry {
                        block_id: block.id.clone(),
                        relationship_type: None,
                        children: Vec::new(),
                        label: label_content(block, None, &doc.timeline),
                    },
                    LabelRole::GroupParent(rel) => LabelEntry {
                        block_id: block.id.clone(),
                        relationship_type: Some(rel.relationship_type.to_string()),
                        children: rel.children.iter().map(|c| c.id.clone()).collect(),
                        label: label_content(block, Some(rel), &doc.timeline),
                    },
                };
                labels.push(entry);
            }
            info!(groups = rels.len(), labels = labels.len(), "grouping done");
            serde_json::to_string_pretty(&labels)?
        }
        Command::Snap { block, x, y } => {
            let Some(dragged) = doc.blocks.iter().find(|b| b.id == block) else {
                bail!("No block with id `{}` in {}", block, cli.trip_file);
            };
            let result =
                find_snap_target(dragged, &doc.blocks, Point::new(x, y), &doc.timeline, &config);
            info!(
                block = %block,
                snap = result.should_snap,
                valid = result.is_valid(),
                "drop resolved"
            );
            serde_json::to_string_pretty(&result)?
        }
        Command::Markers => serde_json::to_string_pretty(&doc.timeline.day_markers())?,
        Command::Connections => {
            let links: Vec<BlockConnection> = connections(&doc.blocks);
            serde_json::to_string_pretty(&links)?
        }
    };

    println!("{}", json);
    Ok(())
}
