//! Realm Atlas - Entry Point
//!
//! Generates the kingdom-ring world map, saves it as JSON and answers
//! route queries against a saved map.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use realm_atlas::campaign::{MapGenerator, MapStorage, NodeKind, WorldGraph};
use realm_atlas::core::config::AtlasConfig;
use realm_atlas::core::error::Result;

/// Kingdom-ring world map generator and router
#[derive(Parser, Debug)]
#[command(name = "realm-atlas")]
#[command(about = "Generate the kingdom-ring world graph and query routes on it")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a map from a ring configuration
    Generate {
        /// TOML ring configuration (built-in eight-kingdom ring when omitted)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Where to write the generated map
        #[arg(long, default_value = realm_atlas::campaign::storage::DEFAULT_MAP_PATH)]
        out: PathBuf,

        /// Generate without writing the map to disk
        #[arg(long)]
        no_save: bool,
    },

    /// Find the shortest route between two nodes of a saved map
    Path {
        /// Saved map JSON
        #[arg(long, default_value = realm_atlas::campaign::storage::DEFAULT_MAP_PATH)]
        map: PathBuf,

        /// Start node id
        from: String,

        /// Goal node id
        to: String,
    },

    /// Print statistics for a saved map
    Stats {
        /// Saved map JSON
        #[arg(long, default_value = realm_atlas::campaign::storage::DEFAULT_MAP_PATH)]
        map: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("realm_atlas=info")),
        )
        .init();

    let args = Args::parse();

    match args.command {
        Command::Generate {
            config,
            out,
            no_save,
        } => generate(config, out, no_save),
        Command::Path { map, from, to } => route(map, &from, &to),
        Command::Stats { map } => stats(map),
    }
}

fn generate(config: Option<PathBuf>, out: PathBuf, no_save: bool) -> Result<()> {
    let config = match config {
        Some(path) => AtlasConfig::load(&path)?,
        None => AtlasConfig::default(),
    };

    println!("=== Map Generation ===");
    println!("Capitals: {}", config.ring.kingdoms.len());
    println!("Center: ({}, {})", config.ring.center.x, config.ring.center.y);
    let order: Vec<String> = config
        .ring
        .effective_ring_order()
        .iter()
        .map(|k| k.to_string())
        .collect();
    println!("Ring order: {}", order.join(", "));
    println!();

    let generator = MapGenerator::new(config.generation.clone())?;
    let storage = MapStorage::new(out);
    let mut world = WorldGraph::new();
    let report = world.generate_from_config(
        &generator,
        &config.ring,
        (!no_save).then_some(&storage),
    )?;

    println!("Map generated successfully!");
    println!("  Nodes: {}", report.nodes);
    println!("  Edges: {}", report.edges);
    println!("  Kingdoms: {}", report.kingdoms);
    if !report.skipped_ring_entries.is_empty() {
        println!("  Skipped ring entries: {:?}", report.skipped_ring_entries);
    }
    if report.saved {
        println!("  Saved to: {}", storage.save_path().display());
    }

    print_kind_counts(&world);
    Ok(())
}

fn route(map: PathBuf, from: &str, to: &str) -> Result<()> {
    let world = MapStorage::new(map).load_graph()?;

    match world.find_path(from, to) {
        Some(path) => {
            let length = world.path_length(&path).unwrap_or(f64::NAN);
            println!(
                "Path {} -> {} ({} nodes, length {:.1}):",
                from,
                to,
                path.len(),
                length
            );
            for id in &path {
                let name = world.node(id.as_str()).map(|n| n.name.as_str()).unwrap_or("?");
                println!("  {} ({})", id, name);
            }
        }
        None => println!("No path from {} to {}", from, to),
    }
    Ok(())
}

fn stats(map: PathBuf) -> Result<()> {
    let world = MapStorage::new(map).load_graph()?;

    println!("Nodes: {}", world.node_count());
    println!("Edges: {}", world.edge_count());
    println!("Kingdoms: {}", world.kingdom_count());
    print_kind_counts(&world);
    Ok(())
}

fn print_kind_counts(world: &WorldGraph) {
    let counts = world.kind_counts();
    println!();
    println!("Node types statistics:");
    for kind in NodeKind::ALL {
        if let Some(count) = counts.get(&kind) {
            println!("  {}: {}", kind.as_str(), count);
        }
    }
}
