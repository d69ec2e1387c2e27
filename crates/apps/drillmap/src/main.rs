use std::path::PathBuf;

use clap::{Parser, Subcommand};
use navigation::MapConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod labels;
mod source;

use source::DirSource;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless driver for the drill-down boundary map")]
struct Args {
    /// Directory holding boundary documents (GeoJSON FeatureCollections)
    #[arg(long, default_value = "data/boundaries")]
    data: PathBuf,

    /// Optional JSON map configuration; missing fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build one level and print per-region stats
    Inspect {
        /// Dataset reference, e.g. 100000_full
        dataset: String,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Drill down through a path of region ids, then back up to the root
    Walk {
        /// Root dataset reference
        root: String,

        /// Region ids to click, one per level
        path: Vec<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => MapConfig::from_json_str(&tokio::fs::read_to_string(path).await?)?,
        None => MapConfig::default(),
    };
    info!(data = %args.data.display(), "using boundary directory");
    let source = DirSource::new(&args.data, &config);

    match args.command {
        Command::Inspect { dataset, json } => {
            let summary = commands::inspect(&source, &config, &dataset).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                commands::print_summary(&summary);
            }
        }
        Command::Walk { root, path, json } => {
            let steps = commands::walk(&source, &config, &root, &path).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&steps)?);
            } else {
                commands::print_walk(&steps);
            }
        }
    }

    Ok(())
}
