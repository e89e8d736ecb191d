use std::path::PathBuf;

use clap::{Parser, Subcommand};
use formats::load_names;
use layers::ViewMode;
use tracing_subscriber::EnvFilter;

use tools::{RenderRequest, country_rows, load_config, render_svg, timeline_line};

#[derive(Parser, Debug)]
#[command(author, version, about = "Trip globe snapshots and data checks")]
struct Args {
    /// Globe config JSON (partial configs keep defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the globe to a standalone SVG
    Render {
        /// World geometry (TopoJSON or GeoJSON)
        #[arg(long)]
        world: PathBuf,

        /// Country names TSV
        #[arg(long)]
        names: PathBuf,

        /// Country facts JSON
        #[arg(long)]
        facts: Option<PathBuf>,

        /// Trip data JSON ({"visited": [...], "records": [...]})
        #[arg(long)]
        trips: Option<PathBuf>,

        /// explorer, visited or lived
        #[arg(long, default_value = "explorer")]
        view: String,

        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        lon: f64,

        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        lat: f64,

        /// Square output size in pixels
        #[arg(long, default_value_t = 800.0)]
        size: f64,

        #[arg(long, default_value_t = 1.0)]
        zoom: f64,

        /// Simulated horizontal flick in pixels before rendering
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        flick: f64,

        /// Output file (stdout if omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// List countries from a names TSV
    Countries {
        names: PathBuf,

        /// Print JSON instead of TSV
        #[arg(long)]
        json: bool,
    },

    /// Parse a period such as "Jan 2022 → Mar 2023"
    Timeline { period: String },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let args = Args::parse();

    match args.command {
        Command::Render {
            world,
            names,
            facts,
            trips,
            view,
            lon,
            lat,
            size,
            zoom,
            flick,
            out,
        } => {
            let view = ViewMode::parse(&view)
                .ok_or_else(|| format!("unknown view {view:?} (explorer, visited, lived)"))?;
            let config = load_config(args.config.as_deref())?;
            let req = RenderRequest {
                world,
                names,
                facts,
                trips,
                view,
                lon,
                lat,
                size,
                zoom,
                flick_px: flick,
            };
            let svg = render_svg(&req, config)?;
            match out {
                Some(path) => {
                    std::fs::write(&path, svg).map_err(|e| format!("write {path:?}: {e}"))?;
                    eprintln!("wrote {}", path.display());
                }
                None => print!("{svg}"),
            }
        }
        Command::Countries { names, json } => {
            let table = load_names(&names).map_err(|e| e.to_string())?;
            let rows = country_rows(&table);
            if json {
                let text = serde_json::to_string_pretty(&rows).map_err(|e| e.to_string())?;
                println!("{text}");
            } else {
                for row in rows {
                    println!("{}\t{}", row.code, row.name);
                }
            }
        }
        Command::Timeline { period } => println!("{}", timeline_line(&period)),
    }

    Ok(())
}
