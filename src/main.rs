//! Command-line building generator.
//!
//! ```text
//! placesmith boundary.json                          # style 1, one storey
//! placesmith boundary.json --style 3 --storeys      # multi-storey style 3
//! placesmith boundary.json --config cfg.json --out house.obj --color 0.6,0.3,0.2
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use placesmith::boundary::{is_place_id, BoundaryMetadata, InMemoryBoundarySource};
use placesmith::config::BuildConfig;
use placesmith::export::{Color, ObjExporter};
use placesmith::pipeline::BuildingSession;
use placesmith::synthesis::FeatureOutcome;
use tracing::{error, info, warn};

#[derive(Debug, Parser)]
#[command(name = "placesmith")]
#[command(about = "Generates a building that fits inside a place boundary")]
#[command(version)]
struct Args {
    /// Boundary metadata JSON (`borderCoordinates`, `buildHeight`)
    boundary: PathBuf,

    /// Place id the boundary is registered under
    #[arg(long = "place", default_value = "1", value_parser = parse_place_id)]
    place_id: String,

    /// Building style, 1 to 4
    #[arg(long = "style", default_value_t = 1)]
    style_id: u8,

    /// Stack as many storeys as the build height allows
    #[arg(long)]
    storeys: bool,

    /// JSON file overriding build dimensions
    #[arg(long)]
    config: Option<PathBuf>,

    /// Building color as `R,G,B` in [0, 1]
    #[arg(long, value_parser = parse_color)]
    color: Option<Color>,

    /// Output OBJ path; the MTL file is written next to it
    #[arg(long, default_value = "building.obj")]
    out: PathBuf,
}

fn parse_place_id(raw: &str) -> Result<String, String> {
    if is_place_id(raw) {
        Ok(raw.to_owned())
    } else {
        Err(format!("place id must be digits: {raw}"))
    }
}

fn parse_color(raw: &str) -> Result<Color, String> {
    let channels: Vec<f32> = raw
        .split(',')
        .map(|c| c.trim().parse::<f32>())
        .collect::<Result<_, _>>()
        .map_err(|_| format!("bad color: {raw}"))?;
    match channels[..] {
        [r, g, b] if channels.iter().all(|c| (0.0..=1.0).contains(c)) => Ok([r, g, b]),
        _ => Err(format!("color needs three channels in [0, 1]: {raw}")),
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => BuildConfig::from_json_file(path)?,
        None => BuildConfig::default(),
    };
    let text = std::fs::read_to_string(&args.boundary)?;
    let boundary = BoundaryMetadata::from_json_str(&text)?;
    let source = InMemoryBoundarySource::new().with_place(args.place_id.clone(), boundary);

    let mut session = BuildingSession::new(source, config);
    if let Some(color) = args.color {
        session.set_color(color);
    }
    session.set_style(args.style_id)?;
    session.set_storeys(args.storeys)?;
    session.load_place(&args.place_id, false)?;

    let Some(mesh) = session.mesh() else {
        warn!(place_id = %args.place_id, "no rectangle fits the boundary");
        return Ok(());
    };
    for outcome in &mesh.outcomes {
        if let FeatureOutcome::Skipped {
            feature,
            floor,
            reason,
        } = outcome
        {
            info!(%feature, floor, reason, "feature skipped");
        }
    }
    session.export(&ObjExporter::new(), &args.out)?;
    println!(
        "{}: {} floors, {} triangles",
        args.out.display(),
        mesh.floors,
        mesh.triangle_count()
    );
    Ok(())
}

fn main() -> ExitCode {
    // Default: WARN for everything, INFO for placesmith.
    // Override with RUST_LOG.
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("placesmith=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "generation failed");
            ExitCode::FAILURE
        }
    }
}
