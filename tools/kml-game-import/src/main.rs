use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;

mod game;
mod kml;

use game::build_game;
use kml::parse_placemarks;

#[derive(Parser, Debug)]
#[command(
    name = "kml-game-import",
    author,
    version,
    about = "Turn KML placemarks into a scavenger hunt game file",
    long_about = "Reads the point placemarks of a KML export (Google My Maps, Google Earth) \
                  and writes a game YAML file with one location per placemark. Every \
                  location gets a placeholder multiple-choice question to be filled in by hand."
)]
struct Args {
    /// Input KML file
    #[arg(short, long)]
    input: PathBuf,

    /// Output game YAML file
    #[arg(short, long)]
    output: PathBuf,

    /// Meters from a location within which its question is revealed
    #[arg(short, long, default_value = "50")]
    radius: u32,

    /// Overwrite the output file if it exists
    #[arg(long)]
    force: bool,

    /// Verbose output (show debug messages)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .format_timestamp(None)
    .init();

    log::info!("Input: {}", args.input.display());
    log::info!("Output: {}", args.output.display());

    if args.output.exists() && !args.force {
        bail!("{} already exists, pass --force to overwrite", args.output.display());
    }

    let data = std::fs::read(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let xml = String::from_utf8_lossy(&data);

    let placemarks = parse_placemarks(&xml)?;
    log::info!("Found {} point placemarks", placemarks.len());
    for placemark in &placemarks {
        log::debug!(
            "{}: {}, {}",
            placemark.name,
            placemark.latitude,
            placemark.longitude
        );
    }

    let game = build_game(&placemarks, args.radius)?;
    let yaml = serde_yaml::to_string(&game).context("Failed to serialize game")?;

    if let Some(dir) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    std::fs::write(&args.output, yaml)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    log::info!(
        "Wrote {} locations with radius {} m",
        game.locations.len(),
        args.radius
    );

    Ok(())
}
