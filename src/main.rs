use std::fs;
use std::path::PathBuf;
use std::process;

use adofai::{export_midi, Config, EventCatalog, Level, Timeline};
use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "adofai", version, about = "Resolve an ADOFAI level into its tile timeline")]
struct Cli {
    /// Level file (.adofai)
    level: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Summary)]
    format: OutputFormat,

    /// Also write the timeline as a MIDI file
    #[arg(short, long, value_name = "OUT")]
    midi: Option<PathBuf>,

    /// YAML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Base tempo, overriding the level and the configuration
    #[arg(long)]
    bpm: Option<f64>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Summary,
    Json,
    Yaml,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let config = match &cli.config {
        Some(path) => Config::load(path).map_err(|e| format!("'{}': {}", path.display(), e))?,
        None => Config::default(),
    };

    let mut level =
        Level::load(&cli.level).map_err(|e| format!("'{}': {}", cli.level.display(), e))?;
    if let Some(bpm) = cli.bpm.or(config.bpm) {
        level.settings.bpm = bpm;
    }

    let timeline = level
        .timeline(&EventCatalog::new())
        .map_err(|e| e.to_string())?;

    match cli.format {
        OutputFormat::Summary => print_summary(&level, &timeline),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&timeline).map_err(|e| e.to_string())?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(&timeline).map_err(|e| e.to_string())?;
            print!("{}", yaml);
        }
    }

    if let Some(path) = &cli.midi {
        let bytes = export_midi(&timeline, &config.midi).map_err(|e| e.to_string())?;
        fs::write(path, bytes).map_err(|e| format!("writing '{}': {}", path.display(), e))?;
        eprintln!("Wrote MIDI to {}", path.display());
    }

    Ok(())
}

fn print_summary(level: &Level, timeline: &Timeline) {
    let settings = &level.settings;
    if !settings.song.is_empty() {
        println!("{} - {}", settings.artist, settings.song);
    }
    println!("{} tiles at base {} bpm", timeline.len(), settings.bpm);
    println!();
    println!(
        "{:>6} {:<12} {:>6} {:>9} {:>8} {:>8} {:>7} {:>10} {:>10} {:>9} {:>9}  events",
        "floor", "kind", "angle", "relative", "static", "bpm", "beats", "ms", "start", "x", "y"
    );

    for tile in timeline {
        let events: Vec<&str> = tile.events().kinds().map(|kind| kind.name()).collect();
        println!(
            "{:>6} {:<12} {:>6} {:>9.3} {:>8.3} {:>8.2} {:>7.3} {:>10.2} {:>10.2} {:>9.3} {:>9.3}  {}{}",
            tile.floor(),
            format!("{:?}", tile.kind()),
            tile.angle().to_string(),
            tile.relative_angle(),
            tile.static_angle(),
            tile.bpm(),
            tile.duration_beats(),
            tile.duration_ms(),
            tile.start_ms(),
            tile.x(),
            tile.y(),
            events.join(","),
            if tile.reversed() { " (reversed)" } else { "" },
        );
    }

    println!();
    println!(
        "Total: {:.3} beats, {:.2} ms",
        timeline.total_duration_beats(),
        timeline.total_duration_ms()
    );
    let (x, y) = timeline.end_position();
    println!("End position: ({:.3}, {:.3})", x, y);

    if !timeline.skipped().is_empty() {
        println!();
        println!("Skipped {} event(s):", timeline.skipped().len());
        for skipped in timeline.skipped() {
            println!("  {}", skipped);
        }
    }
}
