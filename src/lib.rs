pub mod angle;
pub mod config;
pub mod error;
pub mod event;
pub mod level;
pub mod midi;
pub mod timeline;

use std::path::Path;

pub use angle::Angle;
pub use config::Config;
pub use error::*;
pub use event::{Action, EventCatalog, EventKind, EventMap, SkippedEvent};
pub use level::{parse_level, Level, LevelSettings};
pub use midi::{export as export_midi, MidiOptions};
pub use timeline::{build, build_tiles, convert, Tile, TileData, TileKind, Timeline};

/// Decode a level and build its timeline.
/// This is the main entry point for the library.
pub fn analyze(source: &str) -> Result<Timeline, AdofaiError> {
    let level = parse_level(source)?;
    level.timeline(&EventCatalog::new())
}

/// Read a level file and build its timeline.
pub fn analyze_file<P: AsRef<Path>>(path: P) -> Result<Timeline, AdofaiError> {
    let level = Level::load(path)?;
    level.timeline(&EventCatalog::new())
}
