//! # Timeline Module
//!
//! Resolve a level path into an ordered list of tiles with geometry, tempo,
//! and timing.
//!
//! ## Sub-modules
//! - `converter` - heading and turn between consecutive tiles
//! - `tile` - [`TileData`] input records and resolved [`Tile`]s
//! - `builder` - the single-pass construction state machine
//!
//! ## Entry Points
//! - [`build()`] - angle sequence + per-floor actions to [`Timeline`]
//! - [`build_tiles()`] - prepared [`TileData`] records to [`Timeline`]
//!
//! ## Example
//! ```rust
//! use adofai::{analyze, TileKind};
//!
//! let timeline = analyze(r#"{ "pathData": "RRRR", "settings": { "bpm": 120 } }"#).unwrap();
//!
//! assert_eq!(timeline.len(), 4);
//! assert_eq!(timeline[0].kind(), TileKind::First);
//! assert_eq!(timeline[3].kind(), TileKind::Last);
//! assert_eq!(timeline[3].position(), (3.0, 0.0));
//! ```
//!
//! ## Special Tiles
//!
//! | Kind          | Heading                  | Turn                   | Duration |
//! |---------------|--------------------------|------------------------|----------|
//! | `First`       | 0                        | 180 (entry)            | computed |
//! | `ShortReturn` | opposite of previous     | converted              | zero     |
//! | `LongReturn`  | opposite of raw angle    | previous tile's turn   | computed |
//! | `Last`        | from its descriptor      | 180                    | computed |
//!
//! ## State Rules
//! - A tile's `SetSpeed` applies before its own duration is computed.
//! - A tile's `Twirl` flips direction before its own turn is computed.
//! - A `PositionTrack` with `editorOnly: Disabled` places the *next* tile.

pub mod builder;
pub mod converter;
pub mod tile;


pub use builder::{build, build_tiles};
pub use converter::{convert, Conversion};
pub use tile::{Tile, TileData, TileKind};

use serde::Serialize;
use std::ops::Index;

use crate::event::SkippedEvent;

/// The resolved, read-only tile sequence of a level.
///
/// `timeline[floor]` is the tile at that floor.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    tiles: Vec<Tile>,
    skipped: Vec<SkippedEvent>,
}

impl Timeline {
    pub(crate) fn new(tiles: Vec<Tile>) -> Self {
        Self {
            tiles,
            skipped: Vec::new(),
        }
    }

    pub(crate) fn with_skipped(mut self, skipped: Vec<SkippedEvent>) -> Self {
        self.skipped = skipped;
        self
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn get(&self, floor: usize) -> Option<&Tile> {
        self.tiles.get(floor)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tile> {
        self.tiles.iter()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn first(&self) -> Option<&Tile> {
        self.tiles.first()
    }

    pub fn last(&self) -> Option<&Tile> {
        self.tiles.last()
    }

    /// Event records dropped while grouping actions by floor.
    pub fn skipped(&self) -> &[SkippedEvent] {
        &self.skipped
    }

    /// Sum of all tile durations. The last tile's sentinel turn is included.
    pub fn total_duration_ms(&self) -> f64 {
        self.tiles.iter().map(Tile::duration_ms).sum()
    }

    pub fn total_duration_beats(&self) -> f64 {
        self.tiles.iter().map(Tile::duration_beats).sum()
    }

    /// Position of the last tile, or the origin for an empty timeline.
    pub fn end_position(&self) -> (f64, f64) {
        self.tiles.last().map(Tile::position).unwrap_or((0.0, 0.0))
    }
}

impl Index<usize> for Timeline {
    type Output = Tile;

    fn index(&self, floor: usize) -> &Tile {
        &self.tiles[floor]
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = &'a Tile;
    type IntoIter = std::slice::Iter<'a, Tile>;

    fn into_iter(self) -> Self::IntoIter {
        self.tiles.iter()
    }
}
