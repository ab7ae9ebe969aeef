//! Tile records before and after geometry resolution.

use serde::Serialize;

use crate::angle::Angle;
use crate::event::EventMap;

/// Milliseconds per degree of turn at 1 BPM: `60000 / 180`.
pub const MS_PER_DEGREE_AT_ONE_BPM: f64 = 60000.0 / 180.0;

/// A path entry with its events, before the builder resolves geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct TileData {
    pub floor: usize,
    pub angle: Angle,
    pub events: EventMap,
}

impl TileData {
    pub fn new(floor: usize, angle: Angle, events: EventMap) -> Self {
        Self {
            floor,
            angle,
            events,
        }
    }
}

/// Which construction path produced a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TileKind {
    First,
    Regular,
    ShortReturn,
    LongReturn,
    Last,
}

/// Resolved state for one tile, handed from the builder to [`Tile::new`].
#[derive(Debug, Clone, Copy)]
pub(crate) struct Placement {
    pub kind: TileKind,
    pub relative_angle: f64,
    pub static_angle: f64,
    pub reversed: bool,
    pub bpm: f64,
    pub x: f64,
    pub y: f64,
    pub start_ms: f64,
    pub start_beats: f64,
}

/// One resolved tile of a [`Timeline`](crate::Timeline).
///
/// Immutable after construction. Duration fields are fixed when the tile is
/// built: short-return tiles keep them at zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tile {
    floor: usize,
    kind: TileKind,
    angle: Angle,
    relative_angle: f64,
    static_angle: f64,
    reversed: bool,
    bpm: f64,
    x: f64,
    y: f64,
    duration_beats: f64,
    duration_ms: f64,
    start_ms: f64,
    start_beats: f64,
    events: EventMap,
}

impl Tile {
    pub(crate) fn new(data: TileData, placement: Placement) -> Self {
        let (duration_beats, duration_ms) = match placement.kind {
            TileKind::ShortReturn => (0.0, 0.0),
            _ => (
                placement.relative_angle / 180.0,
                duration_ms(placement.relative_angle, placement.bpm),
            ),
        };

        Self {
            floor: data.floor,
            kind: placement.kind,
            angle: data.angle,
            relative_angle: placement.relative_angle,
            static_angle: placement.static_angle,
            reversed: placement.reversed,
            bpm: placement.bpm,
            x: placement.x,
            y: placement.y,
            duration_beats,
            duration_ms,
            start_ms: placement.start_ms,
            start_beats: placement.start_beats,
            events: data.events,
        }
    }

    pub fn floor(&self) -> usize {
        self.floor
    }

    pub fn kind(&self) -> TileKind {
        self.kind
    }

    /// The descriptor this tile was built from.
    pub fn angle(&self) -> &Angle {
        &self.angle
    }

    pub fn relative_angle(&self) -> f64 {
        self.relative_angle
    }

    pub fn static_angle(&self) -> f64 {
        self.static_angle
    }

    /// Rotation direction in effect at this tile, after its own twirl.
    pub fn reversed(&self) -> bool {
        self.reversed
    }

    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    pub fn duration_beats(&self) -> f64 {
        self.duration_beats
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    /// Time from the start of the level to this tile, in milliseconds.
    pub fn start_ms(&self) -> f64 {
        self.start_ms
    }

    pub fn start_beats(&self) -> f64 {
        self.start_beats
    }

    pub fn events(&self) -> &EventMap {
        &self.events
    }

    /// The tempo this tile would need for its turn to last exactly one beat:
    /// `180 * bpm / relative_angle`.
    ///
    /// Returns 0 for a zero turn.
    pub fn effective_bpm_from_relative_angle(&self) -> f64 {
        if self.relative_angle == 0.0 {
            return 0.0;
        }
        180.0 * self.bpm / self.relative_angle
    }
}

/// `relative_angle` degrees at `bpm`, in milliseconds. Zero tempo yields zero.
pub fn duration_ms(relative_angle: f64, bpm: f64) -> f64 {
    if bpm == 0.0 {
        return 0.0;
    }
    relative_angle * MS_PER_DEGREE_AT_ONE_BPM / bpm
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placement(kind: TileKind, relative_angle: f64, bpm: f64) -> Placement {
        Placement {
            kind,
            relative_angle,
            static_angle: 90.0,
            reversed: false,
            bpm,
            x: 1.0,
            y: 0.0,
            start_ms: 600.0,
            start_beats: 1.0,
        }
    }

    fn data() -> TileData {
        TileData::new(1, Angle::numeric(90.0), EventMap::new())
    }

    #[test]
    fn test_durations() {
        let tile = Tile::new(data(), placement(TileKind::Regular, 270.0, 100.0));
        assert_eq!(tile.duration_beats(), 1.5);
        assert!((tile.duration_ms() - 900.0).abs() < 1e-9);
        assert_eq!(tile.position(), (1.0, 0.0));
        assert_eq!(tile.start_ms(), 600.0);
    }

    #[test]
    fn test_zero_bpm_has_zero_duration() {
        let tile = Tile::new(data(), placement(TileKind::Regular, 270.0, 0.0));
        assert_eq!(tile.duration_ms(), 0.0);
        assert_eq!(tile.duration_beats(), 1.5);
    }

    #[test]
    fn test_short_return_has_no_duration() {
        let tile = Tile::new(data(), placement(TileKind::ShortReturn, 180.0, 240.0));
        assert_eq!(tile.duration_beats(), 0.0);
        assert_eq!(tile.duration_ms(), 0.0);
    }

    #[test]
    fn test_effective_bpm() {
        let tile = Tile::new(data(), placement(TileKind::Regular, 90.0, 100.0));
        assert_eq!(tile.effective_bpm_from_relative_angle(), 200.0);

        let still = Tile::new(data(), placement(TileKind::Regular, 0.0, 100.0));
        assert_eq!(still.effective_bpm_from_relative_angle(), 0.0);
    }

    #[test]
    fn test_serializes_camel_case() {
        let tile = Tile::new(data(), placement(TileKind::LongReturn, 180.0, 120.0));
        let json = serde_json::to_value(&tile).unwrap();
        assert_eq!(json["kind"], "longReturn");
        assert_eq!(json["relativeAngle"], 180.0);
        assert_eq!(json["durationBeats"], 1.0);
    }
}
