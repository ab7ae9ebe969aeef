//! Tile timeline construction.
//!
//! One forward pass over the path, threading tempo, twirl direction, heading,
//! position, and elapsed time from tile to tile.

use log::debug;
use std::collections::BTreeMap;

use super::converter::convert;
use super::tile::{Placement, Tile, TileData, TileKind};
use super::Timeline;
use crate::angle::Angle;
use crate::error::AdofaiError;
use crate::event::{Action, EventKind, EventMap};

/// State carried from one tile to the next.
struct BuildState {
    bpm: f64,
    reversed: bool,
    static_angle: f64,
    relative_angle: f64,
    previous_was_neutral: bool,
    x: f64,
    y: f64,
    elapsed_ms: f64,
    elapsed_beats: f64,
}

impl BuildState {
    fn new(base_bpm: f64) -> Self {
        Self {
            bpm: base_bpm,
            reversed: false,
            static_angle: 0.0,
            relative_angle: 0.0,
            previous_was_neutral: false,
            x: 0.0,
            y: 0.0,
            elapsed_ms: 0.0,
            elapsed_beats: 0.0,
        }
    }
}

/// Build a timeline from an angle sequence and per-floor events.
///
/// An empty sequence yields an empty timeline. Events keyed to floors past the
/// end of the sequence are ignored.
///
/// # Errors
/// [`AdofaiError::UnknownSpeedMode`] if a `SetSpeed` action has a `speedType`
/// other than `Bpm` or `Multiplier`. No partial timeline is returned.
///
/// # Example
/// ```
/// use adofai::{build, Angle};
/// use std::collections::BTreeMap;
///
/// let path: Vec<Angle> = "RUL".chars().map(|c| Angle::from_letter(c).unwrap()).collect();
/// let timeline = build(&path, &BTreeMap::new(), 100.0).unwrap();
///
/// assert_eq!(timeline.len(), 3);
/// assert_eq!(timeline[1].relative_angle(), 270.0);
/// assert_eq!(timeline[1].duration_beats(), 1.5);
/// ```
pub fn build(
    angles: &[Angle],
    events_by_floor: &BTreeMap<usize, Vec<Action>>,
    base_bpm: f64,
) -> Result<Timeline, AdofaiError> {
    let data = angles.iter().enumerate().map(|(floor, angle)| {
        let events = events_by_floor
            .get(&floor)
            .map(|actions| EventMap::from_actions(actions.iter().cloned()))
            .unwrap_or_default();
        TileData::new(floor, *angle, events)
    });
    build_tiles(data, base_bpm)
}

/// Build a timeline from prepared tile records.
///
/// Records must be in floor order starting at 0.
pub fn build_tiles<I>(data: I, base_bpm: f64) -> Result<Timeline, AdofaiError>
where
    I: IntoIterator<Item = TileData>,
    I::IntoIter: ExactSizeIterator,
{
    let data = data.into_iter();
    let last_floor = data.len().checked_sub(1);
    let mut state = BuildState::new(base_bpm);
    let mut tiles = Vec::with_capacity(data.len());

    for tile_data in data {
        let floor = tile_data.floor;
        apply_tempo(&mut state, &tile_data.events, floor)?;
        if tile_data.events.contains(EventKind::Twirl) {
            state.reversed = !state.reversed;
            debug!("Floor {}: twirl, reversed = {}", floor, state.reversed);
        }

        let kind = classify(&tile_data.angle, floor, last_floor);
        resolve_angles(&mut state, &tile_data.angle, kind);
        if kind == TileKind::ShortReturn && Some(floor) == last_floor {
            // Short return keeps its zero duration but the last tile still
            // carries the sentinel turn.
            state.relative_angle = 180.0;
        }

        let tile = Tile::new(
            tile_data,
            Placement {
                kind,
                relative_angle: state.relative_angle,
                static_angle: state.static_angle,
                reversed: state.reversed,
                bpm: state.bpm,
                x: state.x,
                y: state.y,
                start_ms: state.elapsed_ms,
                start_beats: state.elapsed_beats,
            },
        );

        state.elapsed_ms += tile.duration_ms();
        state.elapsed_beats += tile.duration_beats();
        state.previous_was_neutral = tile.angle().is_neutral();
        advance_position(&mut state, &tile);
        tiles.push(tile);
    }

    Ok(Timeline::new(tiles))
}

fn apply_tempo(state: &mut BuildState, events: &EventMap, floor: usize) -> Result<(), AdofaiError> {
    let Some(Action::SetSpeed(speed)) = events.first(EventKind::SetSpeed) else {
        return Ok(());
    };
    let change = speed
        .tempo_change()
        .ok_or_else(|| AdofaiError::UnknownSpeedMode {
            floor,
            mode: speed.speed_type.clone().unwrap_or_default(),
        })?;
    state.bpm = change.apply(state.bpm);
    debug!("Floor {}: tempo {:?}, bpm = {}", floor, change, state.bpm);
    Ok(())
}

fn classify(angle: &Angle, floor: usize, last_floor: Option<usize>) -> TileKind {
    if floor == 0 {
        TileKind::First
    } else if angle.is_short_return() {
        TileKind::ShortReturn
    } else if Some(floor) == last_floor {
        TileKind::Last
    } else if angle.is_long_return() {
        TileKind::LongReturn
    } else {
        TileKind::Regular
    }
}

fn resolve_angles(state: &mut BuildState, angle: &Angle, kind: TileKind) {
    match kind {
        TileKind::First => {
            // The entry heading faces away from 0 degrees.
            let entry = Angle::numeric(0.0).opposite();
            state.static_angle = 0.0;
            state.relative_angle = entry.angle();
        }
        TileKind::ShortReturn => {
            let heading = Angle::numeric(state.static_angle).opposite();
            let step = convert(
                state.static_angle,
                &heading,
                state.reversed,
                state.previous_was_neutral,
            );
            debug!("Short return, heading {}", step.static_angle);
            state.static_angle = step.static_angle;
            state.relative_angle = step.relative_angle;
        }
        TileKind::LongReturn => {
            state.static_angle = angle.opposite().angle();
            debug!("Long return, heading {}", state.static_angle);
        }
        TileKind::Last => {
            state.static_angle = if angle.is_long_return() {
                angle.opposite().angle()
            } else {
                convert(
                    state.static_angle,
                    angle,
                    state.reversed,
                    state.previous_was_neutral,
                )
                .static_angle
            };
            state.relative_angle = 180.0;
        }
        TileKind::Regular => {
            let step = convert(
                state.static_angle,
                angle,
                state.reversed,
                state.previous_was_neutral,
            );
            state.static_angle = step.static_angle;
            state.relative_angle = step.relative_angle;
        }
    }
}

fn advance_position(state: &mut BuildState, tile: &Tile) {
    let radians = tile.static_angle().to_radians();
    state.x += radians.cos();
    state.y += radians.sin();

    if let Some(Action::PositionTrack(track)) = tile.events().first(EventKind::PositionTrack) {
        if let Some(offset) = track.placement() {
            state.x = offset.0.unwrap_or(state.x);
            state.y = offset.1.unwrap_or(state.y);
            debug!(
                "Floor {}: next tile placed at ({}, {})",
                tile.floor(),
                state.x,
                state.y
            );
        }
    }
}
