//! # Level Files
//!
//! Decode `.adofai` level files into an angle sequence, settings, and raw event
//! records.
//!
//! Level files are JSON written by the game editor, which leaves trailing
//! commas in arrays and objects and may prefix a UTF-8 byte-order mark. Both
//! are tolerated.
//!
//! ## Path Formats
//! - `angleData`: array of degree values (numbers, or numeric strings)
//! - `pathData`: string of letter codes, one per tile
//!
//! When a file carries both, `angleData` is used.
//!
//! ## Example
//! ```rust
//! use adofai::{parse_level, EventCatalog};
//!
//! let level = parse_level(r#"{
//!     "angleData": [0, 90, 180,],
//!     "settings": { "bpm": 150, "song": "Demo", },
//!     "actions": [ { "floor": 1, "eventType": "Twirl" }, ],
//! }"#).unwrap();
//!
//! assert_eq!(level.angles.len(), 3);
//! assert_eq!(level.settings.bpm, 150.0);
//!
//! let timeline = level.timeline(&EventCatalog::new()).unwrap();
//! assert!(timeline[1].reversed());
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::angle::Angle;
use crate::error::AdofaiError;
use crate::event::{group_by_floor, EventCatalog};
use crate::timeline::{build, Timeline};

/// Base tempo used when a level does not declare one.
pub const DEFAULT_BPM: f64 = 100.0;

/// The `settings` block of a level file. Unlisted keys are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LevelSettings {
    pub version: Option<i64>,
    pub artist: String,
    pub song: String,
    pub author: String,
    pub song_filename: String,
    pub bpm: f64,
    pub offset: f64,
    pub pitch: f64,
    pub volume: f64,
    pub hitsound: Option<String>,
    pub hitsound_volume: Option<f64>,
}

impl Default for LevelSettings {
    fn default() -> Self {
        Self {
            version: None,
            artist: String::new(),
            song: String::new(),
            author: String::new(),
            song_filename: String::new(),
            bpm: DEFAULT_BPM,
            offset: 0.0,
            pitch: 100.0,
            volume: 100.0,
            hitsound: None,
            hitsound_volume: None,
        }
    }
}

/// A decoded level.
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    pub settings: LevelSettings,
    pub angles: Vec<Angle>,
    /// Event records as written in the file.
    pub actions: Vec<Value>,
    /// Decoration records as written in the file. Never interpreted.
    pub decorations: Vec<Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLevel {
    angle_data: Option<Vec<Value>>,
    path_data: Option<String>,
    #[serde(default)]
    settings: LevelSettings,
    #[serde(default)]
    actions: Vec<Value>,
    #[serde(default)]
    decorations: Vec<Value>,
}

impl Level {
    /// Read and decode a level file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, AdofaiError> {
        let source = fs::read_to_string(path)?;
        parse_level(&source)
    }

    /// Group this level's events by floor and build its timeline.
    ///
    /// Event records that cannot be attached are reported through
    /// [`Timeline::skipped`].
    pub fn timeline(&self, catalog: &EventCatalog) -> Result<Timeline, AdofaiError> {
        let groups = group_by_floor(&self.actions, self.angles.len(), catalog);
        let timeline = build(&self.angles, &groups.by_floor, self.settings.bpm)?;
        Ok(timeline.with_skipped(groups.skipped))
    }

    /// Decorations keyed by their `floor` field. Records without one are left out.
    pub fn decorations_by_floor(&self) -> BTreeMap<usize, Vec<&Value>> {
        let mut grouped: BTreeMap<usize, Vec<&Value>> = BTreeMap::new();
        for decoration in &self.decorations {
            if let Some(floor) = decoration.get("floor").and_then(Value::as_u64) {
                grouped.entry(floor as usize).or_default().push(decoration);
            }
        }
        grouped
    }
}

/// Decode level source text.
pub fn parse_level(source: &str) -> Result<Level, AdofaiError> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let cleaned = strip_trailing_commas(source);
    let raw: RawLevel =
        serde_json::from_str(&cleaned).map_err(|e| AdofaiError::LevelFormat(e.to_string()))?;

    let angles = match (raw.angle_data, raw.path_data) {
        (Some(values), _) => decode_angle_data(&values)?,
        (None, Some(path)) => decode_path_data(&path)?,
        (None, None) => {
            return Err(AdofaiError::LevelFormat(
                "level has neither angleData nor pathData".to_string(),
            ))
        }
    };

    Ok(Level {
        settings: raw.settings,
        angles,
        actions: raw.actions,
        decorations: raw.decorations,
    })
}

fn decode_angle_data(values: &[Value]) -> Result<Vec<Angle>, AdofaiError> {
    values
        .iter()
        .enumerate()
        .map(|(floor, value)| {
            let degrees = match value {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            };
            degrees
                .filter(|d| d.is_finite())
                .map(Angle::numeric)
                .ok_or_else(|| AdofaiError::MalformedAngle {
                    floor,
                    value: value.to_string(),
                })
        })
        .collect()
}

fn decode_path_data(path: &str) -> Result<Vec<Angle>, AdofaiError> {
    path.chars()
        .enumerate()
        .map(|(floor, code)| {
            Angle::from_letter(code).map_err(|_| AdofaiError::MalformedAngle {
                floor,
                value: code.to_string(),
            })
        })
        .collect()
}

/// Remove commas that directly precede `]` or `}`, ignoring string contents.
fn strip_trailing_commas(source: &str) -> String {
    let chars: Vec<char> = source.chars().collect();
    let mut out = String::with_capacity(source.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            out.push(c);
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' => {
                let next = chars[i + 1..].iter().find(|ch| !ch.is_whitespace());
                if !matches!(next, Some(']') | Some('}')) {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::TileKind;

    #[test]
    fn test_strip_trailing_commas() {
        assert_eq!(strip_trailing_commas("[1, 2, ]"), "[1, 2 ]");
        assert_eq!(strip_trailing_commas("{\"a\": 1,\n}"), "{\"a\": 1\n}");
        assert_eq!(strip_trailing_commas("[[1,],]"), "[[1]]");
        // commas inside strings are content
        assert_eq!(
            strip_trailing_commas(r#"{"song": "a, ]", "b": "\",}"}"#),
            r#"{"song": "a, ]", "b": "\",}"}"#
        );
    }

    #[test]
    fn test_parse_path_data() {
        let result = parse_level(r#"{ "pathData": "RUL", "settings": { "bpm": 120, "artist": "Someone" } }"#);
        assert!(result.is_ok());
        let level = result.unwrap();

        let letters: Vec<Option<char>> = level.angles.iter().map(Angle::letter).collect();
        assert_eq!(letters, vec![Some('R'), Some('U'), Some('L')]);
        assert_eq!(level.settings.bpm, 120.0);
        assert_eq!(level.settings.artist, "Someone");
        assert_eq!(level.settings.pitch, 100.0);
    }

    #[test]
    fn test_angle_data_wins_over_path_data() {
        let level = parse_level(r#"{ "angleData": [0, 45, "90", 999, -30], "pathData": "RR" }"#).unwrap();
        let values: Vec<f64> = level.angles.iter().map(Angle::angle).collect();
        assert_eq!(values, vec![0.0, 45.0, 90.0, 999.0, -30.0]);
        assert!(level.angles[3].is_short_return());
        assert!(level.angles[4].is_long_return());
    }

    #[test]
    fn test_byte_order_mark() {
        let level = parse_level("\u{feff}{ \"pathData\": \"RR\", }").unwrap();
        assert_eq!(level.angles.len(), 2);
    }

    #[test]
    fn test_default_settings() {
        let level = parse_level(r#"{ "pathData": "R" }"#).unwrap();
        assert_eq!(level.settings, LevelSettings::default());
        assert_eq!(level.settings.bpm, DEFAULT_BPM);
        assert!(level.actions.is_empty());
    }

    #[test]
    fn test_missing_path_is_format_error() {
        let result = parse_level(r#"{ "settings": {} }"#);
        assert!(matches!(result, Err(AdofaiError::LevelFormat(_))));

        let result = parse_level("not json");
        assert!(matches!(result, Err(AdofaiError::LevelFormat(_))));
    }

    #[test]
    fn test_malformed_angles() {
        match parse_level(r#"{ "pathData": "RRXR" }"#) {
            Err(AdofaiError::MalformedAngle { floor, value }) => {
                assert_eq!(floor, 2);
                assert_eq!(value, "X");
            }
            other => panic!("expected MalformedAngle, got {:?}", other),
        }

        match parse_level(r#"{ "angleData": [0, "up"] }"#) {
            Err(AdofaiError::MalformedAngle { floor, .. }) => assert_eq!(floor, 1),
            other => panic!("expected MalformedAngle, got {:?}", other),
        }
    }

    #[test]
    fn test_level_timeline_records_skipped_events() {
        let level = parse_level(
            r#"{
                "pathData": "RRRR",
                "actions": [
                    { "floor": 1, "eventType": "SetSpeed", "speedType": "Bpm", "beatsPerMinute": 200 },
                    { "floor": 2, "eventType": "EditorComment", "comment": "hi" },
                    { "floor": 12, "eventType": "Twirl" },
                ],
            }"#,
        )
        .unwrap();

        let timeline = level.timeline(&EventCatalog::new()).unwrap();
        assert_eq!(timeline.len(), 4);
        assert_eq!(timeline[1].bpm(), 200.0);
        assert_eq!(timeline[3].kind(), TileKind::Last);
        assert_eq!(timeline.skipped().len(), 2);
    }

    #[test]
    fn test_decorations_by_floor() {
        let level = parse_level(
            r#"{
                "pathData": "RRR",
                "decorations": [
                    { "floor": 2, "eventType": "AddDecoration", "tag": "a" },
                    { "eventType": "AddDecoration", "tag": "loose" },
                    { "floor": 2, "eventType": "AddDecoration", "tag": "b" },
                ],
            }"#,
        )
        .unwrap();

        let grouped = level.decorations_by_floor();
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[&2].len(), 2);
        assert_eq!(level.decorations.len(), 3);
    }
}
