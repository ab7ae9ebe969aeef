//! Typed action payloads, one variant per [`EventKind`].
//!
//! Every field is optional: level files routinely omit fields that hold their
//! editor default. Only [`SetSpeed`], the `Twirl` marker, and [`PositionTrack`]
//! feed into timeline math; every other payload is carried through untouched.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::catalog::EventKind;

/// Editor default for `SetSpeed.beatsPerMinute`.
pub const DEFAULT_SPEED_BPM: f64 = 100.0;

/// Editor default for `SetSpeed.bpmMultiplier`.
pub const DEFAULT_SPEED_MULTIPLIER: f64 = 1.0;

/// A single event attached to a tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "eventType")]
pub enum Action {
    SetSpeed(SetSpeed),
    Twirl,
    Checkpoint(Checkpoint),
    CustomBackground(CustomBackground),
    ColorTrack(ColorTrack),
    AnimateTrack(AnimateTrack),
    AddDecoration(AddDecoration),
    Flash(Flash),
    MoveCamera(MoveCamera),
    SetHitsound(SetHitsound),
    RecolorTrack(RecolorTrack),
    MoveTrack(MoveTrack),
    SetFilter(SetFilter),
    HallOfMirrors(HallOfMirrors),
    ShakeScreen(ShakeScreen),
    SetPlanetRotation(SetPlanetRotation),
    MoveDecorations(MoveDecorations),
    PositionTrack(PositionTrack),
    RepeatEvents(RepeatEvents),
    Bloom(Bloom),
    SetConditionalEvents(SetConditionalEvents),
}

impl Action {
    pub fn kind(&self) -> EventKind {
        match self {
            Action::SetSpeed(_) => EventKind::SetSpeed,
            Action::Twirl => EventKind::Twirl,
            Action::Checkpoint(_) => EventKind::Checkpoint,
            Action::CustomBackground(_) => EventKind::CustomBackground,
            Action::ColorTrack(_) => EventKind::ColorTrack,
            Action::AnimateTrack(_) => EventKind::AnimateTrack,
            Action::AddDecoration(_) => EventKind::AddDecoration,
            Action::Flash(_) => EventKind::Flash,
            Action::MoveCamera(_) => EventKind::MoveCamera,
            Action::SetHitsound(_) => EventKind::SetHitsound,
            Action::RecolorTrack(_) => EventKind::RecolorTrack,
            Action::MoveTrack(_) => EventKind::MoveTrack,
            Action::SetFilter(_) => EventKind::SetFilter,
            Action::HallOfMirrors(_) => EventKind::HallOfMirrors,
            Action::ShakeScreen(_) => EventKind::ShakeScreen,
            Action::SetPlanetRotation(_) => EventKind::SetPlanetRotation,
            Action::MoveDecorations(_) => EventKind::MoveDecorations,
            Action::PositionTrack(_) => EventKind::PositionTrack,
            Action::RepeatEvents(_) => EventKind::RepeatEvents,
            Action::Bloom(_) => EventKind::Bloom,
            Action::SetConditionalEvents(_) => EventKind::SetConditionalEvents,
        }
    }
}

/// `Enabled` / `Disabled` switch. Older levels also write plain booleans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Enabled,
    Disabled,
}

impl Serialize for Toggle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(match self {
            Toggle::Enabled => "Enabled",
            Toggle::Disabled => "Disabled",
        })
    }
}

impl<'de> Deserialize<'de> for Toggle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Flag(bool),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Flag(true) => Ok(Toggle::Enabled),
            Repr::Flag(false) => Ok(Toggle::Disabled),
            Repr::Text(text) => match text.as_str() {
                "Enabled" => Ok(Toggle::Enabled),
                "Disabled" => Ok(Toggle::Disabled),
                other => Err(serde::de::Error::custom(format!(
                    "expected Enabled or Disabled, got '{}'",
                    other
                ))),
            },
        }
    }
}

/// An `[x, y]` pair where either component may be `null` (left unchanged).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Offset(pub Option<f64>, pub Option<f64>);

/// Resolved tempo instruction of a [`SetSpeed`] action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TempoChange {
    /// Replace the tempo with this many beats per minute.
    Absolute(f64),
    /// Scale the current tempo.
    Multiplier(f64),
}

impl TempoChange {
    pub fn apply(self, bpm: f64) -> f64 {
        match self {
            TempoChange::Absolute(value) => value,
            TempoChange::Multiplier(factor) => bpm * factor,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SetSpeed {
    pub speed_type: Option<String>,
    pub beats_per_minute: Option<f64>,
    pub bpm_multiplier: Option<f64>,
    pub angle_offset: Option<f64>,
}

impl SetSpeed {
    /// Interpret `speedType`. A missing mode means `Bpm`.
    ///
    /// Returns `None` for any other mode name so the caller can report it.
    pub fn tempo_change(&self) -> Option<TempoChange> {
        match self.speed_type.as_deref() {
            None | Some("Bpm") => Some(TempoChange::Absolute(
                self.beats_per_minute.unwrap_or(DEFAULT_SPEED_BPM),
            )),
            Some("Multiplier") => Some(TempoChange::Multiplier(
                self.bpm_multiplier.unwrap_or(DEFAULT_SPEED_MULTIPLIER),
            )),
            Some(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Checkpoint {
    pub tile_offset: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomBackground {
    pub color: Option<String>,
    pub bg_image: Option<String>,
    pub image_color: Option<String>,
    pub parallax: Option<Value>,
    pub bg_display_mode: Option<String>,
    pub lock_rot: Option<Toggle>,
    pub loop_bg: Option<Toggle>,
    pub unscaled_size: Option<f64>,
    pub angle_offset: Option<f64>,
    pub event_tag: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColorTrack {
    pub track_color_type: Option<String>,
    pub track_color: Option<String>,
    pub secondary_track_color: Option<String>,
    pub track_color_anim_duration: Option<f64>,
    pub track_color_pulse: Option<String>,
    pub track_pulse_length: Option<f64>,
    pub track_style: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnimateTrack {
    pub track_animation: Option<String>,
    pub beats_ahead: Option<f64>,
    pub track_disappear_animation: Option<String>,
    pub beats_behind: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddDecoration {
    pub decoration_image: Option<String>,
    pub position: Option<Offset>,
    pub relative_to: Option<String>,
    pub pivot_offset: Option<Offset>,
    pub rotation: Option<f64>,
    pub scale: Option<Value>,
    pub depth: Option<i64>,
    pub tag: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Flash {
    pub duration: Option<f64>,
    pub plane: Option<String>,
    pub start_color: Option<String>,
    pub start_opacity: Option<f64>,
    pub end_color: Option<String>,
    pub end_opacity: Option<f64>,
    pub angle_offset: Option<f64>,
    pub event_tag: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MoveCamera {
    pub duration: Option<f64>,
    pub relative_to: Option<String>,
    pub position: Option<Offset>,
    pub rotation: Option<f64>,
    pub zoom: Option<f64>,
    pub angle_offset: Option<f64>,
    pub ease: Option<String>,
    pub event_tag: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SetHitsound {
    pub hitsound: Option<String>,
    pub hitsound_volume: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecolorTrack {
    pub start_tile: Option<Value>,
    pub end_tile: Option<Value>,
    pub track_color_type: Option<String>,
    pub track_color: Option<String>,
    pub secondary_track_color: Option<String>,
    pub track_color_anim_duration: Option<f64>,
    pub track_color_pulse: Option<String>,
    pub track_pulse_length: Option<f64>,
    pub track_style: Option<String>,
    pub angle_offset: Option<f64>,
    pub event_tag: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MoveTrack {
    pub start_tile: Option<Value>,
    pub end_tile: Option<Value>,
    pub duration: Option<f64>,
    pub position_offset: Option<Offset>,
    pub rotation: Option<f64>,
    pub scale: Option<Value>,
    pub opacity: Option<f64>,
    pub angle_offset: Option<f64>,
    pub ease: Option<String>,
    pub event_tag: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SetFilter {
    pub filter: Option<String>,
    pub enabled: Option<Toggle>,
    pub intensity: Option<f64>,
    pub disable_others: Option<Toggle>,
    pub angle_offset: Option<f64>,
    pub event_tag: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HallOfMirrors {
    pub enabled: Option<Toggle>,
    pub angle_offset: Option<f64>,
    pub event_tag: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShakeScreen {
    pub duration: Option<f64>,
    pub strength: Option<f64>,
    pub intensity: Option<f64>,
    pub fade_out: Option<Toggle>,
    pub angle_offset: Option<f64>,
    pub event_tag: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SetPlanetRotation {
    pub ease: Option<String>,
    pub ease_parts: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MoveDecorations {
    pub duration: Option<f64>,
    pub tag: Option<String>,
    pub position_offset: Option<Offset>,
    pub rotation_offset: Option<f64>,
    pub scale: Option<Value>,
    pub angle_offset: Option<f64>,
    pub ease: Option<String>,
    pub event_tag: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PositionTrack {
    pub position_offset: Option<Offset>,
    pub editor_only: Option<Toggle>,
}

impl PositionTrack {
    /// The explicit placement for the following tile, if this action overrides
    /// the accumulated path position.
    ///
    /// Only actions with `editorOnly: Disabled` move the track in play.
    pub fn placement(&self) -> Option<Offset> {
        match self.editor_only {
            Some(Toggle::Disabled) => Some(self.position_offset.unwrap_or_default()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RepeatEvents {
    pub repetitions: Option<i64>,
    pub interval: Option<f64>,
    pub tag: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Bloom {
    pub enabled: Option<Toggle>,
    pub threshold: Option<f64>,
    pub intensity: Option<f64>,
    pub color: Option<String>,
    pub angle_offset: Option<f64>,
    pub event_tag: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SetConditionalEvents {
    pub perfect_tag: Option<String>,
    pub hit_tag: Option<String>,
    pub barely_tag: Option<String>,
    pub miss_tag: Option<String>,
    pub loss_tag: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_set_speed() {
        let action: Action = serde_json::from_value(json!({
            "floor": 4,
            "eventType": "SetSpeed",
            "speedType": "Multiplier",
            "beatsPerMinute": 100,
            "bpmMultiplier": 2
        }))
        .unwrap();
        assert_eq!(action.kind(), EventKind::SetSpeed);
        match action {
            Action::SetSpeed(speed) => {
                assert_eq!(speed.tempo_change(), Some(TempoChange::Multiplier(2.0)));
            }
            other => panic!("expected SetSpeed, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_twirl_ignores_extra_fields() {
        let action: Action = serde_json::from_value(json!({ "floor": 2, "eventType": "Twirl" })).unwrap();
        assert_eq!(action, Action::Twirl);
    }

    #[test]
    fn test_speed_mode_defaults() {
        let speed = SetSpeed::default();
        assert_eq!(speed.tempo_change(), Some(TempoChange::Absolute(DEFAULT_SPEED_BPM)));

        let unknown = SetSpeed {
            speed_type: Some("Double".to_string()),
            ..Default::default()
        };
        assert_eq!(unknown.tempo_change(), None);
    }

    #[test]
    fn test_tempo_change_apply() {
        assert_eq!(TempoChange::Absolute(150.0).apply(100.0), 150.0);
        assert_eq!(TempoChange::Multiplier(2.0).apply(150.0), 300.0);
    }

    #[test]
    fn test_toggle_accepts_strings_and_booleans() {
        let a: Toggle = serde_json::from_value(json!("Disabled")).unwrap();
        let b: Toggle = serde_json::from_value(json!(true)).unwrap();
        assert_eq!(a, Toggle::Disabled);
        assert_eq!(b, Toggle::Enabled);
        assert!(serde_json::from_value::<Toggle>(json!("Maybe")).is_err());
    }

    #[test]
    fn test_position_track_placement() {
        let action: Action = serde_json::from_value(json!({
            "eventType": "PositionTrack",
            "positionOffset": [3, null],
            "editorOnly": "Disabled"
        }))
        .unwrap();
        let Action::PositionTrack(track) = action else {
            panic!("expected PositionTrack");
        };
        assert_eq!(track.placement(), Some(Offset(Some(3.0), None)));

        let editor_only = PositionTrack {
            position_offset: Some(Offset(Some(1.0), Some(1.0))),
            editor_only: Some(Toggle::Enabled),
        };
        assert_eq!(editor_only.placement(), None);
    }

    #[test]
    fn test_unknown_event_type_is_rejected() {
        let result = serde_json::from_value::<Action>(json!({ "eventType": "EditorComment" }));
        assert!(result.is_err());
    }
}
