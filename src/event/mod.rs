//! # Events
//!
//! Level files carry a flat list of event records, each naming a `floor` and an
//! `eventType`. This module turns those records into typed [`Action`]s grouped
//! by floor.
//!
//! Grouping never fails. A record that cannot be attached to a tile is dropped,
//! logged with `warn!`, and returned as a [`SkippedEvent`] so callers can report
//! it:
//! - unknown `eventType`
//! - missing or out-of-range `floor`
//! - payload fields of the wrong shape
//! - a second instance of a single-only kind on the same floor (the later one
//!   replaces the earlier)

pub mod action;
pub mod catalog;

pub use action::{Action, Offset, TempoChange, Toggle};
pub use catalog::{EventCatalog, EventKind};

use log::warn;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Events attached to one tile, grouped by kind in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventMap {
    entries: Vec<(EventKind, Vec<Action>)>,
}

impl EventMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from an ordered action list.
    pub fn from_actions<I: IntoIterator<Item = Action>>(actions: I) -> Self {
        let mut map = Self::new();
        for action in actions {
            map.insert(action);
        }
        map
    }

    /// Add an action. For single-only kinds the new action replaces any
    /// existing one, which is returned.
    pub fn insert(&mut self, action: Action) -> Option<Action> {
        let kind = action.kind();
        match self.entries.iter_mut().find(|(k, _)| *k == kind) {
            Some((_, actions)) if kind.single_only() => {
                let previous = std::mem::replace(&mut actions[0], action);
                Some(previous)
            }
            Some((_, actions)) => {
                actions.push(action);
                None
            }
            None => {
                self.entries.push((kind, vec![action]));
                None
            }
        }
    }

    /// All actions of a kind, in insertion order.
    pub fn get(&self, kind: EventKind) -> &[Action] {
        self.entries
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, actions)| actions.as_slice())
            .unwrap_or(&[])
    }

    pub fn first(&self, kind: EventKind) -> Option<&Action> {
        self.get(kind).first()
    }

    pub fn contains(&self, kind: EventKind) -> bool {
        !self.get(kind).is_empty()
    }

    /// Kinds present on the tile, in first-seen order.
    pub fn kinds(&self) -> impl Iterator<Item = EventKind> + '_ {
        self.entries.iter().map(|(kind, _)| *kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EventKind, &[Action])> {
        self.entries
            .iter()
            .map(|(kind, actions)| (*kind, actions.as_slice()))
    }

    /// Total number of actions across all kinds.
    pub fn len(&self) -> usize {
        self.entries.iter().map(|(_, actions)| actions.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for EventMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (kind, actions) in &self.entries {
            map.serialize_entry(kind, actions)?;
        }
        map.end()
    }
}

/// Why an event record was left out of the timeline.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "detail")]
pub enum SkipReason {
    NotAnObject,
    MissingEventType,
    UnknownKind,
    MissingFloor,
    FloorOutOfRange,
    Malformed(String),
    Replaced,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotAnObject => write!(f, "record is not an object"),
            SkipReason::MissingEventType => write!(f, "missing eventType"),
            SkipReason::UnknownKind => write!(f, "unknown event kind"),
            SkipReason::MissingFloor => write!(f, "missing floor"),
            SkipReason::FloorOutOfRange => write!(f, "floor is outside the tile range"),
            SkipReason::Malformed(detail) => write!(f, "malformed payload: {}", detail),
            SkipReason::Replaced => write!(f, "replaced by a later event of the same kind"),
        }
    }
}

/// A dropped event record.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedEvent {
    pub floor: Option<i64>,
    pub event_type: Option<String>,
    pub reason: SkipReason,
}

impl fmt::Display for SkippedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.floor {
            Some(floor) => write!(f, "floor {}", floor)?,
            None => write!(f, "floor ?")?,
        }
        if let Some(event_type) = &self.event_type {
            write!(f, " {}", event_type)?;
        }
        write!(f, ": {}", self.reason)
    }
}

/// Result of [`group_by_floor`].
#[derive(Debug, Clone, Default)]
pub struct EventGroups {
    pub by_floor: BTreeMap<usize, Vec<Action>>,
    pub skipped: Vec<SkippedEvent>,
}

/// Decode raw event records and group them by floor.
///
/// Records referencing floors at or beyond `tile_count` are skipped.
///
/// # Example
/// ```
/// use adofai::event::{group_by_floor, EventCatalog, EventKind};
/// use serde_json::json;
///
/// let records = vec![
///     json!({ "floor": 1, "eventType": "Twirl" }),
///     json!({ "floor": 1, "eventType": "EditorComment" }),
/// ];
/// let groups = group_by_floor(&records, 3, &EventCatalog::new());
/// assert_eq!(groups.by_floor[&1][0].kind(), EventKind::Twirl);
/// assert_eq!(groups.skipped.len(), 1);
/// ```
pub fn group_by_floor(records: &[Value], tile_count: usize, catalog: &EventCatalog) -> EventGroups {
    let mut groups = EventGroups::default();

    for record in records {
        let (floor, action) = match decode_record(record, tile_count, catalog) {
            Ok(decoded) => decoded,
            Err(skipped) => {
                warn!("Skipping event: {}", skipped);
                groups.skipped.push(skipped);
                continue;
            }
        };

        let kind = action.kind();
        let actions = groups.by_floor.entry(floor).or_default();
        let existing = actions.iter().position(|a| a.kind() == kind);
        match existing {
            Some(index) if kind.single_only() => {
                actions[index] = action;
                let skipped = SkippedEvent {
                    floor: Some(floor as i64),
                    event_type: Some(kind.name().to_string()),
                    reason: SkipReason::Replaced,
                };
                warn!("Skipping event: {}", skipped);
                groups.skipped.push(skipped);
            }
            _ => actions.push(action),
        }
    }

    groups
}

fn decode_record(
    record: &Value,
    tile_count: usize,
    catalog: &EventCatalog,
) -> Result<(usize, Action), SkippedEvent> {
    let object = record.as_object().ok_or(SkippedEvent {
        floor: None,
        event_type: None,
        reason: SkipReason::NotAnObject,
    })?;

    let raw_floor = object.get("floor");
    let floor_number = raw_floor.and_then(Value::as_i64);
    let event_type = object.get("eventType").and_then(Value::as_str);
    let skip = |reason: SkipReason| SkippedEvent {
        floor: floor_number,
        event_type: event_type.map(str::to_string),
        reason,
    };

    let name = event_type.ok_or_else(|| skip(SkipReason::MissingEventType))?;
    catalog
        .resolve(name)
        .map_err(|_| skip(SkipReason::UnknownKind))?;

    let floor = match floor_number {
        Some(n) if n < 0 => return Err(skip(SkipReason::FloorOutOfRange)),
        Some(n) => n as usize,
        None => return Err(skip(SkipReason::MissingFloor)),
    };
    if floor >= tile_count {
        return Err(skip(SkipReason::FloorOutOfRange));
    }

    let action: Action = serde_json::from_value(record.clone())
        .map_err(|e| skip(SkipReason::Malformed(e.to_string())))?;

    Ok((floor, action))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn catalog() -> EventCatalog {
        EventCatalog::new()
    }

    #[test]
    fn test_group_preserves_order_within_floor() {
        let records = vec![
            json!({ "floor": 2, "eventType": "MoveCamera", "zoom": 100 }),
            json!({ "floor": 0, "eventType": "SetSpeed", "beatsPerMinute": 150 }),
            json!({ "floor": 2, "eventType": "Flash" }),
            json!({ "floor": 2, "eventType": "MoveCamera", "zoom": 200 }),
        ];
        let groups = group_by_floor(&records, 3, &catalog());
        assert!(groups.skipped.is_empty());

        let kinds: Vec<EventKind> = groups.by_floor[&2].iter().map(Action::kind).collect();
        assert_eq!(
            kinds,
            vec![EventKind::MoveCamera, EventKind::Flash, EventKind::MoveCamera]
        );
        assert_eq!(groups.by_floor[&0].len(), 1);
    }

    #[test]
    fn test_skip_reasons() {
        let records = vec![
            json!("not an event"),
            json!({ "floor": 1 }),
            json!({ "floor": 1, "eventType": "EditorComment" }),
            json!({ "eventType": "Twirl" }),
            json!({ "floor": -1, "eventType": "Twirl" }),
            json!({ "floor": 3, "eventType": "Twirl" }),
            json!({ "floor": 1, "eventType": "SetSpeed", "beatsPerMinute": "fast" }),
        ];
        let groups = group_by_floor(&records, 3, &catalog());
        assert!(groups.by_floor.is_empty());

        let reasons: Vec<&SkipReason> = groups.skipped.iter().map(|s| &s.reason).collect();
        assert_eq!(reasons[0], &SkipReason::NotAnObject);
        assert_eq!(reasons[1], &SkipReason::MissingEventType);
        assert_eq!(reasons[2], &SkipReason::UnknownKind);
        assert_eq!(reasons[3], &SkipReason::MissingFloor);
        assert_eq!(reasons[4], &SkipReason::FloorOutOfRange);
        assert_eq!(reasons[5], &SkipReason::FloorOutOfRange);
        assert!(matches!(reasons[6], SkipReason::Malformed(_)));
        assert_eq!(groups.skipped[2].event_type.as_deref(), Some("EditorComment"));
    }

    #[test]
    fn test_single_only_duplicate_is_replaced() {
        let records = vec![
            json!({ "floor": 1, "eventType": "SetSpeed", "beatsPerMinute": 120 }),
            json!({ "floor": 1, "eventType": "SetSpeed", "beatsPerMinute": 180 }),
        ];
        let groups = group_by_floor(&records, 2, &catalog());
        assert_eq!(groups.by_floor[&1].len(), 1);
        match &groups.by_floor[&1][0] {
            Action::SetSpeed(speed) => assert_eq!(speed.beats_per_minute, Some(180.0)),
            other => panic!("expected SetSpeed, got {:?}", other),
        }
        assert_eq!(groups.skipped.len(), 1);
        assert_eq!(groups.skipped[0].reason, SkipReason::Replaced);
    }

    #[test]
    fn test_event_map_multimap() {
        let mut map = EventMap::new();
        assert!(map.insert(Action::Flash(Default::default())).is_none());
        assert!(map.insert(Action::Flash(Default::default())).is_none());
        assert!(map.insert(Action::Twirl).is_none());
        assert!(map.insert(Action::Twirl).is_some());

        assert_eq!(map.get(EventKind::Flash).len(), 2);
        assert_eq!(map.get(EventKind::Twirl).len(), 1);
        assert!(map.get(EventKind::Bloom).is_empty());
        assert_eq!(map.len(), 3);
        assert_eq!(
            map.kinds().collect::<Vec<_>>(),
            vec![EventKind::Flash, EventKind::Twirl]
        );
    }

    #[test]
    fn test_skipped_event_display() {
        let skipped = SkippedEvent {
            floor: Some(4),
            event_type: Some("EditorComment".to_string()),
            reason: SkipReason::UnknownKind,
        };
        assert_eq!(skipped.to_string(), "floor 4 EditorComment: unknown event kind");
    }
}
