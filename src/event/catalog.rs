//! Event catalog: the closed set of event kinds the analyzer recognizes.
//!
//! The table is constant data. [`EventCatalog`] indexes it by name once and is
//! passed by reference to whoever needs to resolve `eventType` strings.

use serde::Serialize;
use std::collections::HashMap;

use crate::error::AdofaiError;

/// A known event kind.
///
/// Variant names match the `eventType` strings used in level files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum EventKind {
    SetSpeed,
    Twirl,
    Checkpoint,
    CustomBackground,
    ColorTrack,
    AnimateTrack,
    AddDecoration,
    Flash,
    MoveCamera,
    SetHitsound,
    RecolorTrack,
    MoveTrack,
    SetFilter,
    HallOfMirrors,
    ShakeScreen,
    SetPlanetRotation,
    MoveDecorations,
    PositionTrack,
    RepeatEvents,
    Bloom,
    SetConditionalEvents,
}

impl EventKind {
    pub const ALL: [EventKind; 21] = [
        EventKind::SetSpeed,
        EventKind::Twirl,
        EventKind::Checkpoint,
        EventKind::CustomBackground,
        EventKind::ColorTrack,
        EventKind::AnimateTrack,
        EventKind::AddDecoration,
        EventKind::Flash,
        EventKind::MoveCamera,
        EventKind::SetHitsound,
        EventKind::RecolorTrack,
        EventKind::MoveTrack,
        EventKind::SetFilter,
        EventKind::HallOfMirrors,
        EventKind::ShakeScreen,
        EventKind::SetPlanetRotation,
        EventKind::MoveDecorations,
        EventKind::PositionTrack,
        EventKind::RepeatEvents,
        EventKind::Bloom,
        EventKind::SetConditionalEvents,
    ];

    /// The `eventType` string for this kind.
    pub fn name(self) -> &'static str {
        self.metadata().0
    }

    /// Whether a tile may carry at most one action of this kind.
    pub fn single_only(self) -> bool {
        self.metadata().1
    }

    fn metadata(self) -> (&'static str, bool) {
        match self {
            EventKind::SetSpeed => ("SetSpeed", true),
            EventKind::Twirl => ("Twirl", true),
            EventKind::Checkpoint => ("Checkpoint", true),
            EventKind::CustomBackground => ("CustomBackground", false),
            EventKind::ColorTrack => ("ColorTrack", true),
            EventKind::AnimateTrack => ("AnimateTrack", true),
            EventKind::AddDecoration => ("AddDecoration", false),
            EventKind::Flash => ("Flash", false),
            EventKind::MoveCamera => ("MoveCamera", false),
            EventKind::SetHitsound => ("SetHitsound", true),
            EventKind::RecolorTrack => ("RecolorTrack", false),
            EventKind::MoveTrack => ("MoveTrack", false),
            EventKind::SetFilter => ("SetFilter", false),
            EventKind::HallOfMirrors => ("HallOfMirrors", false),
            EventKind::ShakeScreen => ("ShakeScreen", false),
            EventKind::SetPlanetRotation => ("SetPlanetRotation", true),
            EventKind::MoveDecorations => ("MoveDecorations", false),
            EventKind::PositionTrack => ("PositionTrack", true),
            EventKind::RepeatEvents => ("RepeatEvents", true),
            EventKind::Bloom => ("Bloom", false),
            EventKind::SetConditionalEvents => ("SetConditionalEvents", true),
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Name lookup over [`EventKind::ALL`].
#[derive(Debug, Clone)]
pub struct EventCatalog {
    by_name: HashMap<&'static str, EventKind>,
}

impl EventCatalog {
    pub fn new() -> Self {
        let by_name = EventKind::ALL.iter().map(|kind| (kind.name(), *kind)).collect();
        Self { by_name }
    }

    /// Resolve an `eventType` string.
    ///
    /// # Example
    /// ```
    /// use adofai::{EventCatalog, EventKind};
    ///
    /// let catalog = EventCatalog::new();
    /// assert_eq!(catalog.resolve("Twirl").unwrap(), EventKind::Twirl);
    /// assert!(catalog.resolve("EditorComment").is_err());
    /// ```
    pub fn resolve(&self, name: &str) -> Result<EventKind, AdofaiError> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| AdofaiError::UnknownEventKind(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl Default for EventCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_covers_every_kind() {
        let catalog = EventCatalog::new();
        assert_eq!(catalog.len(), 21);
        for kind in EventKind::ALL {
            assert_eq!(catalog.resolve(kind.name()).unwrap(), kind);
        }
    }

    #[test]
    fn test_single_only_flags() {
        assert!(EventKind::SetSpeed.single_only());
        assert!(EventKind::Twirl.single_only());
        assert!(EventKind::PositionTrack.single_only());
        assert!(!EventKind::MoveCamera.single_only());
        assert!(!EventKind::AddDecoration.single_only());
        assert!(!EventKind::Flash.single_only());
    }

    #[test]
    fn test_unknown_name() {
        let catalog = EventCatalog::new();
        let result = catalog.resolve("setspeed");
        assert!(matches!(result, Err(AdofaiError::UnknownEventKind(name)) if name == "setspeed"));
    }

    #[test]
    fn test_serializes_as_event_type_name() {
        let json = serde_json::to_string(&EventKind::SetConditionalEvents).unwrap();
        assert_eq!(json, "\"SetConditionalEvents\"");
    }
}
