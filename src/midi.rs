// MIDI Export - Render a tile timeline as a single-track MIDI file using midly
// One note per hit tile, placed at the tile's start time and held for its duration

use midly::{Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind};
use serde::{Deserialize, Serialize};

use crate::error::AdofaiError;
use crate::timeline::Timeline;

/// MIDI export options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MidiOptions {
    /// Pulses per quarter note (PPQ)
    pub ppq: u16,

    /// Key played for every tile
    pub note: u8,

    pub velocity: u8,

    /// General MIDI program (0 = acoustic grand piano)
    pub program: u8,

    /// Play a note for the start tile as well. The player never hits it.
    pub include_first_tile: bool,
}

impl Default for MidiOptions {
    fn default() -> Self {
        MidiOptions {
            ppq: 480,
            note: 72,
            velocity: 100,
            program: 0,
            include_first_tile: false,
        }
    }
}

const CHANNEL: u8 = 0;

/// Export a timeline to MIDI file bytes
///
/// The file tempo is the first tile's bpm. Tile times are already in
/// milliseconds, so later tempo changes are baked into note positions rather
/// than written as tempo events. Tiles with no duration produce no note.
///
/// # Errors
/// - [`AdofaiError::EmptyTimeline`] if there are no tiles
/// - [`AdofaiError::Midi`] if the options are out of MIDI range, the initial
///   tempo is not positive, or serialization fails
pub fn export(timeline: &Timeline, options: &MidiOptions) -> Result<Vec<u8>, AdofaiError> {
    let first = timeline.first().ok_or(AdofaiError::EmptyTimeline)?;
    validate(options)?;

    let bpm = first.bpm();
    if !(bpm > 0.0 && bpm.is_finite()) {
        return Err(AdofaiError::Midi(format!(
            "initial tempo must be positive, got {}",
            bpm
        )));
    }
    let ticks_per_ms = calculate_ticks_per_ms(bpm, options.ppq);

    let mut events: Vec<(u32, TrackEventKind<'static>)> = vec![
        (0, TrackEventKind::Meta(MetaMessage::Tempo(tempo_micros(bpm).into()))),
        (
            0,
            TrackEventKind::Midi {
                channel: CHANNEL.into(),
                message: MidiMessage::ProgramChange {
                    program: options.program.into(),
                },
            },
        ),
    ];

    let skip = if options.include_first_tile { 0 } else { 1 };
    for tile in timeline.iter().skip(skip) {
        if tile.duration_ms() <= 0.0 {
            continue;
        }
        let tick_on = to_ticks(tile.start_ms(), ticks_per_ms);
        let tick_off = to_ticks(tile.start_ms() + tile.duration_ms(), ticks_per_ms);

        events.push((
            tick_on,
            TrackEventKind::Midi {
                channel: CHANNEL.into(),
                message: MidiMessage::NoteOn {
                    key: options.note.into(),
                    vel: options.velocity.into(),
                },
            },
        ));
        events.push((
            tick_off,
            TrackEventKind::Midi {
                channel: CHANNEL.into(),
                message: MidiMessage::NoteOff {
                    key: options.note.into(),
                    vel: 0u8.into(),
                },
            },
        ));
    }

    // Stable sort keeps a note-off ahead of a note-on on the same tick
    events.sort_by_key(|(tick, _)| *tick);

    let mut track = Track::new();
    let mut last_tick = 0;
    for (tick, kind) in events {
        track.push(TrackEvent {
            delta: tick.saturating_sub(last_tick).into(),
            kind,
        });
        last_tick = tick;
    }
    track.push(TrackEvent {
        delta: 0u32.into(),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });

    let smf = Smf {
        header: Header {
            format: Format::SingleTrack,
            timing: Timing::Metrical(options.ppq.into()),
        },
        tracks: vec![track],
    };

    let mut bytes = Vec::new();
    smf.write(&mut bytes)
        .map_err(|e| AdofaiError::Midi(e.to_string()))?;

    Ok(bytes)
}

fn validate(options: &MidiOptions) -> Result<(), AdofaiError> {
    let fields = [
        ("note", options.note),
        ("velocity", options.velocity),
        ("program", options.program),
    ];
    for (name, value) in fields {
        if value > 127 {
            return Err(AdofaiError::Midi(format!(
                "{} must be between 0 and 127, got {}",
                name, value
            )));
        }
    }
    if options.ppq == 0 || options.ppq > 0x7FFF {
        return Err(AdofaiError::Midi(format!(
            "ppq must be between 1 and 32767, got {}",
            options.ppq
        )));
    }
    Ok(())
}

/// Calculate ticks per millisecond
fn calculate_ticks_per_ms(bpm: f64, ppq: u16) -> f64 {
    let ms_per_quarter = 60_000.0 / bpm;
    ppq as f64 / ms_per_quarter
}

/// Microseconds per quarter note, clamped to the 24-bit tempo field
fn tempo_micros(bpm: f64) -> u32 {
    ((60_000_000.0 / bpm).round() as u32).min(0xFF_FFFF)
}

fn to_ticks(ms: f64, ticks_per_ms: f64) -> u32 {
    (ms * ticks_per_ms).round() as u32
}
