//! # Error Types
//!
//! This module defines all error types for the level analyzer.
//!
//! Fatal errors carry enough context (floor index, offending value) to locate the
//! bad input in the level file. Recoverable conditions (unknown event kinds, events
//! on missing floors) never surface here; they are logged and recorded on the
//! [`Timeline`](crate::Timeline) instead.
//!
//! ## Usage
//! ```rust
//! use adofai::{analyze, AdofaiError};
//!
//! let source = r#"{ "pathData": "RRZ", "settings": { "bpm": 120 } }"#;
//! match analyze(source) {
//!     Ok(timeline) => println!("{} tiles", timeline.len()),
//!     Err(AdofaiError::UnknownSpeedMode { floor, mode }) => {
//!         eprintln!("Bad speed mode {:?} on floor {}", mode, floor);
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdofaiError {
    /// A letter or degree value that is not part of the angle table.
    ///
    /// # Example
    /// ```
    /// # use adofai::AdofaiError;
    /// let err = AdofaiError::UnknownAngleCode("X".to_string());
    /// assert_eq!(err.to_string(), "Unknown angle code: X");
    /// ```
    #[error("Unknown angle code: {0}")]
    UnknownAngleCode(String),

    /// An `eventType` name that the event catalog does not know.
    #[error("Unknown event kind: {0}")]
    UnknownEventKind(String),

    /// A `SetSpeed` event whose `speedType` is neither `Bpm` nor `Multiplier`.
    ///
    /// Tempo drives the duration of every later tile, so this aborts the build.
    ///
    /// # Example
    /// ```
    /// # use adofai::AdofaiError;
    /// let err = AdofaiError::UnknownSpeedMode { floor: 12, mode: "Double".to_string() };
    /// assert_eq!(err.to_string(), "Unknown speed mode 'Double' on floor 12");
    /// ```
    #[error("Unknown speed mode '{mode}' on floor {floor}")]
    UnknownSpeedMode { floor: usize, mode: String },

    /// A path entry that is neither a letter code nor a numeric literal.
    #[error("Malformed angle descriptor on floor {floor}: {value}")]
    MalformedAngle { floor: usize, value: String },

    /// An operation needed at least one tile but the timeline is empty.
    #[error("Timeline contains no tiles")]
    EmptyTimeline,

    /// The level container could not be decoded.
    #[error("Invalid level file: {0}")]
    LevelFormat(String),

    /// The YAML configuration could not be decoded.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Writing the MIDI file failed.
    #[error("MIDI export failed: {0}")]
    Midi(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
