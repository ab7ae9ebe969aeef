//! # Configuration
//!
//! Optional YAML settings for the command-line tool. Every key may be omitted.
//!
//! ```yaml
//! bpm: 180          # override the level's base tempo
//! midi:
//!   ppq: 960
//!   note: 60
//!   velocity: 90
//!   program: 13
//!   include_first_tile: true
//! ```
//!
//! Unknown keys are rejected.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::AdofaiError;
use crate::midi::MidiOptions;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Base tempo used instead of the level's `settings.bpm`.
    pub bpm: Option<f64>,
    pub midi: MidiOptions,
}

impl Config {
    /// Decode a YAML document. An empty document yields the defaults.
    pub fn from_yaml(source: &str) -> Result<Self, AdofaiError> {
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(source).map_err(|e| AdofaiError::Config(e.to_string()))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, AdofaiError> {
        let source = fs::read_to_string(path)?;
        Self::from_yaml(&source)
    }
}
