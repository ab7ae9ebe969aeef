//! # Angle Model
//!
//! A single directional value on the level path.
//!
//! Levels describe their path either as a string of letter codes (`pathData`) or as
//! a list of degree values (`angleData`). Both views of an [`Angle`] are available
//! no matter which one it was built from.
//!
//! ## Letter Table
//! ```text
//! R p J E T o U q G Q H W   0 .. 165 in 15 degree steps
//! L x N Z F V D Y B C M A   180 .. 345 in 15 degree steps
//! 5 6                       108, 252 (dynamic)
//! 7 8                       900/7, 360 - 900/7 (dynamic)
//! !                         neutral, 0 (dynamic)
//! ```
//!
//! Static codes are absolute headings. Dynamic codes are turns relative to the
//! incoming heading.
//!
//! ## Sentinels
//! - `999` marks a short-return tile
//! - negative values mark a long-return tile

use serde::Serialize;

use crate::error::AdofaiError;

/// Raw angle value marking a short-return tile.
pub const SHORT_RETURN: f64 = 999.0;

/// Tolerance for comparing degree values.
pub const EPSILON: f64 = 1e-9;

const ANGLE_TABLE: [(char, f64, bool); 29] = [
    ('R', 0.0, false),
    ('p', 15.0, false),
    ('J', 30.0, false),
    ('E', 45.0, false),
    ('T', 60.0, false),
    ('o', 75.0, false),
    ('U', 90.0, false),
    ('q', 105.0, false),
    ('G', 120.0, false),
    ('Q', 135.0, false),
    ('H', 150.0, false),
    ('W', 165.0, false),
    ('L', 180.0, false),
    ('x', 195.0, false),
    ('N', 210.0, false),
    ('Z', 225.0, false),
    ('F', 240.0, false),
    ('V', 255.0, false),
    ('D', 270.0, false),
    ('Y', 285.0, false),
    ('B', 300.0, false),
    ('C', 315.0, false),
    ('M', 330.0, false),
    ('A', 345.0, false),
    ('5', 108.0, true),
    ('6', 252.0, true),
    ('7', 900.0 / 7.0, true),
    ('8', 360.0 - 900.0 / 7.0, true),
    ('!', 0.0, true),
];

const NEUTRAL_CODE: char = '!';

/// A directional value in degrees.
///
/// Immutable once constructed. Equality compares the degree value only, within
/// [`EPSILON`].
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Angle {
    angle: f64,
    is_dynamic: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    letter: Option<char>,
}

impl Angle {
    /// Look up a letter code.
    ///
    /// # Example
    /// ```
    /// use adofai::Angle;
    ///
    /// let up = Angle::from_letter('U').unwrap();
    /// assert_eq!(up.angle(), 90.0);
    /// assert!(!up.is_dynamic());
    /// assert!(Angle::from_letter('X').is_err());
    /// ```
    pub fn from_letter(code: char) -> Result<Self, AdofaiError> {
        ANGLE_TABLE
            .iter()
            .find(|(letter, _, _)| *letter == code)
            .map(|&(letter, angle, is_dynamic)| Self {
                angle,
                is_dynamic,
                letter: Some(letter),
            })
            .ok_or_else(|| AdofaiError::UnknownAngleCode(code.to_string()))
    }

    /// Look up the table entry for a canonical degree value.
    ///
    /// The neutral code shares 0 degrees with `R` and is only reachable through
    /// [`Angle::from_letter`] or [`Angle::neutral`].
    pub fn from_degrees(value: f64) -> Result<Self, AdofaiError> {
        ANGLE_TABLE
            .iter()
            .filter(|(letter, _, _)| *letter != NEUTRAL_CODE)
            .find(|(_, angle, _)| (angle - value).abs() < EPSILON)
            .map(|&(letter, angle, is_dynamic)| Self {
                angle,
                is_dynamic,
                letter: Some(letter),
            })
            .ok_or_else(|| AdofaiError::UnknownAngleCode(value.to_string()))
    }

    /// An absolute heading taken verbatim from numeric level data.
    ///
    /// Never fails: sentinel values (999, negatives) and headings outside the
    /// letter table are kept as-is, with no letter attached.
    pub fn numeric(value: f64) -> Self {
        let letter = ANGLE_TABLE
            .iter()
            .find(|(_, angle, is_dynamic)| !is_dynamic && (angle - value).abs() < EPSILON)
            .map(|(letter, _, _)| *letter);
        Self {
            angle: value,
            is_dynamic: false,
            letter,
        }
    }

    /// The neutral angle: 0 degrees, dynamic.
    pub fn neutral() -> Self {
        Self {
            angle: 0.0,
            is_dynamic: true,
            letter: Some(NEUTRAL_CODE),
        }
    }

    /// The heading rotated by 180 degrees: `(|angle| + 180) mod 360`.
    pub fn opposite(&self) -> Self {
        Self::numeric((self.angle.abs() + 180.0) % 360.0)
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn is_dynamic(&self) -> bool {
        self.is_dynamic
    }

    pub fn letter(&self) -> Option<char> {
        self.letter
    }

    pub fn radians(&self) -> f64 {
        self.angle.to_radians()
    }

    pub fn is_neutral(&self) -> bool {
        self.is_dynamic && self.angle.abs() < EPSILON
    }

    pub fn is_short_return(&self) -> bool {
        !self.is_dynamic && (self.angle - SHORT_RETURN).abs() < EPSILON
    }

    pub fn is_long_return(&self) -> bool {
        !self.is_dynamic && self.angle < 0.0
    }
}

impl PartialEq for Angle {
    fn eq(&self, other: &Self) -> bool {
        (self.angle - other.angle).abs() < EPSILON
    }
}

impl PartialEq<f64> for Angle {
    fn eq(&self, other: &f64) -> bool {
        (self.angle - other).abs() < EPSILON
    }
}

impl std::fmt::Display for Angle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.letter {
            Some(letter) => write!(f, "{}", letter),
            None => write!(f, "{}", self.angle),
        }
    }
}
