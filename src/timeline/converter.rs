//! Angle conversion between consecutive tiles.

use crate::angle::Angle;

/// Output of [`convert`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conversion {
    /// Absolute heading of the next tile, in `[0, 360)`.
    pub static_angle: f64,
    /// Turn from the current heading to the next one.
    pub relative_angle: f64,
}

/// Convert the current heading plus the next descriptor into the next heading
/// and the turn between them.
///
/// Dynamic descriptors are turns: their value is the relative angle as-is.
/// Static descriptors are headings: the turn is their difference, measured
/// clockwise or counter-clockwise depending on `reversed`, shifted by 180 when
/// the previous tile was neutral, and normalized into `(0, 360]`. A raw turn of
/// exactly 0 is a full revolution.
///
/// # Example
/// ```
/// use adofai::{convert, Angle};
///
/// let up = Angle::from_letter('U').unwrap();
/// let step = convert(0.0, &up, false, false);
/// assert_eq!(step.static_angle, 90.0);
/// assert_eq!(step.relative_angle, 270.0);
/// ```
pub fn convert(
    current_static: f64,
    next: &Angle,
    reversed: bool,
    previous_was_neutral: bool,
) -> Conversion {
    if next.is_dynamic() {
        return Conversion {
            static_angle: (current_static + next.angle()).rem_euclid(360.0),
            relative_angle: next.angle(),
        };
    }

    let mut relative = if reversed {
        next.angle() - current_static
    } else {
        current_static - next.angle()
    };
    if previous_was_neutral {
        relative += 180.0;
    }

    Conversion {
        static_angle: next.angle().rem_euclid(360.0),
        relative_angle: normalize_relative(relative),
    }
}

/// Fold a turn into `(0, 360]`. An exact multiple of 360 becomes 360.
pub fn normalize_relative(relative: f64) -> f64 {
    let folded = relative.rem_euclid(360.0);
    if folded == 0.0 {
        360.0
    } else {
        folded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letter(code: char) -> Angle {
        Angle::from_letter(code).unwrap()
    }

    #[test]
    fn test_static_forward() {
        let step = convert(0.0, &letter('U'), false, false);
        assert_eq!(step.static_angle, 90.0);
        assert_eq!(step.relative_angle, 270.0);

        let step = convert(90.0, &letter('L'), false, false);
        assert_eq!(step.static_angle, 180.0);
        assert_eq!(step.relative_angle, 270.0);
    }

    #[test]
    fn test_static_reversed() {
        let step = convert(0.0, &letter('U'), true, false);
        assert_eq!(step.static_angle, 90.0);
        assert_eq!(step.relative_angle, 90.0);
    }

    #[test]
    fn test_zero_turn_is_full_revolution() {
        let step = convert(90.0, &letter('U'), false, false);
        assert_eq!(step.relative_angle, 360.0);
        let step = convert(90.0, &letter('U'), true, false);
        assert_eq!(step.relative_angle, 360.0);
    }

    #[test]
    fn test_previous_neutral_adds_half_turn() {
        let step = convert(0.0, &letter('L'), false, true);
        // 0 - 180 + 180 = 0, a full revolution
        assert_eq!(step.relative_angle, 360.0);
        let step = convert(0.0, &letter('U'), false, true);
        assert_eq!(step.relative_angle, 90.0);
    }

    #[test]
    fn test_dynamic_descriptor() {
        let step = convert(300.0, &letter('5'), false, false);
        assert!((step.static_angle - 48.0).abs() < 1e-9);
        assert_eq!(step.relative_angle, 108.0);

        // direction does not matter for dynamic turns
        let reversed = convert(300.0, &letter('5'), true, false);
        assert_eq!(reversed, step);
    }

    #[test]
    fn test_neutral_descriptor_keeps_heading() {
        let step = convert(135.0, &Angle::neutral(), false, false);
        assert_eq!(step.static_angle, 135.0);
        assert_eq!(step.relative_angle, 0.0);
    }

    #[test]
    fn test_normalize_bounds() {
        for raw in [-720.0, -360.0, -0.5, 0.0, 0.5, 359.5, 360.0, 360.5, 1080.0] {
            let normalized = normalize_relative(raw);
            assert!(normalized > 0.0 && normalized <= 360.0, "{} -> {}", raw, normalized);
        }
        assert_eq!(normalize_relative(-90.0), 270.0);
        assert_eq!(normalize_relative(450.0), 90.0);
        assert_eq!(normalize_relative(720.0), 360.0);
    }

    #[test]
    fn test_normalize_huge_values() {
        for raw in [1e20, -1e20, 1e300, -1e300] {
            let normalized = normalize_relative(raw);
            assert!(normalized > 0.0 && normalized <= 360.0, "{} -> {}", raw, normalized);
        }
    }
}
