//! Degrees/minutes coordinate codec.
//!
//! Converts decimal degrees to the `"42° 30.000' N"` display form used across
//! the app and back. Longitudes west of Greenwich carry the `O` (oeste) label.
//!
//! # Example
//!
//! ```
//! use buoy_catalog::coordinate::{format, parse, to_decimal_degrees};
//!
//! assert_eq!(format(-8.75, false), "8° 45.000' O");
//! assert_eq!(to_decimal_degrees(42, 30.0, false), 42.5);
//! let lng = parse("8° 45.000' O", false).expect("should parse");
//! assert!((lng + 8.75).abs() < 1e-9);
//! ```

use nom::{
    character::complete::{digit0, digit1, multispace0, one_of},
    combinator::{map_opt, map_res, opt, recognize},
    IResult, Parser,
};
use tracing::trace;

use crate::error::CoordinateError;

/// A coordinate split into whole degrees and fractional minutes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DegreesMinutes {
    pub degrees: u32,
    pub minutes: f64,
    pub is_negative: bool,
}

impl DegreesMinutes {
    /// Split a decimal value. Minutes are never carried into the degrees, so
    /// a value just below a whole degree can display as `59.9996'` or, once
    /// rounded to three places, `60.000'`.
    pub fn from_decimal(value: f64) -> Self {
        let abs = value.abs();
        let whole = abs.trunc();
        Self {
            degrees: whole as u32,
            minutes: (abs - whole) * 60.0,
            is_negative: value < 0.0,
        }
    }

    pub fn to_decimal(&self) -> f64 {
        to_decimal_degrees(self.degrees, self.minutes, self.is_negative)
    }
}

/// Render a decimal coordinate as `"{deg}° {min:.3}' {H}"`.
pub fn format(value: f64, is_latitude: bool) -> String {
    let dm = DegreesMinutes::from_decimal(value);
    let direction = match (is_latitude, value >= 0.0) {
        (true, true) => 'N',
        (true, false) => 'S',
        (false, true) => 'E',
        (false, false) => 'O',
    };
    format!("{}° {:.3}' {}", dm.degrees, dm.minutes, direction)
}

/// `degrees + minutes / 60`, negated for the southern or western hemisphere.
///
/// No range validation is performed.
pub fn to_decimal_degrees(degrees: u32, minutes: f64, is_negative: bool) -> f64 {
    let result = f64::from(degrees) + minutes / 60.0;
    if is_negative {
        -result
    } else {
        result
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hemisphere {
    North,
    South,
    East,
    West,
}

impl Hemisphere {
    fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'N' => Some(Hemisphere::North),
            'S' => Some(Hemisphere::South),
            'E' => Some(Hemisphere::East),
            'W' | 'O' => Some(Hemisphere::West),
            _ => None,
        }
    }

    fn is_latitude(self) -> bool {
        matches!(self, Hemisphere::North | Hemisphere::South)
    }

    fn is_negative(self) -> bool {
        matches!(self, Hemisphere::South | Hemisphere::West)
    }
}

/// Parse degrees/minutes text back into decimal degrees.
///
/// Accepts the output of [`format`] as well as looser hand-typed forms:
/// the degree and minute marks are optional, whitespace is free, the decimal
/// separator may be `.` or `,`, and `W` is accepted alongside `O`.
pub fn parse(input: &str, is_latitude: bool) -> Result<f64, CoordinateError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CoordinateError::EmptyInput);
    }

    let (degrees, minutes, hemisphere) = match coordinate(input) {
        Ok((remaining, parsed)) => {
            if !remaining.is_empty() {
                return Err(CoordinateError::ParseError {
                    position: input.len() - remaining.len(),
                    message: format!("unexpected characters: '{}'", remaining),
                });
            }
            parsed
        }
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            return Err(CoordinateError::ParseError {
                position: input.len() - e.input.len(),
                message: format!("parse error: {:?}", e.code),
            });
        }
        Err(nom::Err::Incomplete(_)) => {
            return Err(CoordinateError::ParseError {
                position: input.len(),
                message: "incomplete coordinate".to_string(),
            });
        }
    };

    if hemisphere.is_latitude() != is_latitude {
        return Err(CoordinateError::HemisphereMismatch {
            hemisphere: input.chars().last().unwrap_or('?').to_ascii_uppercase(),
            is_latitude,
        });
    }

    let value = to_decimal_degrees(degrees, minutes, hemisphere.is_negative());
    trace!(input, value, "parsed coordinate");
    Ok(value)
}

fn coordinate(input: &str) -> IResult<&str, (u32, f64, Hemisphere)> {
    let (input, (degrees, _, _, _, minutes, _, _, _, hemisphere)) = (
        degree_value,
        gap,
        degree_mark,
        gap,
        minute_value,
        gap,
        minute_mark,
        gap,
        hemisphere_letter,
    )
        .parse(input)?;
    Ok((input, (degrees, minutes, hemisphere)))
}

fn gap(input: &str) -> IResult<&str, &str> {
    multispace0(input)
}

fn degree_value(input: &str) -> IResult<&str, u32> {
    nom::character::complete::u32(input)
}

fn degree_mark(input: &str) -> IResult<&str, Option<char>> {
    opt(one_of("°º")).parse(input)
}

fn minute_value(input: &str) -> IResult<&str, f64> {
    map_res(
        recognize((digit1, opt((one_of(".,"), digit0)))),
        |text: &str| text.replace(',', ".").parse::<f64>(),
    )
    .parse(input)
}

fn minute_mark(input: &str) -> IResult<&str, Option<char>> {
    opt(one_of("'′")).parse(input)
}

fn hemisphere_letter(input: &str) -> IResult<&str, Hemisphere> {
    map_opt(one_of("NSEWOnsewo"), Hemisphere::from_letter).parse(input)
}
