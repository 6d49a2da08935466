use thiserror::Error;

/// Error type for parsing degrees/minutes coordinate text.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoordinateError {
    #[error("parse error at position {position}: {message}")]
    ParseError { position: usize, message: String },

    #[error("empty coordinate")]
    EmptyInput,

    #[error("hemisphere {hemisphere} is not valid for a {}", axis_name(.is_latitude))]
    HemisphereMismatch { hemisphere: char, is_latitude: bool },
}

fn axis_name(is_latitude: &bool) -> &'static str {
    if *is_latitude {
        "latitude"
    } else {
        "longitude"
    }
}

/// Which coordinate field of the add form a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Latitude => write!(f, "latitude"),
            Axis::Longitude => write!(f, "longitude"),
        }
    }
}

/// Error type for add-form validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DraftError {
    #[error("buoy name is empty")]
    EmptyName,

    #[error("invalid {axis} degrees: '{input}'")]
    InvalidDegrees { axis: Axis, input: String },

    #[error("invalid {axis} minutes: '{input}'")]
    InvalidMinutes { axis: Axis, input: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_error_display() {
        let err = CoordinateError::ParseError {
            position: 3,
            message: "expected minutes".to_string(),
        };
        assert_eq!(err.to_string(), "parse error at position 3: expected minutes");

        let err = CoordinateError::HemisphereMismatch {
            hemisphere: 'E',
            is_latitude: true,
        };
        assert_eq!(err.to_string(), "hemisphere E is not valid for a latitude");

        assert_eq!(CoordinateError::EmptyInput.to_string(), "empty coordinate");
    }

    #[test]
    fn test_draft_error_display() {
        assert_eq!(DraftError::EmptyName.to_string(), "buoy name is empty");

        let err = DraftError::InvalidDegrees {
            axis: Axis::Latitude,
            input: "4x".to_string(),
        };
        assert_eq!(err.to_string(), "invalid latitude degrees: '4x'");

        let err = DraftError::InvalidMinutes {
            axis: Axis::Longitude,
            input: "".to_string(),
        };
        assert_eq!(err.to_string(), "invalid longitude minutes: ''");
    }
}
