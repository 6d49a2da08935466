//! Validation of the raw text entered in the "new buoy" form.

use crate::coordinate::to_decimal_degrees;
use crate::error::{Axis, DraftError};
use crate::models::BuoySide;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LatitudeHemisphere {
    #[default]
    North,
    South,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LongitudeHemisphere {
    East,
    #[default]
    West,
}

/// Unvalidated add-form contents.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BuoyDraft {
    pub name: String,
    pub lat_degrees: String,
    pub lat_minutes: String,
    pub lat_hemisphere: LatitudeHemisphere,
    pub lng_degrees: String,
    pub lng_minutes: String,
    pub lng_hemisphere: LongitudeHemisphere,
    pub description: String,
    pub side: Option<BuoySide>,
}

/// A validated draft, ready for `BuoyStore::add_buoy`.
#[derive(Clone, Debug, PartialEq)]
pub struct NewBuoy {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub description: Option<String>,
    pub side: Option<BuoySide>,
}

impl BuoyDraft {
    /// Whether the add action should be enabled.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn validate(&self) -> Result<NewBuoy, DraftError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(DraftError::EmptyName);
        }

        let lat_degrees = parse_degrees(&self.lat_degrees, Axis::Latitude)?;
        let lat_minutes = parse_minutes(&self.lat_minutes, Axis::Latitude)?;
        let lng_degrees = parse_degrees(&self.lng_degrees, Axis::Longitude)?;
        let lng_minutes = parse_minutes(&self.lng_minutes, Axis::Longitude)?;

        let description = self.description.trim();

        Ok(NewBuoy {
            name: name.to_string(),
            latitude: to_decimal_degrees(
                lat_degrees,
                lat_minutes,
                self.lat_hemisphere == LatitudeHemisphere::South,
            ),
            longitude: to_decimal_degrees(
                lng_degrees,
                lng_minutes,
                self.lng_hemisphere == LongitudeHemisphere::West,
            ),
            description: (!description.is_empty()).then(|| description.to_string()),
            side: self.side,
        })
    }
}

fn parse_degrees(input: &str, axis: Axis) -> Result<u32, DraftError> {
    input
        .trim()
        .parse::<u32>()
        .map_err(|_| DraftError::InvalidDegrees {
            axis,
            input: input.to_string(),
        })
}

fn parse_minutes(input: &str, axis: Axis) -> Result<f64, DraftError> {
    let invalid = || DraftError::InvalidMinutes {
        axis,
        input: input.to_string(),
    };
    let minutes = input
        .trim()
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|_| invalid())?;
    if minutes.is_finite() && minutes >= 0.0 {
        Ok(minutes)
    } else {
        Err(invalid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_draft() -> BuoyDraft {
        BuoyDraft {
            name: "  Test ".to_string(),
            lat_degrees: "42".to_string(),
            lat_minutes: "30.000".to_string(),
            lng_degrees: "8".to_string(),
            lng_minutes: "45".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_hemispheres() {
        let draft = BuoyDraft::default();
        assert_eq!(draft.lat_hemisphere, LatitudeHemisphere::North);
        assert_eq!(draft.lng_hemisphere, LongitudeHemisphere::West);
        assert!(!draft.is_valid());
    }

    #[test]
    fn test_validate_trims_and_converts() {
        let buoy = test_draft().validate().unwrap();
        assert_eq!(buoy.name, "Test");
        assert!((buoy.latitude - 42.5).abs() < 1e-9);
        assert!((buoy.longitude + 8.75).abs() < 1e-9);
        assert_eq!(buoy.description, None);
        assert_eq!(buoy.side, None);
    }

    #[test]
    fn test_validate_hemispheres_and_description() {
        let draft = BuoyDraft {
            lat_hemisphere: LatitudeHemisphere::South,
            lng_hemisphere: LongitudeHemisphere::East,
            lat_minutes: "13,5".to_string(),
            description: " verde ".to_string(),
            side: Some(BuoySide::Estribor),
            ..test_draft()
        };
        let buoy = draft.validate().unwrap();
        assert!((buoy.latitude + 42.225).abs() < 1e-9);
        assert!((buoy.longitude - 8.75).abs() < 1e-9);
        assert_eq!(buoy.description.as_deref(), Some("verde"));
        assert_eq!(buoy.side, Some(BuoySide::Estribor));
    }

    #[test]
    fn test_validate_errors() {
        let draft = BuoyDraft {
            name: "   ".to_string(),
            ..test_draft()
        };
        assert_eq!(draft.validate(), Err(DraftError::EmptyName));

        let draft = BuoyDraft {
            lat_degrees: "42.5".to_string(),
            ..test_draft()
        };
        assert_eq!(
            draft.validate(),
            Err(DraftError::InvalidDegrees {
                axis: Axis::Latitude,
                input: "42.5".to_string()
            })
        );

        let draft = BuoyDraft {
            lng_minutes: "abc".to_string(),
            ..test_draft()
        };
        assert!(matches!(
            draft.validate(),
            Err(DraftError::InvalidMinutes {
                axis: Axis::Longitude,
                ..
            })
        ));

        let draft = BuoyDraft {
            lng_degrees: "-8".to_string(),
            ..test_draft()
        };
        assert!(!draft.is_valid());
    }
}
