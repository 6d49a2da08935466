use std::fmt;
use std::time::SystemTime;

use crate::coordinate;

/// Opaque, generator-assigned buoy identifier. Never reused once removed.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BuoyId(pub String);

impl BuoyId {
    pub fn generate() -> Self {
        BuoyId(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BuoyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BuoyId {
    fn from(value: &str) -> Self {
        BuoyId(value.to_string())
    }
}

/// Lateral marker classification, used for colour coding only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BuoySide {
    /// Port-hand mark.
    Babor,
    /// Starboard-hand mark.
    Estribor,
}

impl BuoySide {
    pub const ALL: [BuoySide; 2] = [BuoySide::Babor, BuoySide::Estribor];

    pub fn display_name(&self) -> &'static str {
        match self {
            BuoySide::Babor => "Babor",
            BuoySide::Estribor => "Estribor",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Angular extent of a viewport, in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateSpan {
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl CoordinateSpan {
    pub fn new(latitude_delta: f64, longitude_delta: f64) -> Self {
        Self {
            latitude_delta,
            longitude_delta,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraRegion {
    pub center: Coordinate,
    pub span: CoordinateSpan,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Buoy {
    pub id: BuoyId,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub description: Option<String>,
    pub side: Option<BuoySide>,
    pub created_at: SystemTime,
}

impl Buoy {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    pub fn formatted_latitude(&self) -> String {
        coordinate::format(self.latitude, true)
    }

    pub fn formatted_longitude(&self) -> String {
        coordinate::format(self.longitude, false)
    }
}

/// Camera and viewport constants for the store.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapSettings {
    /// Camera region before any selection happens.
    pub initial_region: CameraRegion,
    /// Span used when zooming onto a single selected buoy.
    pub selection_span: CoordinateSpan,
    /// Floor applied to each axis extent when fitting a route.
    pub fit_min_extent: f64,
    /// Margin multiplier applied to the fitted extent.
    pub fit_margin: f64,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            initial_region: CameraRegion {
                center: Coordinate::new(42.2328, -8.7226),
                span: CoordinateSpan::new(0.15, 0.15),
            },
            selection_span: CoordinateSpan::new(0.05, 0.05),
            fit_min_extent: 0.05,
            fit_margin: 1.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_distinct() {
        let a = BuoyId::generate();
        let b = BuoyId::generate();
        assert_ne!(a, b);
        assert!(!a.as_str().is_empty());
    }

    #[test]
    fn test_side_display_names() {
        assert_eq!(BuoySide::Babor.display_name(), "Babor");
        assert_eq!(BuoySide::Estribor.display_name(), "Estribor");
    }

    #[test]
    fn test_buoy_formatted_coordinates() {
        let buoy = Buoy {
            id: BuoyId::from("b-1"),
            name: "Test".to_string(),
            latitude: 42.5,
            longitude: -8.75,
            description: None,
            side: None,
            created_at: SystemTime::now(),
        };
        assert_eq!(buoy.formatted_latitude(), "42° 30.000' N");
        assert_eq!(buoy.formatted_longitude(), "8° 45.000' O");
        assert_eq!(buoy.coordinate(), Coordinate::new(42.5, -8.75));
    }
}
