use crate::models::{BuoyId, CameraRegion, Coordinate};

/// Marker fill colour family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MarkerTint {
    /// Selected buoy.
    Highlight,
    /// Overview route, or a buoy with no side.
    Neutral,
    /// Babor buoy on a filtered route.
    Port,
    /// Estribor buoy on a filtered route.
    Starboard,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MarkerStyle {
    pub tint: MarkerTint,
    pub diameter: f32,
    pub shadow_radius: f32,
    /// Text shown under the marker; only the selected marker has one.
    pub label: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    pub buoy_id: BuoyId,
    pub coordinate: Coordinate,
    pub title: String,
    pub style: MarkerStyle,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineStyle {
    /// RGBA, 0.0..=1.0.
    pub color: [f32; 4],
    pub width: f32,
    /// Dash and gap lengths.
    pub dash_pattern: [f32; 2],
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: [1.0, 0.0, 0.0, 0.7],
            width: 3.0,
            dash_pattern: [8.0, 6.0],
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RouteLine {
    pub coordinates: Vec<Coordinate>,
    pub style: LineStyle,
}

/// Imperative map widget driven by `MapSyncController`.
///
/// Implementations own the rendering objects only. Marker taps and user
/// pans flow back through `MapSyncController::handle_marker_tap` and
/// `MapSyncController::handle_user_viewport_change`.
pub trait MapSurface {
    fn set_viewport(&mut self, region: CameraRegion, animated: bool);

    fn add_markers(&mut self, markers: Vec<Marker>);
    fn remove_markers(&mut self, ids: Vec<BuoyId>);
    fn restyle_marker(&mut self, id: &BuoyId, style: MarkerStyle);

    fn draw_route_line(&mut self, line: RouteLine);
    fn remove_route_line(&mut self);
}
