use std::collections::BTreeMap;

use crate::models::{BuoyId, CameraRegion};
use crate::surface::{MapSurface, Marker, MarkerStyle, RouteLine};

/// One call made against a [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceCall {
    SetViewport { region: CameraRegion, animated: bool },
    AddMarkers(Vec<BuoyId>),
    RemoveMarkers(Vec<BuoyId>),
    RestyleMarker(BuoyId),
    DrawRouteLine(usize),
    RemoveRouteLine,
}

/// In-memory map surface that records every call it receives.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    pub calls: Vec<SurfaceCall>,
    pub markers: BTreeMap<BuoyId, Marker>,
    pub route_lines: Vec<RouteLine>,
    pub viewport: Option<CameraRegion>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop recorded calls, keeping the rendered state.
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn marker(&self, id: &BuoyId) -> Option<&Marker> {
        self.markers.get(id)
    }
}

impl MapSurface for RecordingSurface {
    fn set_viewport(&mut self, region: CameraRegion, animated: bool) {
        self.viewport = Some(region);
        self.calls.push(SurfaceCall::SetViewport { region, animated });
    }

    fn add_markers(&mut self, markers: Vec<Marker>) {
        let ids = markers.iter().map(|m| m.buoy_id.clone()).collect();
        for marker in markers {
            self.markers.insert(marker.buoy_id.clone(), marker);
        }
        self.calls.push(SurfaceCall::AddMarkers(ids));
    }

    fn remove_markers(&mut self, ids: Vec<BuoyId>) {
        for id in &ids {
            self.markers.remove(id);
        }
        self.calls.push(SurfaceCall::RemoveMarkers(ids));
    }

    fn restyle_marker(&mut self, id: &BuoyId, style: MarkerStyle) {
        if let Some(marker) = self.markers.get_mut(id) {
            marker.style = style;
        }
        self.calls.push(SurfaceCall::RestyleMarker(id.clone()));
    }

    fn draw_route_line(&mut self, line: RouteLine) {
        self.calls
            .push(SurfaceCall::DrawRouteLine(line.coordinates.len()));
        self.route_lines.push(line);
    }

    fn remove_route_line(&mut self) {
        self.route_lines.clear();
        self.calls.push(SurfaceCall::RemoveRouteLine);
    }
}
