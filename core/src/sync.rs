//! Reconciliation of [`ViewState`] against an imperative [`MapSurface`].
//!
//! The work is split in two: [`plan`] is a pure function from the previous
//! render state and the current view state to the next render state plus the
//! surface commands needed to get there, and [`MapSyncController`] applies
//! those commands. A pass with no intervening state change plans nothing.
//!
//! Camera updates are edge-triggered on the store's camera revision. Only a
//! newer revision tagged [`CameraSource::Programmatic`] is pushed to the
//! surface; user pans bump the revision too but are absorbed, so the map is
//! never yanked back from where the user moved it.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, trace};

use crate::models::{Buoy, BuoyId, BuoySide, CameraRegion, Coordinate};
use crate::routes::RouteId;
use crate::store::{BuoyStore, CameraSource, ViewState};
use crate::surface::{LineStyle, MapSurface, Marker, MarkerStyle, MarkerTint, RouteLine};

const SELECTED_DIAMETER: f32 = 36.0;
const MARKER_DIAMETER: f32 = 28.0;
const SELECTED_SHADOW: f32 = 6.0;
const MARKER_SHADOW: f32 = 3.0;

/// What the controller believes is currently on the surface.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderState {
    markers: BTreeMap<BuoyId, MarkerStyle>,
    route_line: Option<Vec<Coordinate>>,
    /// Last camera revision seen; `None` until the first pass.
    camera_revision: Option<u64>,
}

impl RenderState {
    pub fn marker_ids(&self) -> impl Iterator<Item = &BuoyId> {
        self.markers.keys()
    }

    pub fn marker_style(&self, id: &BuoyId) -> Option<&MarkerStyle> {
        self.markers.get(id)
    }

    pub fn route_line(&self) -> Option<&[Coordinate]> {
        self.route_line.as_deref()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceCommand {
    SetViewport { region: CameraRegion, animated: bool },
    RemoveMarkers(Vec<BuoyId>),
    AddMarkers(Vec<Marker>),
    RestyleMarker { id: BuoyId, style: MarkerStyle },
    RemoveRouteLine,
    DrawRouteLine(RouteLine),
}

/// Visual state of a buoy's marker under the current view state.
///
/// Selection wins over everything; the overview route is neutral; filtered
/// routes colour by side, neutral when the side is unset.
pub fn marker_style(buoy: &Buoy, view: &ViewState) -> MarkerStyle {
    let selected = view.selected_id() == Some(&buoy.id);
    let tint = if selected {
        MarkerTint::Highlight
    } else if view.active_route().is_all() {
        MarkerTint::Neutral
    } else {
        match buoy.side {
            Some(BuoySide::Babor) => MarkerTint::Port,
            Some(BuoySide::Estribor) => MarkerTint::Starboard,
            None => MarkerTint::Neutral,
        }
    };

    MarkerStyle {
        tint,
        diameter: if selected {
            SELECTED_DIAMETER
        } else {
            MARKER_DIAMETER
        },
        shadow_radius: if selected {
            SELECTED_SHADOW
        } else {
            MARKER_SHADOW
        },
        label: selected.then(|| buoy.name.clone()),
    }
}

fn marker_for(buoy: &Buoy, view: &ViewState) -> Marker {
    Marker {
        buoy_id: buoy.id.clone(),
        coordinate: buoy.coordinate(),
        title: buoy.name.clone(),
        style: marker_style(buoy, view),
    }
}

/// Compute the next render state and the commands that produce it.
pub fn plan(prev: &RenderState, view: &ViewState) -> (RenderState, Vec<SurfaceCommand>) {
    let mut next = prev.clone();
    let mut commands = Vec::new();

    let camera = view.camera();
    match prev.camera_revision {
        None => commands.push(SurfaceCommand::SetViewport {
            region: camera.region,
            animated: false,
        }),
        Some(seen) if camera.revision > seen && camera.source == CameraSource::Programmatic => {
            commands.push(SurfaceCommand::SetViewport {
                region: camera.region,
                animated: true,
            })
        }
        _ => {}
    }
    next.camera_revision = Some(camera.revision);

    let visible = view.visible_buoys();
    let desired: BTreeSet<&BuoyId> = visible.iter().map(|b| &b.id).collect();
    let current: BTreeSet<&BuoyId> = prev.markers.keys().collect();

    if desired != current {
        if !prev.markers.is_empty() {
            commands.push(SurfaceCommand::RemoveMarkers(
                prev.markers.keys().cloned().collect(),
            ));
        }
        next.markers.clear();
        let markers: Vec<Marker> = visible.iter().map(|b| marker_for(b, view)).collect();
        for marker in &markers {
            next.markers
                .insert(marker.buoy_id.clone(), marker.style.clone());
        }
        if !markers.is_empty() {
            commands.push(SurfaceCommand::AddMarkers(markers));
        }
    } else {
        for buoy in &visible {
            let style = marker_style(buoy, view);
            if prev.markers.get(&buoy.id) != Some(&style) {
                next.markers.insert(buoy.id.clone(), style.clone());
                commands.push(SurfaceCommand::RestyleMarker {
                    id: buoy.id.clone(),
                    style,
                });
            }
        }
    }

    let coordinates = view.route_coordinates();
    let wanted_line = (coordinates.len() >= 2).then_some(coordinates);
    if wanted_line != prev.route_line {
        if prev.route_line.is_some() {
            commands.push(SurfaceCommand::RemoveRouteLine);
        }
        if let Some(coordinates) = &wanted_line {
            commands.push(SurfaceCommand::DrawRouteLine(RouteLine {
                coordinates: coordinates.clone(),
                style: LineStyle::default(),
            }));
        }
        next.route_line = wanted_line;
    }

    (next, commands)
}

fn apply<S: MapSurface + ?Sized>(surface: &mut S, command: SurfaceCommand) {
    match command {
        SurfaceCommand::SetViewport { region, animated } => surface.set_viewport(region, animated),
        SurfaceCommand::RemoveMarkers(ids) => surface.remove_markers(ids),
        SurfaceCommand::AddMarkers(markers) => surface.add_markers(markers),
        SurfaceCommand::RestyleMarker { id, style } => surface.restyle_marker(&id, style),
        SurfaceCommand::RemoveRouteLine => surface.remove_route_line(),
        SurfaceCommand::DrawRouteLine(line) => surface.draw_route_line(line),
    }
}

/// Keeps a map surface in step with the store's view state.
#[derive(Debug, Default)]
pub struct MapSyncController {
    render: RenderState,
}

impl MapSyncController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render_state(&self) -> &RenderState {
        &self.render
    }

    /// Forget what was rendered, e.g. after the host recreated its map view.
    /// The next pass rebuilds everything and sets the viewport unanimated.
    pub fn reset(&mut self) {
        self.render = RenderState::default();
    }

    /// Bring the surface in line with `view`. Returns the number of surface
    /// calls issued.
    pub fn reconcile<S: MapSurface + ?Sized>(
        &mut self,
        view: &ViewState,
        surface: &mut S,
    ) -> usize {
        let (next, commands) = plan(&self.render, view);
        self.render = next;

        let count = commands.len();
        if count == 0 {
            trace!("map already in sync");
            return 0;
        }
        debug!(
            commands = count,
            markers = self.render.markers.len(),
            route_line = self.render.route_line.is_some(),
            "reconciled map surface"
        );
        for command in commands {
            apply(surface, command);
        }
        count
    }

    /// Marker tap from the surface. Selects the buoy if it still exists;
    /// a tap on a marker whose buoy is gone does nothing.
    pub fn handle_marker_tap(&self, id: &BuoyId, store: &mut BuoyStore) -> bool {
        if store.state().buoy(id).is_none() {
            trace!(buoy_id = %id, "tap on stale marker ignored");
            return false;
        }
        store.select_buoy(id);
        true
    }

    /// Viewport change made by the user on the surface.
    pub fn handle_user_viewport_change(&self, region: CameraRegion, store: &mut BuoyStore) {
        store.user_moved_camera(region);
    }
}

/// A store, its controller and a surface driven as one serialized unit: every
/// mutation is followed by a reconciliation pass before the call returns.
pub struct MapSession<S: MapSurface> {
    store: BuoyStore,
    controller: MapSyncController,
    surface: S,
}

impl<S: MapSurface> MapSession<S> {
    /// Take ownership of the pieces and run the initial pass.
    pub fn new(store: BuoyStore, surface: S) -> Self {
        let mut session = Self {
            store,
            controller: MapSyncController::new(),
            surface,
        };
        session.sync();
        session
    }

    pub fn store(&self) -> &BuoyStore {
        &self.store
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn add_buoy(
        &mut self,
        name: impl Into<String>,
        latitude: f64,
        longitude: f64,
        description: Option<String>,
        side: Option<BuoySide>,
    ) -> BuoyId {
        let id = self
            .store
            .add_buoy(name, latitude, longitude, description, side);
        self.sync();
        id
    }

    pub fn remove_buoy(&mut self, id: &BuoyId) {
        self.store.remove_buoy(id);
        self.sync();
    }

    pub fn select_buoy(&mut self, id: &BuoyId) {
        self.store.select_buoy(id);
        self.sync();
    }

    pub fn select_route(&mut self, route: RouteId) {
        self.store.select_route(route);
        self.sync();
    }

    pub fn marker_tapped(&mut self, id: &BuoyId) {
        if self.controller.handle_marker_tap(id, &mut self.store) {
            self.sync();
        }
    }

    pub fn user_panned(&mut self, region: CameraRegion) {
        self.controller
            .handle_user_viewport_change(region, &mut self.store);
        self.sync();
    }

    /// Run a reconciliation pass. Returns the number of surface calls made.
    pub fn sync(&mut self) -> usize {
        self.controller
            .reconcile(self.store.state(), &mut self.surface)
    }
}
