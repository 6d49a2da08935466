//! Host-facing handle and records exported through uniffi.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::SystemTime;

use crate::coordinate;
use crate::draft::BuoyDraft;
use crate::error::{CoordinateError, DraftError};
use crate::models::{Buoy, BuoyId, BuoySide, CameraRegion, Coordinate};
use crate::routes::RouteId;
use crate::store::BuoyStore;
use crate::surface::{MapSurface, Marker, MarkerStyle, RouteLine};
use crate::sync::MapSyncController;

/// Buoy as seen by the host UI, with display strings precomputed.
#[derive(Clone, Debug, PartialEq)]
pub struct BuoyRecord {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub description: Option<String>,
    pub side: Option<BuoySide>,
    pub created_at: SystemTime,
    pub formatted_latitude: String,
    pub formatted_longitude: String,
}

impl From<&Buoy> for BuoyRecord {
    fn from(buoy: &Buoy) -> Self {
        Self {
            id: buoy.id.to_string(),
            name: buoy.name.clone(),
            latitude: buoy.latitude,
            longitude: buoy.longitude,
            description: buoy.description.clone(),
            side: buoy.side,
            created_at: buoy.created_at,
            formatted_latitude: buoy.formatted_latitude(),
            formatted_longitude: buoy.formatted_longitude(),
        }
    }
}

pub fn format_coordinate(value: f64, is_latitude: bool) -> String {
    coordinate::format(value, is_latitude)
}

pub fn parse_coordinate(text: &str, is_latitude: bool) -> Result<f64, CoordinateError> {
    coordinate::parse(text, is_latitude)
}

/// Options for the side picker of the add form.
pub fn list_sides() -> Vec<BuoySide> {
    BuoySide::ALL.to_vec()
}

/// Map widget implemented by the host UI.
///
/// Calls arrive while the catalog lock is held, so implementations must not
/// call back into the same [`BuoyCatalog`] before returning.
pub trait MapView: Send + Sync {
    fn set_viewport(&self, region: CameraRegion, animated: bool);
    fn add_markers(&self, markers: Vec<MarkerRecord>);
    fn remove_markers(&self, ids: Vec<String>);
    fn restyle_marker(&self, id: String, style: MarkerStyle);
    fn draw_route_line(&self, coordinates: Vec<Coordinate>);
    fn remove_route_line(&self);
}

/// Marker as handed to the host map.
#[derive(Clone, Debug, PartialEq)]
pub struct MarkerRecord {
    pub buoy_id: String,
    pub coordinate: Coordinate,
    pub title: String,
    pub style: MarkerStyle,
}

impl From<Marker> for MarkerRecord {
    fn from(marker: Marker) -> Self {
        Self {
            buoy_id: marker.buoy_id.0,
            coordinate: marker.coordinate,
            title: marker.title,
            style: marker.style,
        }
    }
}

/// Drives a host [`MapView`] as a [`MapSurface`]. Line styling is left to
/// the host.
struct HostSurface(Box<dyn MapView>);

impl MapSurface for HostSurface {
    fn set_viewport(&mut self, region: CameraRegion, animated: bool) {
        self.0.set_viewport(region, animated);
    }

    fn add_markers(&mut self, markers: Vec<Marker>) {
        self.0
            .add_markers(markers.into_iter().map(MarkerRecord::from).collect());
    }

    fn remove_markers(&mut self, ids: Vec<BuoyId>) {
        self.0
            .remove_markers(ids.into_iter().map(|id| id.0).collect());
    }

    fn restyle_marker(&mut self, id: &BuoyId, style: MarkerStyle) {
        self.0.restyle_marker(id.to_string(), style);
    }

    fn draw_route_line(&mut self, line: RouteLine) {
        self.0.draw_route_line(line.coordinates);
    }

    fn remove_route_line(&mut self) {
        self.0.remove_route_line();
    }
}

type SharedSurface = Box<dyn MapSurface + Send>;

struct CatalogInner {
    store: BuoyStore,
    controller: MapSyncController,
    surface: Option<SharedSurface>,
}

impl CatalogInner {
    fn sync(&mut self) -> usize {
        match self.surface.as_mut() {
            Some(surface) => self.controller.reconcile(self.store.state(), &mut **surface),
            None => 0,
        }
    }
}

/// Thread-safe store handle. All calls are serialized on one lock, and every
/// mutation reconciles the attached map surface before returning.
pub struct BuoyCatalog {
    inner: Mutex<CatalogInner>,
}

impl Default for BuoyCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl BuoyCatalog {
    /// Catalog seeded with the Ría de Vigo buoys.
    pub fn new() -> Self {
        Self::with_store(BuoyStore::with_ria_de_vigo())
    }

    pub fn empty() -> Self {
        Self::with_store(BuoyStore::new())
    }

    pub fn with_store(store: BuoyStore) -> Self {
        Self {
            inner: Mutex::new(CatalogInner {
                store,
                controller: MapSyncController::new(),
                surface: None,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CatalogInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn mutate<T>(&self, f: impl FnOnce(&mut CatalogInner) -> T) -> T {
        let mut inner = self.lock();
        let result = f(&mut *inner);
        inner.sync();
        result
    }

    /// Attach the host's map. Replaces any previous surface and renders the
    /// current state from scratch.
    pub fn attach_surface(&self, surface: Box<dyn MapView>) {
        self.attach_map_surface(Box::new(HostSurface(surface)));
    }

    /// Attach a Rust-side surface.
    pub fn attach_map_surface(&self, surface: Box<dyn MapSurface + Send>) {
        self.mutate(|inner| {
            inner.controller.reset();
            inner.surface = Some(surface);
        });
    }

    pub fn detach_surface(&self) {
        let mut inner = self.lock();
        inner.surface = None;
        inner.controller.reset();
    }

    /// Run a reconciliation pass. Returns the number of surface calls made.
    pub fn sync(&self) -> u32 {
        u32::try_from(self.lock().sync()).unwrap_or(u32::MAX)
    }

    pub fn add_buoy(
        &self,
        name: String,
        latitude: f64,
        longitude: f64,
        description: Option<String>,
        side: Option<BuoySide>,
    ) -> String {
        self.mutate(|inner| {
            inner
                .store
                .add_buoy(name, latitude, longitude, description, side)
                .to_string()
        })
    }

    pub fn add_draft(&self, draft: BuoyDraft) -> Result<String, DraftError> {
        self.mutate(|inner| Ok(inner.store.add_draft(&draft)?.to_string()))
    }

    pub fn remove_buoy(&self, id: &str) {
        self.mutate(|inner| inner.store.remove_buoy(&BuoyId::from(id)));
    }

    pub fn select_buoy(&self, id: &str) {
        self.mutate(|inner| inner.store.select_buoy(&BuoyId::from(id)));
    }

    /// Marker tap from the host map. Selects the buoy if it still exists and
    /// leaves the current selection alone otherwise.
    pub fn marker_tapped(&self, id: &str) -> bool {
        self.mutate(|inner| {
            inner
                .controller
                .handle_marker_tap(&BuoyId::from(id), &mut inner.store)
        })
    }

    pub fn select_route(&self, route: RouteId) {
        self.mutate(|inner| inner.store.select_route(route));
    }

    pub fn user_moved_camera(&self, region: CameraRegion) {
        self.mutate(|inner| {
            inner
                .controller
                .handle_user_viewport_change(region, &mut inner.store)
        });
    }

    pub fn buoys(&self) -> Vec<BuoyRecord> {
        self.lock()
            .store
            .state()
            .buoys()
            .iter()
            .map(BuoyRecord::from)
            .collect()
    }

    pub fn visible_buoys(&self) -> Vec<BuoyRecord> {
        self.lock()
            .store
            .state()
            .visible_buoys()
            .into_iter()
            .map(BuoyRecord::from)
            .collect()
    }

    pub fn selected_buoy(&self) -> Option<BuoyRecord> {
        self.lock()
            .store
            .state()
            .selected_buoy()
            .map(BuoyRecord::from)
    }

    pub fn route_coordinates(&self) -> Vec<Coordinate> {
        self.lock().store.state().route_coordinates()
    }

    pub fn active_route(&self) -> RouteId {
        self.lock().store.state().active_route()
    }

    pub fn camera(&self) -> CameraRegion {
        self.lock().store.state().camera().region
    }
}
