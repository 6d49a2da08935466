//! In-memory buoy collection and the view state derived from it.
//!
//! [`BuoyStore`] is the only writer of [`ViewState`]. Every mutation is
//! followed by a synchronous [`StoreEvent`] to each subscribed observer;
//! observers read derived views (`visible_buoys`, `route_coordinates`,
//! `selected_buoy`) from the state on demand instead of caching them.

use std::time::SystemTime;

use tracing::debug;

use crate::draft::BuoyDraft;
use crate::error::DraftError;
use crate::models::{
    Buoy, BuoyId, BuoySide, CameraRegion, Coordinate, CoordinateSpan, MapSettings,
};
use crate::routes::RouteId;

/// Who moved the camera last.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraSource {
    /// The store recentred the camera (selection, route fit).
    Programmatic,
    /// The user panned or zoomed the map.
    User,
}

/// Camera target tagged with its origin. `revision` increases on every change.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraTarget {
    pub region: CameraRegion,
    pub source: CameraSource,
    pub revision: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum StoreEvent {
    BuoyAdded(BuoyId),
    BuoyRemoved(BuoyId),
    SelectionChanged(Option<BuoyId>),
    RouteChanged(RouteId),
    CameraChanged(CameraTarget),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&StoreEvent) + Send>;

#[derive(Clone, Debug, PartialEq)]
pub struct ViewState {
    buoys: Vec<Buoy>,
    active_route: RouteId,
    selected: Option<BuoyId>,
    camera: CameraTarget,
}

impl ViewState {
    fn new(initial_region: CameraRegion) -> Self {
        Self {
            buoys: Vec::new(),
            active_route: RouteId::All,
            selected: None,
            camera: CameraTarget {
                region: initial_region,
                source: CameraSource::Programmatic,
                revision: 0,
            },
        }
    }

    /// All live buoys, in insertion order.
    pub fn buoys(&self) -> &[Buoy] {
        &self.buoys
    }

    pub fn buoy(&self, id: &BuoyId) -> Option<&Buoy> {
        self.buoys.iter().find(|b| &b.id == id)
    }

    pub fn active_route(&self) -> RouteId {
        self.active_route
    }

    /// Raw selected id, which may point at a buoy that no longer exists.
    pub fn selected_id(&self) -> Option<&BuoyId> {
        self.selected.as_ref()
    }

    pub fn camera(&self) -> &CameraTarget {
        &self.camera
    }

    /// Buoys shown under the active route.
    pub fn visible_buoys(&self) -> Vec<&Buoy> {
        visible_under(&self.buoys, self.active_route)
    }

    /// Coordinates of the active route's buoys in route order. Names with no
    /// live buoy are skipped; the first buoy with a matching name wins.
    pub fn route_coordinates(&self) -> Vec<Coordinate> {
        self.active_route
            .buoy_names()
            .iter()
            .filter_map(|name| self.buoys.iter().find(|b| b.name == *name))
            .map(Buoy::coordinate)
            .collect()
    }

    pub fn selected_buoy(&self) -> Option<&Buoy> {
        self.selected.as_ref().and_then(|id| self.buoy(id))
    }
}

fn visible_under(buoys: &[Buoy], route: RouteId) -> Vec<&Buoy> {
    buoys.iter().filter(|b| route.includes(&b.name)).collect()
}

pub struct BuoyStore {
    state: ViewState,
    settings: MapSettings,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl Default for BuoyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BuoyStore {
    /// Empty store with default camera settings.
    pub fn new() -> Self {
        Self::with_settings(MapSettings::default())
    }

    pub fn with_settings(settings: MapSettings) -> Self {
        Self {
            state: ViewState::new(settings.initial_region),
            settings,
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Store seeded with the reference buoys of the Ría de Vigo.
    pub fn with_ria_de_vigo() -> Self {
        let mut store = Self::new();
        for (name, latitude, longitude, description, side) in RIA_DE_VIGO {
            store.add_buoy(
                name,
                latitude,
                longitude,
                Some(description.to_string()),
                Some(side),
            );
        }
        store
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn settings(&self) -> &MapSettings {
        &self.settings
    }

    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&StoreEvent) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.observers.retain(|(sub, _)| *sub != id);
    }

    /// Append a new buoy and return its freshly generated id.
    pub fn add_buoy(
        &mut self,
        name: impl Into<String>,
        latitude: f64,
        longitude: f64,
        description: Option<String>,
        side: Option<BuoySide>,
    ) -> BuoyId {
        let buoy = Buoy {
            id: BuoyId::generate(),
            name: name.into(),
            latitude,
            longitude,
            description,
            side,
            created_at: SystemTime::now(),
        };
        let id = buoy.id.clone();
        debug!(buoy_id = %id, name = %buoy.name, latitude, longitude, "buoy added");
        self.state.buoys.push(buoy);
        self.notify(StoreEvent::BuoyAdded(id.clone()));
        id
    }

    /// Validate add-form input and append the resulting buoy.
    pub fn add_draft(&mut self, draft: &BuoyDraft) -> Result<BuoyId, DraftError> {
        let buoy = draft.validate()?;
        Ok(self.add_buoy(
            buoy.name,
            buoy.latitude,
            buoy.longitude,
            buoy.description,
            buoy.side,
        ))
    }

    /// Remove a buoy. Unknown ids are ignored. Clears the selection if it
    /// pointed at the removed buoy.
    pub fn remove_buoy(&mut self, id: &BuoyId) {
        let before = self.state.buoys.len();
        self.state.buoys.retain(|b| &b.id != id);
        if self.state.buoys.len() == before {
            return;
        }
        debug!(buoy_id = %id, "buoy removed");
        self.notify(StoreEvent::BuoyRemoved(id.clone()));

        if self.state.selected.as_ref() == Some(id) {
            self.state.selected = None;
            self.notify(StoreEvent::SelectionChanged(None));
        }
    }

    /// Select a buoy and zoom the camera onto it. The id is not checked; an
    /// unknown id leaves the camera where it is and resolves to no selection.
    pub fn select_buoy(&mut self, id: &BuoyId) {
        self.state.selected = Some(id.clone());
        debug!(buoy_id = %id, "buoy selected");
        self.notify(StoreEvent::SelectionChanged(Some(id.clone())));

        if let Some(center) = self.state.buoy(id).map(Buoy::coordinate) {
            let region = CameraRegion {
                center,
                span: self.settings.selection_span,
            };
            self.move_camera(region, CameraSource::Programmatic);
        }
    }

    /// Activate a route, clear the selection and fit the camera around the
    /// buoys visible under it. With nothing visible the camera is untouched.
    pub fn select_route(&mut self, route: RouteId) {
        self.state.active_route = route;
        debug!(route = ?route, "route selected");
        self.notify(StoreEvent::RouteChanged(route));

        if self.state.selected.take().is_some() {
            self.notify(StoreEvent::SelectionChanged(None));
        }

        if let Some(region) = self.fit_region(route) {
            self.move_camera(region, CameraSource::Programmatic);
        }
    }

    /// Record a viewport change made by the user on the map itself.
    pub fn user_moved_camera(&mut self, region: CameraRegion) {
        debug!(
            latitude = region.center.latitude,
            longitude = region.center.longitude,
            "user moved camera"
        );
        self.move_camera(region, CameraSource::User);
    }

    fn fit_region(&self, route: RouteId) -> Option<CameraRegion> {
        let targets = visible_under(&self.state.buoys, route);
        let first = targets.first()?;

        let (mut min_lat, mut max_lat) = (first.latitude, first.latitude);
        let (mut min_lng, mut max_lng) = (first.longitude, first.longitude);
        for buoy in &targets[1..] {
            min_lat = min_lat.min(buoy.latitude);
            max_lat = max_lat.max(buoy.latitude);
            min_lng = min_lng.min(buoy.longitude);
            max_lng = max_lng.max(buoy.longitude);
        }

        let floor = self.settings.fit_min_extent;
        let margin = self.settings.fit_margin;
        Some(CameraRegion {
            center: Coordinate::new((min_lat + max_lat) / 2.0, (min_lng + max_lng) / 2.0),
            span: CoordinateSpan::new(
                (max_lat - min_lat).max(floor) * margin,
                (max_lng - min_lng).max(floor) * margin,
            ),
        })
    }

    fn move_camera(&mut self, region: CameraRegion, source: CameraSource) {
        let camera = CameraTarget {
            region,
            source,
            revision: self.state.camera.revision + 1,
        };
        self.state.camera = camera;
        self.notify(StoreEvent::CameraChanged(camera));
    }

    fn notify(&mut self, event: StoreEvent) {
        for (_, observer) in &mut self.observers {
            observer(&event);
        }
    }
}

const RIA_DE_VIGO: [(&str, f64, f64, &str, BuoySide); 6] = [
    (
        "Subrido",
        42.24351,
        -8.86414,
        "Boia lateral cilíndrica vermelha nº2. Boca Norte da Ría. Reflector radar. Luz vermelha, 4 lampejos/11s.",
        BuoySide::Babor,
    ),
    (
        "La Negra",
        42.15333,
        -8.88833,
        "Boia cardinal Oeste. Marcação N das Serralleiras. Luz branca, 9 lampejos/15s.",
        BuoySide::Babor,
    ),
    (
        "Baliza Meteorológica Sur Cíes",
        42.16900,
        -8.91100,
        "Boia meteorológica e oceanográfica (ODAS). Dados de vento, ondulação e temperatura. Boca Sul das Ilhas Cíes.",
        BuoySide::Babor,
    ),
    (
        "Lousal",
        42.27475,
        -8.68928,
        "Boia lateral nº12. Baixo de Lousal, plataforma rochosa a 7,7m de profundidade. Aprox. 600m a sul de Punta Domaio.",
        BuoySide::Estribor,
    ),
    (
        "Tofiño",
        42.22847,
        -8.77869,
        "Torre baliza verde nº3. Baixo Tofiño, ribeira sul da Ría. Luz verde, GpD(4)/11s, alcance 5Mn.",
        BuoySide::Estribor,
    ),
    (
        "Bondaña",
        42.20667,
        -8.80833,
        "Baliza baixo Bondaña nº1. Balizamento geral da Ría de Vigo. Reflector radar.",
        BuoySide::Estribor,
    ),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn names(buoys: &[&Buoy]) -> Vec<String> {
        buoys.iter().map(|b| b.name.clone()).collect()
    }

    #[test]
    fn test_seeded_store() {
        let store = BuoyStore::with_ria_de_vigo();
        let state = store.state();
        assert_eq!(state.buoys().len(), 6);
        assert_eq!(state.buoys()[0].name, "Subrido");
        assert_eq!(state.active_route(), RouteId::All);
        assert_eq!(state.camera().region, MapSettings::default().initial_region);
        assert_eq!(state.camera().revision, 0);
    }

    #[test]
    fn test_add_preserves_order_and_allows_duplicates() {
        let mut store = BuoyStore::new();
        let a = store.add_buoy("Dup", 42.0, -8.0, None, None);
        let b = store.add_buoy("Dup", 42.0, -8.0, None, None);
        assert_ne!(a, b);
        let ids: Vec<_> = store.state().buoys().iter().map(|b| b.id.clone()).collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[test]
    fn test_visible_buoys_follow_route() {
        let mut store = BuoyStore::with_ria_de_vigo();
        store.select_route(RouteId::Numeral3);
        assert_eq!(
            names(&store.state().visible_buoys()),
            vec!["Lousal", "Tofiño"]
        );

        store.select_route(RouteId::All);
        assert_eq!(store.state().visible_buoys().len(), 6);
        assert!(store.state().route_coordinates().is_empty());
    }

    #[test]
    fn test_route_coordinates_skip_missing_names() {
        let mut store = BuoyStore::new();
        store.add_buoy("Subrido", 42.24351, -8.86414, None, Some(BuoySide::Babor));
        store.select_route(RouteId::Numeral1);

        let coords = store.state().route_coordinates();
        assert_eq!(coords, vec![Coordinate::new(42.24351, -8.86414)]);
    }

    #[test]
    fn test_route_coordinates_follow_route_order() {
        let mut store = BuoyStore::new();
        store.add_buoy("La Negra", 42.15333, -8.88833, None, None);
        store.add_buoy("Subrido", 42.24351, -8.86414, None, None);
        store.select_route(RouteId::Numeral1);

        let coords = store.state().route_coordinates();
        assert_eq!(coords[0], Coordinate::new(42.24351, -8.86414));
        assert_eq!(coords[1], Coordinate::new(42.15333, -8.88833));
    }

    #[test]
    fn test_select_buoy_zooms_camera() {
        let mut store = BuoyStore::new();
        let id = store.add_buoy("Test", 42.5, -8.75, None, None);
        store.select_buoy(&id);

        let camera = store.state().camera();
        assert_eq!(camera.region.center, Coordinate::new(42.5, -8.75));
        assert_eq!(camera.region.span, CoordinateSpan::new(0.05, 0.05));
        assert_eq!(camera.source, CameraSource::Programmatic);
        assert_eq!(camera.revision, 1);
        assert_eq!(store.state().selected_buoy().map(|b| b.id.clone()), Some(id));
    }

    #[test]
    fn test_select_unknown_buoy_keeps_camera() {
        let mut store = BuoyStore::new();
        let ghost = BuoyId::from("ghost");
        store.select_buoy(&ghost);

        assert_eq!(store.state().selected_id(), Some(&ghost));
        assert!(store.state().selected_buoy().is_none());
        assert_eq!(store.state().camera().revision, 0);
    }

    #[test]
    fn test_remove_clears_selection() {
        let mut store = BuoyStore::new();
        let id = store.add_buoy("Test", 42.5, -8.75, None, None);
        store.select_buoy(&id);
        store.remove_buoy(&id);

        assert!(store.state().selected_id().is_none());
        assert!(store.state().visible_buoys().is_empty());
    }

    #[test]
    fn test_remove_other_keeps_selection() {
        let mut store = BuoyStore::new();
        let keep = store.add_buoy("Keep", 42.5, -8.75, None, None);
        let drop = store.add_buoy("Drop", 42.0, -8.0, None, None);
        store.select_buoy(&keep);
        store.remove_buoy(&drop);
        store.remove_buoy(&BuoyId::from("missing"));

        assert_eq!(store.state().selected_id(), Some(&keep));
        assert_eq!(store.state().buoys().len(), 1);
    }

    #[test]
    fn test_select_route_fits_camera() {
        let mut store = BuoyStore::with_ria_de_vigo();
        let id = store.state().buoys()[0].id.clone();
        store.select_buoy(&id);
        store.select_route(RouteId::Numeral3);

        assert!(store.state().selected_id().is_none());
        let region = store.state().camera().region;
        // Lousal (42.27475, -8.68928) and Tofiño (42.22847, -8.77869)
        assert!((region.center.latitude - 42.25161).abs() < 1e-9);
        assert!((region.center.longitude + 8.733985).abs() < 1e-9);
        assert!((region.span.latitude_delta - 0.075).abs() < 1e-9);
        assert!((region.span.longitude_delta - 0.089410 * 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_select_route_single_buoy_uses_floor() {
        let mut store = BuoyStore::new();
        store.add_buoy("Lousal", 42.27475, -8.68928, None, None);
        store.select_route(RouteId::Numeral4);

        let region = store.state().camera().region;
        assert_eq!(region.center, Coordinate::new(42.27475, -8.68928));
        assert!((region.span.latitude_delta - 0.075).abs() < 1e-9);
        assert!((region.span.longitude_delta - 0.075).abs() < 1e-9);
    }

    #[test]
    fn test_select_route_with_nothing_visible_keeps_camera() {
        let mut store = BuoyStore::new();
        store.add_buoy("Elsewhere", 40.0, -3.0, None, None);
        store.select_route(RouteId::Numeral2);

        assert_eq!(store.state().active_route(), RouteId::Numeral2);
        assert_eq!(store.state().camera().revision, 0);
        assert!(store.state().visible_buoys().is_empty());
    }

    #[test]
    fn test_user_camera_is_tagged() {
        let mut store = BuoyStore::new();
        let region = CameraRegion {
            center: Coordinate::new(42.0, -8.8),
            span: CoordinateSpan::new(0.2, 0.2),
        };
        store.user_moved_camera(region);

        let camera = store.state().camera();
        assert_eq!(camera.source, CameraSource::User);
        assert_eq!(camera.region, region);
        assert_eq!(camera.revision, 1);
    }

    #[test]
    fn test_add_draft() {
        let mut store = BuoyStore::new();
        let draft = BuoyDraft {
            name: "Test".to_string(),
            lat_degrees: "42".to_string(),
            lat_minutes: "30.000".to_string(),
            lng_degrees: "8".to_string(),
            lng_minutes: "45.000".to_string(),
            ..Default::default()
        };
        let id = store.add_draft(&draft).unwrap();
        let buoy = store.state().buoy(&id).unwrap();
        assert!((buoy.latitude - 42.5).abs() < 1e-9);
        assert!((buoy.longitude + 8.75).abs() < 1e-9);

        let bad = BuoyDraft::default();
        assert_eq!(store.add_draft(&bad), Err(DraftError::EmptyName));
        assert_eq!(store.state().buoys().len(), 1);
    }

    #[test]
    fn test_observers_receive_events() {
        let mut store = BuoyStore::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let sub = store.subscribe(move |event| sink.lock().unwrap().push(event.clone()));

        let id = store.add_buoy("Test", 42.5, -8.75, None, None);
        store.select_buoy(&id);
        store.remove_buoy(&id);
        store.unsubscribe(sub);
        store.select_route(RouteId::Numeral1);

        let events = seen.lock().unwrap();
        assert_eq!(events.len(), 5);
        assert_eq!(events[0], StoreEvent::BuoyAdded(id.clone()));
        assert_eq!(events[1], StoreEvent::SelectionChanged(Some(id.clone())));
        assert!(matches!(events[2], StoreEvent::CameraChanged(_)));
        assert_eq!(events[3], StoreEvent::BuoyRemoved(id));
        assert_eq!(events[4], StoreEvent::SelectionChanged(None));
    }

    #[test]
    fn test_concrete_scenario() {
        let mut store = BuoyStore::new();
        let latitude = crate::coordinate::to_decimal_degrees(42, 30.0, false);
        let longitude = crate::coordinate::to_decimal_degrees(8, 45.0, true);
        let id = store.add_buoy("Test", latitude, longitude, None, None);

        store.select_route(RouteId::All);
        assert!(store.state().visible_buoys().iter().any(|b| b.id == id));

        store.select_buoy(&id);
        let region = store.state().camera().region;
        assert!((region.center.latitude - 42.5).abs() < 1e-9);
        assert!((region.center.longitude + 8.75).abs() < 1e-9);
        assert_eq!(region.span, CoordinateSpan::new(0.05, 0.05));

        store.remove_buoy(&id);
        assert!(store.state().selected_buoy().is_none());
        assert!(store.state().visible_buoys().iter().all(|b| b.id != id));
    }
}
