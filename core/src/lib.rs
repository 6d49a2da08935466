pub mod coordinate;
pub mod draft;
pub mod error;
pub mod ffi;
pub mod models;
pub mod routes;
pub mod store;
pub mod surface;
pub mod surface_mock;
pub mod sync;

uniffi::include_scaffolding!("buoys");

pub use coordinate::{to_decimal_degrees, DegreesMinutes};
pub use draft::{BuoyDraft, LatitudeHemisphere, LongitudeHemisphere, NewBuoy};
pub use error::{Axis, CoordinateError, DraftError};
pub use ffi::{
    format_coordinate, list_sides, parse_coordinate, BuoyCatalog, BuoyRecord, MapView,
    MarkerRecord,
};
pub use models::{
    Buoy, BuoyId, BuoySide, CameraRegion, Coordinate, CoordinateSpan, MapSettings,
};
pub use routes::{list_routes, RouteId, RouteInfo};
pub use store::{BuoyStore, CameraSource, CameraTarget, StoreEvent, SubscriptionId, ViewState};
pub use surface::{LineStyle, MapSurface, Marker, MarkerStyle, MarkerTint, RouteLine};
pub use sync::{plan, MapSession, MapSyncController, RenderState, SurfaceCommand};
