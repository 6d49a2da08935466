//! Fixed catalog of named routes across the estuary.

/// Route identifiers in declared display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum RouteId {
    /// No filter: every buoy is visible and no line is drawn.
    #[default]
    All,
    Numeral1,
    Numeral2,
    Numeral3,
    Numeral4,
}

impl RouteId {
    pub const ALL: [RouteId; 5] = [
        RouteId::All,
        RouteId::Numeral1,
        RouteId::Numeral2,
        RouteId::Numeral3,
        RouteId::Numeral4,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            RouteId::All => "all",
            RouteId::Numeral1 => "numeral1",
            RouteId::Numeral2 => "numeral2",
            RouteId::Numeral3 => "numeral3",
            RouteId::Numeral4 => "numeral4",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|route| route.key() == key)
    }

    pub fn label(&self) -> &'static str {
        match self {
            RouteId::All => "Todas as Boias",
            RouteId::Numeral1 => "Numeral 1",
            RouteId::Numeral2 => "Numeral 2",
            RouteId::Numeral3 => "Numeral 3",
            RouteId::Numeral4 => "Numeral 4",
        }
    }

    pub fn subtitle(&self) -> &'static str {
        match self {
            RouteId::All => "Visão Geral",
            RouteId::Numeral1 => "Subrido (Babor) → La Negra (Babor)",
            RouteId::Numeral2 => "Subrido (Babor) → Met. Cíes (Babor)",
            RouteId::Numeral3 => "Lousal (Estribor) → Tofiño (Estribor)",
            RouteId::Numeral4 => "Lousal (Estribor) → Bondaña (Estribor)",
        }
    }

    /// Symbol name of the route's icon in the host UI.
    pub fn icon(&self) -> &'static str {
        match self {
            RouteId::All => "globe.europe.africa",
            RouteId::Numeral1 => "1.circle.fill",
            RouteId::Numeral2 => "2.circle.fill",
            RouteId::Numeral3 => "3.circle.fill",
            RouteId::Numeral4 => "4.circle.fill",
        }
    }

    /// Names of the buoys the route connects, in route order.
    pub fn buoy_names(&self) -> &'static [&'static str] {
        match self {
            RouteId::All => &[],
            RouteId::Numeral1 => &["Subrido", "La Negra"],
            RouteId::Numeral2 => &["Subrido", "Baliza Meteorológica Sur Cíes"],
            RouteId::Numeral3 => &["Lousal", "Tofiño"],
            RouteId::Numeral4 => &["Lousal", "Bondaña"],
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, RouteId::All)
    }

    /// Whether a buoy with this name is shown under the route.
    pub fn includes(&self, buoy_name: &str) -> bool {
        self.is_all() || self.buoy_names().contains(&buoy_name)
    }
}

/// Owned snapshot of a route's display metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteInfo {
    pub id: RouteId,
    pub label: String,
    pub subtitle: String,
    pub icon: String,
    pub buoy_names: Vec<String>,
}

impl From<RouteId> for RouteInfo {
    fn from(id: RouteId) -> Self {
        Self {
            id,
            label: id.label().to_string(),
            subtitle: id.subtitle().to_string(),
            icon: id.icon().to_string(),
            buoy_names: id.buoy_names().iter().map(|n| n.to_string()).collect(),
        }
    }
}

/// Every route, in declared order.
pub fn list_routes() -> Vec<RouteInfo> {
    RouteId::ALL.into_iter().map(RouteInfo::from).collect()
}
