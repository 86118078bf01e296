use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// A retail outlet as returned by the backend's `/outlets` endpoint.
///
/// The backend also sends a numeric `id`; it is ignored here, outlets are
/// addressed by position in the fetched list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outlet {
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub operating_hours: Option<String>,
    #[serde(default)]
    pub waze_link: Option<String>,
}

impl Outlet {
    /// The outlet's position, if both coordinates are present and finite.
    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        Coordinate::from_parts(self.latitude, self.longitude)
    }

    /// The Waze link, if it is set to something navigable.
    ///
    /// Placeholder values seen in scraped data (`#`, `None`, blank) count as
    /// absent.
    #[must_use]
    pub fn navigable_waze_link(&self) -> Option<&str> {
        self.waze_link
            .as_deref()
            .map(str::trim)
            .filter(|link| !matches!(*link, "" | "#" | "None"))
    }
}
