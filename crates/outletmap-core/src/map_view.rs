//! View model handed to a map rendering surface.
//!
//! The renderer owns tiles, drawing and interaction. This module only decides
//! what goes on the map: one marker per placeable outlet with its tooltip,
//! popup and coverage circle, plus the bounds to fit the viewport to.

use serde::Serialize;

use crate::geo::{Coordinate, COVERAGE_RADIUS_M};
use crate::outlet::Outlet;
use crate::overlap::highlighted_flags;

/// Initial centre before any outlets are loaded (Kuala Lumpur).
pub const DEFAULT_CENTER: Coordinate = Coordinate::new(3.140_853, 101.693_207);
pub const DEFAULT_ZOOM: u8 = 12;
/// Padding, in pixels, applied on each side when fitting the viewport to bounds.
pub const FIT_PADDING_PX: u32 = 50;

pub const HIGHLIGHT_COLOR: &str = "#FFC20D";
pub const DEFAULT_COLOR: &str = "#007bff";
const HIGHLIGHT_WEIGHT: u8 = 1;
const DEFAULT_WEIGHT: u8 = 2;
const CIRCLE_FILL_OPACITY: f64 = 0.03;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub center: Coordinate,
    pub zoom: u8,
    /// Bounding box of all markers; `None` when nothing could be placed.
    pub bounds: Option<Bounds>,
    pub fit_padding_px: u32,
    pub markers: Vec<MarkerView>,
    /// Names of outlets skipped for lack of coordinates.
    pub unplaced: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub south_west: Coordinate,
    pub north_east: Coordinate,
}

impl Bounds {
    fn around(point: Coordinate) -> Self {
        Self {
            south_west: point,
            north_east: point,
        }
    }

    fn extend(&mut self, point: Coordinate) {
        self.south_west.latitude = self.south_west.latitude.min(point.latitude);
        self.south_west.longitude = self.south_west.longitude.min(point.longitude);
        self.north_east.latitude = self.north_east.latitude.max(point.latitude);
        self.north_east.longitude = self.north_east.longitude.max(point.longitude);
    }

    #[must_use]
    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.south_west.latitude + self.north_east.latitude) / 2.0,
            (self.south_west.longitude + self.north_east.longitude) / 2.0,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerView {
    pub position: Coordinate,
    pub tooltip: String,
    pub popup: PopupView,
    pub circle: CircleView,
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopupView {
    pub name: String,
    pub address: String,
    pub operating_hours: Option<String>,
    pub waze_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CircleView {
    pub center: Coordinate,
    pub radius_m: f64,
    pub color: &'static str,
    pub weight: u8,
    pub fill_opacity: f64,
}

impl CircleView {
    fn new(center: Coordinate, highlighted: bool) -> Self {
        let (color, weight) = if highlighted {
            (HIGHLIGHT_COLOR, HIGHLIGHT_WEIGHT)
        } else {
            (DEFAULT_COLOR, DEFAULT_WEIGHT)
        };
        Self {
            center,
            radius_m: COVERAGE_RADIUS_M,
            color,
            weight,
            fill_opacity: CIRCLE_FILL_OPACITY,
        }
    }
}

/// Derives the map view for `outlets`, flagging overlaps within `radius_m`.
///
/// Drawn circles always use [`COVERAGE_RADIUS_M`]; `radius_m` only decides
/// which circles are highlighted.
#[must_use]
pub fn build_map_view(outlets: &[Outlet], radius_m: f64) -> MapView {
    let flags = highlighted_flags(outlets, radius_m);
    build_map_view_with_flags(outlets, &flags)
}

/// Same as [`build_map_view`] with precomputed highlight flags, one per outlet.
#[must_use]
pub fn build_map_view_with_flags(outlets: &[Outlet], flags: &[bool]) -> MapView {
    let mut markers = Vec::with_capacity(outlets.len());
    let mut unplaced = Vec::new();
    let mut bounds: Option<Bounds> = None;

    for (i, outlet) in outlets.iter().enumerate() {
        let Some(position) = outlet.coordinate() else {
            unplaced.push(outlet.name.clone());
            continue;
        };
        let highlighted = flags.get(i).copied().unwrap_or(false);

        match bounds.as_mut() {
            Some(b) => b.extend(position),
            None => bounds = Some(Bounds::around(position)),
        }

        markers.push(MarkerView {
            position,
            tooltip: outlet.name.clone(),
            popup: PopupView {
                name: outlet.name.clone(),
                address: outlet.address.clone(),
                operating_hours: outlet.operating_hours.clone(),
                waze_link: outlet.navigable_waze_link().map(str::to_owned),
            },
            circle: CircleView::new(position, highlighted),
            highlighted,
        });
    }

    if !unplaced.is_empty() {
        tracing::debug!(count = unplaced.len(), "outlets without coordinates left off the map");
    }

    MapView {
        center: bounds.map_or(DEFAULT_CENTER, |b| b.center()),
        zoom: DEFAULT_ZOOM,
        bounds,
        fit_padding_px: FIT_PADDING_PX,
        markers,
        unplaced,
    }
}
