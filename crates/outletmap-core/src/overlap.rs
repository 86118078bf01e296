//! Pairwise coverage overlap across an outlet collection.

use crate::geo::{within_radius, Coordinate};
use crate::outlet::Outlet;

/// Flags each outlet whose coverage circle overlaps at least one *other*
/// outlet in `outlets`.
///
/// Two outlets overlap when their great-circle distance is at most
/// `radius_m`. Outlets without usable coordinates are never flagged and never
/// cause another outlet to be flagged.
///
/// The scan is quadratic in `outlets.len()`, fine for the tens to low
/// hundreds of outlets a single city has.
#[must_use]
pub fn highlighted_flags(outlets: &[Outlet], radius_m: f64) -> Vec<bool> {
    let coords: Vec<Option<Coordinate>> = outlets.iter().map(Outlet::coordinate).collect();

    coords
        .iter()
        .enumerate()
        .map(|(i, coord)| {
            let Some(a) = coord else {
                return false;
            };
            coords
                .iter()
                .enumerate()
                .any(|(j, other)| i != j && other.is_some_and(|b| within_radius(*a, b, radius_m)))
        })
        .collect()
}
