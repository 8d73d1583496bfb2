//! Place-name geocoding parse boundary.

use cartwise_core::Location;
use serde::Deserialize;

use crate::extract::first_json;

#[derive(Debug, Deserialize)]
struct RawCoordinates {
    #[serde(alias = "latitude")]
    lat: f64,
    #[serde(alias = "longitude", alias = "lon", alias = "long")]
    lng: f64,
    label: Option<String>,
}

/// Parses a geocode response. Out-of-range or missing coordinates give `None`.
pub(crate) fn parse_coordinates(place: &str, text: &str) -> Option<Location> {
    let raw = first_json::<RawCoordinates>(text)?;
    if !(-90.0..=90.0).contains(&raw.lat) || !(-180.0..=180.0).contains(&raw.lng) {
        tracing::warn!(place, lat = raw.lat, lng = raw.lng, "geocode out of range");
        return None;
    }
    let label = raw
        .label
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| place.trim().to_string());
    Some(Location::new(raw.lat, raw.lng).with_label(label))
}
