//! Locations, distance units, and the user-facing settings object.

use std::future::Future;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// A coordinate with an optional human label (e.g. "Leeds city centre").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub label: Option<String>,
}

impl Location {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            label: None,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Coordinates rounded to three decimal places (roughly 100 m), as a
    /// stable string. Used wherever two nearby fixes must compare equal.
    #[must_use]
    pub fn rounded_key(&self) -> String {
        format!("{:.3},{:.3}", self.latitude, self.longitude)
    }

    /// Human description for prompts: the label when present, otherwise the
    /// raw coordinates.
    #[must_use]
    pub fn describe(&self) -> String {
        match &self.label {
            Some(label) => format!(
                "{label} (lat {:.5}, lng {:.5})",
                self.latitude, self.longitude
            ),
            None => format!("lat {:.5}, lng {:.5}", self.latitude, self.longitude),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    /// Short distance unit label used in prompts and rendering.
    #[must_use]
    pub fn distance_label(self) -> &'static str {
        match self {
            UnitSystem::Metric => "km",
            UnitSystem::Imperial => "mi",
        }
    }
}

impl std::fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnitSystem::Metric => write!(f, "metric"),
            UnitSystem::Imperial => write!(f, "imperial"),
        }
    }
}

impl FromStr for UnitSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "metric" | "km" => Ok(UnitSystem::Metric),
            "imperial" | "mi" | "miles" => Ok(UnitSystem::Imperial),
            other => Err(format!(
                "unknown distance unit '{other}'; expected metric or imperial"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

/// User preferences plus the two location sources.
///
/// `resolved_location` comes from the user-entered `location_text`;
/// `device_location` from a [`LocationProvider`]. The user-entered one wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub theme: Theme,
    pub currency_symbol: String,
    pub distance_unit: UnitSystem,
    pub max_distance: f64,
    pub location_text: Option<String>,
    pub resolved_location: Option<Location>,
    pub device_location: Option<Location>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            currency_symbol: "£".to_string(),
            distance_unit: UnitSystem::default(),
            max_distance: 5.0,
            location_text: None,
            resolved_location: None,
            device_location: None,
        }
    }
}

impl Settings {
    /// The location every downstream call should use.
    #[must_use]
    pub fn active_location(&self) -> Option<&Location> {
        self.resolved_location
            .as_ref()
            .or(self.device_location.as_ref())
    }
}

/// A best-effort source of the device's current position.
pub trait LocationProvider {
    /// Returns the current fix, or [`CoreError::LocationUnavailable`] when
    /// the device cannot (or will not) report one.
    fn current_location(&self) -> impl Future<Output = Result<Location, CoreError>> + Send;
}
