//! Where the shopper is: typed place names or explicit coordinates.

use cartwise_core::{CoreError, Location, LocationProvider};
use cartwise_sourcing::Sourcing;
use clap::Args;

#[derive(Debug, Clone, Default, Args)]
pub struct LocationArgs {
    /// Place to shop near, e.g. "Leeds city centre" (geocoded)
    #[arg(long)]
    pub near: Option<String>,

    /// Latitude of your position
    #[arg(long, requires = "lng", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude of your position
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lng: Option<f64>,
}

impl LocationArgs {
    pub fn coordinates(&self) -> Option<Location> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(Location::new(lat, lng)),
            _ => None,
        }
    }

    /// The location to use for a one-off lookup: a typed place wins over
    /// coordinates, matching the planner's precedence.
    pub async fn resolve<S: Sourcing>(&self, sourcing: &S) -> anyhow::Result<Option<Location>> {
        if let Some(place) = self.near.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
            let placed = sourcing.geocode(place).await?;
            if placed.is_some() {
                return Ok(placed);
            }
            tracing::warn!(place, "could not place location; falling back to coordinates");
        }
        Ok(self.coordinates())
    }
}

/// Coordinates passed on the command line, standing in for a device fix.
pub struct CommandLineFix(pub Location);

impl LocationProvider for CommandLineFix {
    async fn current_location(&self) -> Result<Location, CoreError> {
        Ok(self.0.clone())
    }
}
