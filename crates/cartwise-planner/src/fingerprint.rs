//! Identity of a ranking request, used as the result cache key.

use std::fmt::Write as _;

use cartwise_core::{Item, Location, UnitSystem};
use sha2::{Digest, Sha256};

/// SHA-256 over everything a ranking result depends on: the ready items
/// (identity and canonical name, in list order), the active location
/// rounded to about 100 m, the distance preference, and the unit system.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RankingFingerprint(String);

impl RankingFingerprint {
    #[must_use]
    pub fn compute(
        ready_items: &[Item],
        location: Option<&Location>,
        max_distance: f64,
        unit: UnitSystem,
    ) -> Self {
        let mut input = String::new();
        for item in ready_items {
            let _ = write!(
                input,
                "{}\x00{}\x1e",
                item.id,
                item.canonical_name.trim().to_lowercase()
            );
        }
        let location = location.map_or_else(|| "none".to_string(), Location::rounded_key);
        let _ = write!(input, "\x1d{location}\x00{max_distance}\x00{unit}");
        Self(format!("{:x}", Sha256::digest(input.as_bytes())))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RankingFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
