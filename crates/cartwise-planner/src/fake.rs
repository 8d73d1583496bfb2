//! Scriptable in-memory [`Sourcing`] with per-lookup call counters.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use cartwise_core::{Item, Location, PriceQuote, UnitSystem};
use cartwise_gateway::GatewayError;
use cartwise_sourcing::{BranchInfo, Resolution, Sourcing, SourcingError};
use rust_decimal::Decimal;

pub(crate) fn gbp(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

pub(crate) fn quote(shop: &str, cents: i64) -> PriceQuote {
    PriceQuote::new(shop, gbp(cents), "GBP")
}

/// A ready item with the given quotes, walked through the lifecycle.
pub(crate) fn ready_item(name: &str, quotes: &[(&str, i64)]) -> Item {
    let mut item = Item::new(name).unwrap();
    item.begin_correcting().unwrap();
    item.apply_resolution(name, "🛒", None).unwrap();
    item.finish_pricing(quotes.iter().map(|(shop, cents)| quote(shop, *cents)).collect())
        .unwrap();
    item
}

pub(crate) fn branch(shop: &str, distance: f64) -> BranchInfo {
    BranchInfo {
        branch_label: format!("{shop} Central"),
        distance_text: format!("{distance} km"),
        distance,
    }
}

#[derive(Default)]
pub(crate) struct FakeSourcing {
    resolutions: HashMap<String, Resolution>,
    options: HashMap<String, Vec<PriceQuote>>,
    shop_prices: HashMap<(String, String), Decimal>,
    branches: HashMap<String, BranchInfo>,
    places: HashMap<String, Location>,
    failing: Mutex<HashSet<String>>,
    calls: Mutex<Vec<String>>,
    pub resolve_calls: AtomicU32,
    pub options_calls: AtomicU32,
    pub price_calls: AtomicU32,
    pub locate_calls: AtomicU32,
    pub geocode_calls: AtomicU32,
}

impl FakeSourcing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vague(mut self, raw: &str, options: &[&str]) -> Self {
        self.resolutions.insert(
            raw.to_string(),
            Resolution {
                canonical_name: raw.to_string(),
                icon: "❓".to_string(),
                is_vague: true,
                options: options.iter().map(ToString::to_string).collect(),
                example: options.first().map(ToString::to_string),
            },
        );
        self
    }

    pub fn with_resolution(mut self, raw: &str, canonical: &str) -> Self {
        self.resolutions.insert(
            raw.to_string(),
            Resolution {
                canonical_name: canonical.to_string(),
                icon: "🥛".to_string(),
                is_vague: false,
                options: Vec::new(),
                example: None,
            },
        );
        self
    }

    pub fn with_options(mut self, name: &str, quotes: &[(&str, i64)]) -> Self {
        self.options.insert(
            name.to_string(),
            quotes.iter().map(|(shop, cents)| quote(shop, *cents)).collect(),
        );
        self
    }

    pub fn with_shop_price(mut self, name: &str, shop: &str, cents: i64) -> Self {
        self.shop_prices
            .insert((name.to_string(), shop.to_string()), gbp(cents));
        self
    }

    pub fn with_branch(mut self, shop: &str, distance: f64) -> Self {
        self.branches.insert(shop.to_string(), branch(shop, distance));
        self
    }

    pub fn with_place(mut self, place: &str, location: Location) -> Self {
        self.places.insert(place.to_string(), location);
        self
    }

    /// Every lookup keyed by `key` (raw text, item name, shop, or place)
    /// fails until [`FakeSourcing::heal`] is called.
    pub fn failing(self, key: &str) -> Self {
        self.break_on(key);
        self
    }

    pub fn break_on(&self, key: &str) {
        self.failing.lock().unwrap().insert(key.to_string());
    }

    pub fn heal(&self, key: &str) {
        self.failing.lock().unwrap().remove(key);
    }

    /// Lookups in the order they were made, as `kind:key`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn total_calls(&self) -> u32 {
        [
            &self.resolve_calls,
            &self.options_calls,
            &self.price_calls,
            &self.locate_calls,
            &self.geocode_calls,
        ]
        .iter()
        .map(|c| c.load(Ordering::SeqCst))
        .sum()
    }

    fn record(&self, counter: &AtomicU32, kind: &str, keys: &[&str]) -> Result<(), SourcingError> {
        counter.fetch_add(1, Ordering::SeqCst);
        self.calls
            .lock()
            .unwrap()
            .push(format!("{kind}:{}", keys.join("@")));
        let failing = self.failing.lock().unwrap();
        if keys.iter().any(|k| failing.contains(*k)) {
            return Err(SourcingError::Gateway(GatewayError::Unavailable {
                status: Some(503),
                message: format!("{kind} unavailable"),
                attempts: 3,
            }));
        }
        Ok(())
    }
}

impl Sourcing for FakeSourcing {
    async fn resolve(&self, raw: &str) -> Result<Resolution, SourcingError> {
        self.record(&self.resolve_calls, "resolve", &[raw])?;
        Ok(self
            .resolutions
            .get(raw)
            .cloned()
            .unwrap_or_else(|| Resolution::passthrough(raw)))
    }

    async fn find_top_options(
        &self,
        name: &str,
        _location: Option<&Location>,
        _currency: &str,
    ) -> Result<Vec<PriceQuote>, SourcingError> {
        self.record(&self.options_calls, "options", &[name])?;
        Ok(self.options.get(name).cloned().unwrap_or_default())
    }

    async fn price_at(
        &self,
        name: &str,
        shop: &str,
        _location: Option<&Location>,
        _currency: &str,
    ) -> Result<Decimal, SourcingError> {
        self.record(&self.price_calls, "price", &[name, shop])?;
        Ok(self
            .shop_prices
            .get(&(name.to_string(), shop.to_string()))
            .copied()
            .unwrap_or(Decimal::ZERO))
    }

    async fn locate_branch(
        &self,
        shop: &str,
        _location: &Location,
        _unit: UnitSystem,
    ) -> Result<BranchInfo, SourcingError> {
        self.record(&self.locate_calls, "locate", &[shop])?;
        Ok(self
            .branches
            .get(shop)
            .cloned()
            .unwrap_or_else(|| BranchInfo::unknown(shop)))
    }

    async fn geocode(&self, place: &str) -> Result<Option<Location>, SourcingError> {
        self.record(&self.geocode_calls, "geocode", &[place])?;
        Ok(self.places.get(place).cloned())
    }
}
