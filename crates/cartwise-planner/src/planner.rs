//! The planner: list state, the per-item pipeline, and cached ranking.
//!
//! Lookup failures during resolution or pricing are attached to the item
//! (status `error` plus message) and the rest of the list stays usable. Only
//! ranking surfaces lookup failures to the caller.

use std::sync::{Mutex, MutexGuard, PoisonError};

use cartwise_core::{
    CoreError, Item, ItemId, ItemStatus, Location, LocationProvider, RankedStrategy, Settings,
};
use cartwise_sourcing::Sourcing;
use futures::future::join_all;

use crate::cache::ResultCache;
use crate::engine::{rank_strategies, RankingContext, RankingOptions};
use crate::error::PlanError;
use crate::fingerprint::RankingFingerprint;
use crate::list::ShoppingList;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Owns the shopping list, user settings, and the ranking cache; every
/// external lookup goes through `S`.
///
/// Locks are never held across an await, so several pipelines may run
/// concurrently on one task.
pub struct Planner<S> {
    sourcing: S,
    options: RankingOptions,
    list: Mutex<ShoppingList>,
    settings: Mutex<Settings>,
    cache: Mutex<ResultCache>,
}

impl<S: Sourcing> Planner<S> {
    #[must_use]
    pub fn new(sourcing: S, settings: Settings) -> Self {
        Self::with_options(sourcing, settings, RankingOptions::default())
    }

    pub fn with_options(sourcing: S, settings: Settings, options: RankingOptions) -> Self {
        Self {
            sourcing,
            options,
            list: Mutex::new(ShoppingList::new()),
            settings: Mutex::new(settings),
            cache: Mutex::new(ResultCache::new()),
        }
    }

    #[must_use]
    pub fn sourcing(&self) -> &S {
        &self.sourcing
    }

    // -- list ---------------------------------------------------------------

    /// Snapshot of every item in list order.
    #[must_use]
    pub fn items(&self) -> Vec<Item> {
        lock(&self.list).items().to_vec()
    }

    #[must_use]
    pub fn item(&self, id: ItemId) -> Option<Item> {
        lock(&self.list).get(id).cloned()
    }

    /// Adds a pending item without resolving it.
    ///
    /// # Errors
    ///
    /// [`CoreError::EmptyName`] for blank text.
    pub fn add_item(&self, raw: &str) -> Result<ItemId, PlanError> {
        Ok(lock(&self.list).add(raw)?)
    }

    /// # Errors
    ///
    /// [`CoreError::ItemNotFound`] for an unknown id.
    pub fn delete_item(&self, id: ItemId) -> Result<Item, PlanError> {
        Ok(lock(&self.list).delete(id)?)
    }

    /// # Errors
    ///
    /// [`CoreError::ConfirmationRequired`] when the list is not empty and
    /// `confirmed` is false.
    pub fn delete_all(&self, confirmed: bool) -> Result<usize, PlanError> {
        Ok(lock(&self.list).delete_all(confirmed)?)
    }

    /// # Errors
    ///
    /// [`CoreError::ItemNotFound`] for an unknown id.
    pub fn toggle_select(&self, id: ItemId) -> Result<bool, PlanError> {
        Ok(lock(&self.list).toggle_select(id)?)
    }

    pub fn delete_selected(&self) -> usize {
        lock(&self.list).delete_selected()
    }

    // -- item pipeline ------------------------------------------------------

    /// Adds `raw` and runs it through resolution and pricing.
    ///
    /// The returned item is `vague`, `ready`, or `error`; lookup failures
    /// land on the item, not in the `Err` arm.
    ///
    /// # Errors
    ///
    /// [`CoreError::EmptyName`] for blank text.
    pub async fn resolve_and_price(&self, raw: &str) -> Result<ItemId, PlanError> {
        let id = self.add_item(raw)?;
        self.run_pipeline(id).await?;
        Ok(id)
    }

    /// Adds and processes several items concurrently. Backend calls are
    /// still admitted one at a time by the gateway, in issue order.
    pub async fn resolve_all<T: AsRef<str>>(&self, raws: &[T]) -> Vec<Result<ItemId, PlanError>> {
        join_all(raws.iter().map(|raw| self.resolve_and_price(raw.as_ref()))).await
    }

    /// Applies the user's pick for a vague item, then prices it.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidTransition`] unless the item is vague,
    /// [`CoreError::EmptyName`] for a blank choice, or
    /// [`CoreError::ItemNotFound`].
    pub async fn pick_option(&self, id: ItemId, choice: &str) -> Result<(), PlanError> {
        self.update(id, |item| item.choose_option(choice))?;
        self.price(id).await
    }

    /// Re-runs an errored item from the top.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidTransition`] unless the item is in `error`, or
    /// [`CoreError::ItemNotFound`].
    pub async fn retry_item(&self, id: ItemId) -> Result<(), PlanError> {
        let status = self
            .item(id)
            .map(|item| item.status)
            .ok_or(CoreError::ItemNotFound(id))?;
        if status != ItemStatus::Error {
            return Err(CoreError::InvalidTransition {
                id,
                from: status,
                to: ItemStatus::Correcting,
            }
            .into());
        }
        self.run_pipeline(id).await
    }

    async fn run_pipeline(&self, id: ItemId) -> Result<(), PlanError> {
        let raw = self.update(id, |item| {
            item.begin_correcting()?;
            Ok(item.original.clone())
        })?;

        let resolution = match self.sourcing.resolve(&raw).await {
            Ok(resolution) => resolution,
            Err(err) => {
                tracing::warn!(item = %raw, error = %err, "item resolution failed");
                self.settle(id, |item| item.fail(err.to_string()))?;
                return Ok(());
            }
        };

        let parked = self.settle(id, |item| {
            item.apply_resolution(
                &resolution.canonical_name,
                &resolution.icon,
                resolution.vague_parts(),
            )?;
            Ok(item.status == ItemStatus::Vague)
        })?;
        match parked {
            Some(false) => self.price(id).await,
            Some(true) => {
                tracing::debug!(item = %raw, "item needs a choice");
                Ok(())
            }
            None => Ok(()),
        }
    }

    async fn price(&self, id: ItemId) -> Result<(), PlanError> {
        let name = self.update(id, |item| Ok(item.canonical_name.clone()))?;
        let (location, currency) = {
            let settings = lock(&self.settings);
            (
                settings.active_location().cloned(),
                settings.currency_symbol.clone(),
            )
        };

        match self
            .sourcing
            .find_top_options(&name, location.as_ref(), &currency)
            .await
        {
            Ok(quotes) => {
                tracing::debug!(item = %name, quotes = quotes.len(), "item priced");
                self.settle(id, |item| item.finish_pricing(quotes))?;
            }
            Err(err) => {
                tracing::warn!(item = %name, error = %err, "item pricing failed");
                self.settle(id, |item| item.fail(err.to_string()))?;
            }
        }
        Ok(())
    }

    fn update<T>(
        &self,
        id: ItemId,
        f: impl FnOnce(&mut Item) -> Result<T, CoreError>,
    ) -> Result<T, PlanError> {
        let mut list = lock(&self.list);
        let item = list.get_mut(id)?;
        Ok(f(item)?)
    }

    /// Like `update`, for writes after an await: an item deleted while its
    /// lookup was in flight is skipped (`Ok(None)`).
    fn settle<T>(
        &self,
        id: ItemId,
        f: impl FnOnce(&mut Item) -> Result<T, CoreError>,
    ) -> Result<Option<T>, PlanError> {
        match self.update(id, f) {
            Ok(value) => Ok(Some(value)),
            Err(PlanError::Core(CoreError::ItemNotFound(_))) => {
                tracing::debug!(%id, "item deleted mid-lookup; dropping result");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    // -- settings and location ---------------------------------------------

    #[must_use]
    pub fn settings(&self) -> Settings {
        lock(&self.settings).clone()
    }

    pub fn update_settings(&self, f: impl FnOnce(&mut Settings)) {
        f(&mut lock(&self.settings));
    }

    /// Sets the user-entered location, geocoding it. Blank text clears it.
    /// A place the backend cannot find leaves no user-entered location, so
    /// the device location (if any) applies.
    ///
    /// # Errors
    ///
    /// Gateway failures from the geocoding call.
    pub async fn set_location_text(&self, text: &str) -> Result<Option<Location>, PlanError> {
        let text = text.trim();
        if text.is_empty() {
            self.update_settings(|s| {
                s.location_text = None;
                s.resolved_location = None;
            });
            return Ok(None);
        }

        let resolved = self.sourcing.geocode(text).await?;
        if resolved.is_none() {
            tracing::warn!(place = text, "could not place location text");
        }
        self.update_settings(|s| {
            s.location_text = Some(text.to_string());
            s.resolved_location.clone_from(&resolved);
        });
        Ok(resolved)
    }

    /// Polls the device for its position. Failure means "no device
    /// location", never an error.
    pub async fn refresh_device_location<P: LocationProvider>(
        &self,
        provider: &P,
    ) -> Option<Location> {
        let location = match provider.current_location().await {
            Ok(location) => Some(location),
            Err(err) => {
                tracing::warn!(error = %err, "device location unavailable");
                None
            }
        };
        self.update_settings(|s| s.device_location.clone_from(&location));
        location
    }

    // -- ranking ------------------------------------------------------------

    /// Ranked whole-trip strategies for the ready items, served from the
    /// cache when nothing that affects the answer has changed.
    ///
    /// # Errors
    ///
    /// A lookup failure aborts the run; the cache keeps its previous entry.
    pub async fn request_strategy_summary(&self) -> Result<Vec<RankedStrategy>, PlanError> {
        let ready = lock(&self.list).ready_items();
        if ready.is_empty() {
            return Ok(Vec::new());
        }

        let ctx = {
            let settings = lock(&self.settings);
            RankingContext {
                location: settings.active_location().cloned(),
                max_distance: settings.max_distance,
                unit: settings.distance_unit,
                currency: settings.currency_symbol.clone(),
            }
        };
        let fingerprint =
            RankingFingerprint::compute(&ready, ctx.location.as_ref(), ctx.max_distance, ctx.unit);

        let cached = lock(&self.cache).get(&fingerprint).map(<[RankedStrategy]>::to_vec);
        if let Some(hit) = cached {
            tracing::debug!(%fingerprint, "strategy cache hit");
            return Ok(hit);
        }
        tracing::debug!(%fingerprint, "strategy cache miss");

        let strategies = rank_strategies(&self.sourcing, &ready, &ctx, self.options).await?;
        lock(&self.cache).put(fingerprint, strategies.clone());
        Ok(strategies)
    }
}

#[cfg(test)]
#[path = "planner_test.rs"]
mod tests;
