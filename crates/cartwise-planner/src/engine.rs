//! Whole-trip strategy ranking.
//!
//! For each candidate shop the engine finds the nearest branch once, prices
//! every ready item there, and compares each price with the item's cheapest
//! known quote. Lookups are awaited one after another; the gateway lane
//! paces them.

use std::collections::HashMap;

use cartwise_core::{Item, Location, RankedStrategy, ReceiptLine, SavingsGap, UnitSystem};
use cartwise_sourcing::{BranchInfo, Sourcing, SourcingError};
use rust_decimal::Decimal;

/// Shops evaluated per ranking run.
pub const CANDIDATE_LIMIT: usize = 4;

/// Strategies kept after sorting.
pub const STRATEGY_LIMIT: usize = 3;

/// Differences at or below one hundredth of a currency unit are rounding.
fn savings_threshold() -> Decimal {
    Decimal::new(1, 2)
}

/// Inputs a ranking run reads from the user's settings.
#[derive(Debug, Clone, PartialEq)]
pub struct RankingContext {
    pub location: Option<Location>,
    pub max_distance: f64,
    pub unit: UnitSystem,
    pub currency: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankingOptions {
    /// Look up prices that an item's quote list lacks. When off, the mean of
    /// the item's known quotes stands in and no lookups are made.
    pub fetch_missing_prices: bool,
    pub candidate_limit: usize,
    pub strategy_limit: usize,
}

impl Default for RankingOptions {
    fn default() -> Self {
        Self {
            fetch_missing_prices: true,
            candidate_limit: CANDIDATE_LIMIT,
            strategy_limit: STRATEGY_LIMIT,
        }
    }
}

impl RankingOptions {
    /// Degraded mode: estimate instead of fetching missing prices.
    #[must_use]
    pub fn estimating() -> Self {
        Self {
            fetch_missing_prices: false,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Candidate {
    pub shop: String,
    pub coverage: usize,
    rank_sum: usize,
    first_seen: usize,
}

/// Scores shops by how many items quote them, breaking ties by how close to
/// the top of those quote lists they sit, then by first appearance.
pub(crate) fn select_candidates(items: &[&Item], limit: usize) -> Vec<Candidate> {
    let mut by_shop: HashMap<String, Candidate> = HashMap::new();

    for item in items {
        let mut counted: Vec<String> = Vec::new();
        for (position, quote) in item.quotes.iter().enumerate() {
            let key = quote.shop.trim().to_lowercase();
            if key.is_empty() || counted.contains(&key) {
                continue;
            }
            counted.push(key.clone());

            let first_seen = by_shop.len();
            let candidate = by_shop.entry(key).or_insert_with(|| Candidate {
                shop: quote.shop.trim().to_string(),
                coverage: 0,
                rank_sum: 0,
                first_seen,
            });
            candidate.coverage += 1;
            candidate.rank_sum += position;
        }
    }

    let mut candidates: Vec<Candidate> = by_shop.into_values().collect();
    candidates.sort_by(|a, b| {
        b.coverage
            .cmp(&a.coverage)
            .then(a.rank_sum.cmp(&b.rank_sum))
            .then(a.first_seen.cmp(&b.first_seen))
    });
    candidates.truncate(limit);
    candidates
}

fn mean_price(item: &Item) -> Decimal {
    if item.quotes.is_empty() {
        return Decimal::ZERO;
    }
    let sum: Decimal = item.quotes.iter().map(|q| q.price).sum();
    (sum / Decimal::from(item.quotes.len())).round_dp(2)
}

/// Ranks up to [`RankingOptions::strategy_limit`] whole-trip strategies for
/// `ready_items`.
///
/// Items without any quote are skipped. An empty result means no shop was
/// referenced by any item.
///
/// # Errors
///
/// The first lookup failure aborts the run and is returned as-is; nothing
/// partial is produced.
pub async fn rank_strategies<S: Sourcing>(
    sourcing: &S,
    ready_items: &[Item],
    ctx: &RankingContext,
    options: RankingOptions,
) -> Result<Vec<RankedStrategy>, SourcingError> {
    let priced: Vec<&Item> = ready_items
        .iter()
        .filter(|item| !item.quotes.is_empty())
        .collect();
    let candidates = select_candidates(&priced, options.candidate_limit);
    if candidates.is_empty() {
        return Ok(Vec::new());
    }

    tracing::info!(
        items = priced.len(),
        candidates = candidates.len(),
        located = ctx.location.is_some(),
        "ranking shopping strategies"
    );

    let mut strategies = Vec::with_capacity(candidates.len());
    for candidate in &candidates {
        strategies.push(evaluate(sourcing, candidate, &priced, ctx, options).await?);
    }

    // Stable: equal keys keep candidate order.
    strategies.sort_by(|a, b| {
        b.within_preference
            .cmp(&a.within_preference)
            .then(a.total.cmp(&b.total))
    });
    strategies.truncate(options.strategy_limit);
    flag_extremes(&mut strategies);
    Ok(strategies)
}

async fn evaluate<S: Sourcing>(
    sourcing: &S,
    candidate: &Candidate,
    items: &[&Item],
    ctx: &RankingContext,
    options: RankingOptions,
) -> Result<RankedStrategy, SourcingError> {
    let shop = candidate.shop.as_str();
    let branch = match &ctx.location {
        Some(location) => sourcing.locate_branch(shop, location, ctx.unit).await?,
        None => BranchInfo::unknown(shop),
    };

    let mut total = Decimal::ZERO;
    let mut receipt = Vec::with_capacity(items.len());
    let mut savings = Vec::new();

    for item in items {
        let Some(cheapest) = item.best_quote() else {
            continue;
        };

        let known = match item.quote_at(shop) {
            Some(quote) => Some(quote.price),
            None if options.fetch_missing_prices => {
                let price = sourcing
                    .price_at(
                        &item.canonical_name,
                        shop,
                        ctx.location.as_ref(),
                        &ctx.currency,
                    )
                    .await?;
                (price > Decimal::ZERO).then_some(price)
            }
            None => None,
        };
        let (price, estimated) = match known {
            Some(price) => (price, false),
            None => (mean_price(item), true),
        };

        let delta = price - cheapest.price;
        let is_cheapest_here = delta <= Decimal::ZERO;
        if delta > savings_threshold() {
            savings.push(SavingsGap {
                item_id: item.id,
                item_name: item.display_name().to_string(),
                cheapest_price: cheapest.price,
                cheapest_shop: cheapest.shop.clone(),
                price_here: price,
                delta,
            });
        }

        total += price;
        receipt.push(ReceiptLine {
            item_id: item.id,
            item_name: item.display_name().to_string(),
            price,
            is_cheapest_here,
            estimated,
        });
    }

    let cheapest_count = receipt.iter().filter(|line| line.is_cheapest_here).count();
    let potential_savings: Decimal = savings.iter().map(|gap| gap.delta).sum();
    tracing::debug!(
        shop,
        branch = %branch.branch_label,
        distance = branch.distance,
        total = %total,
        "evaluated candidate"
    );

    Ok(RankedStrategy {
        shop: shop.to_string(),
        within_preference: branch.distance <= ctx.max_distance,
        branch: branch.branch_label,
        distance_text: branch.distance_text,
        distance: branch.distance,
        total,
        coverage: candidate.coverage,
        cheapest_count,
        is_closest: false,
        is_cheapest: false,
        receipt,
        savings,
        potential_savings,
    })
}

/// Marks the first minimum-distance and first minimum-total strategy.
fn flag_extremes(strategies: &mut [RankedStrategy]) {
    let mut closest = 0;
    let mut cheapest = 0;
    for (index, strategy) in strategies.iter().enumerate().skip(1) {
        if strategy.distance < strategies[closest].distance {
            closest = index;
        }
        if strategy.total < strategies[cheapest].total {
            cheapest = index;
        }
    }
    if let Some(strategy) = strategies.get_mut(closest) {
        strategy.is_closest = true;
    }
    if let Some(strategy) = strategies.get_mut(cheapest) {
        strategy.is_cheapest = true;
    }
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;
