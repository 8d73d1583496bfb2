//! Output of a ranking run: one whole-trip plan per shop.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::item::ItemId;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReceiptLine {
    pub item_id: ItemId,
    pub item_name: String,
    pub price: Decimal,
    pub is_cheapest_here: bool,
    /// The price is an approximation (mean of known quotes), not a lookup.
    pub estimated: bool,
}

/// An item that is strictly cheaper somewhere else.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavingsGap {
    pub item_id: ItemId,
    pub item_name: String,
    pub cheapest_price: Decimal,
    pub cheapest_shop: String,
    pub price_here: Decimal,
    pub delta: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedStrategy {
    pub shop: String,
    pub branch: String,
    pub distance_text: String,
    /// `f64::INFINITY` when the locator gave no usable figure.
    pub distance: f64,
    pub total: Decimal,
    /// Number of ready items whose quote list references this shop.
    pub coverage: usize,
    /// Items for which no other shop is quoted lower.
    pub cheapest_count: usize,
    pub within_preference: bool,
    pub is_closest: bool,
    pub is_cheapest: bool,
    pub receipt: Vec<ReceiptLine>,
    pub savings: Vec<SavingsGap>,
    pub potential_savings: Decimal,
}
