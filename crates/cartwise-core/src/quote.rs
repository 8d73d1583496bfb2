use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One price for an item at a named shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub shop: String,
    pub price: Decimal,
    pub currency: String,
}

impl PriceQuote {
    #[must_use]
    pub fn new(shop: impl Into<String>, price: Decimal, currency: impl Into<String>) -> Self {
        Self {
            shop: shop.into(),
            price,
            currency: currency.into(),
        }
    }

    /// Case- and whitespace-insensitive shop comparison.
    #[must_use]
    pub fn is_at(&self, shop: &str) -> bool {
        self.shop.trim().eq_ignore_ascii_case(shop.trim())
    }
}

/// Orders quotes cheapest-first. Stable, so equal prices keep their
/// original relative order.
pub fn sort_quotes(quotes: &mut [PriceQuote]) {
    quotes.sort_by(|a, b| a.price.cmp(&b.price));
}
