//! Parsing boundaries for price lookups.

use cartwise_core::{sort_quotes, PriceQuote};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use crate::extract::{decimal_from_value, first_decimal, first_json};

/// Most quotes kept per item.
pub const MAX_OPTIONS: usize = 5;

#[derive(Debug, Deserialize)]
struct RawQuote {
    #[serde(alias = "store", alias = "retailer", alias = "name")]
    shop: String,
    price: Value,
    currency: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawQuoteList {
    Bare(Vec<RawQuote>),
    Wrapped {
        #[serde(alias = "results", alias = "quotes", alias = "prices")]
        options: Vec<RawQuote>,
    },
}

/// Parses a top-options response into at most [`MAX_OPTIONS`] quotes,
/// cheapest first.
///
/// Entries without a shop or a positive price are dropped, as are repeats of
/// a shop already listed (the cheaper one is kept). An unparsable response
/// yields an empty list.
pub(crate) fn parse_quote_list(text: &str, default_currency: &str) -> Vec<PriceQuote> {
    let raw = match first_json::<RawQuoteList>(text) {
        Some(RawQuoteList::Bare(list) | RawQuoteList::Wrapped { options: list }) => list,
        None => {
            tracing::warn!("unparsable price list response; treating as no quotes");
            return Vec::new();
        }
    };

    let mut quotes: Vec<PriceQuote> = raw
        .into_iter()
        .filter_map(|q| {
            let shop = q.shop.trim();
            let price = decimal_from_value(&q.price)?;
            if shop.is_empty() || price <= Decimal::ZERO {
                return None;
            }
            let currency = q
                .currency
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| default_currency.to_string());
            Some(PriceQuote::new(shop, price.round_dp(2), currency))
        })
        .collect();

    sort_quotes(&mut quotes);
    let mut deduped: Vec<PriceQuote> = Vec::with_capacity(quotes.len());
    for quote in quotes {
        if !deduped.iter().any(|q| q.is_at(&quote.shop)) {
            deduped.push(quote);
        }
    }
    deduped.truncate(MAX_OPTIONS);
    deduped
}

/// Parses a single-price response. Returns [`Decimal::ZERO`] ("unknown") when
/// no positive number can be found.
pub(crate) fn parse_single_price(text: &str) -> Decimal {
    match first_decimal(text) {
        Some(price) if price > Decimal::ZERO => price.round_dp(2),
        _ => {
            tracing::warn!("unparsable single price response; treating as unknown");
            Decimal::ZERO
        }
    }
}
