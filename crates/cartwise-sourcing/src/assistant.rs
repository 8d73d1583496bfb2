//! Production [`Sourcing`] implementation over a model backend.

use std::sync::Arc;

use cartwise_core::{Location, PriceQuote, UnitSystem};
use cartwise_gateway::{CallClass, GenerateRequest, ModelBackend, QuotaGateway};
use rust_decimal::Decimal;

use crate::branch::{parse_branch, BranchInfo};
use crate::error::SourcingError;
use crate::geocode::parse_coordinates;
use crate::pricing::{parse_quote_list, parse_single_price};
use crate::prompts;
use crate::resolver::{parse_resolution, Resolution};
use crate::Sourcing;

/// Shapes each lookup into a backend request, sends it through the shared
/// [`QuotaGateway`], and parses the reply.
pub struct Assistant<B> {
    backend: B,
    gateway: Arc<QuotaGateway>,
}

impl<B: ModelBackend> Assistant<B> {
    #[must_use]
    pub fn new(backend: B, gateway: Arc<QuotaGateway>) -> Self {
        Self { backend, gateway }
    }

    async fn call(&self, class: CallClass, request: GenerateRequest) -> Result<String, SourcingError> {
        let text = self
            .gateway
            .invoke(class, || self.backend.generate(&request))
            .await?;
        Ok(text)
    }
}

impl<B: ModelBackend> Sourcing for Assistant<B> {
    async fn resolve(&self, raw: &str) -> Result<Resolution, SourcingError> {
        let text = self.call(CallClass::Generate, prompts::resolve(raw)).await?;
        let resolution = parse_resolution(raw, &text);
        tracing::debug!(
            item = raw,
            canonical = %resolution.canonical_name,
            vague = resolution.is_vague,
            "resolved item"
        );
        Ok(resolution)
    }

    async fn find_top_options(
        &self,
        name: &str,
        location: Option<&Location>,
        currency: &str,
    ) -> Result<Vec<PriceQuote>, SourcingError> {
        let request = prompts::top_options(name, location, currency);
        let text = self.call(CallClass::WebSearch, request).await?;
        let quotes = parse_quote_list(&text, currency);
        tracing::debug!(item = name, quotes = quotes.len(), "fetched top options");
        Ok(quotes)
    }

    async fn price_at(
        &self,
        name: &str,
        shop: &str,
        location: Option<&Location>,
        currency: &str,
    ) -> Result<Decimal, SourcingError> {
        let request = prompts::price_at(name, shop, location, currency);
        let text = self.call(CallClass::WebSearch, request).await?;
        Ok(parse_single_price(&text))
    }

    async fn locate_branch(
        &self,
        shop: &str,
        location: &Location,
        unit: UnitSystem,
    ) -> Result<BranchInfo, SourcingError> {
        let request = prompts::locate_branch(shop, location, unit);
        let text = self.call(CallClass::Maps, request).await?;
        Ok(parse_branch(shop, &text))
    }

    async fn geocode(&self, place: &str) -> Result<Option<Location>, SourcingError> {
        let text = self.call(CallClass::Maps, prompts::geocode(place)).await?;
        Ok(parse_coordinates(place, &text))
    }
}
