//! Full-stack planner tests: planner -> assistant -> quota gateway -> a
//! backend that answers by matching prompt text.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use cartwise_core::{ItemStatus, Location, Settings};
use cartwise_gateway::{
    BackendFailure, GatewayConfig, GenerateRequest, ModelBackend, QuotaGateway, Tool,
};
use cartwise_planner::Planner;
use cartwise_sourcing::Assistant;
use rust_decimal::Decimal;
use tokio::time::Instant;

/// Answers each prompt with the reply of the first route whose needle it
/// contains; anything unrouted gets an empty (unparsable) reply.
#[derive(Clone, Default)]
struct RoutedBackend {
    routes: Vec<(&'static str, &'static str)>,
    seen: Arc<Mutex<Vec<(Instant, Option<Tool>)>>>,
}

impl RoutedBackend {
    fn route(mut self, needle: &'static str, reply: &'static str) -> Self {
        self.routes.push((needle, reply));
        self
    }

    fn admissions(&self) -> Vec<(Instant, Option<Tool>)> {
        self.seen.lock().unwrap().clone()
    }
}

impl ModelBackend for RoutedBackend {
    async fn generate(&self, request: &GenerateRequest) -> Result<String, BackendFailure> {
        self.seen.lock().unwrap().push((Instant::now(), request.tool));
        Ok(self
            .routes
            .iter()
            .find(|(needle, _)| request.prompt.contains(needle))
            .map(|(_, reply)| (*reply).to_string())
            .unwrap_or_default())
    }
}

fn grocer() -> RoutedBackend {
    RoutedBackend::default()
        .route(
            "\"milk\" into a grocery",
            r#"{"name": "Semi-skimmed milk", "icon": "🥛", "isVague": false}"#,
        )
        .route(
            "\"bread\" into a grocery",
            r#"```json
{"name": "Bread", "icon": "🍞", "isVague": true,
 "options": ["white bread", "wholemeal bread"], "example": "Hovis soft white"}
```"#,
        )
        .route(
            "prices for \"Semi-skimmed milk\"",
            r#"Here is what I found: [{"shop": "Lidl", "price": 0.95}, {"shop": "Tesco", "price": "1.10"}]"#,
        )
        .route(
            "prices for \"white bread\"",
            r#"[{"store": "Tesco", "price": 0.75}, {"store": "Lidl", "price": 0.8}]"#,
        )
        .route("branch of Lidl", "BRANCH: Lidl Kirkstall Road\nDISTANCE: 1.4 km")
        .route("branch of Tesco", "**BRANCH:** Tesco Metro Boar Lane\n**DISTANCE:** 0.6 km")
}

fn leeds_settings() -> Settings {
    Settings {
        resolved_location: Some(Location::new(53.7997, -1.5492).with_label("Leeds")),
        ..Settings::default()
    }
}

fn planner(
    backend: RoutedBackend,
    config: GatewayConfig,
) -> Planner<Assistant<RoutedBackend>> {
    let gateway = Arc::new(QuotaGateway::new(config));
    Planner::new(Assistant::new(backend, gateway), leeds_settings())
}

#[tokio::test]
async fn milk_and_bread_to_ranked_strategies() {
    let backend = grocer();
    let planner = planner(backend.clone(), GatewayConfig::immediate());

    let milk = planner.resolve_and_price("milk").await.unwrap();
    let bread = planner.resolve_and_price("bread").await.unwrap();
    assert_eq!(planner.item(milk).unwrap().status, ItemStatus::Ready);

    let vague = planner.item(bread).unwrap();
    assert_eq!(vague.status, ItemStatus::Vague);
    assert_eq!(vague.options, vec!["white bread", "wholemeal bread"]);
    assert_eq!(vague.example.as_deref(), Some("Hovis soft white"));

    planner.pick_option(bread, "white bread").await.unwrap();
    let bread_item = planner.item(bread).unwrap();
    assert_eq!(bread_item.status, ItemStatus::Ready);
    assert_eq!(bread_item.best_quote().unwrap().shop, "Tesco");

    let strategies = planner.request_strategy_summary().await.unwrap();
    assert_eq!(strategies.len(), 2);

    let lidl = &strategies[0];
    assert_eq!(lidl.shop, "Lidl");
    assert_eq!(lidl.branch, "Lidl Kirkstall Road");
    assert_eq!(lidl.total, Decimal::new(175, 2));
    assert!(lidl.is_cheapest);
    assert_eq!(lidl.savings.len(), 1);
    assert_eq!(lidl.potential_savings, Decimal::new(5, 2));

    let tesco = &strategies[1];
    assert_eq!(tesco.branch, "Tesco Metro Boar Lane");
    assert_eq!(tesco.distance_text, "0.6 km");
    assert!((tesco.distance - 0.6).abs() < f64::EPSILON);
    assert!(tesco.is_closest);
    assert_eq!(tesco.total, Decimal::new(185, 2));

    // Served from cache: no further backend traffic.
    let calls = backend.admissions().len();
    assert_eq!(planner.request_strategy_summary().await.unwrap(), strategies);
    assert_eq!(backend.admissions().len(), calls);
}

#[tokio::test]
async fn unparsable_pricing_still_reaches_ready() {
    let backend = RoutedBackend::default();
    let planner = planner(backend, GatewayConfig::immediate());

    let id = planner.resolve_and_price("  saffron ").await.unwrap();
    let item = planner.item(id).unwrap();
    assert_eq!(item.status, ItemStatus::Ready);
    assert_eq!(item.canonical_name, "saffron");
    assert!(item.quotes.is_empty());
    assert!(planner.request_strategy_summary().await.unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn concurrent_items_are_admitted_with_class_gaps() {
    let backend = grocer();
    let config = GatewayConfig::default();
    let planner = planner(backend.clone(), config.clone());

    let results = planner.resolve_all(&["milk", "bread", "eggs"]).await;
    assert!(results.iter().all(Result::is_ok));

    let admissions = backend.admissions();
    assert!(admissions.len() >= 4);
    for pair in admissions.windows(2) {
        let (earlier, tool) = pair[0];
        let (later, _) = pair[1];
        let gap = match tool {
            None => config.generate.gap,
            Some(Tool::WebSearch) => config.web_search.gap,
            Some(Tool::Maps) => config.maps.gap,
        };
        assert!(
            later.duration_since(earlier) >= gap,
            "calls admitted {:?} apart, expected at least {gap:?}",
            later.duration_since(earlier)
        );
    }
    let span = admissions[admissions.len() - 1].0 - admissions[0].0;
    assert!(span >= Duration::from_secs(1));
}
