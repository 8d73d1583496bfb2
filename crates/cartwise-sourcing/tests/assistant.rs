//! Integration tests for `Assistant` over a scripted backend and over a
//! wiremock-backed `GeminiClient`.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use cartwise_core::{Location, UnitSystem};
use cartwise_gateway::{
    BackendFailure, GatewayConfig, GatewayError, GeminiClient, GenerateRequest, ModelBackend,
    QuotaGateway, Tool,
};
use cartwise_sourcing::{Assistant, Sourcing, SourcingError, NEARBY_PLACEHOLDER};
use rust_decimal::Decimal;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Replays canned replies in order and records every request it sees.
#[derive(Clone, Default)]
struct ScriptedBackend {
    replies: Arc<Mutex<VecDeque<Result<String, BackendFailure>>>>,
    seen: Arc<Mutex<Vec<GenerateRequest>>>,
}

impl ScriptedBackend {
    fn with_replies(replies: Vec<Result<&str, BackendFailure>>) -> Self {
        let backend = Self::default();
        backend
            .replies
            .lock()
            .unwrap()
            .extend(replies.into_iter().map(|r| r.map(str::to_string)));
        backend
    }

    fn requests(&self) -> Vec<GenerateRequest> {
        self.seen.lock().unwrap().clone()
    }
}

impl ModelBackend for ScriptedBackend {
    async fn generate(&self, request: &GenerateRequest) -> Result<String, BackendFailure> {
        self.seen.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(BackendFailure::new(Some(500), "script exhausted")))
    }
}

fn assistant(backend: ScriptedBackend) -> Assistant<ScriptedBackend> {
    Assistant::new(
        backend,
        Arc::new(QuotaGateway::new(GatewayConfig::immediate())),
    )
}

fn leeds() -> Location {
    Location::new(53.7997, -1.5492).with_label("Leeds")
}

#[tokio::test]
async fn resolve_flags_vague_items_with_options() {
    let backend = ScriptedBackend::with_replies(vec![Ok(
        r#"{"name":"Bread","icon":"🍞","isVague":true,"options":["white bread","wholemeal bread"],"example":"seeded batch loaf"}"#,
    )]);
    let resolution = assistant(backend.clone()).resolve("bread").await.unwrap();
    assert!(resolution.is_vague);
    assert_eq!(resolution.options, vec!["white bread", "wholemeal bread"]);
    assert_eq!(backend.requests()[0].tool, None);
}

#[tokio::test]
async fn top_options_use_web_search_and_survive_prose() {
    let backend = ScriptedBackend::with_replies(vec![Ok(
        "Prices found:\n[{\"shop\":\"Tesco\",\"price\":1.45},{\"shop\":\"Aldi\",\"price\":0.99}]",
    )]);
    let quotes = assistant(backend.clone())
        .find_top_options("Semi-skimmed milk", Some(&leeds()), "£")
        .await
        .unwrap();
    assert_eq!(quotes[0].shop, "Aldi");
    assert_eq!(quotes[0].currency, "£");
    assert_eq!(backend.requests()[0].tool, Some(Tool::WebSearch));
}

#[tokio::test]
async fn unparsable_top_options_are_empty_not_an_error() {
    let backend = ScriptedBackend::with_replies(vec![Ok("Sorry, I can't browse right now.")]);
    let quotes = assistant(backend)
        .find_top_options("milk", None, "£")
        .await
        .unwrap();
    assert!(quotes.is_empty());
}

#[tokio::test]
async fn price_at_unknown_is_zero_sentinel() {
    let backend = ScriptedBackend::with_replies(vec![Ok("2.35"), Ok("not stocked")]);
    let assistant = assistant(backend);
    let known = assistant
        .price_at("milk", "Lidl", Some(&leeds()), "£")
        .await
        .unwrap();
    assert_eq!(known, Decimal::new(235, 2));
    let unknown = assistant
        .price_at("milk", "Lidl", Some(&leeds()), "£")
        .await
        .unwrap();
    assert_eq!(unknown, Decimal::ZERO);
}

#[tokio::test]
async fn locate_branch_is_map_grounded() {
    let backend = ScriptedBackend::with_replies(vec![
        Ok("BRANCH: Aldi Kirkstall\nDISTANCE: 2.1 mi"),
        Ok("I could not find one."),
    ]);
    let assistant = assistant(backend.clone());
    let info = assistant
        .locate_branch("Aldi", &leeds(), UnitSystem::Imperial)
        .await
        .unwrap();
    assert_eq!(info.branch_label, "Aldi Kirkstall");
    assert!((info.distance - 2.1).abs() < f64::EPSILON);

    let missing = assistant
        .locate_branch("Booths", &leeds(), UnitSystem::Imperial)
        .await
        .unwrap();
    assert_eq!(missing.branch_label, "Booths");
    assert_eq!(missing.distance_text, NEARBY_PLACEHOLDER);
    assert!(missing.distance.is_infinite());

    let request = &backend.requests()[0];
    assert_eq!(request.tool, Some(Tool::Maps));
    assert_eq!(request.near.as_ref(), Some(&leeds()));
}

#[tokio::test]
async fn geocode_parses_or_gives_none() {
    let backend = ScriptedBackend::with_replies(vec![
        Ok(r#"{"lat": 51.5072, "lng": -0.1276, "label": "London"}"#),
        Ok("Where?"),
    ]);
    let assistant = assistant(backend);
    let london = assistant.geocode("london").await.unwrap().unwrap();
    assert_eq!(london.label.as_deref(), Some("London"));
    assert!(assistant.geocode("???").await.unwrap().is_none());
}

#[tokio::test]
async fn gateway_errors_propagate() {
    let backend = ScriptedBackend::with_replies(vec![Err(BackendFailure::new(
        Some(403),
        "API key not valid",
    ))]);
    let err = assistant(backend).resolve("milk").await.unwrap_err();
    assert!(matches!(
        err,
        SourcingError::Gateway(GatewayError::Auth { status: 403, .. })
    ));
}

#[tokio::test]
async fn transient_failures_are_retried_transparently() {
    let backend = ScriptedBackend::with_replies(vec![
        Err(BackendFailure::new(None, "connection reset")),
        Ok(r#"{"name":"Eggs","icon":"🥚","isVague":false}"#),
    ]);
    let resolution = assistant(backend.clone()).resolve("egs").await.unwrap();
    assert_eq!(resolution.canonical_name, "Eggs");
    assert_eq!(backend.requests().len(), 2);
}

#[tokio::test]
async fn top_options_end_to_end_over_http() {
    let server = MockServer::start().await;
    let reply = json!({
        "candidates": [{ "content": { "parts": [{
            "text": "```json\n[{\"shop\":\"Sainsbury's\",\"price\":1.65,\"currency\":\"GBP\"},{\"shop\":\"Asda\",\"price\":1.25,\"currency\":\"GBP\"}]\n```"
        }]}}]
    });
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-test:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply))
        .mount(&server)
        .await;

    let client = GeminiClient::with_base_url("test-key", "gemini-test", 5, &server.uri())
        .expect("client construction should not fail");
    let assistant = Assistant::new(
        client,
        Arc::new(QuotaGateway::new(GatewayConfig::immediate())),
    );
    let quotes = assistant
        .find_top_options("milk", Some(&leeds()), "£")
        .await
        .unwrap();
    assert_eq!(quotes.len(), 2);
    assert_eq!(quotes[0].shop, "Asda");
    assert_eq!(quotes[0].currency, "GBP");
}
