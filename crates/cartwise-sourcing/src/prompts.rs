//! Request builders for each call site.

use cartwise_core::{Location, UnitSystem};
use cartwise_gateway::{GenerateRequest, Tool};

use crate::pricing::MAX_OPTIONS;

fn near_clause(location: Option<&Location>) -> String {
    match location {
        Some(loc) => format!("near {}", loc.describe()),
        None => "at major national retailers".to_string(),
    }
}

pub(crate) fn resolve(raw: &str) -> GenerateRequest {
    GenerateRequest::json(format!(
        "A shopper typed \"{raw}\" into a grocery list. Correct spelling and return the \
         canonical product name and one emoji icon. If the name covers several common \
         sub-types that differ in price (for example \"bread\"), mark it vague and list up \
         to 5 concrete alternatives plus one example of a specific free-text entry.\n\
         Respond with JSON only: {{\"name\": string, \"icon\": string, \"isVague\": bool, \
         \"options\": [string], \"example\": string}}"
    ))
}

pub(crate) fn top_options(name: &str, location: Option<&Location>, currency: &str) -> GenerateRequest {
    GenerateRequest::json(format!(
        "Search current supermarket prices for \"{name}\" {near}. Return the {MAX_OPTIONS} \
         cheapest shops as a JSON array of {{\"shop\": string, \"price\": number, \
         \"currency\": string}} with prices in {currency}. Use the retailer name only as \
         the shop. Respond with the JSON array and nothing else.",
        near = near_clause(location),
    ))
    .with_tool(Tool::WebSearch)
}

pub(crate) fn price_at(
    name: &str,
    shop: &str,
    location: Option<&Location>,
    currency: &str,
) -> GenerateRequest {
    GenerateRequest::text(format!(
        "Search the current price of \"{name}\" at {shop} {near}. Reply with the price in \
         {currency} as a bare number. Reply 0 if you cannot find it.",
        near = near_clause(location),
    ))
    .with_tool(Tool::WebSearch)
}

pub(crate) fn locate_branch(shop: &str, location: &Location, unit: UnitSystem) -> GenerateRequest {
    GenerateRequest::text(format!(
        "Find the branch of {shop} nearest to {loc}. Answer in exactly two lines:\n\
         BRANCH: <branch name>\nDISTANCE: <distance in {unit_label}>",
        loc = location.describe(),
        unit_label = unit.distance_label(),
    ))
    .with_tool(Tool::Maps)
    .near(location)
}

pub(crate) fn geocode(place: &str) -> GenerateRequest {
    GenerateRequest::json(format!(
        "Give the coordinates of \"{place}\". Respond with JSON only: \
         {{\"lat\": number, \"lng\": number, \"label\": string}}"
    ))
    .with_tool(Tool::Maps)
}
