//! Pull structured fragments out of free-form model output.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::Value;

// Thousands-grouped numbers first ("1,200.50"), then plain numbers with a
// decimal point or a one/two-digit decimal comma ("1,05").
static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{1,3}(?:,\d{3})+\b(?:\.\d+)?|\d+(?:\.\d+|,\d{1,2}\b)?|\.\d+")
        .expect("valid number regex")
});

/// Returns the first JSON object or array in `text` that deserializes as `T`.
///
/// Models often wrap the payload in prose or code fences ("Here you go:
/// ```json [...] ```"). Every `{` / `[` is tried as a start position; trailing
/// text after a complete value is ignored.
pub(crate) fn first_json<T: DeserializeOwned>(text: &str) -> Option<T> {
    text.char_indices()
        .filter(|(_, c)| *c == '{' || *c == '[')
        .find_map(|(i, _)| {
            let mut stream = serde_json::Deserializer::from_str(&text[i..]).into_iter::<Value>();
            match stream.next() {
                Some(Ok(value)) => serde_json::from_value::<T>(value).ok(),
                _ => None,
            }
        })
}

/// The first number in `text` as written. "1,20" reads as 1.20 and
/// "1,200" as 1200.
fn first_number_str(text: &str) -> Option<String> {
    let raw = NUMBER_RE.find(text)?.as_str();
    let grouped = raw
        .rsplit_once(',')
        .is_some_and(|(_, tail)| tail.split('.').next().map_or(0, str::len) == 3);
    if grouped {
        Some(raw.replace(',', ""))
    } else {
        Some(raw.replace(',', "."))
    }
}

pub(crate) fn first_decimal(text: &str) -> Option<Decimal> {
    first_number_str(text).and_then(|s| {
        let s = if s.starts_with('.') { format!("0{s}") } else { s };
        Decimal::from_str(&s).ok()
    })
}

pub(crate) fn first_f64(text: &str) -> Option<f64> {
    first_number_str(text).and_then(|s| s.parse::<f64>().ok())
}

/// Reads a price from a JSON value that may be a number or a string such as
/// `"£1.20"`.
pub(crate) fn decimal_from_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .ok()
            .or_else(|| n.as_f64().and_then(|f| Decimal::try_from(f).ok())),
        Value::String(s) => first_decimal(s),
        _ => None,
    }
}
