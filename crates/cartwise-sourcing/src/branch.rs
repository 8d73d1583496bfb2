//! Branch lookup parsing: the `BRANCH:` / `DISTANCE:` two-line format.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::extract::first_f64;

/// Distance text used when the response has no `DISTANCE:` line.
pub const NEARBY_PLACEHOLDER: &str = "Nearby";

static BRANCH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[\s*_#>-]*branch[\s*_]*:[\s*_]*(.+?)[\s*_]*$").expect("valid branch regex")
});

static DISTANCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[\s*_#>-]*distance[\s*_]*:[\s*_]*(.+?)[\s*_]*$")
        .expect("valid distance regex")
});

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BranchInfo {
    pub branch_label: String,
    pub distance_text: String,
    /// `f64::INFINITY` when no number could be read from `distance_text`.
    pub distance: f64,
}

impl BranchInfo {
    /// A branch whose location is unknown: shop name, "Nearby", unbounded.
    #[must_use]
    pub fn unknown(shop: &str) -> Self {
        Self {
            branch_label: shop.to_string(),
            distance_text: NEARBY_PLACEHOLDER.to_string(),
            distance: f64::INFINITY,
        }
    }
}

/// Numeric distance from free text: the first number found, else infinity.
#[must_use]
pub fn parse_distance(text: &str) -> f64 {
    first_f64(text)
        .filter(|d| d.is_finite() && *d >= 0.0)
        .unwrap_or(f64::INFINITY)
}

pub(crate) fn parse_branch(shop: &str, text: &str) -> BranchInfo {
    let capture = |re: &Regex| {
        re.captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty())
    };

    let branch_label = capture(&BRANCH_RE).unwrap_or_else(|| shop.to_string());
    let (distance_text, distance) = match capture(&DISTANCE_RE) {
        Some(text) => {
            let distance = parse_distance(&text);
            (text, distance)
        }
        None => (NEARBY_PLACEHOLDER.to_string(), f64::INFINITY),
    };

    BranchInfo {
        branch_label,
        distance_text,
        distance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_line_format() {
        let info = parse_branch("Aldi", "BRANCH: Aldi Kirkstall Road\nDISTANCE: 1.4 km");
        assert_eq!(info.branch_label, "Aldi Kirkstall Road");
        assert_eq!(info.distance_text, "1.4 km");
        assert!((info.distance - 1.4).abs() < f64::EPSILON);
    }

    #[test]
    fn tolerates_markdown_and_surrounding_prose() {
        let info = parse_branch(
            "Tesco",
            "The closest one I found:\n**Branch:** Tesco Extra Seacroft\n**Distance:** about 3 miles\nEnjoy!",
        );
        assert_eq!(info.branch_label, "Tesco Extra Seacroft");
        assert_eq!(info.distance_text, "about 3 miles");
        assert!((info.distance - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_branch_line_uses_shop_name() {
        let info = parse_branch("Lidl", "DISTANCE: 0.6 mi");
        assert_eq!(info.branch_label, "Lidl");
        assert!((info.distance - 0.6).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_distance_line_is_nearby_and_unbounded() {
        let info = parse_branch("Lidl", "BRANCH: Lidl Headingley");
        assert_eq!(info.distance_text, NEARBY_PLACEHOLDER);
        assert!(info.distance.is_infinite());
    }

    #[test]
    fn distance_without_number_is_unbounded() {
        assert!(parse_distance("walking distance").is_infinite());
        assert!((parse_distance("12 km") - 12.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_response_is_unknown() {
        assert_eq!(parse_branch("Asda", ""), BranchInfo::unknown("Asda"));
    }
}
