//! Item name resolution and its parsing boundary.

use cartwise_core::item::DEFAULT_ICON;
use serde::{Deserialize, Serialize};

use crate::extract::first_json;

const MAX_RESOLVER_OPTIONS: usize = 5;

/// What the resolver made of a free-text item name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub canonical_name: String,
    pub icon: String,
    pub is_vague: bool,
    pub options: Vec<String>,
    pub example: Option<String>,
}

impl Resolution {
    /// Resolution used when the backend's answer cannot be read: the user's
    /// own text, taken as specific.
    #[must_use]
    pub fn passthrough(raw: &str) -> Self {
        Self {
            canonical_name: raw.trim().to_string(),
            icon: DEFAULT_ICON.to_string(),
            is_vague: false,
            options: Vec::new(),
            example: None,
        }
    }

    /// The `(options, example)` pair for a vague resolution.
    #[must_use]
    pub fn vague_parts(&self) -> Option<(Vec<String>, Option<String>)> {
        self.is_vague
            .then(|| (self.options.clone(), self.example.clone()))
    }
}

#[derive(Debug, Deserialize)]
struct RawResolution {
    #[serde(alias = "canonicalName", alias = "canonical_name", alias = "correctedName")]
    name: Option<String>,
    #[serde(alias = "emoji")]
    icon: Option<String>,
    #[serde(default, alias = "isVague", alias = "is_vague", alias = "ambiguous")]
    vague: bool,
    #[serde(default)]
    options: Vec<String>,
    example: Option<String>,
}

/// Parses a resolver response, falling back to [`Resolution::passthrough`].
///
/// A "vague" answer with no usable options is treated as specific: there
/// would be nothing for the user to pick.
pub(crate) fn parse_resolution(raw: &str, text: &str) -> Resolution {
    let Some(parsed) = first_json::<RawResolution>(text) else {
        tracing::warn!(item = raw, "unparsable resolver response; using the typed name");
        return Resolution::passthrough(raw);
    };

    let fallback = Resolution::passthrough(raw);
    let canonical_name = parsed
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or(fallback.canonical_name);
    let icon = parsed
        .icon
        .map(|i| i.trim().to_string())
        .filter(|i| !i.is_empty())
        .unwrap_or(fallback.icon);

    let mut options: Vec<String> = Vec::new();
    for option in parsed.options {
        let option = option.trim();
        if !option.is_empty() && !options.iter().any(|o| o.eq_ignore_ascii_case(option)) {
            options.push(option.to_string());
        }
    }
    options.truncate(MAX_RESOLVER_OPTIONS);

    let is_vague = parsed.vague && !options.is_empty();
    if !is_vague {
        options.clear();
    }
    let example = parsed
        .example
        .map(|e| e.trim().to_string())
        .filter(|e| is_vague && !e.is_empty());

    Resolution {
        canonical_name,
        icon,
        is_vague,
        options,
        example,
    }
}
