//! YAML shopping-list files.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::location::{Settings, Theme, UnitSystem};
use crate::ConfigError;

/// Optional overrides applied on top of the configured settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListSettings {
    pub theme: Option<Theme>,
    pub currency_symbol: Option<String>,
    pub distance_unit: Option<UnitSystem>,
    pub max_distance: Option<f64>,
    pub location: Option<String>,
}

impl ListSettings {
    /// Writes every present override into `settings`.
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(theme) = self.theme {
            settings.theme = theme;
        }
        if let Some(symbol) = &self.currency_symbol {
            settings.currency_symbol.clone_from(symbol);
        }
        if let Some(unit) = self.distance_unit {
            settings.distance_unit = unit;
        }
        if let Some(max) = self.max_distance {
            settings.max_distance = max;
        }
        if let Some(location) = &self.location {
            settings.location_text = Some(location.clone());
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListFile {
    pub items: Vec<String>,
    #[serde(default)]
    pub settings: ListSettings,
}

/// Load and validate a shopping list from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_list_file(path: &Path) -> Result<ListFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ListFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_list_file(&content)
}

fn parse_list_file(content: &str) -> Result<ListFile, ConfigError> {
    let list: ListFile = serde_yaml::from_str(content)?;
    validate_list(&list)?;
    Ok(list)
}

fn validate_list(list: &ListFile) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for item in &list.items {
        let trimmed = item.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::Validation(
                "item names must be non-empty".to_string(),
            ));
        }
        if !seen.insert(trimmed.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate item: '{trimmed}'"
            )));
        }
    }

    if let Some(max) = list.settings.max_distance {
        if !max.is_finite() || max <= 0.0 {
            return Err(ConfigError::Validation(format!(
                "max_distance must be positive, got {max}"
            )));
        }
    }

    Ok(())
}
