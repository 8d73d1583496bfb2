//! Domain types and configuration shared by every cartwise crate.

pub mod app_config;
pub mod config;
pub mod item;
pub mod list_file;
pub mod location;
pub mod quote;
pub mod strategy;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use item::{Item, ItemId, ItemStatus};
pub use list_file::{load_list_file, ListFile, ListSettings};
pub use location::{Location, LocationProvider, Settings, Theme, UnitSystem};
pub use quote::{sort_quotes, PriceQuote};
pub use strategy::{RankedStrategy, ReceiptLine, SavingsGap};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read list file {path}: {source}")]
    ListFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse list file: {0}")]
    ListFileParse(#[from] serde_yaml::Error),

    #[error("invalid list file: {0}")]
    Validation(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("item {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: ItemId,
        from: ItemStatus,
        to: ItemStatus,
    },

    #[error("item not found: {0}")]
    ItemNotFound(ItemId),

    #[error("deleting all {count} items requires confirmation")]
    ConfirmationRequired { count: usize },

    #[error("item name must be non-empty")]
    EmptyName,

    #[error("location unavailable: {0}")]
    LocationUnavailable(String),
}
