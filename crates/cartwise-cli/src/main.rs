mod location;
mod lookup;
mod plan;
mod render;

use std::sync::Arc;

use anyhow::Context;
use cartwise_core::{AppConfig, UnitSystem};
use cartwise_gateway::{GatewayConfig, GeminiClient, QuotaGateway};
use cartwise_sourcing::Assistant;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::location::LocationArgs;
use crate::plan::PlanArgs;

pub(crate) type GeminiAssistant = Assistant<GeminiClient>;

#[derive(Debug, Parser)]
#[command(name = "cartwise")]
#[command(about = "Plan the cheapest whole-trip grocery shop near you")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve and price a shopping list, then rank shops for the whole trip
    Plan(PlanArgs),
    /// Show how a free-text item name is interpreted
    Resolve {
        /// Item name as a shopper would type it
        text: String,
    },
    /// Show the cheapest quotes found for an item
    Quotes {
        /// Product name
        name: String,
        #[command(flatten)]
        location: LocationArgs,
    },
    /// Find the nearest branch of a shop
    Locate {
        /// Shop or retailer name
        shop: String,
        #[command(flatten)]
        location: LocationArgs,
        /// Distance unit: metric or imperial
        #[arg(long)]
        units: Option<UnitSystem>,
    },
}

fn build_assistant(config: &AppConfig) -> anyhow::Result<GeminiAssistant> {
    let client = GeminiClient::with_base_url(
        &config.gemini_api_key,
        &config.model,
        config.request_timeout_secs,
        &config.api_base_url,
    )?;
    let gateway = Arc::new(QuotaGateway::new(GatewayConfig::from_app_config(config)));
    Ok(Assistant::new(client, gateway))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("no command given; run `cartwise --help` for usage");
        return Ok(());
    };

    let config = cartwise_core::load_app_config().context("failed to load configuration")?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(env = %config.env, model = %config.model, "configuration loaded");

    let assistant = build_assistant(&config)?;
    match command {
        Commands::Plan(args) => plan::run_plan(&config, assistant, args).await,
        Commands::Resolve { text } => lookup::run_resolve(&assistant, &text).await,
        Commands::Quotes { name, location } => {
            lookup::run_quotes(&config, &assistant, &name, &location).await
        }
        Commands::Locate {
            shop,
            location,
            units,
        } => {
            let unit = units.unwrap_or(config.distance_unit);
            lookup::run_locate(&assistant, &shop, &location, unit).await
        }
    }
}
