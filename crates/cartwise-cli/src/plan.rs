//! The `plan` command: list in, ranked shops out.

use std::path::PathBuf;

use anyhow::Context;
use cartwise_core::{load_list_file, AppConfig, ItemStatus, Settings, UnitSystem};
use cartwise_planner::{Planner, RankingOptions};
use cartwise_sourcing::Sourcing;
use clap::Args;

use crate::location::{CommandLineFix, LocationArgs};
use crate::render;

#[derive(Debug, Args)]
pub struct PlanArgs {
    /// Items to shop for
    pub items: Vec<String>,

    /// YAML shopping list (items plus optional settings)
    #[arg(long)]
    pub list: Option<PathBuf>,

    #[command(flatten)]
    pub location: LocationArgs,

    /// Furthest you are willing to travel, in the chosen unit
    #[arg(long)]
    pub max_distance: Option<f64>,

    /// Distance unit: metric or imperial
    #[arg(long)]
    pub units: Option<UnitSystem>,

    /// Currency symbol for prices
    #[arg(long)]
    pub currency: Option<String>,

    /// Choice for a vague item, as NAME=OPTION (repeatable)
    #[arg(long = "pick", value_parser = parse_pick)]
    pub picks: Vec<(String, String)>,

    /// Take the first suggested option for vague items without a --pick
    #[arg(long)]
    pub auto_pick: bool,

    /// Estimate prices a shop was not quoted for instead of searching
    #[arg(long)]
    pub estimate_missing: bool,

    /// Print the ranked strategies as JSON
    #[arg(long)]
    pub json: bool,
}

/// Parses `NAME=OPTION`.
pub(crate) fn parse_pick(raw: &str) -> Result<(String, String), String> {
    let (name, choice) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=OPTION, got '{raw}'"))?;
    let (name, choice) = (name.trim(), choice.trim());
    if name.is_empty() || choice.is_empty() {
        return Err(format!("expected NAME=OPTION, got '{raw}'"));
    }
    Ok((name.to_string(), choice.to_string()))
}

impl PlanArgs {
    /// Command-line flags win over list-file settings and configured defaults.
    fn apply_overrides(&self, settings: &mut Settings) -> anyhow::Result<()> {
        if let Some(max) = self.max_distance {
            if !(max.is_finite() && max > 0.0) {
                anyhow::bail!("--max-distance must be a positive number, got {max}");
            }
            settings.max_distance = max;
        }
        if let Some(unit) = self.units {
            settings.distance_unit = unit;
        }
        if let Some(currency) = &self.currency {
            settings.currency_symbol.clone_from(currency);
        }
        if let Some(near) = &self.location.near {
            settings.location_text = Some(near.clone());
        }
        Ok(())
    }

    fn pick_for(&self, name: &str) -> Option<&str> {
        self.picks
            .iter()
            .find(|(item, _)| item.eq_ignore_ascii_case(name))
            .map(|(_, choice)| choice.as_str())
    }
}

/// Run the whole pipeline and print items and strategies.
///
/// # Errors
///
/// Returns an error if the list file is invalid, no items were given, a
/// pick is rejected, or ranking fails. Per-item lookup failures are shown
/// against the item instead.
pub(crate) async fn run_plan<S: Sourcing>(
    config: &AppConfig,
    sourcing: S,
    args: PlanArgs,
) -> anyhow::Result<()> {
    let mut settings = config.default_settings();
    let mut raws: Vec<String> = Vec::new();
    if let Some(path) = &args.list {
        let list = load_list_file(path)
            .with_context(|| format!("failed to load list {}", path.display()))?;
        list.settings.apply_to(&mut settings);
        raws.extend(list.items);
    }
    raws.extend(args.items.iter().cloned());
    if raws.is_empty() {
        anyhow::bail!("nothing to plan; pass item names or --list FILE");
    }
    args.apply_overrides(&mut settings)?;
    let location_text = settings.location_text.clone();

    let options = if args.estimate_missing {
        RankingOptions::estimating()
    } else {
        RankingOptions::default()
    };
    let planner = Planner::with_options(sourcing, settings, options);

    if let Some(fix) = args.location.coordinates() {
        planner.refresh_device_location(&CommandLineFix(fix)).await;
    }
    if let Some(text) = location_text {
        if !place_location(&planner, &text).await {
            println!("could not place \"{text}\"; prices are not local");
        }
    }

    for result in planner.resolve_all(&raws).await {
        if let Err(err) = result {
            tracing::warn!(error = %err, "item not added");
        }
    }
    apply_picks(&planner, &args).await?;

    let settings = planner.settings();
    let strategies = planner.request_strategy_summary().await?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&strategies)?);
    } else {
        print!("{}", render::render_items(&planner.items(), &settings.currency_symbol));
        println!();
        print!("{}", render::render_strategies(&strategies, &settings));
    }
    Ok(())
}

/// Geocodes the typed location. A failed lookup leaves the planner without
/// a typed location and the plan carries on.
async fn place_location<S: Sourcing>(planner: &Planner<S>, text: &str) -> bool {
    match planner.set_location_text(text).await {
        Ok(placed) => placed.is_some(),
        Err(err) => {
            tracing::warn!(error = %err, place = text, "location lookup failed");
            false
        }
    }
}

async fn apply_picks<S: Sourcing>(planner: &Planner<S>, args: &PlanArgs) -> anyhow::Result<()> {
    let vague = planner
        .items()
        .into_iter()
        .filter(|item| item.status == ItemStatus::Vague);

    for item in vague {
        let choice = args
            .pick_for(&item.original)
            .or_else(|| args.pick_for(item.display_name()))
            .map(str::to_string)
            .or_else(|| {
                args.auto_pick
                    .then(|| item.options.first().cloned())
                    .flatten()
            });
        if let Some(choice) = choice {
            tracing::debug!(item = %item.original, %choice, "applying pick");
            planner.pick_option(item.id, &choice).await?;
        }
    }
    Ok(())
}
