//! One-off lookups: resolve, quotes, and locate.

use cartwise_core::{AppConfig, UnitSystem};
use cartwise_sourcing::Sourcing;

use crate::location::LocationArgs;
use crate::render;

/// Print how `text` resolves, including options for a vague name.
///
/// # Errors
///
/// Returns an error if the backend call fails.
pub(crate) async fn run_resolve<S: Sourcing>(sourcing: &S, text: &str) -> anyhow::Result<()> {
    let resolution = sourcing.resolve(text).await?;
    println!("{} {}", resolution.icon, resolution.canonical_name);
    if resolution.is_vague {
        println!("vague; pick one of:");
        for option in &resolution.options {
            println!("  - {option}");
        }
        if let Some(example) = &resolution.example {
            println!("or type something specific, e.g. \"{example}\"");
        }
    }
    Ok(())
}

/// Print the cheapest quotes for `name`.
///
/// # Errors
///
/// Returns an error if geocoding or the price search fails.
pub(crate) async fn run_quotes<S: Sourcing>(
    config: &AppConfig,
    sourcing: &S,
    name: &str,
    location: &LocationArgs,
) -> anyhow::Result<()> {
    let near = location.resolve(sourcing).await?;
    let quotes = sourcing
        .find_top_options(name, near.as_ref(), &config.currency_symbol)
        .await?;

    if quotes.is_empty() {
        println!("no prices found for \"{name}\"");
        return Ok(());
    }
    print!("{}", render::render_quotes(&quotes, &config.currency_symbol));
    Ok(())
}

/// Print the nearest branch of `shop`.
///
/// # Errors
///
/// Returns an error if no location was given or a backend call fails.
pub(crate) async fn run_locate<S: Sourcing>(
    sourcing: &S,
    shop: &str,
    location: &LocationArgs,
    unit: UnitSystem,
) -> anyhow::Result<()> {
    let Some(near) = location.resolve(sourcing).await? else {
        anyhow::bail!("locating a branch needs --near PLACE or --lat/--lng");
    };
    let branch = sourcing.locate_branch(shop, &near, unit).await?;
    println!("{}  ({})", branch.branch_label, branch.distance_text);
    Ok(())
}
