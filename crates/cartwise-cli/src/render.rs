//! Plain-text rendering for the terminal.

use std::fmt::Write as _;

use cartwise_core::{Item, ItemStatus, PriceQuote, RankedStrategy, Settings};
use rust_decimal::Decimal;

fn money(currency: &str, amount: Decimal) -> String {
    format!("{currency}{:.2}", amount.round_dp(2))
}

pub(crate) fn render_items(items: &[Item], currency: &str) -> String {
    let mut out = String::from("ITEMS\n");
    for item in items {
        let detail = match item.status {
            ItemStatus::Ready => match item.best_quote() {
                Some(quote) => format!("{} at {}", money(currency, quote.price), quote.shop),
                None => "no prices found".to_string(),
            },
            ItemStatus::Vague => {
                let mut detail = format!("pick one: {}", item.options.join(" | "));
                if let Some(example) = &item.example {
                    let _ = write!(detail, " (or e.g. \"{example}\")");
                }
                detail
            }
            ItemStatus::Error => format!(
                "failed: {}",
                item.error.as_deref().unwrap_or("unknown error")
            ),
            other => other.to_string(),
        };
        let _ = writeln!(out, "  {} {:<28} {detail}", item.icon, item.display_name());
    }
    out
}

pub(crate) fn render_quotes(quotes: &[PriceQuote], currency: &str) -> String {
    let mut out = String::new();
    for (rank, quote) in quotes.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>2}. {:<24} {}",
            rank + 1,
            quote.shop,
            money(currency, quote.price)
        );
    }
    out
}

pub(crate) fn render_strategies(strategies: &[RankedStrategy], settings: &Settings) -> String {
    if strategies.is_empty() {
        return "no shop strategies: no priced items yet\n".to_string();
    }

    let currency = settings.currency_symbol.as_str();
    let unit = settings.distance_unit.distance_label();
    let mut out = String::from("STRATEGIES\n");

    for (rank, strategy) in strategies.iter().enumerate() {
        let mut tags = Vec::new();
        if strategy.is_cheapest {
            tags.push("cheapest".to_string());
        }
        if strategy.is_closest {
            tags.push("closest".to_string());
        }
        if !strategy.within_preference {
            tags.push(format!("beyond {} {unit}", settings.max_distance));
        }
        let tags = if tags.is_empty() {
            String::new()
        } else {
            format!("  [{}]", tags.join(", "))
        };

        let _ = writeln!(
            out,
            "{}. {} ({}, {})  total {}{tags}",
            rank + 1,
            strategy.shop,
            strategy.branch,
            strategy.distance_text,
            money(currency, strategy.total),
        );
        let _ = writeln!(
            out,
            "   quoted for {} item(s), cheapest here for {}",
            strategy.coverage, strategy.cheapest_count
        );

        for line in &strategy.receipt {
            let price = if line.estimated {
                format!("~{} (estimated)", money(currency, line.price))
            } else {
                money(currency, line.price)
            };
            let _ = writeln!(out, "   - {:<26} {price}", line.item_name);
        }
        for gap in &strategy.savings {
            let _ = writeln!(
                out,
                "   save {} on {} at {} ({})",
                money(currency, gap.delta),
                gap.item_name,
                gap.cheapest_shop,
                money(currency, gap.cheapest_price),
            );
        }
        if strategy.potential_savings > Decimal::ZERO {
            let _ = writeln!(
                out,
                "   potential savings elsewhere: {}",
                money(currency, strategy.potential_savings)
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use cartwise_core::{ItemId, ReceiptLine, SavingsGap};

    use super::*;

    fn gbp(cents: i64) -> Decimal {
        Decimal::new(cents, 2)
    }

    fn strategy(shop: &str, total: i64) -> RankedStrategy {
        RankedStrategy {
            shop: shop.to_string(),
            branch: format!("{shop} Central"),
            distance_text: "1.2 km".to_string(),
            distance: 1.2,
            total: gbp(total),
            coverage: 2,
            cheapest_count: 1,
            within_preference: true,
            is_closest: false,
            is_cheapest: false,
            receipt: Vec::new(),
            savings: Vec::new(),
            potential_savings: Decimal::ZERO,
        }
    }

    #[test]
    fn items_show_price_options_and_errors() {
        let mut ready = Item::new("milk").unwrap();
        ready.begin_correcting().unwrap();
        ready.apply_resolution("Semi-skimmed milk", "🥛", None).unwrap();
        ready
            .finish_pricing(vec![PriceQuote::new("Lidl", gbp(95), "GBP")])
            .unwrap();

        let mut vague = Item::new("bread").unwrap();
        vague.begin_correcting().unwrap();
        vague
            .apply_resolution(
                "Bread",
                "🍞",
                Some((vec!["white".into(), "brown".into()], Some("Hovis".into()))),
            )
            .unwrap();

        let mut failed = Item::new("eggs").unwrap();
        failed.begin_correcting().unwrap();
        failed.fail("rate limited").unwrap();

        let text = render_items(&[ready, vague, failed], "£");
        assert!(text.contains("£0.95 at Lidl"));
        assert!(text.contains("pick one: white | brown (or e.g. \"Hovis\")"));
        assert!(text.contains("failed: rate limited"));
    }

    #[test]
    fn strategies_show_flags_receipt_and_savings() {
        let mut best = strategy("Lidl", 175);
        best.is_cheapest = true;
        best.receipt.push(ReceiptLine {
            item_id: ItemId::new(),
            item_name: "white bread".to_string(),
            price: gbp(80),
            is_cheapest_here: false,
            estimated: true,
        });
        best.savings.push(SavingsGap {
            item_id: ItemId::new(),
            item_name: "white bread".to_string(),
            cheapest_price: gbp(75),
            cheapest_shop: "Tesco".to_string(),
            price_here: gbp(80),
            delta: gbp(5),
        });
        best.potential_savings = gbp(5);
        let mut far = strategy("Asda", 150);
        far.within_preference = false;
        far.is_closest = true;

        let text = render_strategies(&[best, far], &Settings::default());
        assert!(text.contains("1. Lidl (Lidl Central, 1.2 km)  total £1.75  [cheapest]"));
        assert!(text.contains("~£0.80 (estimated)"));
        assert!(text.contains("save £0.05 on white bread at Tesco (£0.75)"));
        assert!(text.contains("potential savings elsewhere: £0.05"));
        assert!(text.contains("2. Asda"));
        assert!(text.contains("[closest, beyond 5 km]"));
    }

    #[test]
    fn empty_strategies_explain_themselves() {
        assert!(render_strategies(&[], &Settings::default()).starts_with("no shop strategies"));
    }

    #[test]
    fn quotes_are_numbered() {
        let quotes = vec![
            PriceQuote::new("Aldi", gbp(89), "GBP"),
            PriceQuote::new("Tesco", gbp(100), "GBP"),
        ];
        let text = render_quotes(&quotes, "€");
        assert!(text.starts_with(" 1. Aldi"));
        assert!(text.contains("€1.00"));
    }
}
