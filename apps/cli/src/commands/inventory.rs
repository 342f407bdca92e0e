//! `totem-quote inventory`
//!
//! Every edit loads the current list through the fallback chain, applies
//! one catalog operation and saves the whole list back to every writable
//! source.

use clap::Subcommand;

use totem_core::catalog::{add_model, remove_model, set_tier_rate};
use totem_core::{Money, TotemModel};
use totem_engine::EngineConfig;
use totem_store::InventoryChain;

#[derive(Debug, Subcommand)]
pub enum InventoryCommand {
    /// List models and their pricing tiers
    List,
    /// Add a model with the default tiers
    Add {
        /// Display name of the new model
        name: String,
    },
    /// Remove a model by id
    Remove {
        id: String,
    },
    /// Change one tier's daily rate
    SetRate {
        id: String,
        /// Tier breakpoint (quantity) to change
        quantity: u32,
        /// New daily rate in euros, e.g. 92.50
        #[arg(value_parser = parse_euros)]
        rate: Money,
    },
}

pub async fn run(config: &EngineConfig, cmd: InventoryCommand) -> anyhow::Result<()> {
    let (chain, outcome) = super::load_inventory(config).await?;
    let models = outcome.models;

    match cmd {
        InventoryCommand::List => {
            print!("{}", render_inventory(&models));
            Ok(())
        }
        InventoryCommand::Add { name } => {
            let (next, added) = add_model(&models, &name)?;
            save(&chain, &next).await?;
            println!("Added {} ({})", added.name, added.id);
            Ok(())
        }
        InventoryCommand::Remove { id } => {
            let next = remove_model(&models, &id)?;
            save(&chain, &next).await?;
            println!("Removed {id}");
            Ok(())
        }
        InventoryCommand::SetRate { id, quantity, rate } => {
            let next = set_tier_rate(&models, &id, quantity, rate)?;
            save(&chain, &next).await?;
            println!("Set {id} tier {quantity} to {rate}/day");
            Ok(())
        }
    }
}

async fn save(chain: &InventoryChain, models: &[TotemModel]) -> anyhow::Result<()> {
    let report = chain.save(models).await?;
    for warning in &report.warnings {
        eprintln!("warning: {warning}");
    }
    if !report.is_complete() {
        eprintln!("warning: saved only to {}", report.saved_to.join(", "));
    }
    Ok(())
}

/// Parses a euro amount with up to two decimals. Accepts `,` as separator.
pub fn parse_euros(input: &str) -> Result<Money, String> {
    let input = input.trim().replace(',', ".");
    let invalid = || format!("'{input}' is not a euro amount like 92.50");

    let (whole, fraction) = input.split_once('.').unwrap_or((input.as_str(), ""));
    let digits_only = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty())
        || fraction.len() > 2
        || !digits_only(whole)
        || !digits_only(fraction)
    {
        return Err(invalid());
    }

    let whole: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid())?
    };
    let cents: i64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
        _ => fraction.parse().map_err(|_| invalid())?,
    };
    Ok(Money::from_cents(whole * 100 + cents))
}

/// One block per model: id, name and its tiers.
pub fn render_inventory(models: &[TotemModel]) -> String {
    let mut out = String::new();
    for model in models {
        out.push_str(&format!("{}  {}\n", model.id, model.name));
        for tier in &model.pricing_tiers {
            out.push_str(&format!("    {:>3}+  {}/day\n", tier.quantity, tier.daily_rate));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use totem_core::catalog::seed_inventory;

    #[test]
    fn test_parse_euros() {
        assert_eq!(parse_euros("92.50").unwrap().cents(), 9250);
        assert_eq!(parse_euros("92,5").unwrap().cents(), 9250);
        assert_eq!(parse_euros("80").unwrap().cents(), 8000);
        assert_eq!(parse_euros(".75").unwrap().cents(), 75);
    }

    #[test]
    fn test_parse_euros_rejects_garbage() {
        assert!(parse_euros("").is_err());
        assert!(parse_euros("abc").is_err());
        assert!(parse_euros("1.234").is_err());
        assert!(parse_euros("-5").is_err());
        assert!(parse_euros("5.-1").is_err());
    }

    #[test]
    fn test_render_inventory_lists_tiers() {
        let text = render_inventory(&seed_inventory());
        assert!(text.starts_with("1  Totem Standard 50\""));
        assert!(text.contains("  1+  €100.00/day"));
        assert!(text.contains("  6+  €75.00/day"));
    }
}
