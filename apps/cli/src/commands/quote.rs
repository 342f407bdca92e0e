//! `totem-quote quote`

use std::fmt::Write as _;

use anyhow::bail;
use clap::Args;
use tracing::info;

use totem_core::{Quote, QuoteRequest, TotemModel};
use totem_engine::{build_resolver, EngineConfig, QuoteEngine, QuoteSlot};

#[derive(Debug, Args)]
pub struct QuoteArgs {
    /// Model id or name (case-insensitive)
    #[arg(long)]
    pub model: String,

    /// Number of totems
    #[arg(long, short = 'q', allow_negative_numbers = true)]
    pub quantity: i64,

    /// Rental length in days
    #[arg(long, short = 'd', allow_negative_numbers = true)]
    pub days: i64,

    /// Destination city
    #[arg(long, short = 'c')]
    pub city: String,

    /// Print the quote as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(config: &EngineConfig, args: QuoteArgs) -> anyhow::Result<()> {
    let (_, outcome) = super::load_inventory(config).await?;
    let geocoder = build_resolver(&config.geocoder)?;
    let engine = QuoteEngine::new(config.pricing.clone(), geocoder)?;

    let request = QuoteRequest {
        model_id: resolve_model_id(&outcome.models, &args.model)?,
        quantity: args.quantity,
        days: args.days,
        destination_city: args.city,
    };
    info!(model = %request.model_id, city = %request.destination_city, "Calculating quote");

    let slot: QuoteSlot = QuoteSlot::new();
    let ticket = slot.begin().await;

    let quote = tokio::select! {
        result = engine.calculate(&outcome.models, &request) => result?,
        _ = tokio::signal::ctrl_c() => {
            slot.close().await;
            bail!("quote cancelled");
        }
    };

    if !ticket.publish(quote).await {
        bail!("quote cancelled");
    }
    let Some(quote) = slot.latest().await else {
        bail!("quote cancelled");
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&quote)?);
    } else {
        print!("{}", render_quote(&quote));
    }
    Ok(())
}

/// Maps `--model` to a model id.
///
/// An exact id wins; otherwise a unique case-insensitive name match. Unknown
/// input is passed through so the engine reports it as a missing model.
pub fn resolve_model_id(models: &[TotemModel], input: &str) -> anyhow::Result<String> {
    let input = input.trim();
    if models.iter().any(|model| model.id == input) {
        return Ok(input.to_string());
    }

    let wanted = input.to_lowercase();
    let matches: Vec<&TotemModel> = models
        .iter()
        .filter(|model| model.name.to_lowercase() == wanted)
        .collect();

    match matches.as_slice() {
        [] => Ok(input.to_string()),
        [model] => Ok(model.id.clone()),
        many => bail!(
            "model name '{input}' is ambiguous ({} matches); use an id",
            many.len()
        ),
    }
}

/// Human-readable quote with both transport options.
pub fn render_quote(quote: &Quote) -> String {
    let per_unit = quote.quantity > 1;
    let mut out = String::new();

    let _ = writeln!(out, "{} × {}", quote.quantity, quote.model.name);
    let _ = writeln!(
        out,
        "Destination: {} ({} km from {})",
        quote.destination_city, quote.distance_km, quote.nearest_warehouse
    );
    let _ = writeln!(
        out,
        "Rental: {} days at {}/day per totem = {}",
        quote.days, quote.daily_rate, quote.rental_cost
    );
    if per_unit {
        let _ = writeln!(out, "  per totem: {}", quote.rental_cost_per_unit);
    }

    for option in &quote.transport_options {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", option.name);
        let _ = writeln!(out, "  {}", option.details);
        let _ = writeln!(out, "  Transport: {}", option.transport_cost);
        let _ = writeln!(out, "  Total:     {}", option.total_cost);
        if per_unit {
            let _ = writeln!(
                out,
                "  per totem: transport {}, total {}",
                option.transport_cost_per_unit, option.total_cost_per_unit
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use totem_core::catalog::seed_inventory;
    use totem_core::{Money, TransportCost, TransportKind, TransportOption};

    fn option(kind: TransportKind, transport: TransportCost, total: TransportCost) -> TransportOption {
        TransportOption {
            kind,
            name: kind.display_name().to_string(),
            transport_cost: transport,
            total_cost: total,
            details: "details".into(),
            transport_cost_per_unit: transport,
            total_cost_per_unit: total,
        }
    }

    fn venezia_quote(quantity: u32) -> Quote {
        let model = seed_inventory().remove(0);
        Quote {
            model,
            quantity,
            days: 2,
            destination_city: "Venezia".into(),
            daily_rate: Money::from_euros(100),
            rental_cost: Money::from_euros(200),
            rental_cost_per_unit: Money::from_euros(200),
            transport_options: vec![
                option(
                    TransportKind::Dedicated,
                    TransportCost::Amount(Money::from_euros(560)),
                    TransportCost::Amount(Money::from_euros(760)),
                ),
                option(
                    TransportKind::Courier,
                    TransportCost::QuoteRequired,
                    TransportCost::QuoteRequired,
                ),
            ],
            distance_km: 280,
            nearest_warehouse: "Novi Ligure".into(),
        }
    }

    #[test]
    fn test_render_shows_both_options_in_order() {
        let text = render_quote(&venezia_quote(1));

        let dedicated = text.find("Dedicated transport").unwrap();
        let courier = text.find("Borghi courier").unwrap();
        assert!(dedicated < courier);
        assert!(text.contains("280 km from Novi Ligure"));
        assert!(text.contains("Total:     €760.00"));
        assert!(text.contains("quote required"));
        assert!(!text.contains("per totem"));
    }

    #[test]
    fn test_render_per_unit_for_multiple_totems() {
        let text = render_quote(&venezia_quote(2));
        assert!(text.contains("per totem"));
    }

    #[test]
    fn test_resolve_model_by_id_or_name() {
        let models = seed_inventory();
        assert_eq!(resolve_model_id(&models, "1").unwrap(), "1");
        assert_eq!(
            resolve_model_id(&models, "totem standard 50\"").unwrap(),
            "1"
        );
        assert_eq!(resolve_model_id(&models, "missing").unwrap(), "missing");
    }

    #[test]
    fn test_ambiguous_name_is_rejected() {
        let mut models = seed_inventory();
        let mut twin = models[0].clone();
        twin.id = "2".into();
        models.push(twin);

        assert!(resolve_model_id(&models, "Totem Standard 50\"").is_err());
    }
}
