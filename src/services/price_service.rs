use crate::models::{MergedTimeline, PriceConfig, SlotLabel};

/// Spot and total price of the current slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrentPrices {
    pub spot: f64,
    pub total: f64,
}

/// Total price incl fees and vat
pub fn total_price(spot: f64, config: &PriceConfig) -> f64 {
    let total = spot
        + config.grid_fee
        + config.energy_tax
        + config.variable_costs
        + config.spot_fee
        + config.cert_fee;

    total * (1.0 + config.vat)
}

/// Prices for the slot labelled `current`.
///
/// `None` when the label is not on the timeline (clock past the known slots,
/// empty today series) or when it only matches a tomorrow slot.
pub fn current_prices(
    timeline: &MergedTimeline,
    current: &SlotLabel,
    config: &PriceConfig,
) -> Option<CurrentPrices> {
    let index = timeline.position(current)?;
    let spot = (*timeline.today_values.get(index)?)?;

    Some(CurrentPrices {
        spot,
        total: total_price(spot, config),
    })
}

/// Text of the spot/total price cards, four decimals, `n/a` when unavailable
pub fn format_price_cards(prices: Option<&CurrentPrices>) -> [String; 2] {
    match prices {
        Some(p) => [
            format!("Spot price: {:.4}", p.spot),
            format!("Total price: {:.4}", p.total),
        ],
        None => ["Spot price: n/a".to_string(), "Total price: n/a".to_string()],
    }
}
