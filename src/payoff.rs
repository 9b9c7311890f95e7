use crate::finmath::OptionType;
use crate::inputs::Position;
use crate::pricing::PricingOutcome;
use crate::utils::linspace;

#[derive(Debug, Clone, PartialEq)]
pub struct PayoffCurve {
    pub spots: Vec<f64>,
    pub payoffs: Vec<f64>,
    pub label: &'static str,
}

pub fn payoff_label(option_type: OptionType, position: Position) -> &'static str {
    match (option_type, position) {
        (OptionType::Call, Position::Long) => "Long Call Payoff",
        (OptionType::Call, Position::Short) => "Short Call Payoff",
        (OptionType::Put, Position::Long) => "Long Put Payoff",
        (OptionType::Put, Position::Short) => "Short Put Payoff",
    }
}

// Expiry payoff of one contract, premium not included
pub fn position_payoff(option_type: OptionType, position: Position, spot: f64, strike: f64) -> f64 {
    let intrinsic = option_type.intrinsic(spot, strike);
    match position {
        Position::Long => intrinsic,
        Position::Short => -intrinsic,
    }
}

pub fn payoff_curve(
    option_type: OptionType,
    position: Position,
    spot: f64,
    strike: f64,
    points: usize,
    low: f64,
    high: f64,
) -> PayoffCurve {
    let spots = linspace(low * spot, high * spot, points);
    let payoffs = spots
        .iter()
        .map(|&s| position_payoff(option_type, position, s, strike))
        .collect();
    PayoffCurve { spots, payoffs, label: payoff_label(option_type, position) }
}

/// Underlying price at which the premium is recovered. Long and short
/// positions share it.
pub fn breakeven(option_type: OptionType, strike: f64, pricing: &PricingOutcome) -> f64 {
    match option_type {
        OptionType::Call => strike + pricing.call,
        OptionType::Put => strike - pricing.put,
    }
}
