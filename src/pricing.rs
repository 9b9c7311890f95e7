use crate::error::{CalcError, CalcResult};
use crate::finmath::{black_scholes, crr_american, MarketParams, OptionType};
use crate::inputs::{ExerciseStyle, OptionInputs};
use tracing::debug;

pub const MIN_BINOMIAL_STEPS: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct ConvergencePoint {
    pub steps: usize,
    pub price: f64,
    pub call: f64,
    pub put: f64,
}

/// Price of the requested option plus the plain call and put used for
/// breakeven and parity.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingOutcome {
    pub price: f64,
    pub call: f64,
    pub put: f64,
    /// One point per step count for American exercise, empty for European.
    pub convergence: Vec<ConvergencePoint>,
}

pub fn price_european(m: &MarketParams, strike: f64, option_type: OptionType) -> CalcResult<PricingOutcome> {
    let call = black_scholes(m, strike, OptionType::Call)?;
    let put = black_scholes(m, strike, OptionType::Put)?;
    let price = match option_type {
        OptionType::Call => call,
        OptionType::Put => put,
    };
    debug!(call, put, "price_european() :: Analytic prices");
    Ok(PricingOutcome { price, call, put, convergence: Vec::new() })
}

pub fn price_american(
    m: &MarketParams,
    strike: f64,
    option_type: OptionType,
    max_steps: usize,
) -> CalcResult<PricingOutcome> {
    if max_steps < MIN_BINOMIAL_STEPS {
        return Err(CalcError::pricing(format!("at least {} binomial steps are required", MIN_BINOMIAL_STEPS)));
    }
    let convergence = (MIN_BINOMIAL_STEPS..=max_steps)
        .map(|steps| {
            let call = crr_american(m, strike, OptionType::Call, steps)?;
            let put = crr_american(m, strike, OptionType::Put, steps)?;
            let price = match option_type {
                OptionType::Call => call,
                OptionType::Put => put,
            };
            Ok(ConvergencePoint { steps, price, call, put })
        })
        .collect::<CalcResult<Vec<_>>>()?;
    let last = convergence
        .last()
        .ok_or_else(|| CalcError::pricing("empty binomial sequence"))?;
    debug!(steps = last.steps, price = last.price, "price_american() :: Converged binomial price");
    Ok(PricingOutcome { price: last.price, call: last.call, put: last.put, convergence })
}

pub fn price_option(inputs: &OptionInputs, max_steps: usize) -> CalcResult<PricingOutcome> {
    let m = inputs.market();
    if m.time < 0.0 {
        return Err(CalcError::pricing(format!(
            "option has expired ({} days to expiry)",
            inputs.day_count()
        )));
    }
    // The tree needs a positive horizon; the closed form prices intrinsic at zero variance
    if m.time == 0.0 && inputs.exercise == ExerciseStyle::American {
        return Err(CalcError::pricing("binomial tree needs at least one day to expiry"));
    }
    match inputs.exercise {
        ExerciseStyle::European => price_european(&m, inputs.strike, inputs.option_type),
        ExerciseStyle::American => price_american(&m, inputs.strike, inputs.option_type, max_steps),
    }
}
