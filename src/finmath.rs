use crate::error::{CalcError, CalcResult};
use statrs::function::erf::erfc;
use std::f64::consts::SQRT_2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    pub fn intrinsic(self, spot: f64, strike: f64) -> f64 {
        match self {
            OptionType::Call => (spot - strike).max(0.0),
            OptionType::Put => (strike - spot).max(0.0),
        }
    }
}

/// Flat market seen by both engines. Rates are continuously compounded,
/// `time` is the Actual/365 Fixed year fraction to expiry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketParams {
    pub spot: f64,
    pub rate: f64,
    pub dividend: f64,
    pub vol: f64,
    pub time: f64,
}

impl MarketParams {
    pub fn discount(&self) -> f64 {
        (-self.rate * self.time).exp()
    }

    pub fn dividend_discount(&self) -> f64 {
        (-self.dividend * self.time).exp()
    }

    pub fn forward(&self) -> f64 {
        self.spot * ((self.rate - self.dividend) * self.time).exp()
    }
}

// Cumulative Normal Distribution
pub fn cnd(x: f64) -> f64 {
    0.5 * erfc(-x / SQRT_2)
}

/* Black-Scholes-Merton price of a European option
spot, rate, dividend yield, vol and time come from the flat market
zero variance (no vol or expiry today) collapses to the discounted intrinsic value of the forward
*/
pub fn black_scholes(m: &MarketParams, strike: f64, option_type: OptionType) -> CalcResult<f64> {
    if m.time < 0.0 {
        return Err(CalcError::pricing("option has expired"));
    }
    if m.vol < 0.0 {
        return Err(CalcError::pricing(format!("negative volatility {}", m.vol)));
    }
    let df = m.discount();
    let forward = m.forward();
    if m.vol == 0.0 || m.time == 0.0 {
        return Ok(df * option_type.intrinsic(forward, strike));
    }
    let std_dev = m.vol * m.time.sqrt();
    let d1 = ((forward / strike).ln() + 0.5 * std_dev * std_dev) / std_dev;
    let d2 = d1 - std_dev;
    let price = match option_type {
        OptionType::Call => df * (forward * cnd(d1) - strike * cnd(d2)),
        OptionType::Put => df * (strike * cnd(-d2) - forward * cnd(-d1)),
    };
    if !price.is_finite() {
        return Err(CalcError::pricing(format!("non-finite Black-Scholes price for strike {}", strike)));
    }
    Ok(price)
}

/// Cox-Ross-Rubinstein tree with early exercise at every node.
///
/// Nodes sit at `spot * e^(±k dx)` with `dx = vol * sqrt(dt)`; the up
/// probability follows the log-drift, `pu = 1/2 + 1/2 (r - q - vol^2/2) dt / dx`.
pub fn crr_american(m: &MarketParams, strike: f64, option_type: OptionType, steps: usize) -> CalcResult<f64> {
    if steps == 0 {
        return Err(CalcError::pricing("binomial steps must be > 0"));
    }
    if m.time <= 0.0 {
        return Err(CalcError::pricing("option has expired"));
    }
    let dt = m.time / steps as f64;
    let dx = m.vol * dt.sqrt();
    let drift_per_step = (m.rate - m.dividend - 0.5 * m.vol * m.vol) * dt;
    let p = 0.5 + 0.5 * drift_per_step / dx;
    if !p.is_finite() || !(0.0..=1.0).contains(&p) {
        return Err(CalcError::pricing(format!(
            "negative probability in binomial tree (pu = {}) at {} steps",
            p, steps
        )));
    }
    let u = dx.exp();
    let d = 1.0 / u;
    let disc = (-m.rate * dt).exp();
    let disc_p = disc * p;
    let disc_1mp = disc * (1.0 - p);
    // spot * u^j * d^(n-j) = spot * d^n * (u/d)^j
    let ratio = u / d;

    let mut values = Vec::with_capacity(steps + 1);
    let mut st = m.spot * d.powi(steps as i32);
    for _ in 0..=steps {
        values.push(option_type.intrinsic(st, strike));
        st *= ratio;
    }

    let mut base = m.spot * d.powi(steps as i32 - 1);
    for i in (0..steps).rev() {
        let mut st = base;
        for j in 0..=i {
            let continuation = disc_p * values[j + 1] + disc_1mp * values[j];
            values[j] = continuation.max(option_type.intrinsic(st, strike));
            st *= ratio;
        }
        base *= u;
    }
    Ok(values[0])
}
