use crate::finmath::MarketParams;
use crate::inputs::ExerciseStyle;
use crate::pricing::PricingOutcome;
use crate::utils::round_to;
use std::io::{self, Write};

pub const RULE: &str = "-------------------------------------------------------------------------";
pub const NO_PARITY: &str = "There's no Put-Call parity, remember that for it to happen both instruments must have the same strike, maturity and underlying asset";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParityCheck {
    European { lhs: f64, rhs: f64, holds: bool },
    American { upper: f64, middle: f64, lower: f64, holds: bool },
}

impl ParityCheck {
    pub fn holds(&self) -> bool {
        match *self {
            ParityCheck::European { holds, .. } | ParityCheck::American { holds, .. } => holds,
        }
    }
}

// C + K e^(-rt) = P + S e^(-qt), compared at four decimals
pub fn european_parity(m: &MarketParams, strike: f64, call: f64, put: f64) -> ParityCheck {
    let lhs = call + strike * m.discount();
    let rhs = put + m.spot * m.dividend_discount();
    ParityCheck::European { lhs, rhs, holds: round_to(lhs, 4) == round_to(rhs, 4) }
}

// Bounds on C - P at two decimals; the lower bound discounts spot by e^(-r*div)
pub fn american_parity(m: &MarketParams, strike: f64, call: f64, put: f64) -> ParityCheck {
    let upper = m.spot - strike * m.discount();
    let lower = m.spot * (-m.rate * m.dividend).exp() - strike;
    let middle = call - put;
    let (u, mid, l) = (round_to(upper, 2), round_to(middle, 2), round_to(lower, 2));
    ParityCheck::American { upper, middle, lower, holds: u >= mid && mid >= l }
}

pub fn check_parity(m: &MarketParams, strike: f64, exercise: ExerciseStyle, pricing: &PricingOutcome) -> ParityCheck {
    match exercise {
        ExerciseStyle::European => european_parity(m, strike, pricing.call, pricing.put),
        ExerciseStyle::American => american_parity(m, strike, pricing.call, pricing.put),
    }
}

pub fn write_proof<W: Write>(
    out: &mut W,
    check: &ParityCheck,
    m: &MarketParams,
    strike: f64,
    pricing: &PricingOutcome,
) -> io::Result<()> {
    if !check.holds() {
        return writeln!(out, "{}", NO_PARITY);
    }
    writeln!(out, "{}", RULE)?;
    writeln!(out, "Call Price (C): {:.2}", pricing.call)?;
    writeln!(out, "Put Price (P): {:.2}", pricing.put)?;
    writeln!(out, "Put-Call parity proof:")?;
    match *check {
        ParityCheck::European { lhs, rhs, .. } => {
            writeln!(out, "C + K * e^(-r*t) = P + S * e^(-div*t)")?;
            writeln!(
                out,
                "{:.2} + {} * e^({} * {:.2}) = {:.2} + {} * e^({} * {:.2})",
                pricing.call, strike, -m.rate, m.time, pricing.put, m.spot, -m.dividend, m.time
            )?;
            writeln!(out, "{:.2} = {:.2}", lhs, rhs)
        }
        ParityCheck::American { upper, middle, lower, .. } => {
            writeln!(out, "S - K * e^(-r*t) ≥ C - P ≥ S * e^(-r*div) - K")?;
            writeln!(out, "{:.2} ≥ {:.2} - {:.2} ≥ {:.2}", upper, pricing.call, pricing.put, lower)?;
            writeln!(out, "{:.2} ≥ {:.2} ≥ {:.2}", upper, middle, lower)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finmath::{black_scholes, OptionType};
    use approx::assert_abs_diff_eq;

    fn market() -> MarketParams {
        MarketParams { spot: 100.0, rate: 0.05, dividend: 0.02, vol: 0.25, time: 0.75 }
    }

    fn outcome(call: f64, put: f64) -> PricingOutcome {
        PricingOutcome { price: call, call, put, convergence: Vec::new() }
    }

    #[test]
    fn analytic_prices_pass_european_check() {
        let m = market();
        let call = black_scholes(&m, 95.0, OptionType::Call).unwrap();
        let put = black_scholes(&m, 95.0, OptionType::Put).unwrap();
        let check = european_parity(&m, 95.0, call, put);
        assert!(check.holds());
        if let ParityCheck::European { lhs, rhs, .. } = check {
            assert_abs_diff_eq!(lhs, rhs, epsilon = 1e-9);
        }
    }

    #[test]
    fn mismatched_prices_fail_european_check() {
        let m = market();
        let call = black_scholes(&m, 95.0, OptionType::Call).unwrap();
        let put = black_scholes(&m, 105.0, OptionType::Put).unwrap();
        assert!(!european_parity(&m, 95.0, call, put).holds());
    }

    #[test]
    fn american_bounds_use_dividend_in_lower_exponent() {
        let m = market();
        let check = american_parity(&m, 100.0, 9.0, 3.0);
        match check {
            ParityCheck::American { upper, middle, lower, holds } => {
                assert_abs_diff_eq!(upper, 100.0 - 100.0 * (-0.05f64 * 0.75).exp(), epsilon = 1e-12);
                assert_abs_diff_eq!(lower, 100.0 * (-0.05f64 * 0.02).exp() - 100.0, epsilon = 1e-12);
                assert_eq!(middle, 6.0);
                assert!(!holds);
            }
            _ => panic!("expected an American check"),
        }
        assert!(american_parity(&m, 100.0, 7.0, 6.0).holds());
    }

    #[test]
    fn proof_text_when_parity_holds() {
        let m = MarketParams { dividend: 0.0, time: 1.0, ..market() };
        let call = black_scholes(&m, 100.0, OptionType::Call).unwrap();
        let put = black_scholes(&m, 100.0, OptionType::Put).unwrap();
        let px = outcome(call, put);
        let check = check_parity(&m, 100.0, ExerciseStyle::European, &px);
        let mut buf = Vec::new();
        write_proof(&mut buf, &check, &m, 100.0, &px).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with(RULE));
        assert!(text.contains("Put-Call parity proof:"));
        assert!(text.contains("C + K * e^(-r*t) = P + S * e^(-div*t)"));
        assert!(text.contains("* e^(-0.05 * 1.00)"));
    }

    #[test]
    fn informational_text_when_parity_fails() {
        let m = market();
        let px = outcome(9.0, 3.0);
        let check = check_parity(&m, 100.0, ExerciseStyle::American, &px);
        let mut buf = Vec::new();
        write_proof(&mut buf, &check, &m, 100.0, &px).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap().trim_end(), NO_PARITY);
    }
}
