use crate::error::{CalcError, CalcResult};
use crate::finmath::{MarketParams, OptionType};
use chrono::NaiveDate;
use regex::Regex;
use std::io::{BufRead, ErrorKind, Write};
use std::sync::OnceLock;

pub const SPOT_PROMPT: &str = "Enter the current stock price (S):";
pub const STRIKE_PROMPT: &str = "Enter the current strike price (K):";
pub const DIVIDEND_PROMPT: &str = "Enter the dividend yield (div):";
pub const RATE_PROMPT: &str = "Enter the risk-free interest rate (r):";
pub const TODAY_PROMPT: &str = "Enter the current date (DD-MM-YYYY):";
pub const EXPIRY_PROMPT: &str = "Enter the option expiration date (DD-MM-YYYY):";
pub const VOL_PROMPT: &str = "Enter the volatility (Sigma):";
pub const TYPE_PROMPT: &str = "Select option type (Put or Call): ";
pub const POSITION_PROMPT: &str = "Select your position (Long or Short):";
pub const PARITY_PROMPT: &str = "Do you want the Put-Call Parity proof? (Yes or No):";
pub const EXERCISE_PROMPT: &str = "Select exercise type (American or European): ";

const DAYS_PER_YEAR: f64 = 365.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Long,
    Short,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExerciseStyle {
    European,
    American,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptionInputs {
    pub spot: f64,
    pub strike: f64,
    pub dividend: f64,
    pub rate: f64,
    pub today: NaiveDate,
    pub expiry: NaiveDate,
    pub vol: f64,
    pub option_type: OptionType,
    pub position: Position,
    pub wants_parity: bool,
    pub exercise: ExerciseStyle,
}

impl OptionInputs {
    pub fn day_count(&self) -> i64 {
        (self.expiry - self.today).num_days()
    }

    /// Actual/365 Fixed
    pub fn year_fraction(&self) -> f64 {
        self.day_count() as f64 / DAYS_PER_YEAR
    }

    pub fn market(&self) -> MarketParams {
        MarketParams {
            spot: self.spot,
            rate: self.rate,
            dividend: self.dividend,
            vol: self.vol,
            time: self.year_fraction(),
        }
    }
}

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\d{1,2})-(\d{1,2})-(\d{4})$").expect("static date pattern"))
}

pub fn parse_float(token: &str) -> CalcResult<f64> {
    let token = token.trim();
    token.parse::<f64>().map_err(|_| CalcError::InvalidNumber(token.to_string()))
}

pub fn parse_date(token: &str) -> CalcResult<NaiveDate> {
    let token = token.trim();
    let invalid = || CalcError::InvalidDate(token.to_string());
    let caps = date_pattern().captures(token).ok_or_else(invalid)?;
    let day: u32 = caps[1].parse().map_err(|_| invalid())?;
    let month: u32 = caps[2].parse().map_err(|_| invalid())?;
    let year: i32 = caps[3].parse().map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

pub fn parse_option_type(token: &str) -> CalcResult<OptionType> {
    match token.trim().to_lowercase().as_str() {
        "call" => Ok(OptionType::Call),
        "put" => Ok(OptionType::Put),
        _ => Err(CalcError::choice("Invalid option type selected. Defaulting to Put.")),
    }
}

pub fn parse_position(token: &str) -> CalcResult<Position> {
    match token.trim().to_lowercase().as_str() {
        "long" => Ok(Position::Long),
        "short" => Ok(Position::Short),
        _ => Err(CalcError::choice("Invalid position type")),
    }
}

pub fn parse_yes_no(token: &str) -> CalcResult<bool> {
    match token.trim().to_lowercase().as_str() {
        "yes" => Ok(true),
        "no" => Ok(false),
        _ => Err(CalcError::choice("Invalid, its not that dificult just write yes or no")),
    }
}

pub fn parse_exercise(token: &str) -> CalcResult<ExerciseStyle> {
    match token.trim().to_lowercase().as_str() {
        "european" => Ok(ExerciseStyle::European),
        "american" => Ok(ExerciseStyle::American),
        _ => Err(CalcError::choice("Invalid position type")),
    }
}

// A line that is not UTF-8 is consumed and reported as a bad answer
fn ask<R: BufRead, W: Write>(input: &mut R, out: &mut W, prompt: &str) -> CalcResult<String> {
    write!(out, "{}", prompt)?;
    out.flush()?;
    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(0) => Err(CalcError::EndOfInput),
        Ok(_) => Ok(line),
        Err(e) if e.kind() == ErrorKind::InvalidData => Err(CalcError::Undecodable(e.to_string())),
        Err(e) => Err(e.into()),
    }
}

/// Runs the eleven prompts in order, failing on the first bad answer.
pub fn collect_inputs<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> CalcResult<OptionInputs> {
    let spot = parse_float(&ask(input, out, SPOT_PROMPT)?)?;
    let strike = parse_float(&ask(input, out, STRIKE_PROMPT)?)?;
    let dividend = parse_float(&ask(input, out, DIVIDEND_PROMPT)?)?;
    let rate = parse_float(&ask(input, out, RATE_PROMPT)?)?;
    let today = parse_date(&ask(input, out, TODAY_PROMPT)?)?;
    let expiry = parse_date(&ask(input, out, EXPIRY_PROMPT)?)?;
    let vol = parse_float(&ask(input, out, VOL_PROMPT)?)?;
    let option_type = parse_option_type(&ask(input, out, TYPE_PROMPT)?)?;
    let position = parse_position(&ask(input, out, POSITION_PROMPT)?)?;
    let wants_parity = parse_yes_no(&ask(input, out, PARITY_PROMPT)?)?;
    let exercise = parse_exercise(&ask(input, out, EXERCISE_PROMPT)?)?;
    Ok(OptionInputs {
        spot,
        strike,
        dividend,
        rate,
        today,
        expiry,
        vol,
        option_type,
        position,
        wants_parity,
        exercise,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const GOOD: &str = "100\n100\n0\n0.05\n01-01-2024\n31-12-2024\n0.2\nCall\nlong\nYES\n european \n";

    #[test]
    fn collects_a_full_request() {
        let mut input = Cursor::new(GOOD);
        let mut out = Vec::new();
        let req = collect_inputs(&mut input, &mut out).unwrap();
        assert_eq!(req.spot, 100.0);
        assert_eq!(req.rate, 0.05);
        assert_eq!(req.today, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(req.option_type, OptionType::Call);
        assert_eq!(req.position, Position::Long);
        assert!(req.wants_parity);
        assert_eq!(req.exercise, ExerciseStyle::European);
        assert_eq!(req.day_count(), 365);
        assert_eq!(req.year_fraction(), 1.0);

        let shown = String::from_utf8(out).unwrap();
        assert!(shown.starts_with(SPOT_PROMPT));
        assert!(shown.ends_with(EXERCISE_PROMPT));
    }

    #[test]
    fn stops_at_first_bad_answer() {
        let mut input = Cursor::new("100\nabc\n0\n");
        let mut out = Vec::new();
        let err = collect_inputs(&mut input, &mut out).unwrap_err();
        assert!(matches!(err, CalcError::InvalidNumber(ref t) if t == "abc"));
        let shown = String::from_utf8(out).unwrap();
        assert!(!shown.contains(DIVIDEND_PROMPT));
    }

    #[test]
    fn categorical_tokens_are_case_insensitive() {
        assert_eq!(parse_option_type(" PUT ").unwrap(), OptionType::Put);
        assert_eq!(parse_position("Short").unwrap(), Position::Short);
        assert!(!parse_yes_no("no").unwrap());
        assert_eq!(parse_exercise("American\n").unwrap(), ExerciseStyle::American);
    }

    #[test]
    fn unknown_choice_carries_its_message() {
        let err = parse_yes_no("maybe").unwrap_err();
        assert_eq!(err.to_string(), "Invalid, its not that dificult just write yes or no");
        assert_eq!(
            parse_option_type("straddle").unwrap_err().to_string(),
            "Invalid option type selected. Defaulting to Put."
        );
        assert_eq!(parse_position("flat").unwrap_err().to_string(), "Invalid position type");
        assert_eq!(parse_exercise("bermudan").unwrap_err().to_string(), "Invalid position type");
    }

    #[test]
    fn dates_are_day_month_year() {
        assert_eq!(parse_date("5-3-2025").unwrap(), NaiveDate::from_ymd_opt(2025, 3, 5).unwrap());
        assert!(matches!(parse_date("2025-03-05"), Err(CalcError::InvalidDate(_))));
        assert!(parse_date("31-02-2025").is_err());
        assert!(parse_date("1-1-25").is_err());
    }

    #[test]
    fn negative_day_count_is_kept() {
        let mut input = Cursor::new(GOOD.replace("31-12-2024", "01-12-2023"));
        let req = collect_inputs(&mut input, &mut Vec::new()).unwrap();
        assert_eq!(req.day_count(), -31);
        assert!(req.market().time < 0.0);
    }

    #[test]
    fn non_utf8_answer_is_not_fatal() {
        let mut bytes = b"100\n100\n0\n0.05\n01-01-2024\n31-12-2024\n0.2\n".to_vec();
        bytes.extend_from_slice(b"\xff\xfe\n");
        let mut input = Cursor::new(bytes);
        let err = collect_inputs(&mut input, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, CalcError::Undecodable(_)));
        assert!(!err.is_fatal());
    }

    #[test]
    fn closed_input_is_reported() {
        let mut input = Cursor::new("100\n");
        let err = collect_inputs(&mut input, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, CalcError::EndOfInput));
        assert!(err.is_fatal());
    }
}
