use crate::config::Settings;
use crate::error::CalcResult;
use crate::export::export_run;
use crate::graphing::{generate_payoff_plot, PlotMarkers};
use crate::inputs::{collect_inputs, ExerciseStyle, OptionInputs};
use crate::parity::{check_parity, write_proof, ParityCheck, RULE};
use crate::payoff::{breakeven, payoff_curve, PayoffCurve};
use crate::pricing::{price_option, PricingOutcome};
use crate::utils::create_directory_if_dne;
use chrono::Local;
use std::io::{BufRead, Write};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub inputs: OptionInputs,
    pub pricing: PricingOutcome,
    pub curve: PayoffCurve,
    pub breakeven: f64,
    pub parity: Option<ParityCheck>,
    /// Number of prompt sequences started, the successful one included.
    pub attempts: usize,
}

pub fn evaluate(inputs: OptionInputs, settings: &Settings) -> CalcResult<RunReport> {
    let pricing = price_option(&inputs, settings.max_binomial_steps)?;
    let breakeven = breakeven(inputs.option_type, inputs.strike, &pricing);
    let curve = payoff_curve(
        inputs.option_type,
        inputs.position,
        inputs.spot,
        inputs.strike,
        settings.grid_points,
        settings.grid_low,
        settings.grid_high,
    );
    let parity = inputs
        .wants_parity
        .then(|| check_parity(&inputs.market(), inputs.strike, inputs.exercise, &pricing));
    Ok(RunReport { inputs, pricing, curve, breakeven, parity, attempts: 1 })
}

pub fn write_report<W: Write>(out: &mut W, report: &RunReport) -> std::io::Result<()> {
    let inputs = &report.inputs;
    match inputs.exercise {
        ExerciseStyle::European => {
            writeln!(out, "{}", RULE)?;
            writeln!(out, "Black Scholes Price = {:.6}", report.pricing.price)?;
            writeln!(out, "Day count = {}", inputs.day_count())?;
        }
        ExerciseStyle::American => {
            writeln!(out, "Option Price: {:.0}", report.pricing.price)?;
            writeln!(out, "Day Count = {}", inputs.day_count())?;
        }
    }
    writeln!(out, "Breakeven at: {:.2}", report.breakeven)?;
    if let Some(check) = &report.parity {
        write_proof(out, check, &inputs.market(), inputs.strike, &report.pricing)?;
    }
    Ok(())
}

/// Chart and CSV output. Failures are logged and never fail the run.
pub fn publish_artifacts(report: &RunReport, settings: &Settings) {
    let stamp = Local::now().format("%Y-%m-%d_%H-%M-%S").to_string();
    if settings.plot {
        let markers = PlotMarkers {
            strike: report.inputs.strike,
            breakeven: report.breakeven,
            price: report.pricing.price,
        };
        let plotted = create_directory_if_dne(&settings.plot_dir)
            .map_err(anyhow::Error::from)
            .and_then(|_| generate_payoff_plot(&report.curve, &markers, &settings.plot_dir, &stamp));
        if let Err(e) = plotted {
            warn!("publish_artifacts() :: Payoff chart skipped: {:#}", e);
        }
    }
    if settings.export_csv {
        let exported = create_directory_if_dne(&settings.csv_dir)
            .map_err(anyhow::Error::from)
            .and_then(|_| export_run(&report.curve, &report.pricing.convergence, &settings.csv_dir, &stamp));
        if let Err(e) = exported {
            warn!("publish_artifacts() :: CSV export skipped: {:#}", e);
        }
    }
}

// Any failure before the report restarts from the first prompt with nothing carried over
/// Prompts until one request prices cleanly, then reports it.
pub fn run_session<R: BufRead, W: Write>(input: &mut R, out: &mut W, settings: &Settings) -> CalcResult<RunReport> {
    let mut attempts = 0;
    loop {
        attempts += 1;
        let attempt = collect_inputs(input, out).and_then(|inputs| evaluate(inputs, settings));
        match attempt {
            Ok(mut report) => {
                report.attempts = attempts;
                info!(
                    attempts,
                    exercise = ?report.inputs.exercise,
                    price = report.pricing.price,
                    "run_session() :: Priced option"
                );
                write_report(out, &report)?;
                out.flush()?;
                publish_artifacts(&report, settings);
                return Ok(report);
            }
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                warn!(attempts, "run_session() :: Restarting prompts: {}", e);
                writeln!(out, "An error occurred: {}", e)?;
                writeln!(out, "Please check your inputs and try again.\n")?;
            }
        }
    }
}
