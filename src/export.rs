use anyhow::{Context, Result};
use csv::Writer;
use std::path::{Path, PathBuf};
use tracing::info;
use crate::payoff::PayoffCurve;
use crate::pricing::ConvergencePoint;

pub fn write_payoff_csv(curve: &PayoffCurve, csv_name: &Path) -> Result<()> {
    let mut writer = Writer::from_path(csv_name)
        .with_context(|| format!("write_payoff_csv() :: ERROR -> Failed to create {}", csv_name.display()))?;
    writer.write_record(["spot", "payoff"])?;
    for (spot, payoff) in curve.spots.iter().zip(curve.payoffs.iter()) {
        writer.write_record([spot.to_string(), payoff.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_convergence_csv(points: &[ConvergencePoint], csv_name: &Path) -> Result<()> {
    let mut writer = Writer::from_path(csv_name)
        .with_context(|| format!("write_convergence_csv() :: ERROR -> Failed to create {}", csv_name.display()))?;
    writer.write_record(["steps", "price", "call", "put"])?;
    for point in points {
        writer.write_record([
            point.steps.to_string(),
            point.price.to_string(),
            point.call.to_string(),
            point.put.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes the payoff grid and, when present, the binomial convergence table.
pub fn export_run(curve: &PayoffCurve, convergence: &[ConvergencePoint], csv_dir: &str, stamp: &str) -> Result<Vec<PathBuf>> {
    let dir = Path::new(csv_dir);
    let mut written = Vec::new();
    let payoff_csv = dir.join(format!("payoff_{}.csv", stamp));
    write_payoff_csv(curve, &payoff_csv)?;
    written.push(payoff_csv);
    if !convergence.is_empty() {
        let conv_csv = dir.join(format!("convergence_{}.csv", stamp));
        write_convergence_csv(convergence, &conv_csv)?;
        written.push(conv_csv);
    }
    info!(files = written.len(), dir = csv_dir, "export_run() :: Successfully exported run data");
    Ok(written)
}
