use anyhow::{Context, Result};
use super::payoff::PayoffCurve;
use std::process::{Command, Stdio};
use std::io::{Write, BufWriter};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::info;

/// Horizontal and vertical markers drawn over the payoff line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotMarkers {
    pub strike: f64,
    pub breakeven: f64,
    pub price: f64,
}

pub fn write_payoff_dat(curve: &PayoffCurve, dat_name: &Path) -> Result<()> {
    let datfile = File::create(dat_name)
        .with_context(|| format!("\nwrite_payoff_dat() :: ERROR -> Failed to create {}", dat_name.display()))?;
    let mut writer = BufWriter::new(datfile);
    for (spot, payoff) in curve.spots.iter().zip(curve.payoffs.iter()) {
        writeln!(writer, "{} {}", spot, payoff)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn payoff_script(curve: &PayoffCurve, markers: &PlotMarkers, dat_name: &Path, png_name: &Path) -> String {
    format!(
        r#"
        set terminal png size 900,600
        set output '{png}'
        set xlabel "Stock Price"
        set ylabel "Payoff"
        set title "Option Payoff"
        set grid
        set key top left
        set arrow from {k},graph 0 to {k},graph 1 nohead dashtype 2 linewidth 0.8 linecolor rgb "red"
        set arrow from {be},graph 0 to {be},graph 1 nohead dashtype 2 linewidth 0.8 linecolor rgb "green"
        plot '{dat}' using 1:2 with lines linewidth 1.5 title '{label}', \
             NaN with lines dashtype 2 linecolor rgb "red" title 'Strike Price', \
             NaN with lines dashtype 2 linecolor rgb "green" title 'Breakeven Point', \
             {price} with lines linewidth 0.8 linecolor rgb "black" notitle
        "#,
        png = png_name.display(),
        k = markers.strike,
        be = markers.breakeven,
        dat = dat_name.display(),
        label = curve.label,
        price = markers.price,
    )
}

/// Renders the payoff chart to `<plot_dir>/payoff_<stamp>.png` through gnuplot.
pub fn generate_payoff_plot(curve: &PayoffCurve, markers: &PlotMarkers, plot_dir: &str, stamp: &str) -> Result<PathBuf> {
    let dir = Path::new(plot_dir);
    let dat_name = dir.join(format!("payoff_{}.dat", stamp));
    let png_name = dir.join(format!("payoff_{}.png", stamp));
    write_payoff_dat(curve, &dat_name)?;
    let gnuplot_script = payoff_script(curve, markers, &dat_name, &png_name);
    let mut cmd_gnuplot = Command::new("gnuplot")
        .stdin(Stdio::piped())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .context("\ngenerate_payoff_plot() :: ERROR -> Failed to execute cmd_gnuplot payoff chart command")?;
    let stdin = cmd_gnuplot.stdin.as_mut().context("\ngenerate_payoff_plot() :: ERROR -> Failed to open stdin for gnuplot_script")?;
    writeln!(stdin, "{}", gnuplot_script).context("\ngenerate_payoff_plot() :: ERROR -> Failed to write gnuplot_script to stdin for payoff chart")?;
    let status = cmd_gnuplot.wait().context("\ngenerate_payoff_plot() :: ERROR -> Failed to wait for gnuplot payoff chart process")?;
    if !status.success() {
        anyhow::bail!("\ngenerate_payoff_plot() :: ERROR -> gnuplot exited with {}", status);
    }
    info!(png = %png_name.display(), "generate_payoff_plot() :: Successfully generated payoff chart");
    Ok(png_name)
}
