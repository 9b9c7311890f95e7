use std::path::Path;
use std::fs;
use std::io;
use tracing::debug;

pub fn create_directory_if_dne(dir_name: &str) -> io::Result<()> {
    let dir = Path::new(dir_name);
    if !dir.exists() {
        debug!(dir = dir_name, "create_directory_if_dne() :: Creating directory");
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

// Evenly spaced points over [start, stop], both ends included
pub fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            (0..num)
                .map(|i| if i == num - 1 { stop } else { start + step * i as f64 })
                .collect()
        }
    }
}

pub fn round_to(x: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (x * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn linspace_includes_both_ends() {
        let pts = linspace(80.0, 120.0, 100);
        assert_eq!(pts.len(), 100);
        assert_eq!(pts[0], 80.0);
        assert_eq!(pts[99], 120.0);
        assert_abs_diff_eq!(pts[1] - pts[0], 40.0 / 99.0, epsilon = 1e-12);
    }

    #[test]
    fn linspace_degenerate_counts() {
        assert!(linspace(1.0, 2.0, 0).is_empty());
        assert_eq!(linspace(1.0, 2.0, 1), vec![1.0]);
    }

    #[test]
    fn round_to_decimals() {
        assert_eq!(round_to(10.450583, 2), 10.45);
        assert_eq!(round_to(10.450583, 4), 10.4506);
        assert_eq!(round_to(-2.555, 0), -3.0);
    }

    #[test]
    fn creates_missing_directory() {
        let dir = std::env::temp_dir().join(format!("optcalc_utils_{}", std::process::id()));
        let name = dir.to_string_lossy().to_string();
        create_directory_if_dne(&name).unwrap();
        assert!(dir.is_dir());
        create_directory_if_dne(&name).unwrap();
        fs::remove_dir_all(&dir).unwrap();
    }
}
