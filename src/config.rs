use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

pub const CONFIG_ENV: &str = "OPTCALC_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "optcalc.json";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Largest CRR step count; the tree is priced for every count from 2 up to this.
    pub max_binomial_steps: usize,
    pub grid_points: usize,
    /// Grid bounds as fractions of spot.
    pub grid_low: f64,
    pub grid_high: f64,
    pub plot: bool,
    pub plot_dir: String,
    pub export_csv: bool,
    pub csv_dir: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_binomial_steps: 74,
            grid_points: 100,
            grid_low: 0.8,
            grid_high: 1.2,
            plot: true,
            plot_dir: "img_out".to_string(),
            export_csv: true,
            csv_dir: "csv_out".to_string(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if self.max_binomial_steps < 2 {
            bail!("max_binomial_steps must be at least 2, got {}", self.max_binomial_steps);
        }
        if self.grid_points < 2 {
            bail!("grid_points must be at least 2, got {}", self.grid_points);
        }
        if !(self.grid_low < self.grid_high) {
            bail!("grid_low ({}) must be below grid_high ({})", self.grid_low, self.grid_high);
        }
        Ok(())
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(text).context("Failed to parse settings JSON")?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Invalid settings in {}", path.display()))
    }

    /// `$OPTCALC_CONFIG` if set, otherwise `optcalc.json` when present, otherwise defaults.
    pub fn load() -> Result<Self> {
        let explicit = std::env::var(CONFIG_ENV).ok();
        let path = explicit.clone().unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
        let path = Path::new(&path);
        if explicit.is_none() && !path.exists() {
            debug!("Settings::load() :: No {} found; using defaults", DEFAULT_CONFIG_PATH);
            return Ok(Self::default());
        }
        let settings = Self::from_file(path)?;
        info!(path = %path.display(), "Settings::load() :: Loaded settings");
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let s = Settings::from_json(r#"{ "max_binomial_steps": 200, "plot": false }"#).unwrap();
        assert_eq!(s.max_binomial_steps, 200);
        assert!(!s.plot);
        assert_eq!(s.grid_points, 100);
        assert_eq!(s.csv_dir, "csv_out");
    }

    #[test]
    fn rejects_bad_values() {
        assert!(Settings::from_json(r#"{ "max_binomial_steps": 1 }"#).is_err());
        assert!(Settings::from_json(r#"{ "grid_points": 0 }"#).is_err());
        assert!(Settings::from_json(r#"{ "grid_low": 1.2, "grid_high": 0.8 }"#).is_err());
        assert!(Settings::from_json("not json").is_err());
    }

    #[test]
    fn reads_settings_file() {
        let path = std::env::temp_dir().join(format!("optcalc_settings_{}.json", std::process::id()));
        fs::write(&path, serde_json::to_string(&Settings { grid_points: 11, ..Settings::default() }).unwrap()).unwrap();
        let s = Settings::from_file(&path).unwrap();
        assert_eq!(s.grid_points, 11);
        fs::remove_file(&path).unwrap();
        assert!(Settings::from_file(&path).is_err());
    }
}
