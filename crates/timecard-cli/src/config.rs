use crate::args::{Cli, ColorMode};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use timecard_core::Palette;

/// Settings for the sample table, read from `config.toml` and overridden by
/// command-line flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub interval_ms: u64,
    pub commit_every: u32,
    pub csv: Option<PathBuf>,
    pub show_date: bool,
    pub limits: Vec<f64>,
    pub color: ColorMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            commit_every: 5,
            csv: None,
            show_date: false,
            limits: vec![0.2, 0.5, 1.0],
            color: ColorMode::Auto,
        }
    }
}

impl Config {
    /// Reads `path`; a missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("timecard").join("config.toml"))
    }

    /// Loads the config named on the command line (or the default location)
    /// and applies the flag overrides.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let mut config = match cli.config.as_deref() {
            Some(path) => Self::load_from(path)?,
            None => match Self::default_path() {
                Some(path) => Self::load_from(&path)?,
                None => Self::default(),
            },
        };
        config.apply(cli);
        Ok(config)
    }

    fn apply(&mut self, cli: &Cli) {
        if let Some(csv) = &cli.csv {
            self.csv = Some(csv.clone());
        }
        if let Some(interval_ms) = cli.interval_ms {
            self.interval_ms = interval_ms;
        }
        if let Some(commit_every) = cli.commit_every {
            self.commit_every = commit_every;
        }
        if cli.show_date {
            self.show_date = true;
        }
        if !cli.limits.is_empty() {
            self.limits = cli.limits.clone();
        }
        if let Some(color) = cli.color {
            self.color = color;
        }
        self.commit_every = self.commit_every.max(1);
    }

    pub fn palette(&self) -> Palette {
        match self.color {
            ColorMode::Auto => Palette::detect(),
            ColorMode::Always => Palette::colored(),
            ColorMode::Never => Palette::plain(),
        }
    }
}
