use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "timecard")]
#[command(about = "Render a live dstat-style table of sample metrics", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to <config dir>/timecard/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Append committed lines to this CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Delay between ticks in milliseconds
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Commit every N-th tick
    #[arg(long)]
    pub commit_every: Option<u32>,

    /// Stop after N ticks instead of running until interrupted
    #[arg(long)]
    pub ticks: Option<u64>,

    /// Show the date next to the time column
    #[arg(long)]
    pub show_date: bool,

    /// Timing threshold in seconds (repeatable)
    #[arg(long = "limit")]
    pub limits: Vec<f64>,

    #[arg(long)]
    pub color: Option<ColorMode>,

    #[arg(long, default_value = "warn")]
    pub log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[value(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorMode::Auto => write!(f, "auto"),
            ColorMode::Always => write!(f, "always"),
            ColorMode::Never => write!(f, "never"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_repeated_limits() {
        let cli = Cli::parse_from(["timecard", "--limit", "0.5", "--limit", "1", "--ticks", "3"]);
        assert_eq!(cli.limits, vec![0.5, 1.0]);
        assert_eq!(cli.ticks, Some(3));
        assert_eq!(cli.log_level, LogLevel::Warn);
        assert_eq!(cli.color, None);
    }

    #[test]
    fn test_parse_color_mode() {
        let cli = Cli::parse_from(["timecard", "--color", "never"]);
        assert_eq!(cli.color, Some(ColorMode::Never));
    }
}
