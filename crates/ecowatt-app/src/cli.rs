//! CLI argument definitions for the EcoWatt application.
//!
//! Uses `clap` with derive macros for ergonomic argument parsing.
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// EcoWatt: household energy monitoring with a built-in energy assistant.
#[derive(Parser, Debug)]
#[command(name = "ecowatt", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level", global = true)]
    pub log_level: Option<String>,

    /// Seed for the synthetic consumption series.
    #[arg(short = 's', long = "seed", global = true)]
    pub seed: Option<u64>,

    /// Print machine-readable JSON instead of text.
    #[arg(long = "json", global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Print the last 24 hours of synthetic consumption.
    Series,
    /// Ask the energy assistant one question.
    Ask {
        /// The question, in French.
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
        /// Answer without the simulated typing delay.
        #[arg(long = "no-delay")]
        no_delay: bool,
    },
    /// List devices grouped by room.
    Devices {
        /// Only show devices whose name or room contains this text.
        #[arg(long = "search")]
        search: Option<String>,
    },
    /// Predict a monthly bill.
    Bill {
        /// Average daily consumption in kWh.
        #[arg(long = "daily")]
        daily: String,
        /// Price per kWh. Defaults to the configured tariff.
        #[arg(long = "rate")]
        rate: Option<String>,
        /// Days in the billing month.
        #[arg(long = "days", default_value = "30")]
        days: String,
        /// Current monthly bill, to compute savings against.
        #[arg(long = "current")]
        current: Option<f64>,
    },
    /// Show community outage reports.
    Outages,
    /// Show the home dashboard figures.
    Dashboard,
    /// Regenerate the series on the configured cadence.
    Watch {
        /// Number of refreshes before exiting.
        #[arg(long = "ticks", default_value_t = 3)]
        ticks: usize,
    },
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > ECOWATT_CONFIG env var > platform default (~/.ecowatt/config.toml).
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("ECOWATT_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the tracing filter directive.
    ///
    /// Priority: --log-level flag > RUST_LOG env var > config file value > "info".
    pub fn resolve_log_filter(&self, config_level: Option<&str>) -> String {
        if let Some(ref level) = self.log_level {
            return level.clone();
        }
        if let Ok(filter) = std::env::var("RUST_LOG") {
            if !filter.trim().is_empty() {
                return filter;
            }
        }
        config_level
            .filter(|l| !l.trim().is_empty())
            .unwrap_or("info")
            .to_string()
    }

    /// Resolve the series seed.
    ///
    /// Priority: --seed flag > ECOWATT_SEED env var > config file value.
    /// Returns `None` for fresh noise on every generation.
    pub fn resolve_seed(&self, config_seed: Option<u64>) -> Option<u64> {
        if self.seed.is_some() {
            return self.seed;
        }
        if let Ok(val) = std::env::var("ECOWATT_SEED") {
            if let Ok(seed) = val.parse::<u64>() {
                return Some(seed);
            }
        }
        config_seed
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".ecowatt").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".ecowatt").join("config.toml");
    }
    PathBuf::from("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_parse_series_with_globals() {
        let args = parse(&["ecowatt", "--seed", "7", "--json", "series"]);
        assert_eq!(args.command, Command::Series);
        assert_eq!(args.seed, Some(7));
        assert!(args.json);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = parse(&["ecowatt", "dashboard", "-l", "debug"]);
        assert_eq!(args.command, Command::Dashboard);
        assert_eq!(args.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_parse_ask_joins_words() {
        let args = parse(&["ecowatt", "ask", "Quels", "appareils", "?", "--no-delay"]);
        match args.command {
            Command::Ask { text, no_delay } => {
                assert_eq!(text.join(" "), "Quels appareils ?");
                assert!(no_delay);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_ask_requires_text() {
        assert!(CliArgs::try_parse_from(["ecowatt", "ask"]).is_err());
    }

    #[test]
    fn test_parse_bill_defaults() {
        let args = parse(&["ecowatt", "bill", "--daily", "12,5"]);
        assert_eq!(
            args.command,
            Command::Bill {
                daily: "12,5".to_string(),
                rate: None,
                days: "30".to_string(),
                current: None,
            }
        );
    }

    #[test]
    fn test_parse_devices_and_watch() {
        let args = parse(&["ecowatt", "devices", "--search", "salon"]);
        assert_eq!(
            args.command,
            Command::Devices {
                search: Some("salon".to_string())
            }
        );

        let args = parse(&["ecowatt", "watch"]);
        assert_eq!(args.command, Command::Watch { ticks: 3 });
        let args = parse(&["ecowatt", "watch", "--ticks", "10"]);
        assert_eq!(args.command, Command::Watch { ticks: 10 });
    }

    #[test]
    fn test_config_flag_wins() {
        let args = parse(&["ecowatt", "--config", "/tmp/eco.toml", "outages"]);
        assert_eq!(args.resolve_config_path(), PathBuf::from("/tmp/eco.toml"));
    }

    #[test]
    fn test_log_level_flag_wins() {
        let args = parse(&["ecowatt", "--log-level", "warn", "series"]);
        assert_eq!(args.resolve_log_filter(Some("trace")), "warn");
    }

    #[test]
    fn test_seed_flag_wins() {
        let args = parse(&["ecowatt", "--seed", "1", "series"]);
        assert_eq!(args.resolve_seed(Some(99)), Some(1));
    }
}
