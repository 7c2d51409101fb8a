use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{EcoWattError, Result};
use crate::tariff::FlatTariff;

/// Top-level configuration for the EcoWatt application.
///
/// Loaded from `~/.ecowatt/config.toml` by default. Every section falls back
/// to its defaults when absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EcoWattConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub tariff: TariffConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub signal: SignalConfig,
}

impl EcoWattConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed, or if a value
    /// is out of range.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: EcoWattConfig = toml::from_str(&content)?;
        config.validate()?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    ///
    /// A missing file is the normal first-run case and is only noted at info
    /// level. Any other failure warns.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(EcoWattError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No config file at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Reject values the rest of the system cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !self.tariff.rate_per_kwh.is_finite() || self.tariff.rate_per_kwh < 0.0 {
            return Err(EcoWattError::Config(format!(
                "tariff.rate_per_kwh must be a non-negative number, got {}",
                self.tariff.rate_per_kwh
            )));
        }
        if !self.dashboard.monthly_budget.is_finite() || self.dashboard.monthly_budget <= 0.0 {
            return Err(EcoWattError::Config(format!(
                "dashboard.monthly_budget must be positive, got {}",
                self.dashboard.monthly_budget
            )));
        }
        if self.dashboard.refresh_interval_secs == 0 {
            return Err(EcoWattError::Config(
                "dashboard.refresh_interval_secs must be at least 1".to_string(),
            ));
        }
        if self.chat.max_message_length == 0 {
            return Err(EcoWattError::Config(
                "chat.max_message_length must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Electricity pricing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TariffConfig {
    /// Flat price per kWh in local currency.
    pub rate_per_kwh: f64,
    /// Currency label used in rendered text.
    pub currency: String,
}

impl Default for TariffConfig {
    fn default() -> Self {
        Self {
            rate_per_kwh: 80.0,
            currency: "FCFA".to_string(),
        }
    }
}

impl TariffConfig {
    pub fn flat_tariff(&self) -> FlatTariff {
        FlatTariff::new(self.rate_per_kwh)
    }
}

/// Dashboard refresh and budget settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Seconds between two regenerations of the consumption series.
    pub refresh_interval_secs: u64,
    /// Monthly budget in local currency.
    pub monthly_budget: f64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 30,
            monthly_budget: 50_000.0,
        }
    }
}

impl DashboardConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}

/// Chat assistant settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Simulated "typing" delay before the assistant answers.
    pub typing_delay_ms: u64,
    /// Maximum user message length in characters.
    pub max_message_length: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            typing_delay_ms: 1500,
            max_message_length: 2000,
        }
    }
}

impl ChatConfig {
    pub fn typing_delay(&self) -> Duration {
        Duration::from_millis(self.typing_delay_ms)
    }
}

/// Synthetic signal settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    /// Fixed RNG seed. When unset, every regeneration draws fresh noise.
    pub seed: Option<u64>,
}
