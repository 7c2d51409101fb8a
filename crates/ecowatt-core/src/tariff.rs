//! Flat-rate tariff and the bill calculator.
//!
//! A single flat price per kWh is used everywhere: for the cost attached to
//! synthesized samples, for the dashboard budget, and for monthly bill
//! predictions.

use serde::{Deserialize, Serialize};

/// Default flat price in FCFA per kWh.
pub const DEFAULT_RATE_PER_KWH: f64 = 80.0;

/// Default number of billed days in a month.
pub const DEFAULT_DAYS_IN_MONTH: f64 = 30.0;

/// Candidate rates shown by the tariff simulator.
pub const SIMULATED_RATES: [f64; 4] = [70.0, 80.0, 90.0, 100.0];

// =============================================================================
// FlatTariff
// =============================================================================

/// One price per kWh, independent of volume or time of day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlatTariff {
    pub rate_per_kwh: f64,
}

impl Default for FlatTariff {
    fn default() -> Self {
        Self::new(DEFAULT_RATE_PER_KWH)
    }
}

impl FlatTariff {
    pub fn new(rate_per_kwh: f64) -> Self {
        Self { rate_per_kwh }
    }

    /// Price applied to one hourly watt sample (`rate / 1000`).
    pub fn per_watt_sample(&self) -> f64 {
        self.rate_per_kwh / 1000.0
    }

    /// Rounded cost of a watt reading, never negative.
    pub fn cost_of_watts(&self, watts: f64) -> u32 {
        (watts * self.per_watt_sample()).round().max(0.0) as u32
    }
}

// =============================================================================
// Bill calculator
// =============================================================================

/// Calculator form values after lenient parsing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BillInputs {
    pub daily_kwh: f64,
    pub rate_per_kwh: f64,
    pub days_in_month: f64,
}

/// Monthly projection for a daily consumption.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BillPrediction {
    pub monthly_consumption_kwh: f64,
    pub monthly_bill: f64,
    pub daily_cost: f64,
}

/// Difference between the current bill and the predicted one.
///
/// A positive `amount` is a saving, a negative one an extra cost.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Savings {
    pub amount: f64,
    pub percent: f64,
}

impl Savings {
    pub fn is_saving(&self) -> bool {
        self.amount > 0.0
    }
}

/// Predicted monthly bill at one candidate rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateSimulation {
    pub rate_per_kwh: f64,
    pub monthly_bill: f64,
}

impl BillInputs {
    pub fn new(daily_kwh: f64, rate_per_kwh: f64, days_in_month: f64) -> Self {
        Self {
            daily_kwh,
            rate_per_kwh,
            days_in_month,
        }
    }

    /// Build inputs from raw form text.
    ///
    /// Empty, unparsable, zero and non-finite fields fall back to their
    /// defaults (0 kWh, 80 per kWh, 30 days).
    pub fn from_form(daily: &str, rate: &str, days: &str) -> Self {
        Self {
            daily_kwh: parse_or(daily, 0.0),
            rate_per_kwh: parse_or(rate, DEFAULT_RATE_PER_KWH),
            days_in_month: parse_or(days, DEFAULT_DAYS_IN_MONTH),
        }
    }

    pub fn predict(&self) -> BillPrediction {
        let monthly_consumption_kwh = self.daily_kwh * self.days_in_month;
        BillPrediction {
            monthly_consumption_kwh,
            monthly_bill: monthly_consumption_kwh * self.rate_per_kwh,
            daily_cost: self.daily_kwh * self.rate_per_kwh,
        }
    }

    /// Compare a current bill against the prediction.
    pub fn savings(&self, current_bill: f64) -> Savings {
        let amount = current_bill - self.predict().monthly_bill;
        let percent = if current_bill > 0.0 {
            amount / current_bill * 100.0
        } else {
            0.0
        };
        Savings { amount, percent }
    }

    /// Predicted bill for each candidate rate, same consumption.
    pub fn simulate_rates(&self, rates: &[f64]) -> Vec<RateSimulation> {
        let monthly = self.predict().monthly_consumption_kwh;
        rates
            .iter()
            .map(|&rate_per_kwh| RateSimulation {
                rate_per_kwh,
                monthly_bill: monthly * rate_per_kwh,
            })
            .collect()
    }
}

fn parse_or(raw: &str, default: f64) -> f64 {
    match raw.trim().replace(',', ".").parse::<f64>() {
        Ok(v) if v.is_finite() && v != 0.0 => v,
        _ => default,
    }
}

// =============================================================================
// Tips
// =============================================================================

/// A fixed energy-saving tip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnergyTip {
    pub title: &'static str,
    pub description: &'static str,
    pub potential: &'static str,
    pub icon: &'static str,
}

pub const ENERGY_TIPS: [EnergyTip; 4] = [
    EnergyTip {
        title: "Climatisation efficace",
        description: "Réglez à 25°C au lieu de 18°C",
        potential: "30-40%",
        icon: "❄️",
    },
    EnergyTip {
        title: "Éclairage LED",
        description: "Remplacez les ampoules classiques",
        potential: "80%",
        icon: "💡",
    },
    EnergyTip {
        title: "Veille des appareils",
        description: "Débranchez les appareils non utilisés",
        potential: "10-15%",
        icon: "🔌",
    },
    EnergyTip {
        title: "Réfrigérateur optimisé",
        description: "Maintenez à 4°C (réfrigérateur) et -18°C (congélateur)",
        potential: "15-20%",
        icon: "🧊",
    },
];
