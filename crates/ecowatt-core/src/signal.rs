//! Synthetic daily consumption signal.
//!
//! Produces a 24-point hourly series shaped like a daily usage cycle: one
//! sine period over the day around an 800 W baseline, plus uniform noise.

use std::f64::consts::PI;

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::tariff::FlatTariff;
use crate::types::EnergySample;

/// Number of hourly samples in a daily series.
pub const SAMPLES_PER_DAY: usize = 24;

/// Lowest consumption a sample can report, in watts.
pub const MIN_CONSUMPTION_WATTS: f64 = 200.0;

const BASELINE_WATTS: f64 = 800.0;
const AMPLITUDE_WATTS: f64 = 500.0;
const NOISE_WATTS: f64 = 300.0;

/// Generates synthetic consumption series with a fixed linear tariff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalSynthesizer {
    tariff_per_unit: f64,
}

impl Default for SignalSynthesizer {
    fn default() -> Self {
        Self::from_tariff(&FlatTariff::default())
    }
}

impl SignalSynthesizer {
    /// Create a synthesizer charging `tariff_per_unit` per watt sample.
    /// Negative tariffs are treated as zero.
    pub fn new(tariff_per_unit: f64) -> Self {
        Self {
            tariff_per_unit: tariff_per_unit.max(0.0),
        }
    }

    pub fn from_tariff(tariff: &FlatTariff) -> Self {
        Self::new(tariff.per_watt_sample())
    }

    pub fn tariff_per_unit(&self) -> f64 {
        self.tariff_per_unit
    }

    /// Generate the 24 hourly samples ending at `now`, oldest first.
    ///
    /// Sample `k` sits `23 - k` hours before `now`. Noise is drawn from `rng`,
    /// so a seeded generator yields a reproducible series.
    /// Timestamps that would fall before the earliest representable instant
    /// saturate at [`DateTime::<Utc>::MIN_UTC`].
    pub fn generate_daily_series<R: Rng>(
        &self,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Vec<EnergySample> {
        let mut series = Vec::with_capacity(SAMPLES_PER_DAY);

        for hours_ago in (0..SAMPLES_PER_DAY).rev() {
            let timestamp = now
                .checked_sub_signed(Duration::hours(hours_ago as i64))
                .unwrap_or(DateTime::<Utc>::MIN_UTC);
            let hour_position = (SAMPLES_PER_DAY - hours_ago) as f64;
            let base =
                (hour_position / SAMPLES_PER_DAY as f64 * 2.0 * PI).sin() * AMPLITUDE_WATTS
                    + BASELINE_WATTS;
            let noise: f64 = rng.random_range(0.0..NOISE_WATTS);
            let consumption = (base + noise).max(MIN_CONSUMPTION_WATTS).round();

            series.push(EnergySample {
                id: hours_ago.to_string(),
                timestamp,
                consumption_watts: consumption as u32,
                cost: (consumption * self.tariff_per_unit).round() as u32,
            });
        }

        debug!(
            samples = series.len(),
            end = %now,
            "Daily consumption series generated"
        );
        series
    }

    /// Generate a reproducible series from a fixed seed.
    pub fn generate_seeded(&self, now: DateTime<Utc>, seed: u64) -> Vec<EnergySample> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.generate_daily_series(now, &mut rng)
    }
}

// =============================================================================
// SeriesStats
// =============================================================================

/// Aggregates over a consumption series, used by dashboard widgets and charts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesStats {
    pub min_watts: u32,
    pub max_watts: u32,
    pub total_watts: u64,
    pub total_cost: u64,
}

impl SeriesStats {
    /// Compute stats over `samples`. Returns `None` for an empty series.
    pub fn from_samples(samples: &[EnergySample]) -> Option<Self> {
        let min_watts = samples.iter().map(|s| s.consumption_watts).min()?;
        let max_watts = samples.iter().map(|s| s.consumption_watts).max()?;
        Some(Self {
            min_watts,
            max_watts,
            total_watts: samples.iter().map(|s| u64::from(s.consumption_watts)).sum(),
            total_cost: samples.iter().map(|s| u64::from(s.cost)).sum(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_series_has_24_samples_ending_now() {
        let series = SignalSynthesizer::default().generate_seeded(fixed_now(), 1);
        assert_eq!(series.len(), SAMPLES_PER_DAY);
        assert_eq!(series.last().unwrap().timestamp, fixed_now());
        assert_eq!(
            series.first().unwrap().timestamp,
            fixed_now() - Duration::hours(23)
        );
    }

    #[test]
    fn test_sample_ids_count_hours_ago() {
        let series = SignalSynthesizer::default().generate_seeded(fixed_now(), 1);
        assert_eq!(series[0].id, "23");
        assert_eq!(series[23].id, "0");
    }

    #[test]
    fn test_same_seed_same_series() {
        let synth = SignalSynthesizer::default();
        assert_eq!(
            synth.generate_seeded(fixed_now(), 99),
            synth.generate_seeded(fixed_now(), 99)
        );
    }

    #[test]
    fn test_different_seeds_differ() {
        let synth = SignalSynthesizer::default();
        assert_ne!(
            synth.generate_seeded(fixed_now(), 1),
            synth.generate_seeded(fixed_now(), 2)
        );
    }

    #[test]
    fn test_values_follow_the_daily_curve() {
        // Noise is in [0, 300), so each sample lies within [base, base + 300].
        let series = SignalSynthesizer::default().generate_seeded(fixed_now(), 5);
        for (k, sample) in series.iter().enumerate() {
            let hours_ago = 23 - k;
            let position = (24 - hours_ago) as f64;
            let base = (position / 24.0 * 2.0 * PI).sin() * 500.0 + 800.0;
            let lower = base.max(MIN_CONSUMPTION_WATTS).round() as u32;
            let upper = (base + 300.0).max(MIN_CONSUMPTION_WATTS).round() as u32;
            assert!(
                sample.consumption_watts >= lower && sample.consumption_watts <= upper,
                "sample {} = {} outside [{}, {}]",
                k,
                sample.consumption_watts,
                lower,
                upper
            );
        }
    }

    #[test]
    fn test_zero_tariff_zero_cost() {
        let series = SignalSynthesizer::new(0.0).generate_seeded(fixed_now(), 3);
        assert!(series.iter().all(|s| s.cost == 0));
    }

    #[test]
    fn test_negative_tariff_is_clamped() {
        let synth = SignalSynthesizer::new(-1.0);
        assert_eq!(synth.tariff_per_unit(), 0.0);
    }

    #[test]
    fn test_series_stats() {
        let series = SignalSynthesizer::default().generate_seeded(fixed_now(), 11);
        let stats = SeriesStats::from_samples(&series).unwrap();
        assert!(stats.min_watts <= stats.max_watts);
        assert!(stats.min_watts >= 200);
        assert_eq!(
            stats.total_watts,
            series.iter().map(|s| s.consumption_watts as u64).sum::<u64>()
        );
        assert_eq!(
            stats.total_cost,
            series.iter().map(|s| s.cost as u64).sum::<u64>()
        );
    }

    #[test]
    fn test_earliest_instant_saturates() {
        let now = DateTime::<Utc>::MIN_UTC;
        let series = SignalSynthesizer::default().generate_seeded(now, 1);
        assert_eq!(series.len(), SAMPLES_PER_DAY);
        assert!(series.iter().all(|s| s.timestamp == now));
        assert!(series.iter().all(|s| s.consumption_watts >= 200));
    }

    #[test]
    fn test_near_earliest_instant_keeps_later_hours() {
        let now = DateTime::<Utc>::MIN_UTC + Duration::hours(5);
        let series = SignalSynthesizer::default().generate_seeded(now, 1);
        assert_eq!(series[0].timestamp, DateTime::<Utc>::MIN_UTC);
        assert_eq!(series[18].timestamp, DateTime::<Utc>::MIN_UTC);
        assert_eq!(series[19].timestamp, now - Duration::hours(4));
        assert_eq!(series[23].timestamp, now);
    }

    #[test]
    fn test_latest_instant() {
        let now = DateTime::<Utc>::MAX_UTC;
        let series = SignalSynthesizer::default().generate_seeded(now, 1);
        assert_eq!(series[0].timestamp, now - Duration::hours(23));
        assert_eq!(series[23].timestamp, now);
    }

    #[test]
    fn test_series_stats_empty() {
        assert!(SeriesStats::from_samples(&[]).is_none());
    }

    proptest! {
        #[test]
        fn prop_series_shape(seed in any::<u64>(), secs in 0i64..4_000_000_000) {
            let now = Utc.timestamp_opt(secs, 0).unwrap();
            let series = SignalSynthesizer::default().generate_seeded(now, seed);

            prop_assert_eq!(series.len(), 24);
            prop_assert_eq!(series[23].timestamp, now);
            for pair in series.windows(2) {
                prop_assert_eq!(pair[1].timestamp - pair[0].timestamp, Duration::hours(1));
            }
        }

        #[test]
        fn prop_floor_and_cost(seed in any::<u64>(), tariff in 0.0f64..1.0) {
            let synth = SignalSynthesizer::new(tariff);
            let series = synth.generate_seeded(fixed_now(), seed);

            for sample in &series {
                prop_assert!(sample.consumption_watts >= 200);
                let expected = (sample.consumption_watts as f64 * tariff).round() as u32;
                prop_assert_eq!(sample.cost, expected);
            }
        }
    }
}
