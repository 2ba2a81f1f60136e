//! Daily revenue and conversion-rate trend generation.

use chrono::{Datelike, Duration, NaiveDate, Utc, Weekday};
use rand::Rng;
use serde::{Deserialize, Serialize};
use storepulse_core::config::AnalyticsConfig;
use storepulse_core::{PulseError, PulseResult};

/// One calendar day of store activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub revenue: f64,
    pub orders: u64,
    pub visitors: u64,
}

/// Produces daily revenue and conversion-rate sequences for a store.
///
/// Revenue follows a weekly seasonality pattern (weekend uplift) with
/// bounded uniform noise and a slight linear growth over the window.
/// Order and visitor counts are derived from revenue via the configured
/// average order value and baseline conversion rate.
pub struct TrendGenerator {
    cfg: AnalyticsConfig,
}

impl TrendGenerator {
    pub fn new(cfg: AnalyticsConfig) -> Self {
        Self { cfg }
    }

    /// Generate `days` points of daily revenue, oldest first, ending today.
    pub fn revenue_trend<R: Rng>(&self, rng: &mut R, days: u32) -> PulseResult<Vec<TrendPoint>> {
        self.revenue_trend_ending(rng, Utc::now().date_naive(), days)
    }

    /// Generate `days` points ending on `last_day`. Split out so tests can
    /// pin the calendar window.
    pub fn revenue_trend_ending<R: Rng>(
        &self,
        rng: &mut R,
        last_day: NaiveDate,
        days: u32,
    ) -> PulseResult<Vec<TrendPoint>> {
        if days == 0 {
            return Err(PulseError::InvalidArgument(
                "day count must be positive".to_string(),
            ));
        }

        let mut trend = Vec::with_capacity(days as usize);
        for i in 0..days {
            let date = last_day - Duration::days(i64::from(days - i - 1));
            let weekend_boost = if is_weekend(date) {
                self.cfg.weekend_multiplier
            } else {
                1.0
            };
            let random_factor = rng.gen_range(0.85..=1.15);
            let growth_factor = 1.0 + f64::from(i) * self.cfg.daily_growth_rate;

            let revenue = round2(
                self.cfg.base_daily_revenue * weekend_boost * random_factor * growth_factor,
            );
            let orders = (revenue / self.cfg.average_order_value).floor() as u64;
            let visitors = (orders as f64 / self.cfg.baseline_conversion_rate).floor() as u64;

            trend.push(TrendPoint {
                date,
                revenue,
                orders,
                visitors,
            });
        }

        Ok(trend)
    }

    /// Generate a conversion-rate series as a bounded random walk.
    ///
    /// Starts at 5.0%, each step adds a uniform delta in [-0.15, +0.20]
    /// and is clamped to the configured floor/ceiling. The clamp is what
    /// keeps day-to-day noise from drifting into implausible territory.
    pub fn conversion_trend<R: Rng>(&self, rng: &mut R, days: u32) -> PulseResult<Vec<f64>> {
        if days == 0 {
            return Err(PulseError::InvalidArgument(
                "day count must be positive".to_string(),
            ));
        }

        let mut rate = 5.0f64;
        let mut trend = Vec::with_capacity(days as usize);
        for _ in 0..days {
            let change = rng.gen_range(-0.15..=0.20);
            rate = (rate + change).clamp(self.cfg.walk_floor, self.cfg.walk_ceiling);
            trend.push(round2(rate));
        }

        Ok(trend)
    }
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use storepulse_core::config::AnalyticsConfig;

    fn generator() -> TrendGenerator {
        TrendGenerator::new(AnalyticsConfig::default())
    }

    // 1. Revenue trend shape ------------------------------------------------

    #[test]
    fn test_revenue_trend_length_and_order() {
        let mut rng = StdRng::seed_from_u64(7);
        let last = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let trend = generator().revenue_trend_ending(&mut rng, last, 30).unwrap();

        assert_eq!(trend.len(), 30);
        assert_eq!(trend.last().unwrap().date, last);
        for pair in trend.windows(2) {
            assert_eq!(pair[1].date - pair[0].date, Duration::days(1));
        }
    }

    #[test]
    fn test_revenue_trend_derived_counts() {
        let mut rng = StdRng::seed_from_u64(42);
        let last = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let trend = generator().revenue_trend_ending(&mut rng, last, 90).unwrap();

        for point in &trend {
            assert_eq!(point.orders, (point.revenue / 78.0).floor() as u64);
            assert_eq!(
                point.visitors,
                (point.orders as f64 / 0.0546).floor() as u64
            );
            // Revenue carries at most two decimals.
            assert!((point.revenue - round2(point.revenue)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_revenue_trend_weekend_uplift_bounds() {
        let mut rng = StdRng::seed_from_u64(3);
        let last = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let trend = generator().revenue_trend_ending(&mut rng, last, 365).unwrap();

        for (i, point) in trend.iter().enumerate() {
            let growth = 1.0 + i as f64 * 0.002;
            let weekend = if is_weekend(point.date) { 1.3 } else { 1.0 };
            let lo = 6000.0 * weekend * 0.85 * growth;
            let hi = 6000.0 * weekend * 1.15 * growth;
            assert!(point.revenue >= lo - 0.01 && point.revenue <= hi + 0.01);
        }
    }

    #[test]
    fn test_revenue_trend_rejects_zero_days() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = generator().revenue_trend(&mut rng, 0).unwrap_err();
        assert!(matches!(
            err,
            storepulse_core::PulseError::InvalidArgument(_)
        ));
    }

    #[test]
    fn test_revenue_trend_seeded_determinism() {
        let last = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let mut a = StdRng::seed_from_u64(11);
        let mut b = StdRng::seed_from_u64(11);
        let ta = generator().revenue_trend_ending(&mut a, last, 14).unwrap();
        let tb = generator().revenue_trend_ending(&mut b, last, 14).unwrap();
        for (x, y) in ta.iter().zip(&tb) {
            assert_eq!(x.revenue, y.revenue);
        }
    }

    // 2. Conversion-rate walk -----------------------------------------------

    #[test]
    fn test_conversion_trend_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(99);
        let trend = generator().conversion_trend(&mut rng, 365).unwrap();

        assert_eq!(trend.len(), 365);
        for rate in trend {
            assert!((4.0..=6.5).contains(&rate), "rate {rate} escaped clamp");
        }
    }

    #[test]
    fn test_conversion_trend_step_size() {
        let mut rng = StdRng::seed_from_u64(5);
        let trend = generator().conversion_trend(&mut rng, 60).unwrap();

        for pair in trend.windows(2) {
            let delta = pair[1] - pair[0];
            // Two-decimal rounding adds up to 0.01 of slack either side.
            assert!(delta >= -0.16 && delta <= 0.21, "step {delta} too large");
        }
    }

    #[test]
    fn test_conversion_trend_rejects_zero_days() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(generator().conversion_trend(&mut rng, 0).is_err());
    }
}
