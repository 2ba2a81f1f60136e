//! Cohort analysis — monthly acquisition cohorts with decaying retention.

use chrono::{Datelike, NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::trend::round1;

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// How many monthly cohorts are reported.
const COHORT_COUNT: usize = 6;

/// Customers acquired in one calendar month, tracked over time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cohort {
    /// Acquisition month label, e.g. "Mar".
    pub month: String,
    /// Customers acquired during that month.
    pub customers: u32,
    /// Retention percentages, starting at 100 for the acquisition month.
    /// Later cohorts have fewer elapsed months and therefore shorter
    /// sequences (right-censored data).
    pub retention: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CohortAnalysis {
    pub months: Vec<String>,
    pub cohorts: Vec<Cohort>,
    pub average_ltv: f64,
    pub average_retention_3m: f64,
}

/// Generates the six most recent monthly cohorts with decaying retention
/// curves. Each retention step multiplies the previous value by a uniform
/// factor in [0.35, 0.55].
pub struct CohortGenerator;

impl CohortGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate cohorts for the six calendar months ending today.
    pub fn generate<R: Rng>(&self, rng: &mut R) -> CohortAnalysis {
        self.generate_ending(rng, Utc::now().date_naive())
    }

    /// Generate cohorts for the six calendar months ending at `today`.
    pub fn generate_ending<R: Rng>(&self, rng: &mut R, today: NaiveDate) -> CohortAnalysis {
        let months = trailing_month_labels(today, COHORT_COUNT);
        let mut cohorts = Vec::with_capacity(COHORT_COUNT);

        for (i, month) in months.iter().enumerate() {
            // Later cohorts are larger — the account is growing.
            let customers = 400 + (i as u32) * 50;
            let mut retention = vec![100.0];

            let steps = COHORT_COUNT - 1 - i;
            for _ in 0..steps {
                let factor = rng.gen_range(0.35..=0.55);
                let previous = *retention.last().unwrap_or(&100.0);
                retention.push(round1(previous * factor));
            }

            cohorts.push(Cohort {
                month: month.clone(),
                customers,
                retention,
            });
        }

        CohortAnalysis {
            months,
            cohorts,
            average_ltv: 156.0,
            average_retention_3m: 28.5,
        }
    }
}

impl Default for CohortGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Labels for the `count` calendar months ending at `today`, oldest first.
fn trailing_month_labels(today: NaiveDate, count: usize) -> Vec<String> {
    let mut labels = Vec::with_capacity(count);
    // month0 is 0-based; walk back count-1 months from the current one.
    let current = today.month0() as i64;
    for offset in (0..count as i64).rev() {
        let idx = (current - offset).rem_euclid(12) as usize;
        labels.push(MONTH_LABELS[idx].to_string());
    }
    labels
}
