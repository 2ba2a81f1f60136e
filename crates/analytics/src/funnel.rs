//! Conversion funnel — the fixed five-stage purchase pipeline with
//! benchmark comparison and revenue-at-risk estimation.

use rand::Rng;
use serde::{Deserialize, Serialize};
use storepulse_core::config::AnalyticsConfig;
use storepulse_core::{Period, PulseResult};

use crate::trend::{round1, round2, TrendGenerator};

/// Stage health relative to its industry benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Critical,
    Warning,
    Good,
    Normal,
}

/// A stage's conversion rate more than this far below benchmark is critical.
const CRITICAL_SHORTFALL: f64 = 5.0;

/// Fraction of revenue-at-risk considered realistically recoverable.
const RECOVERY_FACTOR: f64 = 0.6;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunnelStage {
    pub name: String,
    pub visitors: u64,
    pub conversions: u64,
    pub conversion_rate: f64,
    pub dropoff_rate: f64,
    pub industry_benchmark: f64,
    pub percentile: u8,
    pub value: u64,
    pub status: StageStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insight: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunnelOverall {
    pub visit_to_purchase_rate: f64,
    pub industry_average: f64,
    pub revenue_at_risk: f64,
    pub potential_recovery: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunnelTrends {
    #[serde(rename = "7d")]
    pub seven_day: Vec<f64>,
    #[serde(rename = "30d")]
    pub thirty_day: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunnelReport {
    pub store_id: String,
    pub period: Period,
    pub stages: Vec<FunnelStage>,
    pub overall: FunnelOverall,
    pub trends: FunnelTrends,
}

/// Raw stage counts and annotations before rates are derived.
struct StageSeed {
    name: &'static str,
    visitors: u64,
    conversions: u64,
    benchmark: f64,
    percentile: u8,
    value: u64,
    insight: Option<&'static str>,
}

/// Reference funnel for the demo store. Adjacent stages chain:
/// each stage's conversions feed the next stage's visitors.
fn reference_stages() -> [StageSeed; 5] {
    [
        StageSeed {
            name: "Visit",
            visitors: 45_000,
            conversions: 45_000,
            benchmark: 100.0,
            percentile: 50,
            value: 0,
            insight: None,
        },
        StageSeed {
            name: "Product View",
            visitors: 45_000,
            conversions: 22_500,
            benchmark: 45.0,
            percentile: 65,
            value: 0,
            insight: Some("Above average - product pages are engaging"),
        },
        StageSeed {
            name: "Add to Cart",
            visitors: 22_500,
            conversions: 6_750,
            benchmark: 25.0,
            percentile: 72,
            value: 526_500,
            insight: Some("Strong ATC rate - pricing is competitive"),
        },
        StageSeed {
            name: "Checkout Started",
            visitors: 6_750,
            conversions: 4_050,
            benchmark: 55.0,
            percentile: 58,
            value: 315_900,
            insight: Some("Checkout abandonment higher than optimal"),
        },
        StageSeed {
            name: "Purchase Complete",
            visitors: 4_050,
            conversions: 2_458,
            benchmark: 70.0,
            percentile: 35,
            value: 191_716,
            insight: Some("Payment failures or unexpected costs"),
        },
    ]
}

/// Classify a stage against its benchmark. The entry stage converts at
/// 100% by definition and is not benchmarked.
pub fn classify_stage(conversion_rate: f64, benchmark: f64, is_entry: bool) -> StageStatus {
    if is_entry {
        return StageStatus::Normal;
    }
    let delta = conversion_rate - benchmark;
    if delta >= 0.0 {
        StageStatus::Good
    } else if delta >= -CRITICAL_SHORTFALL {
        StageStatus::Warning
    } else {
        StageStatus::Critical
    }
}

/// Builds the funnel report: derives per-stage rates and statuses from the
/// reference counts and estimates revenue lost at the weakest stage.
pub struct FunnelModel {
    cfg: AnalyticsConfig,
    trends: TrendGenerator,
}

impl FunnelModel {
    pub fn new(cfg: AnalyticsConfig) -> Self {
        let trends = TrendGenerator::new(cfg.clone());
        Self { cfg, trends }
    }

    pub fn report<R: Rng>(
        &self,
        rng: &mut R,
        store_id: &str,
        period: Period,
    ) -> PulseResult<FunnelReport> {
        let seeds = reference_stages();
        let mut stages = Vec::with_capacity(seeds.len());

        for (i, seed) in seeds.iter().enumerate() {
            let rate = round1(seed.conversions as f64 / seed.visitors as f64 * 100.0);
            stages.push(FunnelStage {
                name: seed.name.to_string(),
                visitors: seed.visitors,
                conversions: seed.conversions,
                conversion_rate: rate,
                dropoff_rate: round1(100.0 - rate),
                industry_benchmark: seed.benchmark,
                percentile: seed.percentile,
                value: seed.value,
                status: classify_stage(rate, seed.benchmark, i == 0),
                insight: seed.insight.map(str::to_string),
            });
        }

        let overall = self.overall(&stages);
        let trends = FunnelTrends {
            seven_day: vec![5.1, 5.3, 5.2, 5.4, 5.5, 5.6, 5.46],
            thirty_day: self.trends.conversion_trend(rng, 30)?,
        };

        Ok(FunnelReport {
            store_id: store_id.to_string(),
            period,
            stages,
            overall,
            trends,
        })
    }

    /// Revenue at risk is estimated at the weakest stage (largest shortfall
    /// against benchmark): the orders lost to the shortfall, valued at the
    /// configured average order value.
    fn overall(&self, stages: &[FunnelStage]) -> FunnelOverall {
        let first = stages.first();
        let last = stages.last();
        let visit_to_purchase = match (first, last) {
            (Some(f), Some(l)) if f.visitors > 0 => {
                round2(l.conversions as f64 / f.visitors as f64 * 100.0)
            }
            _ => 0.0,
        };

        let revenue_at_risk = stages
            .iter()
            .skip(1)
            .map(|s| {
                let shortfall = (s.industry_benchmark - s.conversion_rate).max(0.0);
                shortfall / 100.0 * s.visitors as f64 * self.cfg.average_order_value
            })
            .fold(0.0f64, f64::max);

        FunnelOverall {
            visit_to_purchase_rate: visit_to_purchase,
            industry_average: 3.2,
            revenue_at_risk: round2(revenue_at_risk),
            potential_recovery: round2(revenue_at_risk * RECOVERY_FACTOR),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use storepulse_core::config::AnalyticsConfig;

    fn model() -> FunnelModel {
        FunnelModel::new(AnalyticsConfig::default())
    }

    fn demo_report() -> FunnelReport {
        let mut rng = StdRng::seed_from_u64(9);
        model()
            .report(&mut rng, "demo", Period::ThirtyDays)
            .unwrap()
    }

    // 1. Structure ----------------------------------------------------------

    #[test]
    fn test_five_stages_in_pipeline_order() {
        let report = demo_report();
        let names: Vec<_> = report.stages.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "Visit",
                "Product View",
                "Add to Cart",
                "Checkout Started",
                "Purchase Complete"
            ]
        );
    }

    #[test]
    fn test_adjacent_stages_chain() {
        let report = demo_report();
        for pair in report.stages.windows(2) {
            assert_eq!(pair[0].conversions, pair[1].visitors);
        }
        for stage in &report.stages {
            assert!(stage.visitors >= stage.conversions);
        }
    }

    #[test]
    fn test_dropoff_complements_conversion() {
        let report = demo_report();
        for stage in &report.stages {
            assert!((stage.conversion_rate + stage.dropoff_rate - 100.0).abs() < 1e-9);
        }
    }

    // 2. Status classification ----------------------------------------------

    #[test]
    fn test_purchase_stage_is_critical() {
        let report = demo_report();
        let purchase = report.stages.last().unwrap();
        assert_eq!(purchase.conversion_rate, 60.7);
        assert_eq!(purchase.industry_benchmark, 70.0);
        assert_eq!(purchase.status, StageStatus::Critical);
    }

    #[test]
    fn test_entry_stage_is_normal() {
        let report = demo_report();
        assert_eq!(report.stages[0].conversion_rate, 100.0);
        assert_eq!(report.stages[0].status, StageStatus::Normal);
    }

    #[test]
    fn test_classify_thresholds() {
        assert_eq!(classify_stage(50.0, 45.0, false), StageStatus::Good);
        assert_eq!(classify_stage(45.0, 45.0, false), StageStatus::Good);
        assert_eq!(classify_stage(41.0, 45.0, false), StageStatus::Warning);
        assert_eq!(classify_stage(39.0, 45.0, false), StageStatus::Critical);
        assert_eq!(classify_stage(0.0, 100.0, true), StageStatus::Normal);
    }

    // 3. Revenue at risk -----------------------------------------------------

    #[test]
    fn test_revenue_at_risk_at_weakest_stage() {
        let report = demo_report();
        // Purchase Complete has the largest shortfall: 70 - 60.7 = 9.3
        // points over 4050 checkout starters at $78 AOV.
        let expected = 9.3 / 100.0 * 4050.0 * 78.0;
        assert!((report.overall.revenue_at_risk - round2(expected)).abs() < 1e-9);
        assert!(
            (report.overall.potential_recovery - round2(expected * 0.6)).abs() < 1e-9
        );
    }

    #[test]
    fn test_overall_visit_to_purchase_rate() {
        let report = demo_report();
        assert_eq!(report.overall.visit_to_purchase_rate, 5.46);
    }

    // 4. Trends -------------------------------------------------------------

    #[test]
    fn test_trend_blocks() {
        let report = demo_report();
        assert_eq!(report.trends.seven_day.len(), 7);
        assert_eq!(report.trends.thirty_day.len(), 30);
        for rate in &report.trends.thirty_day {
            assert!((4.0..=6.5).contains(rate));
        }
    }

    #[test]
    fn test_repeat_requests_keep_structure() {
        let a = demo_report();
        let mut rng = StdRng::seed_from_u64(1234);
        let b = model()
            .report(&mut rng, "demo", Period::ThirtyDays)
            .unwrap();
        assert_eq!(a.stages.len(), b.stages.len());
        for (x, y) in a.stages.iter().zip(&b.stages) {
            assert_eq!(x.name, y.name);
            assert_eq!(x.status, y.status);
        }
    }
}
