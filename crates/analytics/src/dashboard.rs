//! Dashboard aggregation — assembles summary KPIs, trends, breakdowns,
//! cohorts, and benchmarks into one payload.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use storepulse_core::config::AnalyticsConfig;
use storepulse_core::{Period, PulseResult};

use crate::cohort::{CohortAnalysis, CohortGenerator};
use crate::trend::{TrendGenerator, TrendPoint};

/// Scalar KPIs with period-over-period percentage changes.
///
/// The figures are independently sourced; no cross-field consistency
/// (e.g. conversion_rate == orders / visitors) is enforced here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub total_revenue: f64,
    pub revenue_change: f64,
    pub total_orders: u64,
    pub orders_change: f64,
    pub total_visitors: u64,
    pub visitors_change: f64,
    pub conversion_rate: f64,
    pub conversion_change: f64,
    pub aov: f64,
    pub aov_change: f64,
    pub ltv: f64,
    pub ltv_change: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentStats {
    pub visitors: u64,
    pub percentage: u8,
    pub conversion: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficSources {
    pub organic: SegmentStats,
    pub paid: SegmentStats,
    pub social: SegmentStats,
    pub email: SegmentStats,
    pub direct: SegmentStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceBreakdown {
    pub desktop: SegmentStats,
    pub mobile: SegmentStats,
    pub tablet: SegmentStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopProduct {
    pub name: String,
    pub revenue: f64,
    pub units: u32,
    pub conversion: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkEntry {
    pub store: f64,
    pub industry: f64,
    pub percentile: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Benchmarks {
    pub conversion_rate: BenchmarkEntry,
    pub aov: BenchmarkEntry,
    pub ltv_cac_ratio: BenchmarkEntry,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardMetrics {
    pub store_id: String,
    pub period: Period,
    pub summary: MetricsSummary,
    pub revenue_trend: Vec<TrendPoint>,
    pub traffic_sources: TrafficSources,
    pub device_breakdown: DeviceBreakdown,
    pub top_products: Vec<TopProduct>,
    pub cohort_analysis: CohortAnalysis,
    pub benchmarks: Benchmarks,
}

/// Store profile returned by the overview endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreOverview {
    pub id: String,
    pub name: String,
    pub platform: String,
    pub url: String,
    pub annual_revenue: u64,
    pub monthly_visitors: u64,
    pub conversion_rate: f64,
    pub aov: f64,
    pub ltv: f64,
    pub tier: String,
    pub connected_at: String,
    pub last_sync: DateTime<Utc>,
    pub health_score: u8,
}

/// Inputs for the composite store health score.
#[derive(Debug, Clone, Copy)]
pub struct HealthInputs {
    pub conversion_rate: f64,
    pub industry_conversion_rate: f64,
    /// Period-over-period revenue growth, in percent.
    pub revenue_growth_pct: f64,
    /// Three-month retention, in percent.
    pub retention_3m: f64,
    /// Site performance score, 0-100.
    pub site_performance: f64,
    /// Inventory health score, 0-100.
    pub inventory_health: f64,
}

impl HealthInputs {
    /// Reference profile for the demo store.
    pub fn demo() -> Self {
        Self {
            conversion_rate: 5.46,
            industry_conversion_rate: 3.2,
            revenue_growth_pct: 12.5,
            retention_3m: 28.5,
            site_performance: 85.0,
            inventory_health: 75.0,
        }
    }
}

/// Overall store health on a 0-100 scale, weighted:
/// conversion vs benchmark 30%, revenue growth 25%, retention 20%,
/// site performance 15%, inventory health 10%.
pub fn health_score(inputs: &HealthInputs) -> u8 {
    let conversion = if inputs.industry_conversion_rate > 0.0 {
        (inputs.conversion_rate / inputs.industry_conversion_rate * 50.0).clamp(0.0, 100.0)
    } else {
        0.0
    };
    // 0% growth scores 50; every point of growth moves it 4 points.
    let growth = (50.0 + inputs.revenue_growth_pct * 4.0).clamp(0.0, 100.0);
    // 35% three-month retention is treated as a full score.
    let retention = (inputs.retention_3m / 35.0 * 100.0).clamp(0.0, 100.0);
    let site = inputs.site_performance.clamp(0.0, 100.0);
    let inventory = inputs.inventory_health.clamp(0.0, 100.0);

    let score = conversion * 0.30 + growth * 0.25 + retention * 0.20 + site * 0.15
        + inventory * 0.10;
    score.round() as u8
}

/// Assembles the full dashboard payload from the generators.
pub struct DashboardAggregator {
    trends: TrendGenerator,
    cohorts: CohortGenerator,
}

impl DashboardAggregator {
    pub fn new(cfg: AnalyticsConfig) -> Self {
        Self {
            trends: TrendGenerator::new(cfg),
            cohorts: CohortGenerator::new(),
        }
    }

    pub fn metrics<R: Rng>(
        &self,
        rng: &mut R,
        store_id: &str,
        period: Period,
    ) -> PulseResult<DashboardMetrics> {
        let revenue_trend = self.trends.revenue_trend(rng, period.days())?;
        let cohort_analysis = self.cohorts.generate(rng);

        Ok(DashboardMetrics {
            store_id: store_id.to_string(),
            period,
            summary: reference_summary(),
            revenue_trend,
            traffic_sources: reference_traffic_sources(),
            device_breakdown: reference_device_breakdown(),
            top_products: reference_top_products(),
            cohort_analysis,
            benchmarks: reference_benchmarks(),
        })
    }

    pub fn store_overview(&self, store_id: &str, now: DateTime<Utc>) -> StoreOverview {
        StoreOverview {
            id: store_id.to_string(),
            name: "UrbanThreads".to_string(),
            platform: "Shopify".to_string(),
            url: "urbanthreads-demo.myshopify.com".to_string(),
            annual_revenue: 2_300_000,
            monthly_visitors: 45_000,
            conversion_rate: 3.2,
            aov: 78.0,
            ltv: 156.0,
            tier: "Scale".to_string(),
            connected_at: "2024-01-15T10:30:00Z".to_string(),
            last_sync: now,
            health_score: health_score(&HealthInputs::demo()),
        }
    }
}

fn reference_summary() -> MetricsSummary {
    MetricsSummary {
        total_revenue: 191_667.0,
        revenue_change: 12.5,
        total_orders: 2_458,
        orders_change: 8.3,
        total_visitors: 45_000,
        visitors_change: -2.1,
        conversion_rate: 5.46,
        conversion_change: 0.4,
        aov: 78.0,
        aov_change: 3.2,
        ltv: 156.0,
        ltv_change: 5.1,
    }
}

fn reference_traffic_sources() -> TrafficSources {
    TrafficSources {
        organic: SegmentStats {
            visitors: 15_750,
            percentage: 35,
            conversion: 4.2,
        },
        paid: SegmentStats {
            visitors: 11_250,
            percentage: 25,
            conversion: 6.8,
        },
        social: SegmentStats {
            visitors: 9_000,
            percentage: 20,
            conversion: 3.5,
        },
        email: SegmentStats {
            visitors: 6_750,
            percentage: 15,
            conversion: 8.2,
        },
        direct: SegmentStats {
            visitors: 2_250,
            percentage: 5,
            conversion: 5.1,
        },
    }
}

fn reference_device_breakdown() -> DeviceBreakdown {
    DeviceBreakdown {
        desktop: SegmentStats {
            visitors: 18_000,
            percentage: 40,
            conversion: 6.2,
        },
        mobile: SegmentStats {
            visitors: 22_500,
            percentage: 50,
            conversion: 4.8,
        },
        tablet: SegmentStats {
            visitors: 4_500,
            percentage: 10,
            conversion: 5.5,
        },
    }
}

fn reference_top_products() -> Vec<TopProduct> {
    vec![
        TopProduct {
            name: "Vintage Denim Jacket".to_string(),
            revenue: 28_500.0,
            units: 300,
            conversion: 7.2,
        },
        TopProduct {
            name: "Streetwear Hoodie".to_string(),
            revenue: 22_400.0,
            units: 280,
            conversion: 6.5,
        },
        TopProduct {
            name: "Graphic Tee Bundle".to_string(),
            revenue: 18_900.0,
            units: 450,
            conversion: 8.1,
        },
        TopProduct {
            name: "Canvas Sneakers".to_string(),
            revenue: 15_600.0,
            units: 195,
            conversion: 5.8,
        },
        TopProduct {
            name: "Urban Backpack".to_string(),
            revenue: 12_300.0,
            units: 123,
            conversion: 6.9,
        },
    ]
}

fn reference_benchmarks() -> Benchmarks {
    Benchmarks {
        conversion_rate: BenchmarkEntry {
            store: 5.46,
            industry: 3.2,
            percentile: 85,
        },
        aov: BenchmarkEntry {
            store: 78.0,
            industry: 65.0,
            percentile: 72,
        },
        ltv_cac_ratio: BenchmarkEntry {
            store: 3.2,
            industry: 2.5,
            percentile: 78,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use storepulse_core::config::AnalyticsConfig;

    fn aggregator() -> DashboardAggregator {
        DashboardAggregator::new(AnalyticsConfig::default())
    }

    // 1. Payload assembly ---------------------------------------------------

    #[test]
    fn test_metrics_trend_matches_period() {
        let mut rng = StdRng::seed_from_u64(8);
        let metrics = aggregator()
            .metrics(&mut rng, "demo", Period::SevenDays)
            .unwrap();
        assert_eq!(metrics.revenue_trend.len(), 7);
        assert_eq!(metrics.period, Period::SevenDays);
        assert_eq!(metrics.store_id, "demo");
    }

    #[test]
    fn test_metrics_summary_reference_figures() {
        let mut rng = StdRng::seed_from_u64(8);
        let metrics = aggregator()
            .metrics(&mut rng, "demo", Period::ThirtyDays)
            .unwrap();
        assert_eq!(metrics.summary.total_revenue, 191_667.0);
        assert_eq!(metrics.summary.conversion_rate, 5.46);
        assert_eq!(metrics.summary.aov, 78.0);
        assert_eq!(metrics.top_products.len(), 5);
        assert_eq!(metrics.cohort_analysis.cohorts.len(), 6);
        assert_eq!(metrics.benchmarks.conversion_rate.percentile, 85);
    }

    #[test]
    fn test_traffic_percentages_sum_to_hundred() {
        let sources = reference_traffic_sources();
        let total = sources.organic.percentage
            + sources.paid.percentage
            + sources.social.percentage
            + sources.email.percentage
            + sources.direct.percentage;
        assert_eq!(total, 100);
    }

    // 2. Health score -------------------------------------------------------

    #[test]
    fn test_demo_health_score() {
        assert_eq!(health_score(&HealthInputs::demo()), 87);
    }

    #[test]
    fn test_health_score_clamps_components() {
        let perfect = HealthInputs {
            conversion_rate: 50.0,
            industry_conversion_rate: 1.0,
            revenue_growth_pct: 1_000.0,
            retention_3m: 100.0,
            site_performance: 100.0,
            inventory_health: 100.0,
        };
        assert_eq!(health_score(&perfect), 100);

        let dire = HealthInputs {
            conversion_rate: 0.0,
            industry_conversion_rate: 3.2,
            revenue_growth_pct: -50.0,
            retention_3m: 0.0,
            site_performance: 0.0,
            inventory_health: 0.0,
        };
        assert_eq!(health_score(&dire), 0);
    }

    // 3. Overview -----------------------------------------------------------

    #[test]
    fn test_store_overview() {
        let now = Utc::now();
        let overview = aggregator().store_overview("demo", now);
        assert_eq!(overview.name, "UrbanThreads");
        assert_eq!(overview.platform, "Shopify");
        assert_eq!(overview.health_score, 87);
        assert_eq!(overview.last_sync, now);
    }
}
