//! Synthetic store analytics: trend generation, cohort retention,
//! funnel modeling, and dashboard aggregation.

pub mod alerts;
pub mod cohort;
pub mod dashboard;
pub mod funnel;
pub mod trend;

pub use cohort::{Cohort, CohortAnalysis, CohortGenerator};
pub use dashboard::{DashboardAggregator, DashboardMetrics, StoreOverview};
pub use funnel::{FunnelModel, FunnelReport, FunnelStage, StageStatus};
pub use trend::{TrendGenerator, TrendPoint};
