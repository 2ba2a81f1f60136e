//! Ranking and aggregate-impact projection over the recommendation catalog.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{reference_catalog, CatalogEntry, Category, Priority};

/// Candidate pool size used for the aggregate impact projection.
const IMPACT_POOL_SIZE: usize = 20;

/// Fraction of projected revenue expected to materialize in practice.
const REALITY_FACTOR: f64 = 0.6;

/// Effort threshold under which a recommendation counts as a quick win.
const QUICK_WIN_EFFORT: u32 = 30;

/// A catalog entry selected for a store, stamped at generation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedRecommendation {
    #[serde(flatten)]
    pub entry: CatalogEntry,
    pub store_id: String,
    pub generated_at: DateTime<Utc>,
    /// Potential revenue per unit of implementation effort.
    pub roi_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpactProjection {
    pub total_potential_monthly: f64,
    pub total_potential_annual: f64,
    pub critical_potential: f64,
    pub quick_wins: usize,
    pub implementation_time_total: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDescriptor {
    pub id: Category,
    pub name: String,
    pub icon: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorityDescriptor {
    pub id: Priority,
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryIndex {
    pub categories: Vec<CategoryDescriptor>,
    pub priorities: Vec<PriorityDescriptor>,
}

/// Ranks catalog entries for a store.
///
/// Ordering is a stable two-key sort: priority tier first (critical
/// before high before medium before low), then impact-to-effort leverage
/// descending within a tier. Every critical item outranks every high item
/// no matter the leverage.
pub struct RecommendationEngine {
    catalog: Vec<CatalogEntry>,
}

impl RecommendationEngine {
    pub fn new() -> Self {
        Self {
            catalog: reference_catalog(),
        }
    }

    pub fn with_catalog(catalog: Vec<CatalogEntry>) -> Self {
        Self { catalog }
    }

    pub fn catalog_len(&self) -> usize {
        self.catalog.len()
    }

    /// Top `limit` recommendations for `store_id`, stamped with the
    /// generation time and ROI score. Returns at most the catalog size.
    pub fn rank(&self, store_id: &str, limit: usize, now: DateTime<Utc>) -> Vec<RankedRecommendation> {
        let mut pool: Vec<&CatalogEntry> = self.catalog.iter().collect();
        pool.sort_by(|a, b| {
            a.priority
                .severity()
                .cmp(&b.priority.severity())
                .then_with(|| {
                    b.leverage()
                        .partial_cmp(&a.leverage())
                        .unwrap_or(Ordering::Equal)
                })
        });

        let selected: Vec<RankedRecommendation> = pool
            .into_iter()
            .take(limit)
            .map(|entry| RankedRecommendation {
                roi_score: round2(
                    entry.potential_revenue / f64::from(entry.effort_score.max(1)),
                ),
                store_id: store_id.to_string(),
                generated_at: now,
                entry: entry.clone(),
            })
            .collect();

        debug!(
            store_id,
            requested = limit,
            returned = selected.len(),
            "ranked recommendations"
        );
        selected
    }

    /// Project the aggregate revenue impact of acting on the candidate
    /// pool, discounted by a fixed reality factor since not every
    /// recommendation lands at 100%.
    pub fn potential_impact(&self, store_id: &str, now: DateTime<Utc>) -> ImpactProjection {
        let pool = self.rank(store_id, IMPACT_POOL_SIZE, now);

        let total: f64 = pool.iter().map(|r| r.entry.potential_revenue).sum();
        let critical: f64 = pool
            .iter()
            .filter(|r| r.entry.priority == Priority::Critical)
            .map(|r| r.entry.potential_revenue)
            .sum();

        ImpactProjection {
            total_potential_monthly: round2(total * REALITY_FACTOR),
            total_potential_annual: round2(total * REALITY_FACTOR * 12.0),
            critical_potential: round2(critical * REALITY_FACTOR),
            quick_wins: pool
                .iter()
                .filter(|r| r.entry.effort_score < QUICK_WIN_EFFORT)
                .count(),
            implementation_time_total: pool.iter().map(|r| r.entry.effort_score).sum::<u32>() / 10,
        }
    }
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Display metadata for the category and priority filters.
pub fn category_index() -> CategoryIndex {
    let category = |id, name: &str, icon: &str| CategoryDescriptor {
        id,
        name: name.to_string(),
        icon: icon.to_string(),
    };
    let priority = |id, name: &str, color: &str| PriorityDescriptor {
        id,
        name: name.to_string(),
        color: color.to_string(),
    };

    CategoryIndex {
        categories: vec![
            category(Category::Conversion, "Conversion Optimization", "trending-up"),
            category(Category::Retention, "Customer Retention", "users"),
            category(Category::Revenue, "Revenue Growth", "dollar-sign"),
            category(Category::Inventory, "Inventory Management", "package"),
            category(Category::LeadGen, "Lead Generation", "mail"),
            category(Category::Operations, "Operations", "settings"),
        ],
        priorities: vec![
            priority(Priority::Critical, "Critical", "#ef4444"),
            priority(Priority::High, "High", "#f97316"),
            priority(Priority::Medium, "Medium", "#eab308"),
            priority(Priority::Low, "Low", "#22c55e"),
        ],
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(ranked: &[RankedRecommendation]) -> Vec<&str> {
        ranked.iter().map(|r| r.entry.id.as_str()).collect()
    }

    // 1. Ranking order ------------------------------------------------------

    #[test]
    fn test_full_reference_order() {
        let engine = RecommendationEngine::new();
        let ranked = engine.rank("demo", 20, Utc::now());

        // Critical tier by leverage (92/25 > 88/40), then high
        // (75/15 > 78/35 > 85/45), then medium (72/20 > 70/30 > 65/50).
        assert_eq!(
            ids(&ranked),
            [
                "rec_001", "rec_005", "rec_007", "rec_002", "rec_003", "rec_004", "rec_008",
                "rec_006"
            ]
        );
    }

    #[test]
    fn test_priority_tiers_never_interleave() {
        let engine = RecommendationEngine::new();
        let ranked = engine.rank("demo", 20, Utc::now());

        let severities: Vec<u8> = ranked
            .iter()
            .map(|r| r.entry.priority.severity())
            .collect();
        let mut sorted = severities.clone();
        sorted.sort_unstable();
        assert_eq!(severities, sorted);
    }

    #[test]
    fn test_limit_three_returns_top_of_order() {
        let engine = RecommendationEngine::new();
        let ranked = engine.rank("demo", 3, Utc::now());
        assert_eq!(ids(&ranked), ["rec_001", "rec_005", "rec_007"]);
    }

    #[test]
    fn test_limit_clamped_to_catalog_size() {
        let engine = RecommendationEngine::new();
        assert_eq!(engine.rank("demo", 20, Utc::now()).len(), 8);
        assert_eq!(engine.rank("demo", 0, Utc::now()).len(), 0);
    }

    // 2. Annotation ---------------------------------------------------------

    #[test]
    fn test_selected_entries_are_stamped() {
        let engine = RecommendationEngine::new();
        let now = Utc::now();
        let ranked = engine.rank("store-42", 2, now);

        for rec in &ranked {
            assert_eq!(rec.store_id, "store-42");
            assert_eq!(rec.generated_at, now);
        }
        // rec_001: 8450 / 25
        assert_eq!(ranked[0].roi_score, 338.0);
        // rec_005: 28000 / 40
        assert_eq!(ranked[1].roi_score, 700.0);
    }

    #[test]
    fn test_ranked_serialization_flattens_entry() {
        let engine = RecommendationEngine::new();
        let ranked = engine.rank("demo", 1, Utc::now());
        let json = serde_json::to_value(&ranked[0]).unwrap();
        assert_eq!(json["id"], "rec_001");
        assert_eq!(json["priority"], "critical");
        assert!(json["roi_score"].is_number());
    }

    // 3. Impact projection --------------------------------------------------

    #[test]
    fn test_potential_impact_reference_figures() {
        let engine = RecommendationEngine::new();
        let impact = engine.potential_impact("demo", Utc::now());

        // Sum of all eight potential_revenue values is 115,350.
        assert_eq!(impact.total_potential_monthly, 69_210.0);
        assert_eq!(impact.total_potential_annual, 830_520.0);
        // Critical entries: rec_001 (8,450) + rec_005 (28,000).
        assert_eq!(impact.critical_potential, 21_870.0);
        // Effort under 30: rec_001 (25), rec_007 (15), rec_004 (20).
        assert_eq!(impact.quick_wins, 3);
        // Total effort 260, integer-divided by 10.
        assert_eq!(impact.implementation_time_total, 26);
    }

    // 4. Category index -----------------------------------------------------

    #[test]
    fn test_category_index_covers_all_variants() {
        let index = category_index();
        assert_eq!(index.categories.len(), 6);
        assert_eq!(index.priorities.len(), 4);
        assert_eq!(index.priorities[0].color, "#ef4444");
    }
}
