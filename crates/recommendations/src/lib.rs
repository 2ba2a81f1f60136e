//! Rule-based store recommendations: a static candidate catalog ranked by
//! priority tier and impact-to-effort leverage.

pub mod catalog;
pub mod engine;

pub use catalog::{reference_catalog, CatalogEntry, Category, Priority};
pub use engine::{
    category_index, CategoryIndex, ImpactProjection, RankedRecommendation, RecommendationEngine,
};
