//! Recommendation catalog — candidate actions with impact/effort scoring.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Conversion,
    Retention,
    Revenue,
    Inventory,
    LeadGen,
    Operations,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    /// Sort key: lower is more urgent.
    pub fn severity(self) -> u8 {
        match self {
            Priority::Critical => 0,
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }
}

/// One candidate recommendation. Effort scores are floored at 1 when used
/// as a divisor, so a zero here never reaches a ratio computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
    pub impact_score: u32,
    pub effort_score: u32,
    pub potential_revenue: f64,
    pub implementation_time: String,
    pub steps: Vec<String>,
    pub confidence: f64,
    pub data_sources: Vec<String>,
}

impl CatalogEntry {
    /// Impact per unit of effort; the tie-breaker within a priority tier.
    pub fn leverage(&self) -> f64 {
        f64::from(self.impact_score) / f64::from(self.effort_score.max(1))
    }
}

fn entry(
    id: &str,
    title: &str,
    description: &str,
    category: Category,
    priority: Priority,
    impact_score: u32,
    effort_score: u32,
    potential_revenue: f64,
    implementation_time: &str,
    steps: &[&str],
    confidence: f64,
    data_sources: &[&str],
) -> CatalogEntry {
    CatalogEntry {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        category,
        priority,
        impact_score,
        effort_score,
        potential_revenue,
        implementation_time: implementation_time.to_string(),
        steps: steps.iter().map(|s| s.to_string()).collect(),
        confidence,
        data_sources: data_sources.iter().map(|s| s.to_string()).collect(),
    }
}

/// The reference candidate pool, built from common e-commerce issues.
/// In production this would be fed by a rules layer over live store data;
/// the ranking contract is the same either way.
pub fn reference_catalog() -> Vec<CatalogEntry> {
    vec![
        entry(
            "rec_001",
            "Fix checkout abandonment spike",
            "Your checkout abandonment increased 15% this week. 38% of users drop off at the \
             shipping information step. Consider offering free shipping over $75 or showing \
             shipping costs earlier.",
            Category::Conversion,
            Priority::Critical,
            92,
            25,
            8_450.0,
            "2 hours",
            &[
                "Enable free shipping threshold banner on cart page",
                "Add shipping calculator to product pages",
                "Simplify checkout form fields",
            ],
            0.89,
            &["funnel_analysis", "heatmap_data", "session_recordings"],
        ),
        entry(
            "rec_002",
            "Launch win-back email campaign",
            "You have 3,240 customers who haven't purchased in 90+ days. These customers \
             previously spent an average of $145. A targeted win-back campaign could recover \
             8-12% of them.",
            Category::Retention,
            Priority::High,
            78,
            35,
            12_400.0,
            "1 day",
            &[
                "Segment customers by last purchase date",
                "Create 3-email win-back sequence",
                "Offer 15% discount in final email",
                "Set up automated trigger",
            ],
            0.85,
            &["cohort_analysis", "email_engagement", "purchase_history"],
        ),
        entry(
            "rec_003",
            "Optimize mobile product pages",
            "Mobile visitors convert 22% lower than desktop. Analysis shows slow image loading \
             and confusing CTA placement. Mobile represents 50% of your traffic but only 38% \
             of revenue.",
            Category::Conversion,
            Priority::High,
            85,
            45,
            18_600.0,
            "3 days",
            &[
                "Compress product images (currently 2.3MB avg)",
                "Move CTA above the fold",
                "Implement lazy loading",
                "Add sticky Add to Cart button",
            ],
            0.91,
            &["device_analytics", "page_speed", "heatmap_data"],
        ),
        entry(
            "rec_004",
            "Increase AOV with bundle offers",
            "Customers who buy \"Vintage Denim Jacket\" often also buy \"Graphic Tees\" within \
             14 days. Creating a bundle could increase AOV by $32 and conversion by 18%.",
            Category::Revenue,
            Priority::Medium,
            72,
            20,
            9_600.0,
            "4 hours",
            &[
                "Create \"Street Style Bundle\" with jacket + 2 tees",
                "Price at $129 (saving of $25)",
                "Promote on homepage and PDP",
                "A/B test bundle vs. individual products",
            ],
            0.82,
            &["product_affinity", "market_basket_analysis"],
        ),
        entry(
            "rec_005",
            "Address inventory stockout risk",
            "Your top 3 products have less than 2 weeks of inventory remaining based on current \
             velocity. Stockouts could cost approximately $28,000 in lost revenue.",
            Category::Inventory,
            Priority::Critical,
            88,
            40,
            28_000.0,
            "Immediate",
            &[
                "Place urgent PO for Vintage Denim Jacket (480 units)",
                "Set up low stock alerts at 3-week threshold",
                "Enable backorders with 10% discount incentive",
                "Review supplier lead times",
            ],
            0.95,
            &["inventory_levels", "sales_velocity", "supplier_data"],
        ),
        entry(
            "rec_006",
            "Reduce return rate with sizing guide",
            "Footwear has 18% return rate vs. 8% store average. 65% of returns cite \"wrong \
             size.\" An interactive sizing guide could reduce returns by 40%.",
            Category::Operations,
            Priority::Medium,
            65,
            50,
            4_200.0,
            "2 days",
            &[
                "Add size comparison tool",
                "Include customer reviews with sizing feedback",
                "Add \"true to size\" indicator",
                "Offer free size exchanges",
            ],
            0.76,
            &["return_reasons", "product_reviews", "size_data"],
        ),
        entry(
            "rec_007",
            "Capture more emails with exit intent",
            "You're losing 12,000+ visitors monthly without capturing their email. An \
             exit-intent popup offering 10% off could capture 8-10% of abandoning visitors.",
            Category::LeadGen,
            Priority::High,
            75,
            15,
            15_600.0,
            "2 hours",
            &[
                "Install exit-intent detection script",
                "Design popup with 10% offer",
                "Connect to email platform",
                "Set up welcome flow",
            ],
            0.88,
            &["traffic_analytics", "bounce_rate", "email_conversion"],
        ),
        entry(
            "rec_008",
            "Leverage high-performing email segment",
            "VIP customers (3+ purchases) have 4.2x higher AOV but only receive standard \
             emails. A VIP-specific campaign could drive $18,500 in additional monthly revenue.",
            Category::Retention,
            Priority::Medium,
            70,
            30,
            18_500.0,
            "1 day",
            &[
                "Segment VIP customers (847 total)",
                "Create exclusive early access campaign",
                "Offer VIP-only products",
                "Set up automated VIP nurture flow",
            ],
            0.84,
            &["customer_segmentation", "email_performance", "ltv_analysis"],
        ),
    ]
}
