use serde::Deserialize;

/// Root application configuration. Loaded from environment variables
/// with the prefix `STOREPULSE__` and optional TOML config files.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_node_id")]
    pub node_id: String,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    #[serde(default)]
    pub storefront: StorefrontConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

/// Tunables for the synthetic metrics generators. Defaults reproduce the
/// reference "UrbanThreads" demo profile.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyticsConfig {
    /// Baseline daily revenue before seasonality and noise.
    #[serde(default = "default_base_daily_revenue")]
    pub base_daily_revenue: f64,
    /// Assumed average order value used to derive order counts.
    #[serde(default = "default_average_order_value")]
    pub average_order_value: f64,
    /// Assumed visit-to-purchase rate used to derive visitor counts.
    #[serde(default = "default_baseline_conversion_rate")]
    pub baseline_conversion_rate: f64,
    /// Revenue multiplier applied on Saturdays and Sundays.
    #[serde(default = "default_weekend_multiplier")]
    pub weekend_multiplier: f64,
    /// Linear growth applied per day of the trend window.
    #[serde(default = "default_daily_growth_rate")]
    pub daily_growth_rate: f64,
    /// Lower clamp for the conversion-rate random walk.
    #[serde(default = "default_walk_floor")]
    pub walk_floor: f64,
    /// Upper clamp for the conversion-rate random walk.
    #[serde(default = "default_walk_ceiling")]
    pub walk_ceiling: f64,
}

/// Connection settings for the storefront platform (Shopify Admin API).
#[derive(Debug, Clone, Deserialize)]
pub struct StorefrontConfig {
    #[serde(default = "default_shop_domain")]
    pub shop_domain: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default)]
    pub access_token: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

// Default functions
fn default_node_id() -> String {
    "pulse-01".to_string()
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_http_port() -> u16 {
    8080
}
fn default_metrics_port() -> u16 {
    9091
}
fn default_base_daily_revenue() -> f64 {
    6000.0
}
fn default_average_order_value() -> f64 {
    78.0
}
fn default_baseline_conversion_rate() -> f64 {
    0.0546
}
fn default_weekend_multiplier() -> f64 {
    1.3
}
fn default_daily_growth_rate() -> f64 {
    0.002
}
fn default_walk_floor() -> f64 {
    4.0
}
fn default_walk_ceiling() -> f64 {
    6.5
}
fn default_shop_domain() -> String {
    "urbanthreads-demo.myshopify.com".to_string()
}
fn default_api_version() -> String {
    "2024-01".to_string()
}
fn default_request_timeout_ms() -> u64 {
    10_000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            port: default_metrics_port(),
        }
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            base_daily_revenue: default_base_daily_revenue(),
            average_order_value: default_average_order_value(),
            baseline_conversion_rate: default_baseline_conversion_rate(),
            weekend_multiplier: default_weekend_multiplier(),
            daily_growth_rate: default_daily_growth_rate(),
            walk_floor: default_walk_floor(),
            walk_ceiling: default_walk_ceiling(),
        }
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            shop_domain: default_shop_domain(),
            api_version: default_api_version(),
            access_token: String::new(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            node_id: default_node_id(),
            api: ApiConfig::default(),
            metrics: MetricsConfig::default(),
            analytics: AnalyticsConfig::default(),
            storefront: StorefrontConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("STOREPULSE")
                .separator("__")
                .try_parsing(true)
                .list_separator(","),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}
