//! Shopify Admin API client — fetches shop, order, product, customer, and
//! abandoned-checkout data for a connected store.
//!
//! OAuth installation and webhook verification are handled by the platform
//! layer; this client only performs token-authenticated reads.

use std::collections::HashSet;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storepulse_core::config::StorefrontConfig;
use storepulse_core::{PulseError, PulseResult};
use tracing::{debug, warn};

#[derive(Debug, Clone, Deserialize)]
pub struct Shop {
    pub id: u64,
    pub name: String,
    pub domain: String,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Customer {
    pub id: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Order {
    pub id: u64,
    /// Shopify returns monetary amounts as decimal strings.
    pub total_price: String,
    #[serde(default)]
    pub customer: Option<Customer>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    pub id: u64,
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Checkout {
    pub id: u64,
    #[serde(default)]
    pub total_price: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ShopEnvelope {
    shop: Shop,
}

#[derive(Debug, Deserialize)]
struct OrdersEnvelope {
    #[serde(default)]
    orders: Vec<Order>,
}

#[derive(Debug, Deserialize)]
struct ProductsEnvelope {
    #[serde(default)]
    products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
struct CustomersEnvelope {
    #[serde(default)]
    customers: Vec<Customer>,
}

#[derive(Debug, Deserialize)]
struct CheckoutsEnvelope {
    #[serde(default)]
    checkouts: Vec<Checkout>,
}

/// Optional filters for the orders endpoint.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub limit: u32,
    pub since_id: Option<u64>,
    pub created_at_min: Option<DateTime<Utc>>,
    pub created_at_max: Option<DateTime<Utc>>,
}

/// Result of folding a 30-day order window into sync metrics.
#[derive(Debug, Clone, Serialize)]
pub struct SyncSummary {
    pub store_id: String,
    pub sync_period: String,
    pub orders_synced: usize,
    pub revenue_synced: f64,
    pub customers_count: usize,
    pub abandoned_checkouts: usize,
    pub synced_at: DateTime<Utc>,
}

pub struct StorefrontClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl StorefrontClient {
    pub fn new(cfg: &StorefrontConfig) -> PulseResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(cfg.request_timeout_ms))
            .build()
            .map_err(|e| PulseError::Config(format!("storefront HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: format!("https://{}/admin/api/{}", cfg.shop_domain, cfg.api_version),
            access_token: cfg.access_token.clone(),
        })
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        resource: &str,
        query: &[(&str, String)],
    ) -> PulseResult<T> {
        let url = format!("{}/{}", self.base_url, resource);
        debug!(%url, "storefront request");

        let response = self
            .http
            .get(&url)
            .header("X-Shopify-Access-Token", &self.access_token)
            .header("Content-Type", "application/json")
            .query(query)
            .send()
            .await
            .map_err(|e| PulseError::UpstreamUnavailable(e.to_string()))?;

        let response = response
            .error_for_status()
            .map_err(|e| PulseError::UpstreamUnavailable(e.to_string()))?;

        response
            .json::<T>()
            .await
            .map_err(|e| PulseError::UpstreamUnavailable(e.to_string()))
    }

    pub async fn shop_info(&self) -> PulseResult<Shop> {
        let envelope: ShopEnvelope = self.get("shop.json", &[]).await?;
        Ok(envelope.shop)
    }

    pub async fn orders(&self, filter: &OrderFilter) -> PulseResult<Vec<Order>> {
        let limit = if filter.limit == 0 { 250 } else { filter.limit };
        let mut query = vec![("limit", limit.to_string())];
        if let Some(since_id) = filter.since_id {
            query.push(("since_id", since_id.to_string()));
        }
        if let Some(min) = filter.created_at_min {
            query.push(("created_at_min", min.to_rfc3339()));
        }
        if let Some(max) = filter.created_at_max {
            query.push(("created_at_max", max.to_rfc3339()));
        }

        let envelope: OrdersEnvelope = self.get("orders.json", &query).await?;
        Ok(envelope.orders)
    }

    pub async fn products(&self, limit: u32) -> PulseResult<Vec<Product>> {
        let envelope: ProductsEnvelope = self
            .get("products.json", &[("limit", limit.to_string())])
            .await?;
        Ok(envelope.products)
    }

    pub async fn customers(&self, limit: u32) -> PulseResult<Vec<Customer>> {
        let envelope: CustomersEnvelope = self
            .get("customers.json", &[("limit", limit.to_string())])
            .await?;
        Ok(envelope.customers)
    }

    pub async fn abandoned_checkouts(&self, limit: u32) -> PulseResult<Vec<Checkout>> {
        let envelope: CheckoutsEnvelope = self
            .get("checkouts.json", &[("limit", limit.to_string())])
            .await?;
        Ok(envelope.checkouts)
    }

    /// Pull the last 30 days of orders plus abandoned checkouts and fold
    /// them into a sync summary.
    pub async fn sync_summary(&self, store_id: &str) -> PulseResult<SyncSummary> {
        let end = Utc::now();
        let start = end - chrono::Duration::days(30);

        let orders = self
            .orders(&OrderFilter {
                limit: 250,
                created_at_min: Some(start),
                created_at_max: Some(end),
                ..OrderFilter::default()
            })
            .await?;
        let checkouts = self.abandoned_checkouts(250).await?;

        Ok(summarize(store_id, &orders, checkouts.len(), start, end))
    }
}

/// Fold fetched orders into the sync summary. Split from the I/O path so
/// the aggregation is testable against fixture data.
fn summarize(
    store_id: &str,
    orders: &[Order],
    abandoned_checkouts: usize,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> SyncSummary {
    let mut revenue = 0.0f64;
    for order in orders {
        match order.total_price.parse::<f64>() {
            Ok(amount) => revenue += amount,
            Err(_) => warn!(order_id = order.id, price = %order.total_price, "unparseable order total"),
        }
    }

    let customers: HashSet<u64> = orders
        .iter()
        .filter_map(|o| o.customer.as_ref().map(|c| c.id))
        .collect();

    SyncSummary {
        store_id: store_id.to_string(),
        sync_period: format!("{} to {}", start.date_naive(), end.date_naive()),
        orders_synced: orders.len(),
        revenue_synced: revenue,
        customers_count: customers.len(),
        abandoned_checkouts,
        synced_at: Utc::now(),
    }
}
