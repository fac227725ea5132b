//! Role-specific dashboard snapshots.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::catalog::Product;
use super::company::SubscriptionStatus;
use crate::config::ACTIVITY_FEED_LIMIT;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ActivityItem {
    /// e.g. `product_added`, `new_product`, `new_registration`
    pub kind: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ActivityItem {
    pub fn new(kind: &str, description: String, timestamp: DateTime<Utc>) -> Self {
        Self {
            kind: kind.to_string(),
            description,
            timestamp,
            details: None,
        }
    }

    pub fn with_details(mut self, details: String) -> Self {
        self.details = Some(details);
        self
    }
}

/// Newest first, capped at the feed limit.
pub fn newest_first(mut items: Vec<ActivityItem>) -> Vec<ActivityItem> {
    items.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    items.truncate(ACTIVITY_FEED_LIMIT);
    items
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VendorDashboard {
    pub total_products: u64,
    pub active_products: u64,
    pub draft_products: u64,
    pub total_views: i64,
    pub recent_products: Vec<Product>,
    pub recent_activity: Vec<ActivityItem>,
    pub subscription_status: SubscriptionStatus,
    pub subscription_expiry: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BuyerDashboard {
    pub total_marketplace_products: u64,
    pub available_industries: u64,
    pub recent_marketplace_products: Vec<Product>,
    pub recent_activity: Vec<ActivityItem>,
}

/// Dashboard for the caller's role
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Dashboard {
    Vendor(VendorDashboard),
    BusinessBuyer(BuyerDashboard),
    ConsumerBuyer(BuyerDashboard),
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct IndustryShare {
    pub name: String,
    pub count: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AdminDashboard {
    pub total_users: u64,
    pub total_companies: u64,
    pub total_products: u64,
    pub active_subscriptions: u64,
    pub new_users_30d: u64,
    pub new_products_30d: u64,
    pub user_growth_rate: f64,
    pub product_growth_rate: f64,
    pub industry_stats: Vec<IndustryShare>,
    pub recent_activity: Vec<ActivityItem>,
}

/// `part / total * 100`, or zero for an empty total.
pub fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

/// Growth over the recent window relative to the current total.
pub fn growth_rate(new_in_window: u64, total: u64) -> f64 {
    percentage(new_in_window, total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_growth_rate_with_empty_total_is_zero() {
        assert_eq!(growth_rate(0, 0), 0.0);
        assert_eq!(growth_rate(5, 0), 0.0);
        assert_eq!(growth_rate(5, 20), 25.0);
    }

    #[test]
    fn test_activity_feed_is_sorted_and_capped() {
        let now = Utc::now();
        let items: Vec<ActivityItem> = (0..14)
            .map(|i| ActivityItem::new("x", format!("item {i}"), now - Duration::hours(i)))
            .rev()
            .collect();
        let feed = newest_first(items);
        assert_eq!(feed.len(), ACTIVITY_FEED_LIMIT);
        assert_eq!(feed[0].description, "item 0");
        assert!(feed.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
    }
}
