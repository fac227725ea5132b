//! Company profile, roles and subscription state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{ROLE_BUSINESS_BUYER, ROLE_CONSUMER_BUYER, ROLE_VENDOR};

/// Account type chosen at registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CompanyRole {
    Vendor,
    BusinessBuyer,
    ConsumerBuyer,
}

impl CompanyRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompanyRole::Vendor => ROLE_VENDOR,
            CompanyRole::BusinessBuyer => ROLE_BUSINESS_BUYER,
            CompanyRole::ConsumerBuyer => ROLE_CONSUMER_BUYER,
        }
    }

    pub fn is_vendor(&self) -> bool {
        matches!(self, CompanyRole::Vendor)
    }

    /// Buyers never pass through the payment step
    pub fn is_buyer(&self) -> bool {
        !self.is_vendor()
    }
}

impl From<&str> for CompanyRole {
    fn from(s: &str) -> Self {
        match s {
            ROLE_BUSINESS_BUYER => CompanyRole::BusinessBuyer,
            ROLE_CONSUMER_BUYER => CompanyRole::ConsumerBuyer,
            _ => CompanyRole::Vendor,
        }
    }
}

impl std::fmt::Display for CompanyRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subscription lifecycle of a company
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Pending,
    Active,
    Expired,
    Cancelled,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Pending => "pending",
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Expired => "expired",
            SubscriptionStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, SubscriptionStatus::Active)
    }
}

impl From<&str> for SubscriptionStatus {
    fn from(s: &str) -> Self {
        match s {
            "active" => SubscriptionStatus::Active,
            "expired" => SubscriptionStatus::Expired,
            "cancelled" => SubscriptionStatus::Cancelled,
            _ => SubscriptionStatus::Pending,
        }
    }
}

impl std::fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subscription fields as they should be stored right after registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitialSubscription {
    pub status: SubscriptionStatus,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl InitialSubscription {
    /// Vendors wait for payment; buyers are active immediately with no end date.
    pub fn for_role(role: CompanyRole, now: DateTime<Utc>) -> Self {
        if role.is_buyer() {
            Self {
                status: SubscriptionStatus::Active,
                start_date: Some(now),
                end_date: None,
            }
        } else {
            Self {
                status: SubscriptionStatus::Pending,
                start_date: None,
                end_date: None,
            }
        }
    }
}

/// Company profile attached 1:1 to a login identity
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Company {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company_name: String,
    pub description: String,
    /// Data URI, empty when unset
    pub logo: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub registration_number: String,
    pub country_of_registration: String,
    pub other_industry: String,
    pub role: CompanyRole,
    pub subscription_status: SubscriptionStatus,
    pub subscription_start_date: Option<DateTime<Utc>>,
    pub subscription_end_date: Option<DateTime<Utc>>,
    pub is_verified: bool,
    /// Industry ids the company operates in
    pub industries: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Company {
    /// Display name, falling back to the account email
    pub fn display_name<'a>(&'a self, account_email: &'a str) -> &'a str {
        if self.company_name.is_empty() {
            account_email
        } else {
            &self.company_name
        }
    }
}

/// Registration payload: identity + company metadata
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegisterAccount {
    #[schema(example = "buyer@acme.com")]
    pub email: String,
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
    #[schema(example = "SecurePass123!")]
    pub password_confirm: String,
    pub role: CompanyRole,
    #[schema(example = "Acme Metals LLC")]
    pub company_name: String,
    #[serde(default)]
    pub industries: Vec<Uuid>,
    #[serde(default)]
    pub other_industry: String,
    #[serde(default)]
    pub terms_accepted: bool,
}

/// Profile edit payload
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateCompany {
    pub company_name: Option<String>,
    pub description: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub registration_number: Option<String>,
    pub country_of_registration: Option<String>,
    pub industries: Option<Vec<Uuid>>,
    pub other_industry: Option<String>,
    /// Replaces the logo when present
    pub logo: Option<super::ImageUpload>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vendor_starts_pending() {
        let sub = InitialSubscription::for_role(CompanyRole::Vendor, Utc::now());
        assert_eq!(sub.status, SubscriptionStatus::Pending);
        assert!(sub.start_date.is_none());
        assert!(sub.end_date.is_none());
    }

    #[test]
    fn test_buyers_start_active_without_end_date() {
        let now = Utc::now();
        for role in [CompanyRole::BusinessBuyer, CompanyRole::ConsumerBuyer] {
            let sub = InitialSubscription::for_role(role, now);
            assert_eq!(sub.status, SubscriptionStatus::Active);
            assert_eq!(sub.start_date, Some(now));
            assert!(sub.end_date.is_none());
        }
    }

    #[test]
    fn test_role_round_trips_through_storage_string() {
        for role in [
            CompanyRole::Vendor,
            CompanyRole::BusinessBuyer,
            CompanyRole::ConsumerBuyer,
        ] {
            assert_eq!(CompanyRole::from(role.as_str()), role);
        }
    }

    #[test]
    fn test_unknown_subscription_status_is_pending() {
        assert_eq!(SubscriptionStatus::from("bogus"), SubscriptionStatus::Pending);
        assert!(SubscriptionStatus::from("active").is_active());
    }
}
