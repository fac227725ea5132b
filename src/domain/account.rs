//! Login identity and the authenticated principal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::company::{Company, CompanyRole, SubscriptionStatus};
use crate::errors::{AppError, AppResult};

/// Login identity. Every account owns exactly one [`Company`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Platform staff (admin dashboard, CMS management)
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Account + company pair returned by registration and profile reads
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AccountResponse {
    pub user_id: Uuid,
    #[schema(example = "buyer@acme.com")]
    pub email: String,
    pub is_staff: bool,
    pub company: Company,
}

impl AccountResponse {
    pub fn new(account: UserAccount, company: Company) -> Self {
        Self {
            user_id: account.id,
            email: account.email,
            is_staff: account.is_staff,
            company,
        }
    }
}

/// The authenticated caller, passed explicitly into every workflow call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Uuid,
    pub email: String,
    pub is_staff: bool,
    pub company_id: Uuid,
    pub company_name: String,
    pub role: CompanyRole,
    pub subscription_status: SubscriptionStatus,
}

impl Principal {
    pub fn new(account: &UserAccount, company: &Company) -> Self {
        Self {
            user_id: account.id,
            email: account.email.clone(),
            is_staff: account.is_staff,
            company_id: company.id,
            company_name: company.display_name(&account.email).to_string(),
            role: company.role,
            subscription_status: company.subscription_status,
        }
    }

    pub fn has_active_subscription(&self) -> bool {
        self.subscription_status.is_active()
    }

    /// Hard denial unless the caller is a vendor.
    pub fn require_vendor(&self) -> AppResult<()> {
        if self.role.is_vendor() {
            Ok(())
        } else {
            Err(AppError::forbidden("Only vendors may manage products."))
        }
    }

    /// Soft denial (redirect to pricing) unless the subscription is active.
    pub fn require_active_subscription(&self, message: &str) -> AppResult<()> {
        if self.has_active_subscription() {
            Ok(())
        } else {
            Err(AppError::subscription_inactive(message))
        }
    }

    /// Both vendor-management guards, role first.
    pub fn require_active_vendor(&self) -> AppResult<()> {
        self.require_vendor()?;
        self.require_active_subscription(
            "Your subscription is not active. Please renew to continue.",
        )
    }

    pub fn require_staff(&self) -> AppResult<()> {
        if self.is_staff {
            Ok(())
        } else {
            Err(AppError::forbidden("Staff access required."))
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn principal(role: CompanyRole, subscription: SubscriptionStatus) -> Principal {
        Principal {
            user_id: Uuid::new_v4(),
            email: "someone@example.com".to_string(),
            is_staff: false,
            company_id: Uuid::new_v4(),
            company_name: "Example Co".to_string(),
            role,
            subscription_status: subscription,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::principal;
    use super::*;

    #[test]
    fn test_vendor_guard_rejects_buyers_hard() {
        let buyer = principal(CompanyRole::BusinessBuyer, SubscriptionStatus::Active);
        let err = buyer.require_active_vendor().unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn test_inactive_vendor_is_sent_to_pricing() {
        let vendor = principal(CompanyRole::Vendor, SubscriptionStatus::Pending);
        let err = vendor.require_active_vendor().unwrap_err();
        assert!(matches!(err, AppError::SubscriptionInactive(_)));
    }

    #[test]
    fn test_active_vendor_passes_both_guards() {
        let vendor = principal(CompanyRole::Vendor, SubscriptionStatus::Active);
        assert!(vendor.require_active_vendor().is_ok());
    }

    #[test]
    fn test_role_is_checked_before_subscription() {
        let buyer = principal(CompanyRole::ConsumerBuyer, SubscriptionStatus::Expired);
        assert!(matches!(
            buyer.require_active_vendor(),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_staff_guard() {
        let mut p = principal(CompanyRole::Vendor, SubscriptionStatus::Active);
        assert!(p.require_staff().is_err());
        p.is_staff = true;
        assert!(p.require_staff().is_ok());
    }
}
