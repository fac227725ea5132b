//! Account service - company profile and the admin subscription hooks.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;
use validator::ValidateEmail;

use crate::domain::{AccountResponse, Company, Principal, SubscriptionStatus, UpdateCompany};
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::CompanyChanges;
use crate::infra::UnitOfWork;
use crate::with_transaction;

#[async_trait]
pub trait AccountService: Send + Sync {
    async fn get_profile(&self, principal: &Principal) -> AppResult<AccountResponse>;

    async fn update_profile(
        &self,
        principal: &Principal,
        changes: UpdateCompany,
    ) -> AppResult<AccountResponse>;

    /// Staff only. Called when the external payment step settles.
    async fn set_subscription(
        &self,
        principal: &Principal,
        company_id: Uuid,
        status: SubscriptionStatus,
    ) -> AppResult<Company>;

    /// Staff only
    async fn set_verified(
        &self,
        principal: &Principal,
        company_id: Uuid,
        verified: bool,
    ) -> AppResult<Company>;
}

pub struct AccountManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> AccountManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

fn company_changes(changes: &mut UpdateCompany) -> AppResult<CompanyChanges> {
    if let Some(name) = &changes.company_name {
        if name.trim().is_empty() {
            return Err(AppError::validation("Company name is required"));
        }
    }
    if let Some(email) = &changes.contact_email {
        if !email.is_empty() && !email.validate_email() {
            return Err(AppError::validation("Invalid contact email"));
        }
    }
    let logo = changes.logo.take().map(|l| l.into_data_uri()).transpose()?;

    Ok(CompanyChanges {
        company_name: changes.company_name.take().map(|n| n.trim().to_string()),
        description: changes.description.take(),
        logo,
        contact_email: changes.contact_email.take(),
        contact_phone: changes.contact_phone.take(),
        registration_number: changes.registration_number.take(),
        country_of_registration: changes.country_of_registration.take(),
        other_industry: changes.other_industry.take(),
    })
}

#[async_trait]
impl<U: UnitOfWork> AccountService for AccountManager<U> {
    async fn get_profile(&self, principal: &Principal) -> AppResult<AccountResponse> {
        let accounts = self.uow.accounts();
        let account = accounts
            .find_by_id(principal.user_id)
            .await?
            .ok_or(AppError::NotFound)?;
        let company = accounts
            .find_company(principal.company_id)
            .await?
            .ok_or(AppError::NotFound)?;
        Ok(AccountResponse::new(account, company))
    }

    async fn update_profile(
        &self,
        principal: &Principal,
        mut changes: UpdateCompany,
    ) -> AppResult<AccountResponse> {
        let record = company_changes(&mut changes)?;
        let industries = changes.industries.take();
        let company_id = principal.company_id;

        let company = with_transaction!(self.uow, |ctx| {
            let accounts = ctx.accounts();
            if let Some(requested) = industries {
                let known = accounts.known_industries(requested.clone()).await?;
                if let Some(unknown) = requested.iter().find(|id| !known.contains(id)) {
                    return Err(AppError::validation(format!("Unknown industry: {}", unknown)));
                }
                accounts.set_industries(company_id, known).await?;
            }
            accounts.update_company(company_id, record).await
        })?;

        let account = self
            .uow
            .accounts()
            .find_by_id(principal.user_id)
            .await?
            .ok_or(AppError::NotFound)?;
        Ok(AccountResponse::new(account, company))
    }

    async fn set_subscription(
        &self,
        principal: &Principal,
        company_id: Uuid,
        status: SubscriptionStatus,
    ) -> AppResult<Company> {
        principal.require_staff()?;
        let company = self
            .uow
            .accounts()
            .set_subscription(company_id, status, Utc::now())
            .await?;
        tracing::info!(%company_id, status = %status, "Subscription updated");
        Ok(company)
    }

    async fn set_verified(
        &self,
        principal: &Principal,
        company_id: Uuid,
        verified: bool,
    ) -> AppResult<Company> {
        principal.require_staff()?;
        self.uow.accounts().set_verified(company_id, verified).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::fixtures::principal;
    use crate::domain::{CompanyRole, ImageUpload};
    use crate::infra::MockAccountRepository;
    use crate::services::test_support::TestUnitOfWork;

    #[tokio::test]
    async fn test_admin_hooks_require_staff() {
        let service = AccountManager::new(Arc::new(TestUnitOfWork::default()));
        let vendor = principal(CompanyRole::Vendor, SubscriptionStatus::Active);

        let sub = service
            .set_subscription(&vendor, Uuid::new_v4(), SubscriptionStatus::Active)
            .await;
        let verify = service.set_verified(&vendor, Uuid::new_v4(), true).await;
        assert!(matches!(sub, Err(AppError::Forbidden(_))));
        assert!(matches!(verify, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_staff_activation_goes_to_repository() {
        let company_id = Uuid::new_v4();
        let mut repo = MockAccountRepository::new();
        repo.expect_set_subscription()
            .withf(move |id, status, _| *id == company_id && *status == SubscriptionStatus::Active)
            .times(1)
            .returning(|_, _, _| Err(AppError::NotFound));

        let service = AccountManager::new(Arc::new(TestUnitOfWork::default().with_accounts(repo)));
        let mut staff = principal(CompanyRole::ConsumerBuyer, SubscriptionStatus::Active);
        staff.is_staff = true;

        let result = service
            .set_subscription(&staff, company_id, SubscriptionStatus::Active)
            .await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[test]
    fn test_company_changes_rejects_blank_name_and_bad_logo() {
        let mut blank = UpdateCompany {
            company_name: Some("  ".into()),
            ..Default::default()
        };
        assert!(company_changes(&mut blank).is_err());

        let mut bad_logo = UpdateCompany {
            logo: Some(ImageUpload::new("application/pdf", b"%PDF")),
            ..Default::default()
        };
        assert!(company_changes(&mut bad_logo).is_err());
    }

    #[test]
    fn test_company_changes_converts_logo() {
        let mut changes = UpdateCompany {
            company_name: Some(" Acme ".into()),
            logo: Some(ImageUpload::new("image/png", b"png")),
            ..Default::default()
        };
        let record = company_changes(&mut changes).unwrap();
        assert_eq!(record.company_name.as_deref(), Some("Acme"));
        assert!(record.logo.unwrap().starts_with("data:image/png;base64,"));
        assert!(record.description.is_none());
    }
}
