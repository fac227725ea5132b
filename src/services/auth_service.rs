//! Authentication service - registration, login and principal resolution.
//!
//! SOLID (SRP): Handles authentication concerns only.
//! DDD: Uses domain Password value object for hashing.
//! DDD: Registration creates the account and its company in one Unit of Work.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::ValidateEmail;

use crate::config::{Config, CHECKOUT_PATH, DASHBOARD_PATH, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::{
    AccountResponse, CompanyRole, InitialSubscription, Password, Principal, RegisterAccount,
    UserAccount,
};
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::NewCompanyRecord;
use crate::infra::UnitOfWork;
use crate::with_transaction;

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub staff: bool,
    pub exp: i64,
    pub iat: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token expiration time in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
}

/// Result of a successful registration
#[derive(Debug, Serialize, ToSchema)]
pub struct Registration {
    pub account: AccountResponse,
    /// Checkout for vendors, the dashboard for buyers
    #[schema(example = "/payments/checkout")]
    pub next_step: String,
}

impl Registration {
    fn new(account: AccountResponse) -> Self {
        let next_step = if account.company.role.is_vendor() {
            CHECKOUT_PATH
        } else {
            DASHBOARD_PATH
        };
        Self {
            account,
            next_step: next_step.to_string(),
        }
    }
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create an account and its company profile atomically
    async fn register(&self, input: RegisterAccount) -> AppResult<Registration>;

    /// Login and return JWT token
    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;

    /// Load the caller's account and company as an explicit principal
    async fn principal(&self, user_id: Uuid) -> AppResult<Principal>;
}

/// Generate JWT token for an account
fn generate_token(account: &UserAccount, config: &Config) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: account.id,
        email: account.email.clone(),
        staff: account.is_staff,
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(TokenResponse {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.jwt_expiration_hours * SECONDS_PER_HOUR,
    })
}

fn verify_token_internal(token: &str, config: &Config) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

/// Form-level checks that must pass before anything is written.
fn check_registration(input: &RegisterAccount) -> AppResult<()> {
    if !input.email.trim().validate_email() {
        return Err(AppError::validation("Invalid email format"));
    }
    if input.company_name.trim().is_empty() {
        return Err(AppError::validation("Company name is required"));
    }
    if !input.terms_accepted {
        return Err(AppError::validation(
            "You must accept the terms and conditions",
        ));
    }
    Ok(())
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(&self, input: RegisterAccount) -> AppResult<Registration> {
        check_registration(&input)?;
        let password_hash =
            Password::confirmed(&input.password, &input.password_confirm)?.into_string();

        let email = input.email.trim().to_lowercase();
        let role: CompanyRole = input.role;
        let company_name = input.company_name.trim().to_string();
        let other_industry = input.other_industry;
        let requested_industries = input.industries;

        let account = with_transaction!(self.uow, |ctx| {
            let accounts = ctx.accounts();
            if accounts.find_by_email(&email).await?.is_some() {
                return Err(AppError::conflict("An account with this email"));
            }

            let known = accounts.known_industries(requested_industries.clone()).await?;
            if let Some(unknown) = requested_industries.iter().find(|id| !known.contains(id)) {
                return Err(AppError::validation(format!("Unknown industry: {}", unknown)));
            }

            let account = accounts.create_account(email, password_hash).await?;
            let mut company = accounts
                .create_company(NewCompanyRecord {
                    user_id: account.id,
                    company_name,
                    role,
                    subscription: InitialSubscription::for_role(role, Utc::now()),
                    other_industry,
                })
                .await?;
            accounts.set_industries(company.id, known.clone()).await?;
            company.industries = known;

            Ok(AccountResponse::new(account, company))
        })?;

        tracing::info!(
            user_id = %account.user_id,
            company_id = %account.company.id,
            role = %account.company.role,
            "Account registered"
        );
        Ok(Registration::new(account))
    }

    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse> {
        let email = email.trim().to_lowercase();
        let account = self.uow.accounts().find_by_email(&email).await?;

        // Unknown emails still pay for one hash verification
        match account {
            Some(account) if Password::from_hash(account.password_hash.clone()).verify(&password) => {
                generate_token(&account, &self.config)
            }
            Some(_) => Err(AppError::InvalidCredentials),
            None => {
                Password::verify_dummy(&password);
                Err(AppError::InvalidCredentials)
            }
        }
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        verify_token_internal(token, &self.config)
    }

    async fn principal(&self, user_id: Uuid) -> AppResult<Principal> {
        let accounts = self.uow.accounts();
        let account = accounts.find_by_id(user_id).await?.ok_or(AppError::NotFound)?;
        let company = accounts
            .find_company_by_user(user_id)
            .await?
            .ok_or(AppError::NotFound)?;
        Ok(Principal::new(&account, &company))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Company, SubscriptionStatus};
    use crate::infra::MockAccountRepository;
    use crate::services::test_support::TestUnitOfWork;

    fn registration(role: CompanyRole) -> RegisterAccount {
        RegisterAccount {
            email: "owner@acme.com".into(),
            password: "SecurePass123!".into(),
            password_confirm: "SecurePass123!".into(),
            role,
            company_name: "Acme".into(),
            industries: vec![],
            other_industry: String::new(),
            terms_accepted: true,
        }
    }

    fn account(email: &str, password: &str) -> UserAccount {
        UserAccount {
            id: Uuid::new_v4(),
            email: email.into(),
            password_hash: Password::new(password).unwrap().into_string(),
            is_staff: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn company_for(user_id: Uuid) -> Company {
        Company {
            id: Uuid::new_v4(),
            user_id,
            company_name: "Acme".into(),
            description: String::new(),
            logo: String::new(),
            contact_email: String::new(),
            contact_phone: String::new(),
            registration_number: String::new(),
            country_of_registration: String::new(),
            other_industry: String::new(),
            role: CompanyRole::Vendor,
            subscription_status: SubscriptionStatus::Active,
            subscription_start_date: None,
            subscription_end_date: None,
            is_verified: false,
            industries: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn service(accounts: MockAccountRepository) -> Authenticator<TestUnitOfWork> {
        let uow = TestUnitOfWork::default().with_accounts(accounts);
        Authenticator::new(
            Arc::new(uow),
            Config::new("sqlite::memory:", "test-secret-that-is-at-least-32-chars"),
        )
    }

    #[tokio::test]
    async fn test_register_rejects_password_mismatch_before_writing() {
        let auth = service(MockAccountRepository::new());
        let mut input = registration(CompanyRole::Vendor);
        input.password_confirm = "Different123!".into();

        let err = auth.register(input).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg == "Passwords don't match"));
    }

    #[tokio::test]
    async fn test_register_requires_terms() {
        let auth = service(MockAccountRepository::new());
        let mut input = registration(CompanyRole::BusinessBuyer);
        input.terms_accepted = false;

        assert!(matches!(
            auth.register(input).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_register_rejects_bad_email() {
        let auth = service(MockAccountRepository::new());
        let mut input = registration(CompanyRole::Vendor);
        input.email = "not-an-email".into();

        assert!(matches!(
            auth.register(input).await,
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_next_step_depends_on_role() {
        let vendor = company_for(Uuid::new_v4());
        let acc = account("v@acme.com", "SecurePass123!");
        let reg = Registration::new(AccountResponse::new(acc.clone(), vendor.clone()));
        assert_eq!(reg.next_step, CHECKOUT_PATH);

        let mut buyer = vendor;
        buyer.role = CompanyRole::ConsumerBuyer;
        let reg = Registration::new(AccountResponse::new(acc, buyer));
        assert_eq!(reg.next_step, DASHBOARD_PATH);
    }

    #[tokio::test]
    async fn test_login_issues_verifiable_token() {
        let acc = account("owner@acme.com", "SecurePass123!");
        let expected_id = acc.id;
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_email()
            .withf(|email| email == "owner@acme.com")
            .returning(move |_| Ok(Some(acc.clone())));

        let auth = service(repo);
        let token = auth
            .login(" Owner@Acme.com ".into(), "SecurePass123!".into())
            .await
            .unwrap();
        assert_eq!(token.token_type, TOKEN_TYPE_BEARER);

        let claims = auth.verify_token(&token.access_token).unwrap();
        assert_eq!(claims.sub, expected_id);
        assert!(!claims.staff);
    }

    #[tokio::test]
    async fn test_login_wrong_password_and_unknown_email_look_the_same() {
        let acc = account("owner@acme.com", "SecurePass123!");
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_email().returning(move |email| {
            Ok((email == "owner@acme.com").then(|| acc.clone()))
        });

        let auth = service(repo);
        let wrong = auth
            .login("owner@acme.com".into(), "WrongPass123!".into())
            .await;
        let unknown = auth
            .login("ghost@acme.com".into(), "SecurePass123!".into())
            .await;
        assert!(matches!(wrong, Err(AppError::InvalidCredentials)));
        assert!(matches!(unknown, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_principal_requires_company() {
        let acc = account("owner@acme.com", "SecurePass123!");
        let user_id = acc.id;
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(acc.clone())));
        repo.expect_find_company_by_user().returning(|_| Ok(None));

        let auth = service(repo);
        assert!(matches!(
            auth.principal(user_id).await,
            Err(AppError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_principal_carries_company_state() {
        let acc = account("owner@acme.com", "SecurePass123!");
        let user_id = acc.id;
        let company = company_for(user_id);
        let company_id = company.id;
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(acc.clone())));
        repo.expect_find_company_by_user()
            .returning(move |_| Ok(Some(company.clone())));

        let principal = service(repo).principal(user_id).await.unwrap();
        assert_eq!(principal.company_id, company_id);
        assert_eq!(principal.role, CompanyRole::Vendor);
        assert!(principal.has_active_subscription());
    }
}
