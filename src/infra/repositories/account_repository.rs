//! Login identities and their company profiles.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
};
use uuid::Uuid;

use super::base;
use super::entities::{
    company::{self, Entity as CompanyEntity},
    company_industry::{self, Entity as CompanyIndustryEntity},
    industry::{self, Entity as IndustryEntity},
    user::{self, Entity as UserEntity},
};
use crate::domain::{Company, CompanyRole, InitialSubscription, SubscriptionStatus, UserAccount};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Company row to insert at registration
#[derive(Debug, Clone)]
pub struct NewCompanyRecord {
    pub user_id: Uuid,
    pub company_name: String,
    pub role: CompanyRole,
    pub subscription: InitialSubscription,
    pub other_industry: String,
}

/// Profile fields to overwrite; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct CompanyChanges {
    pub company_name: Option<String>,
    pub description: Option<String>,
    /// Data URI
    pub logo: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub registration_number: Option<String>,
    pub country_of_registration: Option<String>,
    pub other_industry: Option<String>,
}

/// Account repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<UserAccount>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserAccount>>;

    async fn find_company(&self, id: Uuid) -> AppResult<Option<Company>>;

    async fn find_company_by_user(&self, user_id: Uuid) -> AppResult<Option<Company>>;

    /// Account that owns the given company
    async fn find_company_owner(&self, company_id: Uuid) -> AppResult<Option<UserAccount>>;

    /// Company id -> company name for the given ids
    async fn company_names(&self, ids: Vec<Uuid>) -> AppResult<HashMap<Uuid, String>>;

    /// Set the subscription status, stamping start (active) or end (expired/cancelled) dates
    async fn set_subscription(
        &self,
        company_id: Uuid,
        status: SubscriptionStatus,
        now: DateTime<Utc>,
    ) -> AppResult<Company>;

    async fn set_verified(&self, company_id: Uuid, verified: bool) -> AppResult<Company>;

    async fn count_users(&self) -> AppResult<u64>;

    async fn count_users_since(&self, since: DateTime<Utc>) -> AppResult<u64>;

    async fn count_companies(&self) -> AppResult<u64>;

    async fn count_active_subscriptions(&self) -> AppResult<u64>;

    /// Newest companies first
    async fn recent_companies(&self, limit: u64) -> AppResult<Vec<Company>>;
}

/// Concrete implementation of AccountRepository
pub struct AccountStore {
    db: DatabaseConnection,
}

impl AccountStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountRepository for AccountStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<UserAccount>> {
        let result = UserEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(UserAccount::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserAccount>> {
        find_account_by_email(&self.db, email).await
    }

    async fn find_company(&self, id: Uuid) -> AppResult<Option<Company>> {
        find_company(&self.db, id).await
    }

    async fn find_company_by_user(&self, user_id: Uuid) -> AppResult<Option<Company>> {
        let model = CompanyEntity::find()
            .filter(company::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?;
        match model {
            Some(model) => Ok(Some(with_industries(&self.db, model).await?)),
            None => Ok(None),
        }
    }

    async fn find_company_owner(&self, company_id: Uuid) -> AppResult<Option<UserAccount>> {
        let Some(company) = CompanyEntity::find_by_id(company_id).one(&self.db).await? else {
            return Ok(None);
        };
        let result = UserEntity::find_by_id(company.user_id).one(&self.db).await?;
        Ok(result.map(UserAccount::from))
    }

    async fn company_names(&self, ids: Vec<Uuid>) -> AppResult<HashMap<Uuid, String>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows: Vec<(Uuid, String)> = CompanyEntity::find()
            .select_only()
            .column(company::Column::Id)
            .column(company::Column::CompanyName)
            .filter(company::Column::Id.is_in(ids))
            .into_tuple()
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().collect())
    }

    async fn set_subscription(
        &self,
        company_id: Uuid,
        status: SubscriptionStatus,
        now: DateTime<Utc>,
    ) -> AppResult<Company> {
        let model = CompanyEntity::find_by_id(company_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: company::ActiveModel = model.into();
        active.subscription_status = Set(status.as_str().to_string());
        match status {
            SubscriptionStatus::Active => {
                active.subscription_start_date = Set(Some(now));
                active.subscription_end_date = Set(None);
            }
            SubscriptionStatus::Expired | SubscriptionStatus::Cancelled => {
                active.subscription_end_date = Set(Some(now));
            }
            SubscriptionStatus::Pending => {}
        }
        active.updated_at = Set(now);

        let model = active.update(&self.db).await?;
        with_industries(&self.db, model).await
    }

    async fn set_verified(&self, company_id: Uuid, verified: bool) -> AppResult<Company> {
        let model = CompanyEntity::find_by_id(company_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: company::ActiveModel = model.into();
        active.is_verified = Set(verified);
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await?;
        with_industries(&self.db, model).await
    }

    async fn count_users(&self) -> AppResult<u64> {
        base::count(&self.db, UserEntity::find()).await
    }

    async fn count_users_since(&self, since: DateTime<Utc>) -> AppResult<u64> {
        base::count(
            &self.db,
            UserEntity::find().filter(user::Column::CreatedAt.gte(since)),
        )
        .await
    }

    async fn count_companies(&self) -> AppResult<u64> {
        base::count(&self.db, CompanyEntity::find()).await
    }

    async fn count_active_subscriptions(&self) -> AppResult<u64> {
        base::count(
            &self.db,
            CompanyEntity::find().filter(
                company::Column::SubscriptionStatus.eq(SubscriptionStatus::Active.as_str()),
            ),
        )
        .await
    }

    async fn recent_companies(&self, limit: u64) -> AppResult<Vec<Company>> {
        let models = CompanyEntity::find()
            .order_by_desc(company::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await?;
        Ok(models
            .into_iter()
            .map(|m| m.into_domain(Vec::new()))
            .collect())
    }
}

/// Transaction-aware account repository.
pub struct TxAccountRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxAccountRepository<'a> {
    pub(crate) fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<UserAccount>> {
        find_account_by_email(self.txn, email).await
    }

    pub async fn find_company(&self, id: Uuid) -> AppResult<Option<Company>> {
        find_company(self.txn, id).await
    }

    pub async fn create_account(&self, email: String, password_hash: String) -> AppResult<UserAccount> {
        let now = Utc::now();
        let model = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email),
            password_hash: Set(password_hash),
            is_staff: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.txn)
        .await
        .map_err(|e| match e.sql_err() {
            // A concurrent registration won the race for this email
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                AppError::conflict("An account with this email")
            }
            _ => AppError::from(e),
        })?;

        Ok(UserAccount::from(model))
    }

    pub async fn create_company(&self, record: NewCompanyRecord) -> AppResult<Company> {
        let now = Utc::now();
        let model = company::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(record.user_id),
            company_name: Set(record.company_name),
            description: Set(String::new()),
            logo: Set(String::new()),
            contact_email: Set(String::new()),
            contact_phone: Set(String::new()),
            registration_number: Set(String::new()),
            country_of_registration: Set(String::new()),
            other_industry: Set(record.other_industry),
            role: Set(record.role.as_str().to_string()),
            subscription_status: Set(record.subscription.status.as_str().to_string()),
            subscription_start_date: Set(record.subscription.start_date),
            subscription_end_date: Set(record.subscription.end_date),
            is_verified: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.txn)
        .await?;

        Ok(model.into_domain(Vec::new()))
    }

    /// Of `ids`, the ones that name an existing industry.
    pub async fn known_industries(&self, ids: Vec<Uuid>) -> AppResult<Vec<Uuid>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let found: Vec<Uuid> = IndustryEntity::find()
            .select_only()
            .column(industry::Column::Id)
            .filter(industry::Column::Id.is_in(ids))
            .into_tuple()
            .all(self.txn)
            .await?;
        Ok(found)
    }

    /// Replace the company's industry links.
    pub async fn set_industries(&self, company_id: Uuid, industries: Vec<Uuid>) -> AppResult<()> {
        CompanyIndustryEntity::delete_many()
            .filter(company_industry::Column::CompanyId.eq(company_id))
            .exec(self.txn)
            .await?;

        let mut seen = std::collections::HashSet::new();
        let rows: Vec<company_industry::ActiveModel> = industries
            .into_iter()
            .filter(|id| seen.insert(*id))
            .map(|industry_id| company_industry::ActiveModel {
                company_id: Set(company_id),
                industry_id: Set(industry_id),
            })
            .collect();
        if !rows.is_empty() {
            CompanyIndustryEntity::insert_many(rows)
                .exec_without_returning(self.txn)
                .await?;
        }
        Ok(())
    }

    pub async fn update_company(&self, company_id: Uuid, changes: CompanyChanges) -> AppResult<Company> {
        let model = CompanyEntity::find_by_id(company_id)
            .one(self.txn)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: company::ActiveModel = model.into();
        if let Some(v) = changes.company_name {
            active.company_name = Set(v);
        }
        if let Some(v) = changes.description {
            active.description = Set(v);
        }
        if let Some(v) = changes.logo {
            active.logo = Set(v);
        }
        if let Some(v) = changes.contact_email {
            active.contact_email = Set(v);
        }
        if let Some(v) = changes.contact_phone {
            active.contact_phone = Set(v);
        }
        if let Some(v) = changes.registration_number {
            active.registration_number = Set(v);
        }
        if let Some(v) = changes.country_of_registration {
            active.country_of_registration = Set(v);
        }
        if let Some(v) = changes.other_industry {
            active.other_industry = Set(v);
        }
        active.updated_at = Set(Utc::now());

        let model = active.update(self.txn).await?;
        with_industries(self.txn, model).await
    }
}

async fn find_account_by_email<C: ConnectionTrait>(
    conn: &C,
    email: &str,
) -> AppResult<Option<UserAccount>> {
    let result = UserEntity::find()
        .filter(user::Column::Email.eq(email))
        .one(conn)
        .await?;
    Ok(result.map(UserAccount::from))
}

async fn find_company<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<Option<Company>> {
    match CompanyEntity::find_by_id(id).one(conn).await? {
        Some(model) => Ok(Some(with_industries(conn, model).await?)),
        None => Ok(None),
    }
}

async fn with_industries<C: ConnectionTrait>(conn: &C, model: company::Model) -> AppResult<Company> {
    let industries: Vec<Uuid> = CompanyIndustryEntity::find()
        .select_only()
        .column(company_industry::Column::IndustryId)
        .filter(company_industry::Column::CompanyId.eq(model.id))
        .into_tuple()
        .all(conn)
        .await?;
    Ok(model.into_domain(industries))
}
