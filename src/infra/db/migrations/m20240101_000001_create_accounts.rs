//! Migration: users, companies, industries and the company/industry join table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(Users::IsStaff)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Users::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Industries::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Industries::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Industries::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Industries::Slug).string().not_null().unique_key())
                    .col(ColumnDef::new(Industries::Description).text().not_null().default(""))
                    .col(ColumnDef::new(Industries::Icon).string_len(50).not_null().default(""))
                    .col(ColumnDef::new(Industries::Image).text().not_null().default(""))
                    .col(
                        ColumnDef::new(Industries::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Industries::DisplayOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Industries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Companies::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Companies::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Companies::UserId).uuid().not_null().unique_key())
                    .col(ColumnDef::new(Companies::CompanyName).string_len(200).not_null())
                    .col(ColumnDef::new(Companies::Description).text().not_null().default(""))
                    .col(ColumnDef::new(Companies::Logo).text().not_null().default(""))
                    .col(ColumnDef::new(Companies::ContactEmail).string().not_null().default(""))
                    .col(ColumnDef::new(Companies::ContactPhone).string_len(20).not_null().default(""))
                    .col(
                        ColumnDef::new(Companies::RegistrationNumber)
                            .string_len(100)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Companies::CountryOfRegistration)
                            .string_len(100)
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Companies::OtherIndustry).string_len(100).not_null().default(""))
                    .col(ColumnDef::new(Companies::Role).string_len(20).not_null())
                    .col(
                        ColumnDef::new(Companies::SubscriptionStatus)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Companies::SubscriptionStartDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Companies::SubscriptionEndDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Companies::IsVerified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Companies::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Companies::UpdatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_companies_user")
                            .from(Companies::Table, Companies::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CompanyIndustries::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CompanyIndustries::CompanyId).uuid().not_null())
                    .col(ColumnDef::new(CompanyIndustries::IndustryId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .col(CompanyIndustries::CompanyId)
                            .col(CompanyIndustries::IndustryId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_company_industries_company")
                            .from(CompanyIndustries::Table, CompanyIndustries::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_company_industries_industry")
                            .from(CompanyIndustries::Table, CompanyIndustries::IndustryId)
                            .to(Industries::Table, Industries::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_companies_subscription_status")
                    .table(Companies::Table)
                    .col(Companies::SubscriptionStatus)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CompanyIndustries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Companies::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Industries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Users {
    Table,
    Id,
    Email,
    PasswordHash,
    IsStaff,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub enum Industries {
    Table,
    Id,
    Name,
    Slug,
    Description,
    Icon,
    Image,
    IsActive,
    DisplayOrder,
    CreatedAt,
}

#[derive(Iden)]
pub enum Companies {
    Table,
    Id,
    UserId,
    CompanyName,
    Description,
    Logo,
    ContactEmail,
    ContactPhone,
    RegistrationNumber,
    CountryOfRegistration,
    OtherIndustry,
    Role,
    SubscriptionStatus,
    SubscriptionStartDate,
    SubscriptionEndDate,
    IsVerified,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub enum CompanyIndustries {
    Table,
    CompanyId,
    IndustryId,
}
