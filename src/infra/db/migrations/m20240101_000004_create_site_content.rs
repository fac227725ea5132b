//! Migration: marketing content (hero carousel, testimonials, settings, contact inquiries).

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(HeroImages::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(HeroImages::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(HeroImages::Title).string_len(200).not_null())
                    .col(ColumnDef::new(HeroImages::HeroTitle).string_len(300).not_null())
                    .col(ColumnDef::new(HeroImages::HeroSubtitle).text().not_null())
                    .col(ColumnDef::new(HeroImages::Image).text().not_null())
                    .col(
                        ColumnDef::new(HeroImages::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(HeroImages::DisplayOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(HeroImages::CreatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Testimonials::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Testimonials::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Testimonials::ClientName).string_len(200).not_null())
                    .col(ColumnDef::new(Testimonials::ClientTitle).string_len(200).not_null().default(""))
                    .col(ColumnDef::new(Testimonials::CompanyName).string_len(200).not_null())
                    .col(ColumnDef::new(Testimonials::TestimonialText).text().not_null())
                    .col(ColumnDef::new(Testimonials::Rating).integer().not_null().default(5))
                    .col(
                        ColumnDef::new(Testimonials::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Testimonials::DisplayOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Testimonials::CreatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SiteSettings::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SiteSettings::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(SiteSettings::SiteName).string_len(100).not_null())
                    .col(
                        ColumnDef::new(SiteSettings::AnnualFeeMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(SiteSettings::Currency).string_len(3).not_null().default("USD"))
                    .col(ColumnDef::new(SiteSettings::ContactEmail).string().not_null())
                    .col(ColumnDef::new(SiteSettings::ContactPhone).string_len(20).not_null().default(""))
                    .col(ColumnDef::new(SiteSettings::Address).text().not_null().default(""))
                    .col(ColumnDef::new(SiteSettings::SiteLogo).text().not_null().default(""))
                    .col(ColumnDef::new(SiteSettings::UpdatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ContactInquiries::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ContactInquiries::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(ContactInquiries::Name).string_len(100).not_null())
                    .col(ColumnDef::new(ContactInquiries::Email).string().not_null())
                    .col(ColumnDef::new(ContactInquiries::Subject).string_len(200).not_null())
                    .col(ColumnDef::new(ContactInquiries::Message).text().not_null())
                    .col(
                        ColumnDef::new(ContactInquiries::IsResponded)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ContactInquiries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ContactInquiries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SiteSettings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Testimonials::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(HeroImages::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum HeroImages {
    Table,
    Id,
    Title,
    HeroTitle,
    HeroSubtitle,
    Image,
    IsActive,
    DisplayOrder,
    CreatedAt,
}

#[derive(Iden)]
enum Testimonials {
    Table,
    Id,
    ClientName,
    ClientTitle,
    CompanyName,
    TestimonialText,
    Rating,
    IsActive,
    DisplayOrder,
    CreatedAt,
}

#[derive(Iden)]
enum SiteSettings {
    Table,
    Id,
    SiteName,
    AnnualFeeMinor,
    Currency,
    ContactEmail,
    ContactPhone,
    Address,
    SiteLogo,
    UpdatedAt,
}

#[derive(Iden)]
enum ContactInquiries {
    Table,
    Id,
    Name,
    Email,
    Subject,
    Message,
    IsResponded,
    CreatedAt,
}
