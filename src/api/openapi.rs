//! OpenAPI documentation configuration.
//!
//! Served through Swagger UI at `/swagger-ui`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    account_handler, admin_handler, auth_handler, catalog_handler, content_handler,
    dashboard_handler, messaging_handler, notification_handler, quote_handler,
};
use crate::domain::{
    AccountResponse, ActivityItem, AdminDashboard, BuyerDashboard, Category, CategoryTree,
    Company, CompanyRole, ContactInquiry, Conversation, ConversationDetail, ConversationSummary,
    Dashboard, HeroImage, HomePage, ImageUpload, Industry, IndustryOverview, IndustryShare,
    IndustryStats, Message, NewCategory, NewContactInquiry, NewHeroImage, NewIndustry, NewMessage,
    NewQuoteRequest, NewTestimonial, Notification, NotificationType, PricingPage, Product,
    ProductDetail, ProductInput, ProductStatus, QuoteRequest, QuoteResponseInput, QuoteStatus,
    QuoteSummary, RegisterAccount, SiteSettings, SubscriptionStatus, SupplierSummary, Testimonial,
    UnreadCountResponse, UnreadCounts, UpdateCompany, UpdateSiteSettings, VendorDashboard,
};
use crate::services::{Registration, TokenResponse};
use crate::types::{
    ConversationPage, InquiryPage, NotificationPage, PaginationMeta, ProductPage,
    QuotePage, UpdatedResponse,
};

/// OpenAPI documentation for the marketplace API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "B2B Marketplace API",
        version = "0.1.0",
        description = "Multi-vendor B2B marketplace: company accounts, product catalog, quote requests, messaging and notifications",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Authentication
        auth_handler::register,
        auth_handler::login,
        // Account
        account_handler::get_profile,
        account_handler::update_profile,
        // Catalog
        catalog_handler::list_industries,
        catalog_handler::industry_overview,
        catalog_handler::get_industry,
        catalog_handler::list_categories,
        catalog_handler::category_products,
        catalog_handler::list_products,
        catalog_handler::get_product,
        catalog_handler::my_products,
        catalog_handler::create_product,
        catalog_handler::update_product,
        catalog_handler::delete_product,
        // Quotes
        quote_handler::request_quote,
        quote_handler::received_quotes,
        quote_handler::sent_quotes,
        quote_handler::respond_to_quote,
        quote_handler::close_quote,
        // Messaging
        messaging_handler::list_conversations,
        messaging_handler::get_conversation,
        messaging_handler::send_message,
        // Notifications
        notification_handler::list_notifications,
        notification_handler::mark_all_read,
        notification_handler::unread_count,
        // Dashboards
        dashboard_handler::dashboard,
        dashboard_handler::admin_dashboard,
        // Site
        content_handler::home,
        content_handler::pricing,
        content_handler::site_settings,
        content_handler::submit_contact,
        // Admin
        admin_handler::set_subscription,
        admin_handler::set_verification,
        admin_handler::create_industry,
        admin_handler::create_category,
        admin_handler::create_hero_image,
        admin_handler::create_testimonial,
        admin_handler::update_site_settings,
        admin_handler::list_inquiries,
        admin_handler::mark_inquiry_responded,
    ),
    components(
        schemas(
            // Accounts
            RegisterAccount, Registration, TokenResponse, AccountResponse, Company, CompanyRole,
            SubscriptionStatus, UpdateCompany, ImageUpload,
            auth_handler::LoginRequest,
            admin_handler::SubscriptionUpdate,
            admin_handler::VerificationUpdate,
            // Catalog
            Industry, NewIndustry, IndustryOverview, IndustryStats, Category, CategoryTree,
            NewCategory, Product, ProductStatus, ProductInput, ProductDetail, SupplierSummary,
            // Quotes and messaging
            QuoteRequest, QuoteStatus, NewQuoteRequest, QuoteResponseInput, QuoteSummary,
            Conversation, ConversationSummary, ConversationDetail, Message, NewMessage,
            Notification, NotificationType, UnreadCounts, UnreadCountResponse,
            // Dashboards
            Dashboard, VendorDashboard, BuyerDashboard, AdminDashboard, ActivityItem, IndustryShare,
            // Site content
            HomePage, PricingPage, SiteSettings, UpdateSiteSettings, HeroImage, NewHeroImage,
            Testimonial, NewTestimonial, ContactInquiry, NewContactInquiry,
            // Shared
            PaginationMeta, ProductPage, QuotePage, ConversationPage, NotificationPage,
            InquiryPage, UpdatedResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration and login"),
        (name = "Account", description = "Company profile of the signed-in account"),
        (name = "Catalog", description = "Industries, categories and product listings"),
        (name = "Vendor", description = "Product management for subscribed vendors"),
        (name = "Quotes", description = "Quote requests and supplier responses"),
        (name = "Messaging", description = "Quote conversations"),
        (name = "Notifications", description = "Notifications and unread counts"),
        (name = "Dashboard", description = "Role dashboards"),
        (name = "Site", description = "Marketing pages and contact form"),
        (name = "Admin", description = "Staff-only administration")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /auth/login"))
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_workflow_paths() {
        let doc = ApiDoc::openapi();
        for path in [
            "/auth/register",
            "/products/{id}/quotes",
            "/conversations/{id}/messages",
            "/notifications/unread-count",
            "/admin/dashboard",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
