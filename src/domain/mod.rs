//! Domain layer - business entities and rules.
//!
//! Types here know nothing about HTTP or the database; the only outside
//! dependency is the shared error type.

pub mod account;
pub mod catalog;
pub mod company;
pub mod content;
pub mod dashboard;
pub mod media;
pub mod messaging;
pub mod password;
pub mod quote;

pub use account::{AccountResponse, Principal, UserAccount};
pub use catalog::{
    Category, CategoryTree, Industry, IndustryOverview, IndustryStats, NewCategory, NewIndustry,
    Product, ProductDetail, ProductFilter, ProductInput, ProductStatus, SupplierSummary,
};
pub use company::{
    Company, CompanyRole, InitialSubscription, RegisterAccount, SubscriptionStatus, UpdateCompany,
};
pub use content::{
    ContactInquiry, HeroImage, HomePage, NewContactInquiry, NewHeroImage, NewTestimonial,
    PricingPage, SiteSettings, Testimonial, UpdateSiteSettings,
};
pub use dashboard::{ActivityItem, AdminDashboard, BuyerDashboard, Dashboard, IndustryShare, VendorDashboard};
pub use media::ImageUpload;
pub use messaging::{
    Conversation, ConversationDetail, ConversationSummary, Message, NewMessage, NewNotification,
    Notification, NotificationType, UnreadCountResponse, UnreadCounts,
};
pub use password::Password;
pub use quote::{NewQuoteRequest, QuoteRequest, QuoteResponseInput, QuoteStatus, QuoteSummary};
