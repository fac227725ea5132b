//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod category;
pub mod company;
pub mod company_industry;
pub mod contact_inquiry;
pub mod conversation;
pub mod conversation_participant;
pub mod hero_image;
pub mod industry;
pub mod message;
pub mod notification;
pub mod product;
pub mod quote_request;
pub mod site_settings;
pub mod testimonial;
pub mod user;
