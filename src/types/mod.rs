//! Shared types for list and write responses.

mod pagination;
mod response;

pub use pagination::{
    ConversationPage, InquiryPage, NotificationPage, PageQuery, Paginated, PaginationMeta,
    PaginationParams, ProductPage, QuotePage,
};
pub use response::{Created, NoContent, UpdatedResponse};
