// core/src/models/mod.rs

//! Data structures representing stored entities.

pub mod cart_line;
pub mod legal_page;
pub mod product;
pub mod quick_cache;

pub use cart_line::{line_total, CartLine, CartLineSeed};
pub use legal_page::{LegalPage, LegalPageDraft};
pub use product::{Product, ProductDraft};
pub use quick_cache::QuickCacheEntry;

/// Products and legal pages use database-assigned integer ids.
pub type ProductId = i64;
pub type LegalPageId = i64;
