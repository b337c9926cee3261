// core/src/store/mod.rs

//! Persistence boundary for products, cart lines and legal pages.
//!
//! Two backends implement the same traits: [`memory::MemoryStore`] for tests and
//! database-less development, and [`postgres::PgStore`] for deployments. Ordering
//! contracts are part of the trait: every `list_*` returns newest first.

use async_trait::async_trait;

use crate::error::ShopResult;
use crate::models::{CartLine, CartLineSeed, LegalPage, LegalPageDraft, LegalPageId, Product, ProductDraft, ProductId};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait ProductStore: Send + Sync {
  async fn list_products(&self) -> ShopResult<Vec<Product>>;
  async fn get_product(&self, id: ProductId) -> ShopResult<Option<Product>>;
  /// `image` is the stored file name; `draft.image` is ignored.
  async fn create_product(&self, draft: &ProductDraft, image: &str) -> ShopResult<Product>;
  /// Keeps the current image when `draft.image` is `None`. `Ok(None)` if absent.
  async fn update_product(&self, id: ProductId, draft: &ProductDraft) -> ShopResult<Option<Product>>;
  /// `Ok(false)` if there was nothing to delete.
  async fn delete_product(&self, id: ProductId) -> ShopResult<bool>;
}

#[async_trait]
pub trait CartStore: Send + Sync {
  /// Atomic insert-or-increment on (session, product).
  ///
  /// On insert the seed's snapshot and qty become the line. On conflict only
  /// `seed.qty` is used: it is added to the stored qty and the total is
  /// recomputed from the stored unit price. Concurrent calls never lose a delta.
  async fn add_or_increment(&self, seed: &CartLineSeed) -> ShopResult<CartLine>;
  async fn find_line(&self, session_id: &str, product_id: ProductId) -> ShopResult<Option<CartLine>>;
  /// Most recently created first.
  async fn list_lines(&self, session_id: &str) -> ShopResult<Vec<CartLine>>;
  /// `Ok(false)` when no line matched.
  async fn remove_line(&self, session_id: &str, product_id: ProductId) -> ShopResult<bool>;
}

#[async_trait]
pub trait LegalPageStore: Send + Sync {
  async fn list_legal_pages(&self) -> ShopResult<Vec<LegalPage>>;
  async fn get_legal_page(&self, id: LegalPageId) -> ShopResult<Option<LegalPage>>;
  async fn create_legal_page(&self, draft: &LegalPageDraft) -> ShopResult<LegalPage>;
  async fn update_legal_page(&self, id: LegalPageId, draft: &LegalPageDraft) -> ShopResult<Option<LegalPage>>;
  async fn delete_legal_page(&self, id: LegalPageId) -> ShopResult<bool>;
}
