// core/src/store/postgres.rs

//! Postgres implementation of the store traits (runtime `sqlx` queries).

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{info, instrument};

use super::{CartStore, LegalPageStore, ProductStore};
use crate::error::ShopResult;
use crate::models::{
  line_total, CartLine, CartLineSeed, LegalPage, LegalPageDraft, LegalPageId, Product, ProductDraft, ProductId,
};

const PRODUCT_COLUMNS: &str = "id, name, details, price, image, size, color, category, created_at, updated_at";
const CART_COLUMNS: &str =
  "id, session_id, product_id, name, image, size, color, category, price, qty, total_price, created_at, updated_at";
const LEGAL_PAGE_COLUMNS: &str = "id, title, description, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  pub async fn connect(database_url: &str, max_connections: u32) -> ShopResult<Self> {
    let pool = PgPoolOptions::new()
      .max_connections(max_connections)
      .connect(database_url)
      .await?;
    info!("Successfully connected to the database.");
    Ok(Self::new(pool))
  }

  /// Applies the embedded migrations under `core/migrations`.
  pub async fn migrate(&self) -> ShopResult<()> {
    sqlx::migrate!("./migrations").run(&self.pool).await?;
    info!("Database migrations applied.");
    Ok(())
  }
}

#[async_trait]
impl ProductStore for PgStore {
  async fn list_products(&self) -> ShopResult<Vec<Product>> {
    let products: Vec<Product> = sqlx::query_as(&format!(
      "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at DESC, id DESC"
    ))
    .fetch_all(&self.pool)
    .await?;
    Ok(products)
  }

  async fn get_product(&self, id: ProductId) -> ShopResult<Option<Product>> {
    let product: Option<Product> = sqlx::query_as(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"))
      .bind(id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(product)
  }

  #[instrument(name = "pg::create_product", skip(self, draft), err(Display))]
  async fn create_product(&self, draft: &ProductDraft, image: &str) -> ShopResult<Product> {
    let product: Product = sqlx::query_as(&format!(
      "INSERT INTO products (name, details, price, image, size, color, category, created_at, updated_at) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, NOW(), NOW()) \
       RETURNING {PRODUCT_COLUMNS}"
    ))
    .bind(&draft.name)
    .bind(&draft.details)
    .bind(draft.price)
    .bind(image)
    .bind(&draft.size)
    .bind(&draft.color)
    .bind(&draft.category)
    .fetch_one(&self.pool)
    .await?;
    Ok(product)
  }

  #[instrument(name = "pg::update_product", skip(self, draft), err(Display))]
  async fn update_product(&self, id: ProductId, draft: &ProductDraft) -> ShopResult<Option<Product>> {
    let product: Option<Product> = sqlx::query_as(&format!(
      "UPDATE products SET name = $2, details = $3, price = $4, image = COALESCE($5, image), \
       size = $6, color = $7, category = $8, updated_at = NOW() \
       WHERE id = $1 RETURNING {PRODUCT_COLUMNS}"
    ))
    .bind(id)
    .bind(&draft.name)
    .bind(&draft.details)
    .bind(draft.price)
    .bind(draft.image.as_deref())
    .bind(&draft.size)
    .bind(&draft.color)
    .bind(&draft.category)
    .fetch_optional(&self.pool)
    .await?;
    Ok(product)
  }

  async fn delete_product(&self, id: ProductId) -> ShopResult<bool> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected() > 0)
  }
}

#[async_trait]
impl CartStore for PgStore {
  #[instrument(
    name = "pg::add_or_increment",
    skip(self, seed),
    fields(session_id = %seed.session_id, product_id = seed.product_id, qty = seed.qty),
    err(Display)
  )]
  async fn add_or_increment(&self, seed: &CartLineSeed) -> ShopResult<CartLine> {
    // Single statement: the conflict arm reads and writes the stored row under
    // its row lock, so concurrent deltas serialize instead of overwriting.
    let line: CartLine = sqlx::query_as(&format!(
      "INSERT INTO carts (session_id, product_id, name, image, size, color, category, price, qty, total_price, \
       created_at, updated_at) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, NOW(), NOW()) \
       ON CONFLICT (session_id, product_id) DO UPDATE \
       SET qty = carts.qty + EXCLUDED.qty, \
           total_price = (carts.qty + EXCLUDED.qty) * carts.price, \
           updated_at = NOW() \
       RETURNING {CART_COLUMNS}"
    ))
    .bind(&seed.session_id)
    .bind(seed.product_id)
    .bind(&seed.name)
    .bind(&seed.image)
    .bind(&seed.size)
    .bind(&seed.color)
    .bind(&seed.category)
    .bind(seed.price)
    .bind(seed.qty)
    .bind(line_total(seed.price, seed.qty))
    .fetch_one(&self.pool)
    .await?;
    Ok(line)
  }

  async fn find_line(&self, session_id: &str, product_id: ProductId) -> ShopResult<Option<CartLine>> {
    let line: Option<CartLine> = sqlx::query_as(&format!(
      "SELECT {CART_COLUMNS} FROM carts WHERE session_id = $1 AND product_id = $2"
    ))
    .bind(session_id)
    .bind(product_id)
    .fetch_optional(&self.pool)
    .await?;
    Ok(line)
  }

  async fn list_lines(&self, session_id: &str) -> ShopResult<Vec<CartLine>> {
    let lines: Vec<CartLine> = sqlx::query_as(&format!(
      "SELECT {CART_COLUMNS} FROM carts WHERE session_id = $1 ORDER BY created_at DESC, id DESC"
    ))
    .bind(session_id)
    .fetch_all(&self.pool)
    .await?;
    Ok(lines)
  }

  async fn remove_line(&self, session_id: &str, product_id: ProductId) -> ShopResult<bool> {
    let result = sqlx::query("DELETE FROM carts WHERE session_id = $1 AND product_id = $2")
      .bind(session_id)
      .bind(product_id)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected() > 0)
  }
}

#[async_trait]
impl LegalPageStore for PgStore {
  async fn list_legal_pages(&self) -> ShopResult<Vec<LegalPage>> {
    let pages: Vec<LegalPage> = sqlx::query_as(&format!(
      "SELECT {LEGAL_PAGE_COLUMNS} FROM legal_pages ORDER BY created_at DESC, id DESC"
    ))
    .fetch_all(&self.pool)
    .await?;
    Ok(pages)
  }

  async fn get_legal_page(&self, id: LegalPageId) -> ShopResult<Option<LegalPage>> {
    let page: Option<LegalPage> = sqlx::query_as(&format!("SELECT {LEGAL_PAGE_COLUMNS} FROM legal_pages WHERE id = $1"))
      .bind(id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(page)
  }

  async fn create_legal_page(&self, draft: &LegalPageDraft) -> ShopResult<LegalPage> {
    let page: LegalPage = sqlx::query_as(&format!(
      "INSERT INTO legal_pages (title, description, created_at, updated_at) \
       VALUES ($1, $2, NOW(), NOW()) RETURNING {LEGAL_PAGE_COLUMNS}"
    ))
    .bind(&draft.title)
    .bind(&draft.description)
    .fetch_one(&self.pool)
    .await?;
    Ok(page)
  }

  async fn update_legal_page(&self, id: LegalPageId, draft: &LegalPageDraft) -> ShopResult<Option<LegalPage>> {
    let page: Option<LegalPage> = sqlx::query_as(&format!(
      "UPDATE legal_pages SET title = $2, description = $3, updated_at = NOW() \
       WHERE id = $1 RETURNING {LEGAL_PAGE_COLUMNS}"
    ))
    .bind(id)
    .bind(&draft.title)
    .bind(&draft.description)
    .fetch_optional(&self.pool)
    .await?;
    Ok(page)
  }

  async fn delete_legal_page(&self, id: LegalPageId) -> ShopResult<bool> {
    let result = sqlx::query("DELETE FROM legal_pages WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected() > 0)
  }
}
