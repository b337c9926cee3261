// core/src/store/memory.rs

//! In-memory implementation of every store trait.
//!
//! All tables live behind one `tokio::sync::RwLock`. Mutations take the write
//! lock for their whole read-modify-write, which is what makes
//! `add_or_increment` atomic here. Not durable: state is lost on restart.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use tracing::debug;

use super::{CartStore, LegalPageStore, ProductStore};
use crate::error::ShopResult;
use crate::models::{
  line_total, CartLine, CartLineSeed, LegalPage, LegalPageDraft, LegalPageId, Product, ProductDraft, ProductId,
};

#[derive(Debug, Default)]
struct Tables {
  products: BTreeMap<ProductId, Product>,
  next_product_id: ProductId,
  carts: BTreeMap<i64, CartLine>,
  cart_index: HashMap<(String, ProductId), i64>,
  next_cart_id: i64,
  legal_pages: BTreeMap<LegalPageId, LegalPage>,
  next_legal_page_id: LegalPageId,
}

fn next_id(counter: &mut i64) -> i64 {
  *counter += 1;
  *counter
}

#[derive(Debug, Default)]
pub struct MemoryStore {
  tables: RwLock<Tables>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl ProductStore for MemoryStore {
  async fn list_products(&self) -> ShopResult<Vec<Product>> {
    let tables = self.tables.read().await;
    Ok(tables.products.values().rev().cloned().collect())
  }

  async fn get_product(&self, id: ProductId) -> ShopResult<Option<Product>> {
    Ok(self.tables.read().await.products.get(&id).cloned())
  }

  async fn create_product(&self, draft: &ProductDraft, image: &str) -> ShopResult<Product> {
    let mut tables = self.tables.write().await;
    let id = next_id(&mut tables.next_product_id);
    let now = Utc::now();
    let product = Product {
      id,
      name: draft.name.clone(),
      details: draft.details.clone(),
      price: draft.price,
      image: image.to_string(),
      size: draft.size.clone(),
      color: draft.color.clone(),
      category: draft.category.clone(),
      created_at: now,
      updated_at: now,
    };
    tables.products.insert(id, product.clone());
    Ok(product)
  }

  async fn update_product(&self, id: ProductId, draft: &ProductDraft) -> ShopResult<Option<Product>> {
    let mut tables = self.tables.write().await;
    let Some(product) = tables.products.get_mut(&id) else {
      return Ok(None);
    };
    product.name = draft.name.clone();
    product.details = draft.details.clone();
    product.price = draft.price;
    product.size = draft.size.clone();
    product.color = draft.color.clone();
    product.category = draft.category.clone();
    if let Some(image) = &draft.image {
      product.image = image.clone();
    }
    product.updated_at = Utc::now();
    Ok(Some(product.clone()))
  }

  async fn delete_product(&self, id: ProductId) -> ShopResult<bool> {
    Ok(self.tables.write().await.products.remove(&id).is_some())
  }
}

#[async_trait]
impl CartStore for MemoryStore {
  async fn add_or_increment(&self, seed: &CartLineSeed) -> ShopResult<CartLine> {
    let mut tables = self.tables.write().await;
    let key = (seed.session_id.clone(), seed.product_id);
    let now = Utc::now();

    if let Some(line_id) = tables.cart_index.get(&key).copied() {
      if let Some(line) = tables.carts.get_mut(&line_id) {
        line.accumulate(seed.qty, now);
        debug!(line_id, qty = line.qty, "Incremented existing cart line.");
        return Ok(line.clone());
      }
    }

    let line_id = next_id(&mut tables.next_cart_id);
    let line = CartLine {
      id: line_id,
      session_id: seed.session_id.clone(),
      product_id: seed.product_id,
      name: seed.name.clone(),
      image: seed.image.clone(),
      size: seed.size.clone(),
      color: seed.color.clone(),
      category: seed.category.clone(),
      price: seed.price,
      qty: seed.qty,
      total_price: line_total(seed.price, seed.qty),
      created_at: now,
      updated_at: now,
    };
    tables.carts.insert(line_id, line.clone());
    tables.cart_index.insert(key, line_id);
    debug!(line_id, qty = line.qty, "Inserted new cart line.");
    Ok(line)
  }

  async fn find_line(&self, session_id: &str, product_id: ProductId) -> ShopResult<Option<CartLine>> {
    let tables = self.tables.read().await;
    Ok(
      tables
        .cart_index
        .get(&(session_id.to_string(), product_id))
        .and_then(|line_id| tables.carts.get(line_id))
        .cloned(),
    )
  }

  async fn list_lines(&self, session_id: &str) -> ShopResult<Vec<CartLine>> {
    let tables = self.tables.read().await;
    Ok(
      tables
        .carts
        .values()
        .rev()
        .filter(|line| line.session_id == session_id)
        .cloned()
        .collect(),
    )
  }

  async fn remove_line(&self, session_id: &str, product_id: ProductId) -> ShopResult<bool> {
    let mut tables = self.tables.write().await;
    match tables.cart_index.remove(&(session_id.to_string(), product_id)) {
      Some(line_id) => Ok(tables.carts.remove(&line_id).is_some()),
      None => Ok(false),
    }
  }
}

#[async_trait]
impl LegalPageStore for MemoryStore {
  async fn list_legal_pages(&self) -> ShopResult<Vec<LegalPage>> {
    let tables = self.tables.read().await;
    Ok(tables.legal_pages.values().rev().cloned().collect())
  }

  async fn get_legal_page(&self, id: LegalPageId) -> ShopResult<Option<LegalPage>> {
    Ok(self.tables.read().await.legal_pages.get(&id).cloned())
  }

  async fn create_legal_page(&self, draft: &LegalPageDraft) -> ShopResult<LegalPage> {
    let mut tables = self.tables.write().await;
    let id = next_id(&mut tables.next_legal_page_id);
    let now = Utc::now();
    let page = LegalPage {
      id,
      title: draft.title.clone(),
      description: draft.description.clone(),
      created_at: now,
      updated_at: now,
    };
    tables.legal_pages.insert(id, page.clone());
    Ok(page)
  }

  async fn update_legal_page(&self, id: LegalPageId, draft: &LegalPageDraft) -> ShopResult<Option<LegalPage>> {
    let mut tables = self.tables.write().await;
    let Some(page) = tables.legal_pages.get_mut(&id) else {
      return Ok(None);
    };
    page.title = draft.title.clone();
    page.description = draft.description.clone();
    page.updated_at = Utc::now();
    Ok(Some(page.clone()))
  }

  async fn delete_legal_page(&self, id: LegalPageId) -> ShopResult<bool> {
    Ok(self.tables.write().await.legal_pages.remove(&id).is_some())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal::Decimal;

  fn seed(session: &str, product_id: ProductId, price: Decimal, qty: i32) -> CartLineSeed {
    CartLineSeed {
      session_id: session.to_string(),
      product_id,
      name: "Linen Shirt".to_string(),
      image: "1700000000000.png".to_string(),
      size: "M".to_string(),
      color: "white".to_string(),
      category: "shirts".to_string(),
      price,
      qty,
    }
  }

  #[tokio::test]
  async fn increment_keeps_first_snapshot_price() {
    let store = MemoryStore::new();
    store.add_or_increment(&seed("s1", 3, Decimal::new(1000, 2), 2)).await.unwrap();
    let line = store
      .add_or_increment(&seed("s1", 3, Decimal::new(9999, 2), 3))
      .await
      .unwrap();

    assert_eq!(line.qty, 5);
    assert_eq!(line.price, Decimal::new(1000, 2));
    assert_eq!(line.total_price, Decimal::new(5000, 2));
  }

  #[tokio::test]
  async fn lines_are_listed_newest_first_per_session() {
    let store = MemoryStore::new();
    store.add_or_increment(&seed("s1", 1, Decimal::ONE, 1)).await.unwrap();
    store.add_or_increment(&seed("s2", 1, Decimal::ONE, 1)).await.unwrap();
    store.add_or_increment(&seed("s1", 2, Decimal::ONE, 1)).await.unwrap();
    // Incrementing an older line does not move it to the front.
    store.add_or_increment(&seed("s1", 1, Decimal::ONE, 1)).await.unwrap();

    let ids: Vec<_> = store.list_lines("s1").await.unwrap().iter().map(|l| l.product_id).collect();
    assert_eq!(ids, vec![2, 1]);
  }

  #[tokio::test]
  async fn remove_reports_whether_a_line_existed() {
    let store = MemoryStore::new();
    store.add_or_increment(&seed("s1", 1, Decimal::ONE, 1)).await.unwrap();

    assert!(store.remove_line("s1", 1).await.unwrap());
    assert!(!store.remove_line("s1", 1).await.unwrap());
    assert!(store.find_line("s1", 1).await.unwrap().is_none());
  }
}
