// core/src/models/cart_line.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{Product, ProductId};

/// One row per (session, product). The product fields are a snapshot taken
/// when the line was first created and are never refreshed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CartLine {
  pub id: i64,
  pub session_id: String,
  pub product_id: ProductId,
  pub name: String,
  pub image: String,
  pub size: String,
  pub color: String,
  pub category: String,
  pub price: Decimal,
  pub qty: i32,
  pub total_price: Decimal,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// What a store needs to insert a fresh line, or to increment an existing one.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLineSeed {
  pub session_id: String,
  pub product_id: ProductId,
  pub name: String,
  pub image: String,
  pub size: String,
  pub color: String,
  pub category: String,
  pub price: Decimal,
  pub qty: i32,
}

impl CartLineSeed {
  pub fn from_product(session_id: &str, product: &Product, qty: i32) -> Self {
    Self {
      session_id: session_id.to_string(),
      product_id: product.id,
      name: product.name.clone(),
      image: product.image.clone(),
      size: product.size.clone(),
      color: product.color.clone(),
      category: product.category.clone(),
      price: product.price,
      qty,
    }
  }
}

impl CartLine {
  /// Adds `delta` to the line, repricing with the line's own stored unit
  /// price.
  pub fn accumulate(&mut self, delta: i32, now: DateTime<Utc>) {
    self.qty += delta;
    self.total_price = line_total(self.price, self.qty);
    self.updated_at = now;
  }
}

pub fn line_total(price: Decimal, qty: i32) -> Decimal {
  price * Decimal::from(qty)
}
