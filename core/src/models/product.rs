// core/src/models/product.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::ProductId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Product {
  pub id: ProductId,
  pub name: String,
  pub details: String,
  pub price: Decimal,
  /// File name under the public image directory.
  pub image: String,
  pub size: String,
  pub color: String,
  pub category: String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Validated product fields, as accepted by create and update.
///
/// `image` is `None` on an update that keeps the stored image.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
  pub name: String,
  pub details: String,
  pub price: Decimal,
  pub size: String,
  pub color: String,
  pub category: String,
  pub image: Option<String>,
}
