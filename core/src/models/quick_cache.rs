// core/src/models/quick_cache.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ProductId;

/// Display-only badge entry. `qty` is the quantity of the most recent add,
/// not the accumulated cart quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickCacheEntry {
  pub id: ProductId,
  pub name: String,
  pub qty: i32,
  pub price: Decimal,
}
