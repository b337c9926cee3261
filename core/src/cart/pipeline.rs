// core/src/cart/pipeline.rs

//! Step pipelines behind cart add and remove.
//!
//! Add runs `validate_add_quantity` → `load_product_snapshot` → `upsert_cart_line`
//! → `refresh_quick_cache`. Both writes come after every check, so a request
//! that fails validation or names an unknown product touches neither store.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::cart::request::check_add_quantity;
use crate::error::{ShopError, ShopResult, ValidationErrors};
use crate::flow::{ContextData, Pipeline, PipelineControl};
use crate::models::{CartLine, CartLineSeed, Product, ProductId, QuickCacheEntry};
use crate::session_cache::SessionCache;
use crate::store::{CartStore, ProductStore};

/// Collaborators every cart step may reach.
#[derive(Clone)]
pub struct CartDeps {
  pub products: Arc<dyn ProductStore>,
  pub carts: Arc<dyn CartStore>,
  pub quick_cache: Arc<dyn SessionCache>,
}

#[derive(Clone)]
pub struct AddToCartCtxData {
  pub deps: CartDeps,
  pub session_id: String,
  pub product_id: ProductId,
  pub qty: i32,
  pub product: Option<Product>,
  pub updated_line: Option<CartLine>,
}

#[derive(Clone)]
pub struct RemoveFromCartCtxData {
  pub deps: CartDeps,
  pub session_id: String,
  pub product_id: ProductId,
  pub line_removed: bool,
}

pub fn build_add_to_cart_pipeline() -> Pipeline<AddToCartCtxData, ShopError> {
  let mut p = Pipeline::<AddToCartCtxData, ShopError>::new(&[
    ("validate_add_quantity", false, None),
    ("load_product_snapshot", false, None),
    ("upsert_cart_line", false, None),
    ("refresh_quick_cache", false, None),
  ]);
  p.on_root("validate_add_quantity", validate_add_quantity);
  p.on_root("load_product_snapshot", load_product_snapshot);
  p.on_root("upsert_cart_line", upsert_cart_line);
  p.on_root("refresh_quick_cache", refresh_quick_cache);
  p
}

pub fn build_remove_from_cart_pipeline() -> Pipeline<RemoveFromCartCtxData, ShopError> {
  let mut p = Pipeline::<RemoveFromCartCtxData, ShopError>::new(&[
    ("remove_cart_line", false, None),
    ("forget_quick_cache_entry", false, None),
  ]);
  p.on_root("remove_cart_line", remove_cart_line);
  p.on_root("forget_quick_cache_entry", forget_quick_cache_entry);
  p
}

async fn validate_add_quantity(ctx_data: ContextData<AddToCartCtxData>) -> ShopResult<PipelineControl> {
  let qty = ctx_data.read().qty;
  if let Err(message) = check_add_quantity(i64::from(qty)) {
    warn!(qty, "Add to Cart Pipeline: quantity out of range.");
    return Err(ValidationErrors::single("qty", message).into());
  }
  Ok(PipelineControl::Continue)
}

async fn load_product_snapshot(ctx_data: ContextData<AddToCartCtxData>) -> ShopResult<PipelineControl> {
  let (products, product_id) = {
    let guard = ctx_data.read();
    (guard.deps.products.clone(), guard.product_id)
  };

  match products.get_product(product_id).await? {
    Some(product) => {
      ctx_data.write().product = Some(product);
      Ok(PipelineControl::Continue)
    }
    None => {
      warn!(product_id, "Add to Cart Pipeline: product not found.");
      Err(ShopError::not_found("Product", product_id))
    }
  }
}

#[instrument(name = "cart_step::upsert_cart_line", skip(ctx_data), err(Display))]
async fn upsert_cart_line(ctx_data: ContextData<AddToCartCtxData>) -> ShopResult<PipelineControl> {
  let (carts, seed) = {
    let guard = ctx_data.read();
    let product = guard
      .product
      .as_ref()
      .ok_or_else(|| ShopError::Internal("product snapshot missing before cart upsert".to_string()))?;
    (
      guard.deps.carts.clone(),
      CartLineSeed::from_product(&guard.session_id, product, guard.qty),
    )
  };

  let line = carts.add_or_increment(&seed).await?;
  info!(
    line_id = line.id,
    product_id = line.product_id,
    qty = line.qty,
    total_price = %line.total_price,
    "Add to Cart Pipeline: cart line stored."
  );
  ctx_data.write().updated_line = Some(line);
  Ok(PipelineControl::Continue)
}

async fn refresh_quick_cache(ctx_data: ContextData<AddToCartCtxData>) -> ShopResult<PipelineControl> {
  let guard = ctx_data.read();
  let product = guard
    .product
    .as_ref()
    .ok_or_else(|| ShopError::Internal("product snapshot missing before quick-cache refresh".to_string()))?;
  // The latest add's qty and the live product price, not the line's totals.
  guard.deps.quick_cache.put(
    &guard.session_id,
    QuickCacheEntry {
      id: product.id,
      name: product.name.clone(),
      qty: guard.qty,
      price: product.price,
    },
  );
  Ok(PipelineControl::Continue)
}

async fn remove_cart_line(ctx_data: ContextData<RemoveFromCartCtxData>) -> ShopResult<PipelineControl> {
  let (carts, session_id, product_id) = {
    let guard = ctx_data.read();
    (guard.deps.carts.clone(), guard.session_id.clone(), guard.product_id)
  };
  let removed = carts.remove_line(&session_id, product_id).await?;
  if !removed {
    info!(product_id, "Remove from Cart Pipeline: no line to remove.");
  }
  ctx_data.write().line_removed = removed;
  Ok(PipelineControl::Continue)
}

async fn forget_quick_cache_entry(ctx_data: ContextData<RemoveFromCartCtxData>) -> ShopResult<PipelineControl> {
  let guard = ctx_data.read();
  guard.deps.quick_cache.forget_item(&guard.session_id, guard.product_id);
  Ok(PipelineControl::Continue)
}
