// core/src/cart/mod.rs

//! Session cart: authoritative lines in a [`CartStore`], plus the display-only
//! quick-cache kept in a [`SessionCache`].
//!
//! The two are updated with different rules on purpose. A line accumulates
//! every add and reprices from its stored unit price; the quick-cache entry
//! is overwritten with the latest add's qty and the product's current price.

pub mod pipeline;
pub mod request;

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::error::{ShopError, ShopResult, ValidationErrors};
use crate::flow::{ContextData, Pipeline, PipelineResult};
use crate::models::{CartLine, ProductId, QuickCacheEntry};
use crate::session_cache::SessionCache;
use crate::store::{CartStore, ProductStore};

pub use pipeline::{AddToCartCtxData, CartDeps, RemoveFromCartCtxData};
pub use request::{AddToCart, AddToCartPayload, MAX_ADD_QTY, MIN_ADD_QTY};

#[derive(Clone)]
pub struct CartService {
  deps: CartDeps,
  add_pipeline: Arc<Pipeline<AddToCartCtxData, ShopError>>,
  remove_pipeline: Arc<Pipeline<RemoveFromCartCtxData, ShopError>>,
}

impl CartService {
  pub fn new(
    products: Arc<dyn ProductStore>,
    carts: Arc<dyn CartStore>,
    quick_cache: Arc<dyn SessionCache>,
  ) -> Self {
    Self {
      deps: CartDeps {
        products,
        carts,
        quick_cache,
      },
      add_pipeline: Arc::new(pipeline::build_add_to_cart_pipeline()),
      remove_pipeline: Arc::new(pipeline::build_remove_from_cart_pipeline()),
    }
  }

  /// Adds `qty` (1..=5) of a product to the session's cart and returns the
  /// resulting line.
  #[instrument(name = "cart::add", skip(self), err(Display))]
  pub async fn add(&self, session_id: &str, product_id: ProductId, qty: i32) -> ShopResult<CartLine> {
    ensure_session(session_id)?;
    let ctx_data = ContextData::new(AddToCartCtxData {
      deps: self.deps.clone(),
      session_id: session_id.to_string(),
      product_id,
      qty,
      product: None,
      updated_line: None,
    });

    match self.add_pipeline.run(ctx_data.clone()).await? {
      PipelineResult::Completed => {
        let line = ctx_data.read().updated_line.clone();
        line.ok_or_else(|| {
          warn!("Add to Cart pipeline completed but no line was recorded.");
          ShopError::Internal("Cart update completed, but line details are unavailable.".to_string())
        })
      }
      PipelineResult::Stopped => Err(ShopError::Internal("Process to add item to cart was halted.".to_string())),
    }
  }

  /// Removes the session's line for `product_id`, if any. Returns whether a
  /// line existed; absence is not an error.
  #[instrument(name = "cart::remove", skip(self), err(Display))]
  pub async fn remove(&self, session_id: &str, product_id: ProductId) -> ShopResult<bool> {
    ensure_session(session_id)?;
    let ctx_data = ContextData::new(RemoveFromCartCtxData {
      deps: self.deps.clone(),
      session_id: session_id.to_string(),
      product_id,
      line_removed: false,
    });

    match self.remove_pipeline.run(ctx_data.clone()).await? {
      PipelineResult::Completed => {
        let removed = ctx_data.read().line_removed;
        info!(removed, "Remove from cart finished.");
        Ok(removed)
      }
      PipelineResult::Stopped => Err(ShopError::Internal(
        "Process to remove item from cart was halted.".to_string(),
      )),
    }
  }

  /// Newest line first. The quick-cache is not consulted.
  pub async fn list(&self, session_id: &str) -> ShopResult<Vec<CartLine>> {
    ensure_session(session_id)?;
    let lines = self.deps.carts.list_lines(session_id).await?;
    debug!(count = lines.len(), "Listed cart lines.");
    Ok(lines)
  }

  pub fn quick_cache(&self, session_id: &str) -> Vec<QuickCacheEntry> {
    self.deps.quick_cache.entries(session_id)
  }

  pub fn add_pipeline_steps(&self) -> Vec<&str> {
    self.add_pipeline.step_names()
  }
}

fn ensure_session(session_id: &str) -> ShopResult<()> {
  if session_id.trim().is_empty() {
    return Err(ValidationErrors::single("session", "A session is required.").into());
  }
  Ok(())
}
