// tests/common/mod.rs
#![allow(dead_code)]

use std::sync::Arc;

use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use storefront::flow::{ContextData, Handler, PipelineControl};
use storefront::models::{Product, ProductDraft};
use storefront::store::ProductStore;
use storefront::{CartService, MemorySessionCache, MemoryStore, PipelineError};
use tracing::Level;

// --- Flow test context ---
#[derive(Clone, Debug, Default)]
pub struct TestContext {
  pub counter: i32,
  pub message: String,
  pub steps_executed: Vec<String>,
  pub should_stop_at: Option<String>,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  #[error("Pipeline error: {0}")]
  Pipeline(String),

  #[error("Test handler failed: {0}")]
  Handler(String),
}

impl From<PipelineError> for TestError {
  fn from(e: PipelineError) -> Self {
    TestError::Pipeline(format!("{:?}", e))
  }
}

pub fn create_simple_handler(step_name: &'static str, message_to_append: &'static str) -> Handler<TestContext, TestError> {
  Box::new(move |ctx: ContextData<TestContext>| {
    Box::pin(async move {
      let mut guard = ctx.write();
      guard.counter += 1;
      guard.message.push_str(message_to_append);
      guard.steps_executed.push(step_name.to_string());
      tracing::debug!(target: "test_handlers", step = step_name, counter = guard.counter, "executed");
      if guard.should_stop_at.as_deref() == Some(step_name) {
        return Ok(PipelineControl::Stop);
      }
      Ok(PipelineControl::Continue)
    })
  })
}

pub fn create_failing_handler(step_name: &'static str, error_message: &'static str) -> Handler<TestContext, TestError> {
  Box::new(move |ctx: ContextData<TestContext>| {
    Box::pin(async move {
      ctx.write().steps_executed.push(step_name.to_string());
      Err(TestError::Handler(error_message.to_string()))
    })
  })
}

// --- Tracing ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Cart fixtures ---
pub struct Shop {
  pub store: Arc<MemoryStore>,
  pub quick_cache: Arc<MemorySessionCache>,
  pub cart: CartService,
}

pub fn shop() -> Shop {
  let store = Arc::new(MemoryStore::new());
  let quick_cache = Arc::new(MemorySessionCache::new());
  let cart = CartService::new(store.clone(), store.clone(), quick_cache.clone());
  Shop {
    store,
    quick_cache,
    cart,
  }
}

pub fn draft(name: &str, price: Decimal) -> ProductDraft {
  ProductDraft {
    name: name.to_string(),
    details: format!("{} details", name),
    price,
    size: "M".to_string(),
    color: "Black".to_string(),
    category: "Shirts".to_string(),
    image: None,
  }
}

pub async fn seed_product(store: &MemoryStore, name: &str, price: Decimal) -> Product {
  store
    .create_product(&draft(name, price), &format!("{}.png", name.to_lowercase()))
    .await
    .unwrap()
}

pub fn png_bytes() -> Vec<u8> {
  let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
  bytes.extend_from_slice(&[0u8; 32]);
  bytes
}
