// tests/cart_tests.rs
mod common;

use common::*;
use futures::future::join_all;
use proptest::prelude::*;
use rust_decimal::Decimal;
use serial_test::serial;
use storefront::models::ProductDraft;
use storefront::store::{CartStore, ProductStore};
use storefront::{AddToCartPayload, SessionCache, ShopError};

#[tokio::test]
#[serial]
async fn test_repeat_adds_accumulate_on_one_line() {
  setup_tracing();
  let shop = shop();
  let shirt = seed_product(&shop.store, "Shirt", Decimal::new(2000, 2)).await;

  shop.cart.add("s1", shirt.id, 2).await.unwrap();
  let line = shop.cart.add("s1", shirt.id, 3).await.unwrap();

  assert_eq!(line.qty, 5);
  assert_eq!(line.total_price, Decimal::new(10000, 2));
  let lines = shop.cart.list("s1").await.unwrap();
  assert_eq!(lines.len(), 1);
  assert_eq!(lines[0].name, "Shirt");
  assert_eq!(lines[0].price, Decimal::new(2000, 2));
}

#[tokio::test]
#[serial]
async fn test_quick_cache_keeps_latest_add_not_accumulated_qty() {
  setup_tracing();
  let shop = shop();
  let shirt = seed_product(&shop.store, "Shirt", Decimal::new(2000, 2)).await;

  shop.cart.add("s1", shirt.id, 2).await.unwrap();
  shop.cart.add("s1", shirt.id, 3).await.unwrap();

  let entries = shop.cart.quick_cache("s1");
  assert_eq!(entries.len(), 1);
  assert_eq!(entries[0].qty, 3);
  assert_eq!(entries[0].price, Decimal::new(2000, 2));
  assert_eq!(shop.cart.list("s1").await.unwrap()[0].qty, 5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[serial]
async fn test_concurrent_adds_never_lose_an_increment() {
  setup_tracing();
  let shop = shop();
  let shirt_id = seed_product(&shop.store, "Shirt", Decimal::new(1000, 2)).await.id;

  let tasks = (0..5).map(|_| {
    let cart = shop.cart.clone();
    tokio::spawn(async move { cart.add("s1", shirt_id, 1).await })
  });
  for joined in join_all(tasks).await {
    joined.unwrap().unwrap();
  }

  let lines = shop.cart.list("s1").await.unwrap();
  assert_eq!(lines.len(), 1);
  assert_eq!(lines[0].qty, 5);
  assert_eq!(lines[0].total_price, Decimal::new(5000, 2));
}

#[tokio::test]
#[serial]
async fn test_sessions_are_isolated() {
  setup_tracing();
  let shop = shop();
  let shirt = seed_product(&shop.store, "Shirt", Decimal::new(1000, 2)).await;

  shop.cart.add("alice", shirt.id, 1).await.unwrap();
  shop.cart.add("bob", shirt.id, 4).await.unwrap();

  assert_eq!(shop.cart.list("alice").await.unwrap()[0].qty, 1);
  assert_eq!(shop.cart.list("bob").await.unwrap()[0].qty, 4);

  assert!(shop.cart.remove("alice", shirt.id).await.unwrap());
  assert!(shop.cart.list("alice").await.unwrap().is_empty());
  assert_eq!(shop.cart.list("bob").await.unwrap().len(), 1);
  assert_eq!(shop.cart.quick_cache("bob").len(), 1);
}

#[tokio::test]
#[serial]
async fn test_remove_of_absent_line_is_a_no_op() {
  setup_tracing();
  let shop = shop();
  let shirt = seed_product(&shop.store, "Shirt", Decimal::new(1000, 2)).await;
  shop.cart.add("s1", shirt.id, 1).await.unwrap();

  assert!(!shop.cart.remove("s1", 9999).await.unwrap());
  assert!(!shop.cart.remove("someone-else", shirt.id).await.unwrap());
  assert_eq!(shop.cart.list("s1").await.unwrap().len(), 1);
}

#[tokio::test]
#[serial]
async fn test_remove_clears_line_and_quick_cache_entry() {
  setup_tracing();
  let shop = shop();
  let shirt = seed_product(&shop.store, "Shirt", Decimal::new(1000, 2)).await;
  let hat = seed_product(&shop.store, "Hat", Decimal::new(500, 2)).await;
  shop.cart.add("s1", shirt.id, 1).await.unwrap();
  shop.cart.add("s1", hat.id, 2).await.unwrap();

  assert!(shop.cart.remove("s1", shirt.id).await.unwrap());

  let lines = shop.cart.list("s1").await.unwrap();
  assert_eq!(lines.len(), 1);
  assert_eq!(lines[0].product_id, hat.id);
  let entries = shop.quick_cache.entries("s1");
  assert_eq!(entries.len(), 1);
  assert_eq!(entries[0].id, hat.id);
}

#[tokio::test]
#[serial]
async fn test_lines_list_newest_first() {
  setup_tracing();
  let shop = shop();
  let shirt = seed_product(&shop.store, "Shirt", Decimal::new(1000, 2)).await;
  let hat = seed_product(&shop.store, "Hat", Decimal::new(500, 2)).await;

  shop.cart.add("s1", shirt.id, 1).await.unwrap();
  shop.cart.add("s1", hat.id, 1).await.unwrap();
  shop.cart.add("s1", shirt.id, 1).await.unwrap();

  let ids: Vec<_> = shop.cart.list("s1").await.unwrap().iter().map(|l| l.product_id).collect();
  assert_eq!(ids, vec![hat.id, shirt.id]);
}

#[tokio::test]
#[serial]
async fn test_price_change_does_not_reprice_existing_line() {
  setup_tracing();
  let shop = shop();
  let shirt = seed_product(&shop.store, "Shirt", Decimal::new(1000, 2)).await;
  shop.cart.add("s1", shirt.id, 1).await.unwrap();

  let repriced = ProductDraft {
    name: "Shirt v2".to_string(),
    ..draft("Shirt", Decimal::new(1500, 2))
  };
  shop.store.update_product(shirt.id, &repriced).await.unwrap().unwrap();

  let line = shop.cart.add("s1", shirt.id, 1).await.unwrap();
  assert_eq!(line.qty, 2);
  assert_eq!(line.price, Decimal::new(1000, 2));
  assert_eq!(line.total_price, Decimal::new(2000, 2));
  assert_eq!(line.name, "Shirt");

  // The quick-cache shows the live price.
  assert_eq!(shop.cart.quick_cache("s1")[0].price, Decimal::new(1500, 2));
}

#[tokio::test]
#[serial]
async fn test_deleted_product_leaves_orphaned_line() {
  setup_tracing();
  let shop = shop();
  let shirt = seed_product(&shop.store, "Shirt", Decimal::new(1000, 2)).await;
  shop.cart.add("s1", shirt.id, 2).await.unwrap();

  assert!(shop.store.delete_product(shirt.id).await.unwrap());

  let lines = shop.cart.list("s1").await.unwrap();
  assert_eq!(lines.len(), 1);
  assert_eq!(lines[0].name, "Shirt");
  assert_eq!(lines[0].total_price, Decimal::new(2000, 2));

  let err = shop.cart.add("s1", shirt.id, 1).await.unwrap_err();
  assert!(err.is_not_found());
}

#[tokio::test]
#[serial]
async fn test_failed_add_touches_neither_store() {
  setup_tracing();
  let shop = shop();
  let shirt = seed_product(&shop.store, "Shirt", Decimal::new(1000, 2)).await;

  let err = shop.cart.add("s1", shirt.id, 6).await.unwrap_err();
  assert!(err.is_validation());
  let err = shop.cart.add("s1", 424242, 1).await.unwrap_err();
  assert!(matches!(err, ShopError::NotFound(ref m) if m == "Product with ID 424242 not found."));

  assert!(shop.store.find_line("s1", shirt.id).await.unwrap().is_none());
  assert!(shop.cart.quick_cache("s1").is_empty());
}

#[tokio::test]
#[serial]
async fn test_empty_session_is_rejected() {
  setup_tracing();
  let shop = shop();
  let err = shop.cart.list("  ").await.unwrap_err();
  assert!(err.is_validation());
}

#[tokio::test]
#[serial]
async fn test_add_pipeline_step_order() {
  let shop = shop();
  assert_eq!(
    shop.cart.add_pipeline_steps(),
    vec![
      "validate_add_quantity",
      "load_product_snapshot",
      "upsert_cart_line",
      "refresh_quick_cache"
    ]
  );
}

#[test]
fn test_payload_validation_messages() {
  let payload: AddToCartPayload = serde_json::from_value(serde_json::json!({"id": "3", "qty": 9})).unwrap();
  let errors = payload.validate().unwrap_err();
  assert_eq!(errors.messages("qty"), ["The qty field must not be greater than 5."]);

  let payload: AddToCartPayload = serde_json::from_value(serde_json::json!({"qty": "two"})).unwrap();
  let errors = payload.validate().unwrap_err();
  assert_eq!(errors.messages("id"), ["The id field is required."]);
  assert_eq!(errors.messages("qty"), ["The qty field must be an integer."]);
}

proptest! {
  #![proptest_config(ProptestConfig::with_cases(32))]

  #[test]
  fn prop_line_qty_and_total_track_every_add(adds in prop::collection::vec(1i32..=5, 1..12), cents in 1i64..100_000) {
    let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
    rt.block_on(async {
      let shop = shop();
      let price = Decimal::new(cents, 2);
      let product = seed_product(&shop.store, "Prop", price).await;

      for qty in &adds {
        shop.cart.add("prop", product.id, *qty).await.unwrap();
      }

      let expected: i32 = adds.iter().sum();
      let lines = shop.cart.list("prop").await.unwrap();
      prop_assert_eq!(lines.len(), 1);
      prop_assert_eq!(lines[0].qty, expected);
      prop_assert_eq!(lines[0].total_price, price * Decimal::from(expected));
      prop_assert_eq!(shop.cart.quick_cache("prop")[0].qty, *adds.last().unwrap());
      Ok(())
    })?;
  }
}
