// server/src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use storefront::AddToCartPayload;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::session::CartSession;
use crate::state::AppState;

#[instrument(name = "handler::list_cart", skip(app_state, session), fields(session = %session.id))]
pub async fn list_cart_handler(app_state: web::Data<AppState>, session: CartSession) -> Result<HttpResponse, AppError> {
  let lines = app_state.cart.list(&session.id).await?;

  let mut res = HttpResponse::Ok();
  session.attach(&mut res);
  Ok(res.json(lines))
}

/// Badge data from the quick-cache. `count` is the number of distinct products.
#[instrument(name = "handler::cart_summary", skip(app_state, session), fields(session = %session.id))]
pub async fn cart_summary_handler(app_state: web::Data<AppState>, session: CartSession) -> Result<HttpResponse, AppError> {
  let items = app_state.cart.quick_cache(&session.id);

  let mut res = HttpResponse::Ok();
  session.attach(&mut res);
  Ok(res.json(json!({
      "count": items.len(),
      "items": items,
  })))
}

#[instrument(name = "handler::add_to_cart", skip(app_state, session, req_payload), fields(session = %session.id))]
pub async fn add_to_cart_handler(
  app_state: web::Data<AppState>,
  session: CartSession,
  req_payload: web::Json<AddToCartPayload>,
) -> Result<HttpResponse, AppError> {
  let request = req_payload.validate()?;

  let line = app_state.cart.add(&session.id, request.product_id, request.qty).await?;
  info!(
    product_id = line.product_id,
    qty = line.qty,
    total_price = %line.total_price,
    "Add to cart successful."
  );

  let mut res = HttpResponse::Ok();
  session.attach(&mut res);
  Ok(res.json(json!({
      "success": true,
      "message": "Product added to cart successfully",
  })))
}

/// Succeeds whether or not the session had a line for the product. A
/// non-numeric id cannot match a line, so it is treated the same way.
#[instrument(name = "handler::remove_from_cart", skip(app_state, session, path), fields(session = %session.id))]
pub async fn remove_from_cart_handler(
  app_state: web::Data<AppState>,
  session: CartSession,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let raw_id = path.into_inner();
  match raw_id.trim().parse::<i64>() {
    Ok(product_id) => {
      let removed = app_state.cart.remove(&session.id, product_id).await?;
      info!(product_id, removed, "Remove from cart handled.");
    }
    Err(_) => info!(product_id = %raw_id, "Remove from cart named no product; nothing to do."),
  }

  let mut res = HttpResponse::Ok();
  session.attach(&mut res);
  Ok(res.json(json!({
      "success": true,
      "message": "Product removed from cart",
  })))
}
