// server/src/web/handlers/product_handlers.rs

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures_util::StreamExt;
use serde_json::json;
use storefront::{ImageUpload, ProductForm};
use tracing::{debug, info, instrument};

use crate::errors::AppError;
use crate::state::AppState;

/// Largest text part accepted; covers the longest `details` we expect.
const TEXT_FIELD_LIMIT: usize = 64 * 1024;

/// Reads the product form out of a multipart body.
///
/// The image is buffered only up to one byte past the configured limit, which
/// is enough for validation to reject it as oversized. Text parts over
/// [`TEXT_FIELD_LIMIT`] fail the request; unknown parts are drained unread.
async fn read_product_form(mut payload: Multipart, max_image_kb: usize) -> Result<ProductForm, AppError> {
  let image_limit = max_image_kb * 1024 + 1;
  let mut form = ProductForm::default();

  while let Some(field) = payload.next().await {
    let mut field = field.map_err(|e| AppError::Upload(e.to_string()))?;
    let name = field.name().unwrap_or_default().to_string();

    let slot = match name.as_str() {
      "image" => None,
      "name" => Some(&mut form.name),
      "details" => Some(&mut form.details),
      "price" => Some(&mut form.price),
      "size" => Some(&mut form.size),
      "color" => Some(&mut form.color),
      "category" => Some(&mut form.category),
      other => {
        debug!(field = other, "Ignoring unknown form field.");
        while let Some(chunk) = field.next().await {
          chunk.map_err(|e| AppError::Upload(e.to_string()))?;
        }
        continue;
      }
    };

    let Some(slot) = slot else {
      let file_name = field
        .content_disposition()
        .and_then(|cd| cd.get_filename())
        .map(str::to_string);
      let content_type = field.content_type().map(|m| m.to_string());
      let mut bytes = Vec::new();
      while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|e| AppError::Upload(e.to_string()))?;
        let room = image_limit.saturating_sub(bytes.len());
        bytes.extend_from_slice(&chunk[..chunk.len().min(room)]);
      }
      form.image = Some(ImageUpload {
        file_name,
        content_type,
        bytes,
      });
      continue;
    };

    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
      let chunk = chunk.map_err(|e| AppError::Upload(e.to_string()))?;
      if bytes.len() + chunk.len() > TEXT_FIELD_LIMIT {
        return Err(AppError::Upload(format!(
          "The {} field must not be larger than {} bytes.",
          name, TEXT_FIELD_LIMIT
        )));
      }
      bytes.extend_from_slice(&chunk);
    }
    let text = String::from_utf8(bytes).map_err(|_| AppError::Upload(format!("The {} field is not valid UTF-8.", name)))?;
    *slot = Some(text);
  }

  Ok(form)
}

pub async fn list_products_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let products = app_state.catalog.list().await?;
  debug!(count = products.len(), "Listed products.");
  Ok(HttpResponse::Ok().json(products))
}

#[instrument(name = "handler::create_product", skip(app_state, payload))]
pub async fn create_product_handler(
  app_state: web::Data<AppState>,
  payload: Multipart,
) -> Result<HttpResponse, AppError> {
  let form = read_product_form(payload, app_state.config.max_image_kb).await?;
  let product = app_state.catalog.create(form).await?;
  info!(product_id = product.id, "Product created successfully.");
  Ok(HttpResponse::Created().json(product))
}

#[instrument(name = "handler::get_product", skip(app_state, path), fields(product_id = %path.as_ref()))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let product = app_state.catalog.get(path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(product))
}

#[instrument(name = "handler::update_product", skip(app_state, path, payload), fields(product_id = %path.as_ref()))]
pub async fn update_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
  payload: Multipart,
) -> Result<HttpResponse, AppError> {
  let form = read_product_form(payload, app_state.config.max_image_kb).await?;
  let product = app_state.catalog.update(path.into_inner(), form).await?;
  Ok(HttpResponse::Ok().json(product))
}

#[instrument(name = "handler::delete_product", skip(app_state, path), fields(product_id = %path.as_ref()))]
pub async fn delete_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  app_state.catalog.delete(path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(json!({ "message": "Product deleted successfully" })))
}
