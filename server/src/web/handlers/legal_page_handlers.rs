// server/src/web/handlers/legal_page_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use storefront::LegalPagePayload;
use tracing::instrument;

use crate::errors::AppError;
use crate::state::AppState;

pub async fn list_legal_pages_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  Ok(HttpResponse::Ok().json(app_state.legal.list().await?))
}

#[instrument(name = "handler::create_legal_page", skip(app_state, req_payload))]
pub async fn create_legal_page_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<LegalPagePayload>,
) -> Result<HttpResponse, AppError> {
  let page = app_state.legal.create(req_payload.into_inner()).await?;
  Ok(HttpResponse::Created().json(page))
}

#[instrument(name = "handler::get_legal_page", skip(app_state, path), fields(legal_page_id = %path.as_ref()))]
pub async fn get_legal_page_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let page = app_state.legal.get(path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(page))
}

#[instrument(name = "handler::update_legal_page", skip(app_state, path, req_payload), fields(legal_page_id = %path.as_ref()))]
pub async fn update_legal_page_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
  req_payload: web::Json<LegalPagePayload>,
) -> Result<HttpResponse, AppError> {
  let page = app_state.legal.update(path.into_inner(), req_payload.into_inner()).await?;
  Ok(HttpResponse::Ok().json(page))
}

#[instrument(name = "handler::delete_legal_page", skip(app_state, path), fields(legal_page_id = %path.as_ref()))]
pub async fn delete_legal_page_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  app_state.legal.delete(path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(json!({ "message": "Legal page deleted successfully" })))
}
