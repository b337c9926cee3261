// server/src/web/handlers/image_handlers.rs

use actix_web::http::header;
use actix_web::{web, HttpResponse};

use crate::errors::AppError;
use crate::state::AppState;

pub async fn serve_image_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let file_name = path.into_inner();
  let bytes = app_state.catalog.image(&file_name).await?;
  let mime = mime_guess::from_path(&file_name).first_or_octet_stream();

  Ok(
    HttpResponse::Ok()
      .content_type(mime.to_string())
      .insert_header((header::CACHE_CONTROL, "public, max-age=86400"))
      .body(bytes),
  )
}
