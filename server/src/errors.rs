// server/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use storefront::{ShopError, ValidationErrors};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error(transparent)]
  Shop(#[from] ShopError),

  #[error("Configuration Error: {0}")]
  Config(String),

  /// Malformed multipart upload.
  #[error("Upload Error: {0}")]
  Upload(String),

  /// Body that could not be read as the expected JSON.
  #[error("Invalid Payload: {0}")]
  Payload(String),

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl From<ValidationErrors> for AppError {
  fn from(errors: ValidationErrors) -> Self {
    AppError::Shop(ShopError::Validation(errors))
  }
}

impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<ShopError>() {
      Ok(shop_err) => AppError::Shop(shop_err),
      Err(err) => AppError::Internal(err.to_string()),
    }
  }
}

/// `"<first message>"`, or `"<first message> (and N more errors)"` when there
/// are several.
pub fn summarize(errors: &ValidationErrors) -> String {
  let mut all = errors.fields().flat_map(|field| errors.messages(field).iter());
  let Some(first) = all.next() else {
    return "The given data was invalid.".to_string();
  };
  match all.count() {
    0 => first.clone(),
    1 => format!("{} (and 1 more error)", first),
    n => format!("{} (and {} more errors)", first, n),
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Shop(ShopError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
      AppError::Shop(ShopError::NotFound(_)) => StatusCode::NOT_FOUND,
      AppError::Upload(_) | AppError::Payload(_) => StatusCode::BAD_REQUEST,
      _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() {
      tracing::error!(application_error = %self, "Responding with error");
    } else {
      tracing::warn!(application_error = %self, "Rejecting request");
    }

    let mut builder = HttpResponse::build(status);
    match self {
      AppError::Shop(ShopError::Validation(errors)) => builder.json(json!({
        "message": summarize(errors),
        "errors": errors,
      })),
      AppError::Shop(ShopError::NotFound(m)) => builder.json(json!({ "message": m })),
      AppError::Upload(m) | AppError::Payload(m) => builder.json(json!({ "message": m })),
      _ => builder.json(json!({ "message": "Server Error" })),
    }
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn summary_counts_remaining_messages() {
    let mut errors = ValidationErrors::new();
    errors.add("name", "The name field is required.");
    assert_eq!(summarize(&errors), "The name field is required.");

    errors.add("price", "The price field is required.");
    errors.add("price", "The price field must be a number.");
    assert_eq!(summarize(&errors), "The name field is required. (and 2 more errors)");
  }

  #[test]
  fn internal_details_are_not_leaked() {
    let err = AppError::Shop(ShopError::Internal("pool exhausted".to_string()));
    assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = actix_web::body::to_bytes(err.error_response().into_body());
    let bytes = futures_util::FutureExt::now_or_never(body).unwrap().unwrap();
    assert_eq!(&bytes[..], br#"{"message":"Server Error"}"#);
  }
}
