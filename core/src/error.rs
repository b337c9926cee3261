// core/src/error.rs
use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Field-level validation messages, keyed by request field name.
///
/// Serializes as `{"field": ["message", ...]}` so the HTTP layer can hand it
/// to the browser unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
  pub fn new() -> Self {
    Self::default()
  }

  /// Single-field shortcut.
  pub fn single(field: &str, message: impl Into<String>) -> Self {
    let mut errors = Self::new();
    errors.add(field, message);
    errors
  }

  pub fn add(&mut self, field: &str, message: impl Into<String>) {
    self.0.entry(field.to_string()).or_default().push(message.into());
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn has(&self, field: &str) -> bool {
    self.0.contains_key(field)
  }

  pub fn messages(&self, field: &str) -> &[String] {
    self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
  }

  pub fn fields(&self) -> impl Iterator<Item = &str> {
    self.0.keys().map(String::as_str)
  }

  /// `Ok(())` when nothing was collected.
  pub fn into_result(self) -> Result<(), ShopError> {
    if self.is_empty() {
      Ok(())
    } else {
      Err(ShopError::Validation(self))
    }
  }
}

impl fmt::Display for ValidationErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut first = true;
    for (field, messages) in &self.0 {
      for message in messages {
        if !first {
          f.write_str("; ")?;
        }
        write!(f, "{}: {}", field, message)?;
        first = false;
      }
    }
    Ok(())
  }
}

/// Errors raised by the step pipeline itself, as opposed to its handlers.
#[derive(Debug, Error)]
pub enum PipelineError {
  #[error("Handler missing for non-optional step: {step_name}")]
  HandlerMissing { step_name: String },

  #[error("Step not found: {step_name}")]
  StepNotFound { step_name: String },
}

#[derive(Debug, Error)]
pub enum ShopError {
  #[error("The given data was invalid: {0}")]
  Validation(ValidationErrors),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Database Error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("Migration Error: {0}")]
  Migration(#[from] sqlx::migrate::MigrateError),

  #[error("Storage Error: {0}")]
  Storage(#[from] std::io::Error),

  #[error("Pipeline Error: {0}")]
  Pipeline(#[from] PipelineError),

  #[error("Internal Error: {0}")]
  Internal(String),
}

impl ShopError {
  pub fn not_found(what: &str, id: impl fmt::Display) -> Self {
    ShopError::NotFound(format!("{} with ID {} not found.", what, id))
  }

  pub fn is_not_found(&self) -> bool {
    matches!(self, ShopError::NotFound(_))
  }

  pub fn is_validation(&self) -> bool {
    matches!(self, ShopError::Validation(_))
  }
}

impl From<ValidationErrors> for ShopError {
  fn from(errors: ValidationErrors) -> Self {
    ShopError::Validation(errors)
  }
}

impl From<anyhow::Error> for ShopError {
  fn from(err: anyhow::Error) -> Self {
    if err.is::<sqlx::Error>() {
      if let Ok(db_err) = err.downcast::<sqlx::Error>() {
        return ShopError::Database(db_err);
      }
      return ShopError::Internal("database error lost during downcast".to_string());
    }
    ShopError::Internal(err.to_string())
  }
}

pub type ShopResult<T, E = ShopError> = std::result::Result<T, E>;
