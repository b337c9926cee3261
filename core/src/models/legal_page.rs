// core/src/models/legal_page.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::LegalPageId;

/// A static content page. `description` is raw HTML and is served to the
/// browser without sanitization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct LegalPage {
  pub id: LegalPageId,
  pub title: String,
  pub description: String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LegalPageDraft {
  pub title: String,
  pub description: String,
}
