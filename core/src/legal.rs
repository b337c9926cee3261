// core/src/legal.rs

//! Legal-page CMS.
//!
//! `description` is stored and returned as raw HTML. Nothing here escapes or
//! sanitizes it; whoever can write pages can put markup in front of every
//! visitor, so write access belongs behind the admin boundary.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, instrument};

use crate::error::{ShopError, ShopResult, ValidationErrors};
use crate::models::{LegalPage, LegalPageDraft, LegalPageId};
use crate::store::LegalPageStore;

const TITLE_MAX: usize = 255;

#[derive(Debug, Default, Deserialize)]
pub struct LegalPagePayload {
  #[serde(default)]
  pub title: Option<String>,
  #[serde(default)]
  pub description: Option<String>,
}

impl LegalPagePayload {
  pub fn validate(self) -> Result<LegalPageDraft, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let title = self.title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty());
    match &title {
      None => errors.add("title", "The title field is required."),
      Some(t) if t.chars().count() > TITLE_MAX => errors.add(
        "title",
        format!("The title field must not be greater than {} characters.", TITLE_MAX),
      ),
      Some(_) => {}
    }
    // HTML bodies keep their whitespace; only an all-blank body counts as missing.
    let description = self.description.filter(|d| !d.trim().is_empty());
    if description.is_none() {
      errors.add("description", "The description field is required.");
    }

    match (title, description) {
      (Some(title), Some(description)) if errors.is_empty() => Ok(LegalPageDraft { title, description }),
      _ => Err(errors),
    }
  }
}

#[derive(Clone)]
pub struct LegalPageService {
  pages: Arc<dyn LegalPageStore>,
}

impl LegalPageService {
  pub fn new(pages: Arc<dyn LegalPageStore>) -> Self {
    Self { pages }
  }

  pub async fn list(&self) -> ShopResult<Vec<LegalPage>> {
    self.pages.list_legal_pages().await
  }

  pub async fn get(&self, id: LegalPageId) -> ShopResult<LegalPage> {
    self
      .pages
      .get_legal_page(id)
      .await?
      .ok_or_else(|| ShopError::not_found("Legal page", id))
  }

  #[instrument(name = "legal::create", skip(self, payload), err(Display))]
  pub async fn create(&self, payload: LegalPagePayload) -> ShopResult<LegalPage> {
    let draft = payload.validate()?;
    let page = self.pages.create_legal_page(&draft).await?;
    info!(legal_page_id = page.id, "Legal page created.");
    Ok(page)
  }

  #[instrument(name = "legal::update", skip(self, payload), err(Display))]
  pub async fn update(&self, id: LegalPageId, payload: LegalPagePayload) -> ShopResult<LegalPage> {
    self.get(id).await?;
    let draft = payload.validate()?;
    self
      .pages
      .update_legal_page(id, &draft)
      .await?
      .ok_or_else(|| ShopError::not_found("Legal page", id))
  }

  #[instrument(name = "legal::delete", skip(self), err(Display))]
  pub async fn delete(&self, id: LegalPageId) -> ShopResult<()> {
    if self.pages.delete_legal_page(id).await? {
      info!(legal_page_id = id, "Legal page deleted.");
      Ok(())
    } else {
      Err(ShopError::not_found("Legal page", id))
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn html_is_kept_verbatim() {
    let draft = LegalPagePayload {
      title: Some("  Terms  ".to_string()),
      description: Some("<p onclick=\"x()\">Hi</p>\n".to_string()),
    }
    .validate()
    .unwrap();
    assert_eq!(draft.title, "Terms");
    assert_eq!(draft.description, "<p onclick=\"x()\">Hi</p>\n");
  }

  #[test]
  fn both_fields_are_required() {
    let errors = LegalPagePayload::default().validate().unwrap_err();
    assert!(errors.has("title"));
    assert!(errors.has("description"));
  }

  #[test]
  fn long_titles_are_rejected() {
    let errors = LegalPagePayload {
      title: Some("t".repeat(256)),
      description: Some("<p>body</p>".to_string()),
    }
    .validate()
    .unwrap_err();
    assert_eq!(
      errors.messages("title"),
      ["The title field must not be greater than 255 characters."]
    );
  }
}
