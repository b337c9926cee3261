// core/src/images.rs

//! Product image uploads: type/size checks and storage under the public
//! image directory.
//!
//! Stored names are `<unix-millis>.<ext>`. Two uploads with the same extension
//! in the same millisecond collide; the second fails instead of overwriting.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument};

use crate::error::{ShopError, ShopResult, ValidationErrors};

pub const ALLOWED_IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];
/// Declared part types accepted alongside the sniffed content. A generic
/// binary type counts as undeclared.
const ALLOWED_IMAGE_TYPES: [&str; 5] = ["image/jpeg", "image/jpg", "image/png", "image/webp", "application/octet-stream"];
pub const DEFAULT_MAX_IMAGE_KB: usize = 2048;

/// A file part as received from a multipart form.
#[derive(Debug, Clone, Default)]
pub struct ImageUpload {
  pub file_name: Option<String>,
  pub content_type: Option<String>,
  pub bytes: Vec<u8>,
}

impl ImageUpload {
  /// Extension implied by the file's leading bytes, if it is a supported image.
  pub fn sniff_extension(&self) -> Option<&'static str> {
    let b = &self.bytes;
    if b.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
      Some("png")
    } else if b.starts_with(&[0xFF, 0xD8, 0xFF]) {
      Some("jpg")
    } else if b.len() >= 12 && &b[0..4] == b"RIFF" && &b[8..12] == b"WEBP" {
      Some("webp")
    } else {
      None
    }
  }

  fn declared_extension(&self) -> Option<String> {
    self
      .file_name
      .as_deref()
      .and_then(|name| Path::new(name).extension())
      .and_then(|ext| ext.to_str())
      .map(str::to_ascii_lowercase)
  }

  /// The declared type without parameters, lowercased.
  fn declared_type(&self) -> Option<String> {
    self
      .content_type
      .as_deref()
      .and_then(|ct| ct.split(';').next())
      .map(|essence| essence.trim().to_ascii_lowercase())
      .filter(|essence| !essence.is_empty())
  }

  /// Checks type and size, recording messages under `field`. Returns the
  /// extension to store the file with.
  pub fn validate(&self, field: &str, max_kb: usize, errors: &mut ValidationErrors) -> Option<&'static str> {
    if self.bytes.is_empty() {
      errors.add(field, format!("The {} field is required.", field));
      return None;
    }

    let sniffed = self.sniff_extension();
    let declared_ok = self
      .declared_extension()
      .map_or(true, |ext| ALLOWED_IMAGE_EXTENSIONS.contains(&ext.as_str()));
    let type_ok = self
      .declared_type()
      .map_or(true, |ct| ALLOWED_IMAGE_TYPES.contains(&ct.as_str()));
    let mut ok = true;
    if sniffed.is_none() || !declared_ok || !type_ok {
      errors.add(field, format!("The {} field must be an image.", field));
      errors.add(
        field,
        format!(
          "The {} field must be a file of type: {}.",
          field,
          ALLOWED_IMAGE_EXTENSIONS.join(", ")
        ),
      );
      ok = false;
    }
    if self.bytes.len() > max_kb * 1024 {
      errors.add(
        field,
        format!("The {} field must not be greater than {} kilobytes.", field, max_kb),
      );
      ok = false;
    }
    if ok {
      sniffed
    } else {
      None
    }
  }
}

#[async_trait]
pub trait ImageStore: Send + Sync {
  /// Persists the bytes and returns the generated file name.
  async fn save(&self, extension: &str, bytes: &[u8]) -> ShopResult<String>;
  async fn open(&self, file_name: &str) -> ShopResult<Vec<u8>>;
}

#[derive(Debug, Clone)]
pub struct LocalImageStore {
  dir: PathBuf,
}

impl LocalImageStore {
  pub fn new(dir: impl Into<PathBuf>) -> Self {
    Self { dir: dir.into() }
  }
}

/// Only bare file names produced by `save` are servable.
fn is_safe_file_name(name: &str) -> bool {
  !name.is_empty() && !name.contains(['/', '\\']) && !name.contains("..") && !name.starts_with('.')
}

#[async_trait]
impl ImageStore for LocalImageStore {
  #[instrument(name = "images::save", skip(self, bytes), fields(size = bytes.len()), err(Display))]
  async fn save(&self, extension: &str, bytes: &[u8]) -> ShopResult<String> {
    tokio::fs::create_dir_all(&self.dir).await?;
    let file_name = format!("{}.{}", Utc::now().timestamp_millis(), extension);
    let path = self.dir.join(&file_name);

    let mut file = tokio::fs::OpenOptions::new()
      .write(true)
      .create_new(true)
      .open(&path)
      .await?;
    file.write_all(bytes).await?;
    file.flush().await?;

    info!(%file_name, "Stored uploaded image.");
    Ok(file_name)
  }

  async fn open(&self, file_name: &str) -> ShopResult<Vec<u8>> {
    if !is_safe_file_name(file_name) {
      debug!(%file_name, "Rejected unsafe image name.");
      return Err(ShopError::NotFound(format!("Image {} not found.", file_name)));
    }
    match tokio::fs::read(self.dir.join(file_name)).await {
      Ok(bytes) => Ok(bytes),
      Err(e) if e.kind() == ErrorKind::NotFound => Err(ShopError::NotFound(format!("Image {} not found.", file_name))),
      Err(e) => Err(e.into()),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const PNG_HEADER: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

  fn upload(name: &str, bytes: Vec<u8>) -> ImageUpload {
    ImageUpload {
      file_name: Some(name.to_string()),
      content_type: None,
      bytes,
    }
  }

  #[test]
  fn sniffs_supported_formats() {
    assert_eq!(upload("a.png", PNG_HEADER.to_vec()).sniff_extension(), Some("png"));
    assert_eq!(upload("a.jpg", vec![0xFF, 0xD8, 0xFF, 0xE0]).sniff_extension(), Some("jpg"));
    let mut webp = b"RIFF".to_vec();
    webp.extend_from_slice(&[0, 0, 0, 0]);
    webp.extend_from_slice(b"WEBP");
    assert_eq!(upload("a.webp", webp).sniff_extension(), Some("webp"));
    assert_eq!(upload("a.gif", b"GIF89a".to_vec()).sniff_extension(), None);
  }

  #[test]
  fn rejects_non_images_and_oversized_files() {
    let mut errors = ValidationErrors::new();
    assert!(upload("notes.txt", b"hello".to_vec()).validate("image", 2048, &mut errors).is_none());
    assert_eq!(errors.messages("image")[0], "The image field must be an image.");

    let mut big = PNG_HEADER.to_vec();
    big.resize(3 * 1024, 0);
    let mut errors = ValidationErrors::new();
    assert!(upload("big.png", big).validate("image", 2, &mut errors).is_none());
    assert_eq!(
      errors.messages("image"),
      ["The image field must not be greater than 2 kilobytes."]
    );
  }

  #[test]
  fn declared_type_must_be_an_image() {
    let mut disguised = upload("photo.png", PNG_HEADER.to_vec());
    disguised.content_type = Some("text/html; charset=utf-8".to_string());
    let mut errors = ValidationErrors::new();
    assert!(disguised.validate("image", 2048, &mut errors).is_none());
    assert_eq!(errors.messages("image")[0], "The image field must be an image.");

    let mut declared = upload("photo.png", PNG_HEADER.to_vec());
    declared.content_type = Some("Image/PNG".to_string());
    let mut errors = ValidationErrors::new();
    assert_eq!(declared.validate("image", 2048, &mut errors), Some("png"));
    assert!(errors.is_empty());
  }

  #[test]
  fn rejects_path_like_names() {
    assert!(!is_safe_file_name("../secret"));
    assert!(!is_safe_file_name("a/b.png"));
    assert!(!is_safe_file_name(".env"));
    assert!(is_safe_file_name("1734500000000.png"));
  }
}
