// core/src/catalog.rs

//! Product catalog: validated CRUD over a [`ProductStore`] plus image uploads.
//!
//! Deleting a product never touches cart lines; lines keep their snapshot.

use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{info, instrument, warn};

use crate::error::{ShopError, ShopResult, ValidationErrors};
use crate::images::{ImageStore, ImageUpload};
use crate::models::{Product, ProductDraft, ProductId};
use crate::store::ProductStore;

const NAME_MAX: usize = 255;
const ATTRIBUTE_MAX: usize = 100;

/// Largest value a NUMERIC(10, 2) column holds.
fn max_price() -> Decimal {
  Decimal::new(99_999_999_99, 2)
}

/// Product form fields as submitted, before validation.
#[derive(Debug, Clone, Default)]
pub struct ProductForm {
  pub name: Option<String>,
  pub details: Option<String>,
  pub price: Option<String>,
  pub size: Option<String>,
  pub color: Option<String>,
  pub category: Option<String>,
  pub image: Option<ImageUpload>,
}

/// Validated form: the draft plus the extension to store a new image under.
#[derive(Debug)]
struct ValidatedProduct {
  draft: ProductDraft,
  image: Option<(&'static str, Vec<u8>)>,
}

impl ProductForm {
  fn validate(self, image_required: bool, max_image_kb: usize) -> Result<ValidatedProduct, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let name = required_text(&mut errors, "name", self.name, Some(NAME_MAX));
    let details = required_text(&mut errors, "details", self.details, None);
    let price = required_price(&mut errors, self.price);
    let size = required_text(&mut errors, "size", self.size, Some(ATTRIBUTE_MAX));
    let color = required_text(&mut errors, "color", self.color, Some(ATTRIBUTE_MAX));
    let category = required_text(&mut errors, "category", self.category, Some(ATTRIBUTE_MAX));

    let image = match self.image.filter(|upload| !upload.bytes.is_empty()) {
      Some(upload) => upload
        .validate("image", max_image_kb, &mut errors)
        .map(|ext| (ext, upload.bytes)),
      None => {
        if image_required {
          errors.add("image", "The image field is required.");
        }
        None
      }
    };

    match (name, details, price, size, color, category) {
      (Some(name), Some(details), Some(price), Some(size), Some(color), Some(category)) if errors.is_empty() => {
        Ok(ValidatedProduct {
          draft: ProductDraft {
            name,
            details,
            price,
            size,
            color,
            category,
            image: None,
          },
          image,
        })
      }
      _ => Err(errors),
    }
  }
}

fn required_text(errors: &mut ValidationErrors, field: &str, value: Option<String>, max: Option<usize>) -> Option<String> {
  let value = value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
  let Some(value) = value else {
    errors.add(field, format!("The {} field is required.", field));
    return None;
  };
  if let Some(max) = max {
    if value.chars().count() > max {
      errors.add(
        field,
        format!("The {} field must not be greater than {} characters.", field, max),
      );
      return None;
    }
  }
  Some(value)
}

fn required_price(errors: &mut ValidationErrors, value: Option<String>) -> Option<Decimal> {
  let raw = required_text(errors, "price", value, None)?;
  let parsed = Decimal::from_str(&raw)
    .or_else(|_| Decimal::from_scientific(&raw))
    .map(|price| price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero));
  // The bound applies to the value that would be stored.
  match parsed {
    Ok(price) if price.abs() > max_price() => {
      errors.add("price", format!("The price field must not be greater than {}.", max_price()));
      None
    }
    Ok(price) => Some(price),
    Err(_) => {
      errors.add("price", "The price field must be a number.");
      None
    }
  }
}

#[derive(Clone)]
pub struct CatalogService {
  products: Arc<dyn ProductStore>,
  images: Arc<dyn ImageStore>,
  max_image_kb: usize,
}

impl CatalogService {
  pub fn new(products: Arc<dyn ProductStore>, images: Arc<dyn ImageStore>, max_image_kb: usize) -> Self {
    Self {
      products,
      images,
      max_image_kb,
    }
  }

  /// Newest first.
  pub async fn list(&self) -> ShopResult<Vec<Product>> {
    self.products.list_products().await
  }

  pub async fn get(&self, id: ProductId) -> ShopResult<Product> {
    self
      .products
      .get_product(id)
      .await?
      .ok_or_else(|| ShopError::not_found("Product", id))
  }

  #[instrument(name = "catalog::create", skip(self, form), err(Display))]
  pub async fn create(&self, form: ProductForm) -> ShopResult<Product> {
    let validated = form.validate(true, self.max_image_kb)?;
    let (ext, bytes) = validated
      .image
      .ok_or_else(|| ShopError::Internal("validated product form lost its image".to_string()))?;
    let image_name = self.images.save(ext, &bytes).await?;

    let product = self.products.create_product(&validated.draft, &image_name).await?;
    info!(product_id = product.id, image = %product.image, "Product created.");
    Ok(product)
  }

  /// Looks the product up before validating, so an unknown id is a 404 even
  /// when the form is also invalid.
  #[instrument(name = "catalog::update", skip(self, form), err(Display))]
  pub async fn update(&self, id: ProductId, form: ProductForm) -> ShopResult<Product> {
    self.get(id).await?;
    let ValidatedProduct { mut draft, image } = form.validate(false, self.max_image_kb)?;
    if let Some((ext, bytes)) = image {
      draft.image = Some(self.images.save(ext, &bytes).await?);
    }

    match self.products.update_product(id, &draft).await? {
      Some(product) => {
        info!(product_id = id, "Product updated.");
        Ok(product)
      }
      None => {
        warn!(product_id = id, "Product vanished during update.");
        Err(ShopError::not_found("Product", id))
      }
    }
  }

  #[instrument(name = "catalog::delete", skip(self), err(Display))]
  pub async fn delete(&self, id: ProductId) -> ShopResult<()> {
    if self.products.delete_product(id).await? {
      info!(product_id = id, "Product deleted.");
      Ok(())
    } else {
      Err(ShopError::not_found("Product", id))
    }
  }

  pub async fn image(&self, file_name: &str) -> ShopResult<Vec<u8>> {
    self.images.open(file_name).await
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn form() -> ProductForm {
    ProductForm {
      name: Some("Canvas Tote".to_string()),
      details: Some("Heavy cotton canvas.".to_string()),
      price: Some("24.5".to_string()),
      size: Some("One size".to_string()),
      color: Some("Natural".to_string()),
      category: Some("Bags".to_string()),
      image: None,
    }
  }

  #[test]
  fn update_form_without_image_is_valid() {
    let validated = form().validate(false, 2048).unwrap();
    assert_eq!(validated.draft.price, Decimal::new(2450, 2));
    assert!(validated.image.is_none());
  }

  #[test]
  fn create_form_requires_image() {
    let errors = form().validate(true, 2048).unwrap_err();
    assert_eq!(errors.messages("image"), ["The image field is required."]);
  }

  #[test]
  fn reports_every_invalid_field() {
    let errors = ProductForm {
      name: Some("x".repeat(256)),
      price: Some("twelve".to_string()),
      size: Some("  ".to_string()),
      ..form()
    }
    .validate(false, 2048)
    .unwrap_err();

    assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["name", "price", "size"]);
    assert_eq!(errors.messages("price"), ["The price field must be a number."]);
  }

  #[test]
  fn prices_are_rounded_to_cents() {
    let validated = ProductForm {
      price: Some("10.005".to_string()),
      ..form()
    }
    .validate(false, 2048)
    .unwrap();
    assert_eq!(validated.draft.price.to_string(), "10.01");
  }

  #[test]
  fn price_bound_is_checked_after_rounding() {
    let price = |raw: &str| ProductForm {
      price: Some(raw.to_string()),
      ..form()
    };

    let validated = price("99999999.994").validate(false, 2048).unwrap();
    assert_eq!(validated.draft.price.to_string(), "99999999.99");

    let errors = price("99999999.995").validate(false, 2048).unwrap_err();
    assert_eq!(
      errors.messages("price"),
      ["The price field must not be greater than 99999999.99."]
    );
  }
}
