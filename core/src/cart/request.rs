// core/src/cart/request.rs

//! Request body for `POST /add-to-cart` and its validation rules.

use serde::Deserialize;
use serde_json::Value;

use crate::error::ValidationErrors;
use crate::models::ProductId;

/// Smallest quantity a single add may carry.
pub const MIN_ADD_QTY: i32 = 1;
/// Largest quantity a single add may carry. The accumulated line is uncapped.
pub const MAX_ADD_QTY: i32 = 5;

/// Raw body as sent by the browser. Fields stay untyped so that a wrong type
/// is reported as a field error instead of a deserialization failure.
#[derive(Debug, Default, Deserialize)]
pub struct AddToCartPayload {
  #[serde(default)]
  pub id: Option<Value>,
  #[serde(default)]
  pub qty: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddToCart {
  pub product_id: ProductId,
  pub qty: i32,
}

impl AddToCartPayload {
  pub fn validate(&self) -> Result<AddToCart, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let product_id = required_integer(&mut errors, "id", self.id.as_ref());
    let qty = required_integer(&mut errors, "qty", self.qty.as_ref()).and_then(|qty| {
      if let Err(message) = check_add_quantity(qty) {
        errors.add("qty", message);
        return None;
      }
      i32::try_from(qty).ok()
    });

    match (product_id, qty) {
      (Some(product_id), Some(qty)) if errors.is_empty() => Ok(AddToCart { product_id, qty }),
      _ => Err(errors),
    }
  }
}

/// Range rule for one add, shared by the HTTP payload and the cart pipeline.
pub fn check_add_quantity(qty: i64) -> Result<(), String> {
  if qty < i64::from(MIN_ADD_QTY) {
    Err(format!("The qty field must be at least {}.", MIN_ADD_QTY))
  } else if qty > i64::from(MAX_ADD_QTY) {
    Err(format!("The qty field must not be greater than {}.", MAX_ADD_QTY))
  } else {
    Ok(())
  }
}

fn required_integer(errors: &mut ValidationErrors, field: &str, value: Option<&Value>) -> Option<i64> {
  let parsed = match value {
    None | Some(Value::Null) => {
      errors.add(field, format!("The {} field is required.", field));
      return None;
    }
    Some(Value::String(s)) if s.trim().is_empty() => {
      errors.add(field, format!("The {} field is required.", field));
      return None;
    }
    Some(Value::Number(n)) => n.as_i64(),
    Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
    Some(_) => None,
  };
  if parsed.is_none() {
    errors.add(field, format!("The {} field must be an integer.", field));
  }
  parsed
}
