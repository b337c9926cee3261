// server/src/session.rs

//! Cookie-carried cart session.
//!
//! The token is a server-issued UUID v4. Anything else in the cookie is treated
//! as absent, and a new token is minted for the request.

use actix_web::cookie::{Cookie, SameSite};
use actix_web::{web, FromRequest, HttpRequest, HttpResponseBuilder};
use futures_util::future::{ready, Ready};
use tracing::debug;
use uuid::Uuid;

use crate::config::DEFAULT_SESSION_COOKIE;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Clone)]
pub struct CartSession {
  pub id: String,
  cookie_name: String,
  fresh: bool,
}

impl CartSession {
  /// Adds the `Set-Cookie` header for a freshly minted token.
  pub fn attach(&self, builder: &mut HttpResponseBuilder) {
    if self.fresh {
      builder.cookie(
        Cookie::build(self.cookie_name.clone(), self.id.clone())
          .path("/")
          .http_only(true)
          .same_site(SameSite::Lax)
          .finish(),
      );
    }
  }
}

impl FromRequest for CartSession {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
    let cookie_name = req
      .app_data::<web::Data<AppState>>()
      .map(|state| state.config.session_cookie.clone())
      .unwrap_or_else(|| DEFAULT_SESSION_COOKIE.to_string());

    let existing = req
      .cookie(&cookie_name)
      .and_then(|cookie| Uuid::parse_str(cookie.value()).ok());

    let session = match existing {
      Some(token) => CartSession {
        id: token.to_string(),
        cookie_name,
        fresh: false,
      },
      None => {
        let token = Uuid::new_v4();
        debug!(session = %token, "Issuing new cart session.");
        CartSession {
          id: token.to_string(),
          cookie_name,
          fresh: true,
        }
      }
    };
    ready(Ok(session))
  }
}
