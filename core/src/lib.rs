// core/src/lib.rs

//! Storefront: session carts, a product catalog and legal pages.
//!
//! The cart is the interesting part:
//!  - Lines are keyed by (session, product) and accumulate quantity on repeat adds.
//!  - Each line snapshots the product (name, image, attributes, unit price) when
//!    first added; later catalog edits do not reach it.
//!  - A per-session quick-cache mirrors the latest add for the header badge and is
//!    never used for totals.
//!
//! Cart writes run as small step pipelines (see [`flow`]), so each stage logs
//! under its own span and a failing check stops the run before any store is touched.

pub mod cart;
pub mod catalog;
pub mod error;
pub mod flow;
pub mod images;
pub mod legal;
pub mod models;
pub mod session_cache;
pub mod store;

pub use crate::cart::{AddToCart, AddToCartPayload, CartService};
pub use crate::catalog::{CatalogService, ProductForm};
pub use crate::error::{PipelineError, ShopError, ShopResult, ValidationErrors};
pub use crate::flow::{ContextData, Pipeline, PipelineControl, PipelineResult};
pub use crate::images::{ImageStore, ImageUpload, LocalImageStore};
pub use crate::legal::{LegalPagePayload, LegalPageService};
pub use crate::session_cache::{MemorySessionCache, SessionCache, DEFAULT_SESSION_IDLE_TTL};
pub use crate::store::{CartStore, LegalPageStore, MemoryStore, PgStore, ProductStore};
