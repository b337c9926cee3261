// server/src/web/handlers/mod.rs

pub mod cart_handlers;
pub mod image_handlers;
pub mod legal_page_handlers;
pub mod product_handlers;
