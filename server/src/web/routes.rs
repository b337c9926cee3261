// server/src/web/routes.rs

use actix_web::error::JsonPayloadError;
use actix_web::{web, HttpRequest};

use crate::errors::AppError;
use crate::web::handlers::{cart_handlers, image_handlers, legal_page_handlers, product_handlers};

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
  AppError::Payload(err.to_string()).into()
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .app_data(web::JsonConfig::default().error_handler(json_error_handler))
    .route("/health", web::get().to(health_check_handler))
    // Cart
    .route("/cart", web::get().to(cart_handlers::list_cart_handler))
    .route("/cart/summary", web::get().to(cart_handlers::cart_summary_handler))
    .route("/add-to-cart", web::post().to(cart_handlers::add_to_cart_handler))
    .route(
      "/cart/{product_id}",
      web::delete().to(cart_handlers::remove_from_cart_handler),
    )
    // Catalog
    .service(
      web::scope("/products")
        .route("", web::get().to(product_handlers::list_products_handler))
        .route("", web::post().to(product_handlers::create_product_handler))
        .route("/{product_id}/edit", web::get().to(product_handlers::get_product_handler))
        .route("/{product_id}", web::post().to(product_handlers::update_product_handler))
        .route("/{product_id}", web::delete().to(product_handlers::delete_product_handler)),
    )
    // Legal pages
    .service(
      web::scope("/api/legal-pages")
        .route("", web::get().to(legal_page_handlers::list_legal_pages_handler))
        .route("", web::post().to(legal_page_handlers::create_legal_page_handler))
        .route("/{id}/edit", web::get().to(legal_page_handlers::get_legal_page_handler))
        .route("/{id}", web::get().to(legal_page_handlers::get_legal_page_handler))
        .route("/{id}", web::post().to(legal_page_handlers::update_legal_page_handler))
        .route("/{id}", web::delete().to(legal_page_handlers::delete_legal_page_handler)),
    )
    .route("/images/{file_name}", web::get().to(image_handlers::serve_image_handler));
}
