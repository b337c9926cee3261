// server/src/main.rs

use actix_web::{web as actix_data, App, HttpServer};
use std::sync::Arc;
use storefront_server::web::configure_app_routes;
use storefront_server::{AppConfig, AppState};
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  let subscriber = tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_span_events(FmtSpan::CLOSE);
  // LOG_FORMAT=json for log shippers; human-readable otherwise.
  if std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")) {
    subscriber.json().init();
  } else {
    subscriber.init();
  }

  tracing::info!("Starting storefront server...");

  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      return Err(std::io::Error::other(e.to_string()));
    }
  };

  let app_state = match AppState::from_config(app_config.clone()).await {
    Ok(state) => state,
    Err(e) => {
      tracing::error!(error = %e, "Failed to initialize storage.");
      return Err(std::io::Error::other(e.to_string()));
    }
  };
  tracing::info!(steps = ?app_state.cart.add_pipeline_steps(), "Cart pipelines ready.");

  let server_address = app_config.bind_address();
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .configure(configure_app_routes)
      .wrap(tracing_actix_web::TracingLogger::default())
  })
  .bind(&server_address)?
  .run()
  .await
}
