// server/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use storefront::images::DEFAULT_MAX_IMAGE_KB;
use storefront::DEFAULT_SESSION_IDLE_TTL;

pub const DEFAULT_SESSION_COOKIE: &str = "storefront_session";

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  /// Postgres is used when set; otherwise everything lives in memory.
  pub database_url: Option<String>,
  pub run_migrations: bool,
  pub image_dir: PathBuf,
  pub session_cookie: String,
  pub max_image_kb: usize,
  /// Quick-cache sessions idle longer than this are dropped.
  pub session_idle_ttl: Duration,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok();

    let get_env = |var_name: &str| env::var(var_name).ok().filter(|v| !v.trim().is_empty());

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .unwrap_or_else(|| "8080".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let database_url = get_env("DATABASE_URL");
    let run_migrations = get_env("RUN_MIGRATIONS")
      .unwrap_or_else(|| "false".to_string())
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid RUN_MIGRATIONS value: {}", e)))?;
    let image_dir = PathBuf::from(get_env("IMAGE_DIR").unwrap_or_else(|| "public/images".to_string()));
    let session_cookie = get_env("SESSION_COOKIE").unwrap_or_else(|| DEFAULT_SESSION_COOKIE.to_string());
    let max_image_kb = match get_env("MAX_IMAGE_KB") {
      Some(raw) => raw
        .parse::<usize>()
        .map_err(|e| AppError::Config(format!("Invalid MAX_IMAGE_KB: {}", e)))?,
      None => DEFAULT_MAX_IMAGE_KB,
    };
    let session_idle_ttl = match get_env("SESSION_IDLE_MINUTES") {
      Some(raw) => raw
        .parse::<u64>()
        .map(|minutes| Duration::from_secs(minutes * 60))
        .map_err(|e| AppError::Config(format!("Invalid SESSION_IDLE_MINUTES: {}", e)))?,
      None => DEFAULT_SESSION_IDLE_TTL,
    };

    if run_migrations && database_url.is_none() {
      tracing::warn!("RUN_MIGRATIONS is set but DATABASE_URL is not; nothing to migrate.");
    }
    tracing::info!(
      backend = if database_url.is_some() { "postgres" } else { "memory" },
      image_dir = %image_dir.display(),
      "Application configuration loaded successfully."
    );

    Ok(Self {
      server_host,
      server_port,
      database_url,
      run_migrations,
      image_dir,
      session_cookie,
      max_image_kb,
      session_idle_ttl,
    })
  }

  /// In-memory configuration with images under `image_dir`.
  pub fn local(image_dir: impl Into<PathBuf>) -> Self {
    Self {
      server_host: "127.0.0.1".to_string(),
      server_port: 8080,
      database_url: None,
      run_migrations: false,
      image_dir: image_dir.into(),
      session_cookie: DEFAULT_SESSION_COOKIE.to_string(),
      max_image_kb: DEFAULT_MAX_IMAGE_KB,
      session_idle_ttl: DEFAULT_SESSION_IDLE_TTL,
    }
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}
