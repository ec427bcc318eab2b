//! HTTP server wiring for the OVAL advisory store.
//!
//! Loads [`ServerConfig`] and wraps the [`oval_api`] router with request
//! tracing. The binary in `main.rs` only parses flags and serves.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::Router;
use config::{
  Config, ConfigError, Environment, File,
  builder::{ConfigBuilder, DefaultState},
};
use oval_store_sqlite::SqliteStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `OVAL_*` environment variables.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ServerConfig {
  pub host:    String,
  pub port:    u16,
  pub db_path: PathBuf,
}

impl ServerConfig {
  /// Load from an optional TOML file at `path`, then the environment.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    defaults()?
      .add_source(File::from(path).required(false))
      .add_source(Environment::with_prefix("OVAL"))
      .build()?
      .try_deserialize()
  }

  /// `db_path` with a leading `~/` expanded to the user's home directory.
  pub fn resolved_db_path(&self) -> PathBuf { expand_tilde(&self.db_path) }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
  Config::builder()
    .set_default("host", "127.0.0.1")?
    .set_default("port", 1324_i64)?
    .set_default("db_path", "oval.sqlite3")
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router over `store`.
pub fn app(store: SqliteStore) -> Router {
  oval_api::api_router(Arc::new(store)).layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use config::FileFormat;
  use tower::ServiceExt as _;

  fn from_toml(toml: &str) -> ServerConfig {
    defaults()
      .unwrap()
      .add_source(File::from_str(toml, FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap()
  }

  #[test]
  fn config_defaults_apply() {
    let cfg = from_toml("");
    assert_eq!(cfg, ServerConfig {
      host:    "127.0.0.1".into(),
      port:    1324,
      db_path: PathBuf::from("oval.sqlite3"),
    });
  }

  #[test]
  fn config_file_overrides_defaults() {
    let cfg = from_toml(
      r#"
        host    = "0.0.0.0"
        port    = 8080
        db_path = "/var/lib/oval/oval.sqlite3"
      "#,
    );
    assert_eq!(cfg.host, "0.0.0.0");
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.db_path, PathBuf::from("/var/lib/oval/oval.sqlite3"));
  }

  #[test]
  fn missing_config_file_is_not_an_error() {
    let cfg = ServerConfig::load(Path::new("/nonexistent/oval.toml")).unwrap();
    assert_eq!(cfg.db_path, PathBuf::from("oval.sqlite3"));
  }

  #[test]
  fn absolute_db_path_is_untouched() {
    let p = Path::new("/srv/oval.sqlite3");
    assert_eq!(expand_tilde(p), p);
  }

  #[tokio::test]
  async fn app_serves_health() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let req = Request::builder()
      .uri("/health")
      .body(Body::empty())
      .unwrap();
    let resp = app(store).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
  }
}
