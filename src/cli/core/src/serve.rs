/* src/cli/core/src/serve.rs */

use anyhow::{Context, Result};
use axum::Json;
use axum::Router;
use axum::http::Uri;
use localeroute::RoutingEngine;
use localeroute_axum::{AxumError, IntoLocaleRouter, Localizer};
use serde_json::{Value, json};

use crate::ui;

/// Every routed request echoes what the engine resolved.
pub fn preview_router(engine: RoutingEngine) -> Router {
  Router::new().fallback(echo).with_locale_routing(engine)
}

async fn echo(localizer: Result<Localizer, AxumError>, uri: Uri) -> Json<Value> {
  let Ok(localizer) = localizer else {
    return Json(json!({ "path": uri.path(), "routed": false }));
  };
  let alternates = localizer.alternates().unwrap_or_default();
  Json(json!({
    "path": uri.path(),
    "routed": true,
    "locale": localizer.locale(),
    "source": localizer.context().source(),
    "domain": localizer.context().domain(),
    "route": localizer.context().route(),
    "alternates": alternates,
  }))
}

pub async fn run_serve(engine: RoutingEngine, addr: &str) -> Result<()> {
  let router = preview_router(engine);
  let listener =
    tokio::net::TcpListener::bind(addr).await.with_context(|| format!("failed to bind {addr}"))?;
  let local_addr = listener.local_addr()?;
  ui::ok(&format!("preview server on http://{local_addr}"));
  tracing::info!(%local_addr, "serving");
  axum::serve(listener, router).await.context("server error")?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use axum::body::Body;
  use axum::http::{Request, StatusCode, header};
  use localeroute::RoutingConfig;
  use tower::ServiceExt;

  use super::*;

  #[tokio::test]
  async fn echoes_resolved_locale() {
    let config = RoutingConfig::new(vec!["en".into(), "de".into()], "en");
    let engine = RoutingEngine::new(config).unwrap();
    let request = Request::builder()
      .uri("/de/shop")
      .header(header::HOST, "localhost")
      .body(Body::empty())
      .unwrap();
    let response = preview_router(engine).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["locale"], "de");
    assert_eq!(body["path"], "/shop");
    assert_eq!(body["source"], "prefix");
    assert_eq!(body["alternates"][1]["href"], "http://localhost/de/shop");
  }
}
